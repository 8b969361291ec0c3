mod render;

use clap::{Parser, Subcommand};
use railway::prelude::*;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "View and manage Railway projects, services and deployments")]
struct Cli {
    /// Print the raw result envelope as JSON
    #[arg(long, global = true)]
    json: bool,
    /// API token (overrides RAILWAY_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    /// GraphQL endpoint (overrides RAILWAY_API_URL)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Template code used by create-service (overrides RAILWAY_SERVICE_TEMPLATE)
    #[arg(long, global = true)]
    template: Option<String>,
    /// Request timeout in seconds; no timeout when omitted
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authenticated account and its workspaces
    Me,
    /// List projects
    Projects,
    /// Show one project with its services, deployments and environments
    Project {
        /// Project id
        id: String,
    },
    /// Create a project
    CreateProject {
        /// Name of the new project
        name: String,
    },
    /// Delete a project
    DeleteProject {
        /// Project id
        id: String,
    },
    /// Show a template and whether it can be deployed
    Template {
        /// Template code
        code: String,
    },
    /// Create a service by deploying a template into an environment
    CreateService {
        #[arg(short, long)]
        project: String,
        #[arg(short, long)]
        environment: String,
    },
    /// Create a service from a GitHub repository
    CreateRepoService {
        #[arg(short, long)]
        project: String,
        /// Repository in owner/name form
        #[arg(short, long)]
        repo: String,
    },
    /// Delete a service from an environment
    DeleteService {
        #[arg(short, long)]
        environment: String,
        #[arg(short, long)]
        service: String,
    },
    /// Trigger a deployment of a service
    Deploy {
        #[arg(short, long)]
        project: String,
        #[arg(short, long)]
        service: String,
        #[arg(short, long)]
        environment: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();
    let gateway = match build_config(&cli).and_then(Gateway::from_config) {
        Ok(gateway) => gateway,
        Err(e) if e.is_configuration() => {
            eprintln!("✗ {}", e);
            eprintln!("  Check the RAILWAY_* environment variables or the matching flags.");
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    let success = match cli.command {
        Commands::Me => {
            let envelope = gateway.me().await;
            emit(cli.json, envelope, render::account)
        }
        Commands::Projects => {
            let envelope = gateway.list_projects().await;
            emit(cli.json, envelope, |projects| render::project_list(projects))
        }
        Commands::Project { id } => {
            let envelope = gateway.get_project(&id).await;
            emit(cli.json, envelope, render::project)
        }
        Commands::CreateProject { name } => {
            let envelope = gateway.create_project(&name).await;
            emit(cli.json, envelope, |stub| {
                format!("Created project {} ({})", name, stub.id)
            })
        }
        Commands::DeleteProject { id } => {
            let envelope = gateway.delete_project(&id).await;
            emit_done(cli.json, envelope, format!("Deleted project {}", id))
        }
        Commands::Template { code } => {
            let envelope = gateway.get_template(&code).await;
            emit(cli.json, envelope, render::template)
        }
        Commands::CreateService {
            project,
            environment,
        } => {
            let envelope = match cli.template.as_deref() {
                Some(code) => {
                    gateway
                        .create_service_from_template(code, &project, &environment)
                        .await
                }
                None => gateway.create_service(&project, &environment).await,
            };
            emit(cli.json, envelope, render::template_deployment)
        }
        Commands::CreateRepoService { project, repo } => {
            let envelope = gateway.create_repo_service(&project, &repo).await;
            emit(cli.json, envelope, |service| {
                format!("Created service {} ({}) from {}", service.name, service.id, repo)
            })
        }
        Commands::DeleteService {
            environment,
            service,
        } => {
            let envelope = gateway.delete_service(&environment, &service).await;
            emit_done(cli.json, envelope, format!("Deleted service {}", service))
        }
        Commands::Deploy {
            project,
            service,
            environment,
        } => {
            let envelope = gateway
                .create_deployment(&project, &service, &environment)
                .await;
            emit(cli.json, envelope, render::deployment_trigger)
        }
    };

    if !success {
        std::process::exit(1);
    }

    Ok(())
}

fn build_config(cli: &Cli) -> GatewayResult<RailwayConfig> {
    let mut config = RailwayConfig::from_env()?;

    if let Some(token) = &cli.token {
        config = config.with_token(token.clone());
    }
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(template) = &cli.template {
        config = config.with_service_template(template.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

/// Prints an envelope and reports whether it succeeded.
fn emit<T, F>(json: bool, envelope: Envelope<T>, render: F) -> bool
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if json {
        print_json(&envelope);
        return envelope.success;
    }

    match envelope.into_result() {
        Ok(Some(data)) => {
            println!("{}", render(&data));
            true
        }
        Ok(None) => true,
        Err(error) => report_failure(&error),
    }
}

fn emit_done(json: bool, envelope: Envelope<()>, message: String) -> bool {
    if json {
        print_json(&envelope);
        return envelope.success;
    }

    match envelope.into_result() {
        Ok(_) => {
            println!("✓ {}", message);
            true
        }
        Err(error) => report_failure(&error),
    }
}

fn print_json<T: Serialize>(envelope: &Envelope<T>) {
    match serde_json::to_string_pretty(envelope) {
        Ok(text) => println!("{}", text),
        Err(e) => error!("Failed to serialize envelope: {}", e),
    }
}

fn report_failure(error: &str) -> bool {
    let message = if error.is_empty() { "unknown error" } else { error };
    eprintln!("✗ {}", message);
    error!("Operation failed: {}", message);
    false
}
