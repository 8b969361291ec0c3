//! Plain-text views of gateway results.

use railway::types::{
    Account, DeploymentTrigger, Project, ProjectSummary, Template, TemplateDeployment,
};
use std::fmt::Write;

pub fn project_list(projects: &[ProjectSummary]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    let mut out = String::from("Projects:");
    for project in projects {
        let _ = write!(out, "\n  - {} ({})", project.name, project.id);
        if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(out, ": {}", description);
        }
    }
    out
}

pub fn project(project: &Project) -> String {
    let mut out = format!("{} ({})", project.name, project.id);
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "\n{}", description);
    }

    if let Some(env) = project.default_environment() {
        let _ = write!(out, "\nDefault environment: {}", env.name);
    }

    out.push_str("\n\nEnvironments:");
    if project.environments.is_empty() {
        out.push_str("\n  (none)");
    }
    for env in &project.environments {
        let marker = if env.is_default { " [default]" } else { "" };
        let _ = write!(out, "\n  - {} ({}){}", env.name, env.id, marker);
    }

    out.push_str("\n\nServices:");
    if project.services.is_empty() {
        out.push_str("\n  (none)");
    }
    for service in &project.services {
        let _ = write!(out, "\n  - {} ({})", service.name, service.id);
        let mut deployed = false;
        for env in &project.environments {
            if let Some(deployment) = service.latest_deployment(&env.id) {
                deployed = true;
                let pending = if deployment.status.is_terminal() {
                    ""
                } else {
                    " (in progress)"
                };
                let _ = write!(
                    out,
                    "\n      {}: {} {}{}",
                    env.name, deployment.status, deployment.id, pending
                );
            }
        }
        if !deployed {
            out.push_str("\n      no deployments");
        }
    }

    out
}

pub fn account(account: &Account) -> String {
    let who = account
        .name
        .as_deref()
        .or(account.email.as_deref())
        .unwrap_or(account.id.as_str());
    let mut out = format!("Signed in as {}", who);

    for workspace in &account.workspaces {
        let _ = write!(
            out,
            "\n\nWorkspace {}",
            workspace.name.as_deref().unwrap_or(workspace.id.as_str())
        );
        for project in &workspace.projects {
            let _ = write!(
                out,
                "\n  - {} ({}), {} service(s)",
                project.name,
                project.id,
                project.service_ids.len()
            );
        }
    }

    out
}

pub fn template(template: &Template) -> String {
    let name = template.name.as_deref().unwrap_or("unnamed template");
    let mut out = format!("{} ({})", name, template.id);
    if let Some(description) = template.description.as_deref() {
        let _ = write!(out, "\n{}", description);
    }
    let deployable = if template.serialized_config.is_some() {
        "yes"
    } else {
        "no (missing serialized configuration)"
    };
    let _ = write!(out, "\nDeployable: {}", deployable);
    out
}

pub fn template_deployment(deployment: &TemplateDeployment) -> String {
    match deployment.workflow_id.as_deref() {
        Some(workflow) => format!(
            "Template deploying into project {} (workflow {})",
            deployment.project_id, workflow
        ),
        None => format!("Template deploying into project {}", deployment.project_id),
    }
}

pub fn deployment_trigger(trigger: &DeploymentTrigger) -> String {
    format!(
        "Triggered deployment {} of service {} in environment {}",
        trigger.id, trigger.service_id, trigger.environment_id
    )
}
