use crate::config::RailwayConfig;
use crate::documents;
use crate::graphql::{Connection, GraphQLRequest, GraphQLResponse, NoVariables};
use crate::provider::{GatewayError, GatewayResult, PlatformProvider};
use crate::types::{
    Account, Deployment, DeploymentTrigger, Environment, Project, ProjectStub, ProjectSummary,
    Service, Template, TemplateDeployment, Workspace, WorkspaceProject,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

#[derive(Serialize)]
struct IdVariables<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct CodeVariables<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct PageVariables {
    first: u32,
}

#[derive(Serialize)]
struct InputVariables<T: Serialize> {
    input: T,
}

#[derive(Serialize)]
struct ProjectCreateInput<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDeployInput<'a> {
    project_id: &'a str,
    environment_id: &'a str,
    serialized_config: &'a serde_json::Value,
    template_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceCreateInput<'a> {
    project_id: &'a str,
    source: ServiceSource<'a>,
}

#[derive(Serialize)]
struct ServiceSource<'a> {
    repo: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceScopeVariables<'a> {
    environment_id: &'a str,
    service_id: &'a str,
}

#[derive(Deserialize)]
struct MeData {
    me: ApiAccount,
}

#[derive(Deserialize)]
struct ApiAccount {
    id: String,
    name: Option<String>,
    email: Option<String>,
    #[serde(default)]
    workspaces: Vec<ApiWorkspace>,
}

#[derive(Deserialize)]
struct ApiWorkspace {
    id: String,
    name: Option<String>,
    team: Option<ApiTeam>,
}

#[derive(Deserialize)]
struct ApiTeam {
    #[serde(default)]
    projects: Connection<ApiWorkspaceProject>,
}

#[derive(Deserialize)]
struct ApiWorkspaceProject {
    id: String,
    name: String,
    #[serde(default)]
    services: Connection<ApiId>,
}

#[derive(Deserialize)]
struct ApiId {
    id: String,
}

#[derive(Deserialize)]
struct ProjectsData {
    projects: Connection<ProjectSummary>,
}

#[derive(Deserialize)]
struct ProjectData {
    project: Option<ApiProject>,
}

#[derive(Deserialize)]
struct ApiProject {
    id: String,
    name: String,
    description: Option<String>,
    #[serde(default)]
    services: Connection<ApiService>,
    #[serde(default)]
    environments: Connection<ApiEnvironment>,
}

#[derive(Deserialize)]
struct ApiService {
    id: String,
    name: String,
    #[serde(default)]
    deployments: Connection<Deployment>,
}

#[derive(Deserialize)]
struct ApiEnvironment {
    id: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectCreateData {
    project_create: ProjectStub,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDeleteData {
    project_delete: bool,
}

#[derive(Deserialize)]
struct TemplateData {
    template: Option<ApiTemplate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTemplate {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    serialized_config: Option<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDeployData {
    template_deploy_v2: TemplateDeployment,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceCreateData {
    service_create: ApiService,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDeleteData {
    service_delete: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceInstanceDeployData {
    service_instance_deploy_v2: String,
}

/// `PlatformProvider` backed by Railway's public GraphQL endpoint.
pub struct RailwayClient {
    http_client: reqwest::Client,
    config: RailwayConfig,
}

impl RailwayClient {
    pub fn new(config: RailwayConfig) -> GatewayResult<Self> {
        config
            .validate()
            .map_err(|msg| GatewayError::InvalidConfig { message: msg })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().map_err(|e| GatewayError::InvalidConfig {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn with_default_config() -> GatewayResult<Self> {
        Self::new(RailwayConfig::default())
    }

    pub fn config(&self) -> &RailwayConfig {
        &self.config
    }

    /// POSTs one document and unwraps its `data` into `T`.
    ///
    /// The credential check happens before anything touches the network.
    async fn execute<V, T>(
        &self,
        operation: &'static str,
        document: &str,
        variables: &V,
    ) -> GatewayResult<T>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        let token = self.config.token().ok_or_else(|| {
            warn!(operation, "RAILWAY_API_TOKEN is not set, skipping request");
            GatewayError::MissingCredential
        })?;

        debug!(operation, endpoint = %self.config.endpoint, "Sending GraphQL request");

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(token)
            .json(&GraphQLRequest {
                query: document,
                variables,
            })
            .send()
            .await
            .map_err(|e| {
                error!(operation, error = %e, "GraphQL request failed");
                GatewayError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: GraphQLResponse<serde_json::Value> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                error!(operation, %status, "Railway returned a non-JSON error response");
                return Err(GatewayError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }
            Err(e) => {
                error!(operation, error = %e, "Failed to parse GraphQL response");
                return Err(GatewayError::Serialization(e));
            }
        };

        let data = parsed.into_result(status.as_u16()).map_err(|e| {
            error!(operation, error = %e, "Railway rejected the request");
            e
        })?;

        serde_json::from_value(data).map_err(|e| {
            error!(operation, error = %e, "GraphQL data did not match the expected shape");
            GatewayError::Serialization(e)
        })
    }

    fn convert_service(service: ApiService) -> Service {
        Service {
            id: service.id,
            name: service.name,
            deployments: service.deployments.into_nodes(),
        }
    }

    fn convert_project(project: ApiProject) -> Project {
        Project {
            id: project.id,
            name: project.name,
            description: project.description,
            services: project.services.map_nodes(Self::convert_service),
            environments: project
                .environments
                .map_nodes(|env| Environment::new(env.id, env.name)),
        }
    }

    fn convert_account(account: ApiAccount) -> Account {
        let workspaces = account
            .workspaces
            .into_iter()
            .map(|workspace| Workspace {
                id: workspace.id,
                name: workspace.name,
                projects: workspace
                    .team
                    .map(|team| {
                        team.projects.map_nodes(|project| WorkspaceProject {
                            id: project.id,
                            name: project.name,
                            service_ids: project.services.map_nodes(|service| service.id),
                        })
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Account {
            id: account.id,
            name: account.name,
            email: account.email,
            workspaces,
        }
    }

    fn convert_template(code: &str, template: ApiTemplate) -> GatewayResult<Template> {
        let id = template
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GatewayError::MissingField {
                message: format!(
                    "Template ID not found for template {}. Cannot deploy.",
                    code
                ),
            })?;

        Ok(Template {
            id,
            name: template.name,
            description: template.description,
            serialized_config: template.serialized_config,
        })
    }

    async fn fetch_template(&self, code: &str) -> GatewayResult<ApiTemplate> {
        let data: TemplateData = self
            .execute("getTemplate", documents::GET_TEMPLATE, &CodeVariables { code })
            .await?;

        data.template.ok_or_else(|| GatewayError::NotFound {
            entity: "Template",
            id: code.to_string(),
        })
    }
}

#[async_trait]
impl PlatformProvider for RailwayClient {
    async fn me(&self) -> GatewayResult<Account> {
        let data: MeData = self
            .execute("me", documents::ME, &NoVariables::default())
            .await?;

        let account = Self::convert_account(data.me);
        info!(
            "Fetched account with {} workspaces and {} projects",
            account.workspaces.len(),
            account.project_count()
        );
        Ok(account)
    }

    async fn list_projects(&self) -> GatewayResult<Vec<ProjectSummary>> {
        let variables = PageVariables {
            first: self.config.page_size,
        };
        let data: ProjectsData = self
            .execute("listProjects", documents::LIST_PROJECTS, &variables)
            .await?;

        let truncated = data.projects.has_next_page();
        let projects = data.projects.into_nodes();
        if truncated {
            warn!(
                page_size = self.config.page_size,
                "Railway has more projects than one page; only the first {} are listed",
                projects.len()
            );
        }
        info!("Fetched {} projects", projects.len());
        Ok(projects)
    }

    async fn get_project(&self, id: &str) -> GatewayResult<Project> {
        let data: ProjectData = self
            .execute("getProject", documents::GET_PROJECT, &IdVariables { id })
            .await?;

        let project = data.project.ok_or_else(|| GatewayError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;

        let project = Self::convert_project(project);
        info!(
            project_id = %project.id,
            "Fetched project {} with {} services and {} environments",
            project.name,
            project.services.len(),
            project.environments.len()
        );
        Ok(project)
    }

    async fn create_project(&self, name: &str) -> GatewayResult<ProjectStub> {
        let variables = InputVariables {
            input: ProjectCreateInput { name },
        };
        let data: ProjectCreateData = self
            .execute("createProject", documents::CREATE_PROJECT, &variables)
            .await?;

        info!(project_id = %data.project_create.id, "Created project {}", name);
        Ok(data.project_create)
    }

    async fn delete_project(&self, id: &str) -> GatewayResult<()> {
        let data: ProjectDeleteData = self
            .execute("deleteProject", documents::DELETE_PROJECT, &IdVariables { id })
            .await?;

        if !data.project_delete {
            return Err(GatewayError::Api {
                message: format!("Railway did not confirm deletion of project {}.", id),
            });
        }

        info!(project_id = %id, "Deleted project");
        Ok(())
    }

    async fn get_template(&self, code: &str) -> GatewayResult<Template> {
        let template = self.fetch_template(code).await?;
        Self::convert_template(code, template)
    }

    async fn create_service(
        &self,
        project_id: &str,
        environment_id: &str,
    ) -> GatewayResult<TemplateDeployment> {
        if self.config.token().is_none() {
            return Err(GatewayError::MissingCredential);
        }
        let code = self
            .config
            .service_template()
            .ok_or(GatewayError::MissingTemplate)?;

        self.create_service_from_template(code, project_id, environment_id)
            .await
    }

    async fn create_service_from_template(
        &self,
        template_code: &str,
        project_id: &str,
        environment_id: &str,
    ) -> GatewayResult<TemplateDeployment> {
        let mut template = self.fetch_template(template_code).await?;

        // The configuration is checked before the id.
        let serialized_config =
            template
                .serialized_config
                .take()
                .ok_or_else(|| GatewayError::MissingField {
                    message: "Serialized configuration not found for the template.".to_string(),
                })?;
        let template = Self::convert_template(template_code, template)?;

        let variables = InputVariables {
            input: TemplateDeployInput {
                project_id,
                environment_id,
                serialized_config: &serialized_config,
                template_id: &template.id,
            },
        };
        let data: TemplateDeployData = self
            .execute("templateDeployV2", documents::DEPLOY_TEMPLATE, &variables)
            .await?;

        info!(
            project_id = %project_id,
            environment_id = %environment_id,
            workflow_id = ?data.template_deploy_v2.workflow_id,
            "Deployed template {}",
            template_code
        );
        Ok(data.template_deploy_v2)
    }

    async fn create_repo_service(&self, project_id: &str, repo: &str) -> GatewayResult<Service> {
        let variables = InputVariables {
            input: ServiceCreateInput {
                project_id,
                source: ServiceSource { repo },
            },
        };
        let data: ServiceCreateData = self
            .execute("serviceCreate", documents::CREATE_SERVICE, &variables)
            .await?;

        let service = Self::convert_service(data.service_create);
        info!(project_id = %project_id, service_id = %service.id, "Created service from {}", repo);
        Ok(service)
    }

    async fn delete_service(&self, environment_id: &str, service_id: &str) -> GatewayResult<()> {
        let variables = ServiceScopeVariables {
            environment_id,
            service_id,
        };
        let data: ServiceDeleteData = self
            .execute("deleteService", documents::DELETE_SERVICE, &variables)
            .await?;

        if !data.service_delete {
            return Err(GatewayError::Api {
                message: format!("Railway did not confirm deletion of service {}.", service_id),
            });
        }

        info!(service_id = %service_id, environment_id = %environment_id, "Deleted service");
        Ok(())
    }

    async fn create_deployment(
        &self,
        project_id: &str,
        service_id: &str,
        environment_id: &str,
    ) -> GatewayResult<DeploymentTrigger> {
        let variables = ServiceScopeVariables {
            environment_id,
            service_id,
        };
        let data: ServiceInstanceDeployData = self
            .execute(
                "createDeployment",
                documents::DEPLOY_SERVICE_INSTANCE,
                &variables,
            )
            .await?;

        let trigger = DeploymentTrigger {
            id: data.service_instance_deploy_v2,
            project_id: project_id.to_string(),
            service_id: service_id.to_string(),
            environment_id: environment_id.to_string(),
        };
        info!(
            project_id = %project_id,
            service_id = %service_id,
            deployment_id = %trigger.id,
            "Triggered deployment"
        );
        Ok(trigger)
    }

    fn provider_name(&self) -> &'static str {
        "railway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeploymentStatus;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> RailwayClient {
        let config = RailwayConfig::default()
            .with_endpoint(format!("{}/graphql/v2", server.url()))
            .with_token("test-token");
        RailwayClient::new(config).unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = RailwayClient::with_default_config();
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().provider_name(), "railway");
    }

    #[test]
    fn test_provider_rejects_invalid_config() {
        let config = RailwayConfig::default().with_endpoint("ftp://example.com");
        assert!(matches!(
            RailwayClient::new(config),
            Err(GatewayError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_convert_project_keeps_order_and_flags_default() {
        let api: ApiProject = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "demo",
            "description": null,
            "services": {"edges": [
                {"node": {"id": "s2", "name": "worker", "deployments": {"edges": []}}},
                {"node": {"id": "s1", "name": "web", "deployments": {"edges": [
                    {"node": {"id": "d1", "environmentId": "e1", "status": "SUCCESS"}}
                ]}}}
            ]},
            "environments": {"edges": [
                {"node": {"id": "e2", "name": "staging"}},
                {"node": {"id": "e1", "name": "production"}}
            ]}
        }))
        .unwrap();

        let project = RailwayClient::convert_project(api);
        assert_eq!(project.services[0].id, "s2");
        assert_eq!(project.services[1].id, "s1");
        assert_eq!(
            project.services[1].deployments[0].status,
            DeploymentStatus::Success
        );
        assert_eq!(project.default_environment().unwrap().id, "e1");
        assert!(!project.environments[0].is_default);
    }

    #[test]
    fn test_convert_project_tolerates_missing_connections() {
        let api: ApiProject =
            serde_json::from_value(serde_json::json!({"id": "p1", "name": "bare"})).unwrap();
        let project = RailwayClient::convert_project(api);
        assert!(project.services.is_empty());
        assert!(project.environments.is_empty());
    }

    #[test]
    fn test_convert_account_without_team() {
        let api: ApiAccount = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "name": "Ada",
            "email": null,
            "workspaces": [
                {"id": "w1", "name": "personal", "team": null},
                {"id": "w2", "name": "team", "team": {"projects": {"edges": [
                    {"node": {"id": "p1", "name": "api", "services": {"edges": [
                        {"node": {"id": "s1"}}, {"node": {"id": "s2"}}
                    ]}}}
                ]}}}
            ]
        }))
        .unwrap();

        let account = RailwayClient::convert_account(api);
        assert!(account.workspaces[0].projects.is_empty());
        assert_eq!(account.workspaces[1].projects[0].service_ids, vec!["s1", "s2"]);
        assert_eq!(account.project_count(), 1);
    }

    #[test]
    fn test_convert_template_requires_id() {
        let api = ApiTemplate {
            id: None,
            name: Some("node".to_string()),
            description: None,
            serialized_config: Some(serde_json::json!({})),
        };
        assert!(matches!(
            RailwayClient::convert_template("abc", api),
            Err(GatewayError::MissingField { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_config_reported_before_missing_id() {
        let mut server = mockito::Server::new_async().await;
        let _template = server
            .mock("POST", "/graphql/v2")
            .match_body(Matcher::Regex("getTemplate".to_string()))
            .with_status(200)
            .with_body(r#"{"data": {"template": {"id": null, "serializedConfig": null}}}"#)
            .create_async()
            .await;
        let deploy = server
            .mock("POST", "/graphql/v2")
            .match_body(Matcher::Regex("templateDeployV2".to_string()))
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        match client.create_service_from_template("bare", "p1", "e1").await {
            Err(GatewayError::MissingField { message }) => assert_eq!(
                message,
                "Serialized configuration not found for the template."
            ),
            other => panic!("expected MissingField, got {:?}", other),
        }
        deploy.assert_async().await;
    }

    #[tokio::test]
    async fn test_template_without_id_is_not_deployed() {
        let mut server = mockito::Server::new_async().await;
        let _template = server
            .mock("POST", "/graphql/v2")
            .match_body(Matcher::Regex("getTemplate".to_string()))
            .with_status(200)
            .with_body(r#"{"data": {"template": {"id": "", "serializedConfig": {}}}}"#)
            .create_async()
            .await;
        let deploy = server
            .mock("POST", "/graphql/v2")
            .match_body(Matcher::Regex("templateDeployV2".to_string()))
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        match client.create_service_from_template("noid", "p1", "e1").await {
            Err(GatewayError::MissingField { message }) => {
                assert!(message.starts_with("Template ID not found"))
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
        deploy.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_projects_with_more_pages_still_returns_first_page() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql/v2")
            .match_body(Matcher::Regex("pageInfo".to_string()))
            .with_status(200)
            .with_body(
                r#"{"data": {"projects": {"edges": [{"node": {"id": "p1", "name": "a", "description": null}}], "pageInfo": {"hasNextPage": true}}}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let projects = client.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "p1");
    }

    #[tokio::test]
    async fn test_null_errors_field_is_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql/v2")
            .with_status(200)
            .with_body(r#"{"data": {"projectCreate": {"id": "p1"}}, "errors": null}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(client.create_project("demo").await.unwrap().id, "p1");
    }

    #[tokio::test]
    async fn test_sends_bearer_token_and_variables() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql/v2")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "variables": {"input": {"name": "demo"}}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"projectCreate": {"id": "p1"}}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let stub = client.create_project("demo").await.unwrap();
        assert_eq!(stub.id, "p1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_json_body_is_serialization_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql/v2")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.list_projects().await;
        assert!(matches!(result, Err(GatewayError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_non_json_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql/v2")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let client = client_for(&server);
        match client.list_projects().await {
            Err(GatewayError::UnexpectedStatus { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "Bad Gateway");
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_partial_data_with_errors_reports_first_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql/v2")
            .with_status(200)
            .with_body(
                r#"{"data": {"projectCreate": null}, "errors": [{"message": "Name taken", "path": ["projectCreate"]}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        match client.create_project("demo").await {
            Err(GatewayError::Api { message }) => assert_eq!(message, "Name taken"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_project_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql/v2")
            .with_status(200)
            .with_body(r#"{"data": {"project": null}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.get_project("missing").await,
            Err(GatewayError::NotFound {
                entity: "Project",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_unconfirmed_delete_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql/v2")
            .with_status(200)
            .with_body(r#"{"data": {"projectDelete": false}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.delete_project("p1").await,
            Err(GatewayError::Api { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_service_requires_template_code() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql/v2")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.create_service("p1", "e1").await,
            Err(GatewayError::MissingTemplate)
        ));
        mock.assert_async().await;
    }
}
