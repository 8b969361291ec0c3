use crate::client::RailwayClient;
use crate::config::RailwayConfig;
use crate::envelope::Envelope;
use crate::provider::{GatewayResult, PlatformProvider};
use crate::types::{
    Account, DeploymentTrigger, Project, ProjectStub, ProjectSummary, Service, Template,
    TemplateDeployment,
};

/// Envelope-returning front of a `PlatformProvider`.
///
/// Holds no state between calls, so one instance can be shared across tasks.
pub struct Gateway<P: PlatformProvider = RailwayClient> {
    provider: P,
}

impl Gateway<RailwayClient> {
    pub fn from_config(config: RailwayConfig) -> GatewayResult<Self> {
        Ok(Self::new(RailwayClient::new(config)?))
    }

    pub fn from_env() -> GatewayResult<Self> {
        Self::from_config(RailwayConfig::from_env()?)
    }
}

impl<P: PlatformProvider> Gateway<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn me(&self) -> Envelope<Account> {
        self.provider.me().await.into()
    }

    pub async fn list_projects(&self) -> Envelope<Vec<ProjectSummary>> {
        self.provider.list_projects().await.into()
    }

    pub async fn get_project(&self, id: &str) -> Envelope<Project> {
        self.provider.get_project(id).await.into()
    }

    pub async fn create_project(&self, name: &str) -> Envelope<ProjectStub> {
        self.provider.create_project(name).await.into()
    }

    pub async fn delete_project(&self, id: &str) -> Envelope<()> {
        Envelope::from_unit(self.provider.delete_project(id).await)
    }

    pub async fn get_template(&self, code: &str) -> Envelope<Template> {
        self.provider.get_template(code).await.into()
    }

    pub async fn create_service(
        &self,
        project_id: &str,
        environment_id: &str,
    ) -> Envelope<TemplateDeployment> {
        self.provider
            .create_service(project_id, environment_id)
            .await
            .into()
    }

    pub async fn create_service_from_template(
        &self,
        template_code: &str,
        project_id: &str,
        environment_id: &str,
    ) -> Envelope<TemplateDeployment> {
        self.provider
            .create_service_from_template(template_code, project_id, environment_id)
            .await
            .into()
    }

    pub async fn create_repo_service(&self, project_id: &str, repo: &str) -> Envelope<Service> {
        self.provider
            .create_repo_service(project_id, repo)
            .await
            .into()
    }

    pub async fn delete_service(&self, environment_id: &str, service_id: &str) -> Envelope<()> {
        Envelope::from_unit(
            self.provider
                .delete_service(environment_id, service_id)
                .await,
        )
    }

    pub async fn create_deployment(
        &self,
        project_id: &str,
        service_id: &str,
        environment_id: &str,
    ) -> Envelope<DeploymentTrigger> {
        self.provider
            .create_deployment(project_id, service_id, environment_id)
            .await
            .into()
    }
}
