use crate::types::{
    Account, DeploymentTrigger, Project, ProjectStub, ProjectSummary, Service, Template,
    TemplateDeployment,
};
use async_trait::async_trait;
use thiserror::Error;

pub const MISSING_CREDENTIAL_MESSAGE: &str = "Server configuration error: API token missing.";
pub const MISSING_TEMPLATE_MESSAGE: &str =
    "Server configuration error: service template code missing.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    #[error("{}", MISSING_TEMPLATE_MESSAGE)]
    MissingTemplate,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("{message}")]
    Api { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{message}")]
    MissingField { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl GatewayError {
    /// Text placed in the `error` slot of an envelope.
    ///
    /// Transport and decoding failures collapse into one generic message so
    /// response bodies never leak to callers; the detail goes to the log.
    pub fn envelope_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Serialization(_) | Self::UnexpectedStatus { .. } => {
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential | Self::MissingTemplate | Self::InvalidConfig { .. }
        )
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// One method per upstream capability the dashboard needs.
#[async_trait]
pub trait PlatformProvider: Send + Sync {
    async fn me(&self) -> GatewayResult<Account>;

    async fn list_projects(&self) -> GatewayResult<Vec<ProjectSummary>>;

    async fn get_project(&self, id: &str) -> GatewayResult<Project>;

    async fn create_project(&self, name: &str) -> GatewayResult<ProjectStub>;

    async fn delete_project(&self, id: &str) -> GatewayResult<()>;

    async fn get_template(&self, code: &str) -> GatewayResult<Template>;

    /// Deploys the configured service template into a project environment.
    async fn create_service(
        &self,
        project_id: &str,
        environment_id: &str,
    ) -> GatewayResult<TemplateDeployment>;

    async fn create_service_from_template(
        &self,
        template_code: &str,
        project_id: &str,
        environment_id: &str,
    ) -> GatewayResult<TemplateDeployment>;

    async fn create_repo_service(&self, project_id: &str, repo: &str) -> GatewayResult<Service>;

    async fn delete_service(&self, environment_id: &str, service_id: &str) -> GatewayResult<()>;

    async fn create_deployment(
        &self,
        project_id: &str,
        service_id: &str,
        environment_id: &str,
    ) -> GatewayResult<DeploymentTrigger>;

    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_messages() {
        assert_eq!(
            GatewayError::MissingCredential.envelope_message(),
            "Server configuration error: API token missing."
        );
        assert!(GatewayError::MissingCredential.is_configuration());
        assert!(GatewayError::MissingTemplate.is_configuration());
    }

    #[test]
    fn test_api_message_is_verbatim() {
        let err = GatewayError::Api {
            message: "Not Authorized".to_string(),
        };
        assert_eq!(err.envelope_message(), "Not Authorized");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_transport_errors_are_generic() {
        let json_err = serde_json::from_str::<i32>("<html>").unwrap_err();
        let err = GatewayError::from(json_err);
        assert!(matches!(err, GatewayError::Serialization(_)));
        assert_eq!(err.envelope_message(), "An unexpected error occurred.");

        let err = GatewayError::UnexpectedStatus {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.envelope_message(), "An unexpected error occurred.");
    }

    #[test]
    fn test_not_found_message() {
        let err = GatewayError::NotFound {
            entity: "Project",
            id: "p1".to_string(),
        };
        assert_eq!(err.envelope_message(), "Project not found: p1");
    }
}
