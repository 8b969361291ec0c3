pub mod client;
pub mod config;
pub mod documents;
pub mod envelope;
pub mod gateway;
pub mod graphql;
pub mod provider;
pub mod types;

pub use client::RailwayClient;
pub use config::RailwayConfig;
pub use envelope::Envelope;
pub use gateway::Gateway;
pub use provider::{GatewayError, GatewayResult, PlatformProvider};
pub use types::{
    Account, Deployment, DeploymentStatus, DeploymentTrigger, Environment, Project, ProjectStub,
    ProjectSummary, Service, Template, TemplateDeployment, Workspace, WorkspaceProject,
};

pub mod prelude {
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::envelope::*;
    pub use crate::gateway::*;
    pub use crate::provider::*;
    pub use crate::types::*;
}
