//! Static GraphQL documents sent to Railway. Every identifier is bound
//! through `$variables`; nothing is ever formatted into the document text.

pub const ME: &str = r#"
query me {
  me {
    id
    name
    email
    workspaces {
      id
      name
      team {
        projects {
          edges {
            node {
              id
              name
              services {
                edges {
                  node {
                    id
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

pub const LIST_PROJECTS: &str = r#"
query listProjects($first: Int!) {
  projects(first: $first) {
    edges {
      node {
        id
        name
        description
      }
    }
    pageInfo {
      hasNextPage
    }
  }
}
"#;

pub const GET_PROJECT: &str = r#"
query getProject($id: String!) {
  project(id: $id) {
    id
    name
    description
    services {
      edges {
        node {
          id
          name
          deployments {
            edges {
              node {
                id
                environmentId
                status
              }
            }
          }
        }
      }
    }
    environments {
      edges {
        node {
          id
          name
        }
      }
    }
  }
}
"#;

pub const CREATE_PROJECT: &str = r#"
mutation createProject($input: ProjectCreateInput!) {
  projectCreate(input: $input) {
    id
  }
}
"#;

pub const DELETE_PROJECT: &str = r#"
mutation deleteProject($id: String!) {
  projectDelete(id: $id)
}
"#;

pub const GET_TEMPLATE: &str = r#"
query getTemplate($code: String!) {
  template(code: $code) {
    id
    name
    description
    serializedConfig
  }
}
"#;

pub const DEPLOY_TEMPLATE: &str = r#"
mutation templateDeployV2($input: TemplateDeployV2Input!) {
  templateDeployV2(input: $input) {
    projectId
    workflowId
  }
}
"#;

pub const CREATE_SERVICE: &str = r#"
mutation serviceCreate($input: ServiceCreateInput!) {
  serviceCreate(input: $input) {
    id
    name
    deployments {
      edges {
        node {
          id
          environmentId
          status
        }
      }
    }
  }
}
"#;

pub const DELETE_SERVICE: &str = r#"
mutation deleteService($environmentId: String!, $serviceId: String!) {
  serviceDelete(environmentId: $environmentId, id: $serviceId)
}
"#;

pub const DEPLOY_SERVICE_INSTANCE: &str = r#"
mutation deployServiceInstance($serviceId: String!, $environmentId: String!) {
  serviceInstanceDeployV2(serviceId: $serviceId, environmentId: $environmentId)
}
"#;
