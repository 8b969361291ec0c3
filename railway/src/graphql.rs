//! Wire shapes shared by every GraphQL round trip.

use crate::provider::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: &'a V,
}

/// Variables for documents that take none. Serializes as `{}`.
#[derive(Debug, Default, Serialize)]
pub struct NoVariables {}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    /// Absent and `null` both mean no errors.
    #[serde(default)]
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

impl<T> GraphQLResponse<T> {
    /// Collapses the response into its payload, preferring the first reported
    /// error over anything else in the body.
    pub fn into_result(self, status: u16) -> GatewayResult<T> {
        if let Some(first) = self.errors.into_iter().flatten().next() {
            return Err(GatewayError::Api {
                message: first.message,
            });
        }

        if !(200..300).contains(&status) {
            return Err(GatewayError::UnexpectedStatus {
                status,
                body: String::new(),
            });
        }

        self.data.ok_or_else(|| GatewayError::MissingField {
            message: "Response contained neither data nor errors.".to_string(),
        })
    }
}

/// Relay-style `{ edges: [{ node }] }` list.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    #[serde(default, rename = "pageInfo")]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: None,
        }
    }
}

impl<T> Connection<T> {
    /// True when upstream reported more items beyond this page.
    pub fn has_next_page(&self) -> bool {
        self.page_info.as_ref().is_some_and(|info| info.has_next_page)
    }

    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }

    pub fn map_nodes<U>(self, f: impl FnMut(T) -> U) -> Vec<U> {
        self.edges.into_iter().map(|edge| edge.node).map(f).collect()
    }
}
