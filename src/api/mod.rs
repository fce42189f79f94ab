//! GraphQL client for the Code Society notebooks service.
//!
//! Two operations cross this boundary: a `login` mutation exchanging a
//! credential pair for a session token plus user identity, and a `notebooks`
//! query returning the full notebook/page tree for that token. Both are
//! plain POSTs of `{query, variables}` JSON; the interesting state lives in
//! [`crate::tui::state`], not here.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Result, StylusError};
use crate::model::{Credentials, Notebook, Session};

/// Default GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.codesociety.xyz/api";

const LOGIN_MUTATION: &str = r"
    mutation Login($email: String!, $password: String!) {
        login(email: $email, password: $password) {
            token
            user {
                id
                username
            }
        }
    }";

const NOTEBOOKS_QUERY: &str = r"
    query GetNotebooks {
        notebooks {
            id
            title
            description
            updatedAt
            pages {
                id
                title
                parentId
                updatedAt
                content
            }
        }
    }";

/// Generic GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

impl<T> GraphqlResponse<T> {
    /// Unwrap the data payload or collapse the GraphQL error list into a
    /// single message.
    fn into_data(self) -> std::result::Result<T, String> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(first.message);
        }
        self.data.ok_or_else(|| "empty response from service".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct LoginData {
    login: LoginPayload,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    token: String,
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: String,
    username: String,
}

#[derive(Debug, Deserialize)]
struct NotebooksData {
    notebooks: Vec<Notebook>,
}

/// Client for the remote notebooks service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ApiClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("stylus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StylusError::auth_with_source("failed to build HTTP client", e))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Exchange a credential pair for a session.
    ///
    /// No client-side validation: empty fields are sent as-is and the
    /// service decides validity. On success the returned session has an
    /// empty notebook cache; [`Self::fetch_notebooks`] populates it.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let body = json!({
            "query": LOGIN_MUTATION,
            "variables": {
                "email": credentials.email,
                "password": credentials.password,
            },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| StylusError::auth_with_source("request failed", e))?;

        let envelope: GraphqlResponse<LoginData> = response
            .json()
            .await
            .map_err(|e| StylusError::auth_with_source("malformed response", e))?;

        let data = envelope.into_data().map_err(StylusError::auth)?;
        debug!(username = %data.login.user.username, "authenticated");

        Ok(Session::new(
            data.login.token,
            data.login.user.id,
            data.login.user.username,
        ))
    }

    /// Fetch the full notebook tree for a session token.
    ///
    /// Invoked once per login; the caller replaces `session.notebooks`
    /// wholesale with the result.
    pub async fn fetch_notebooks(&self, token: &str) -> Result<Vec<Notebook>> {
        let body = json!({ "query": NOTEBOOKS_QUERY });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StylusError::fetch_with_source("request failed", e))?;

        let envelope: GraphqlResponse<NotebooksData> = response
            .json()
            .await
            .map_err(|e| StylusError::fetch_with_source("malformed response", e))?;

        let data = envelope.into_data().map_err(StylusError::fetch)?;
        debug!(count = data.notebooks.len(), "fetched notebooks");

        Ok(data.notebooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn login_response_deserializes() {
        let body = r#"{
            "data": {
                "login": {
                    "token": "abc123",
                    "user": { "id": "u1", "username": "ada" }
                }
            }
        }"#;
        let envelope: GraphqlResponse<LoginData> = serde_json::from_str(body).unwrap();
        let data = envelope.into_data().unwrap();
        assert_eq!(data.login.token, "abc123");
        assert_eq!(data.login.user.username, "ada");
    }

    #[test]
    fn graphql_errors_take_precedence_over_data() {
        let body = r#"{
            "data": null,
            "errors": [
                { "message": "invalid credentials" },
                { "message": "secondary" }
            ]
        }"#;
        let envelope: GraphqlResponse<LoginData> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.into_data().unwrap_err(), "invalid credentials");
    }

    #[test]
    fn empty_response_is_an_error() {
        let envelope: GraphqlResponse<LoginData> = serde_json::from_str("{}").unwrap();
        assert!(envelope.into_data().is_err());
    }

    #[test]
    fn notebooks_response_deserializes() {
        let body = r##"{
            "data": {
                "notebooks": [
                    {
                        "id": "nb1",
                        "title": "Notes",
                        "description": "general",
                        "updatedAt": "2024-03-01T12:00:00Z",
                        "pages": [
                            {
                                "id": "p1",
                                "title": "Intro",
                                "parentId": null,
                                "updatedAt": "2024-03-01T12:30:00Z",
                                "content": "# Hi"
                            }
                        ]
                    }
                ]
            }
        }"##;
        let envelope: GraphqlResponse<NotebooksData> = serde_json::from_str(body).unwrap();
        let data = envelope.into_data().unwrap();
        assert_eq!(data.notebooks.len(), 1);
        assert_eq!(data.notebooks[0].pages[0].content, "# Hi");
        assert_eq!(data.notebooks[0].pages[0].parent_id, None);
    }
}
