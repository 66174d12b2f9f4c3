//! Auth and user endpoints.

use serde::Serialize;

use super::query;
use crate::error::ApiResult;
use crate::forms::LoginForm;
use crate::gateway::ApiClient;
use crate::types::{JwtTokenResponse, RegisterRequest, RegisterResponse, UserSummary};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Exchanges credentials for a bearer token and profile.
pub async fn login(api: &ApiClient, form: &LoginForm) -> ApiResult<JwtTokenResponse> {
    let body = LoginRequest {
        username: &form.username,
        password: &form.password,
    };
    api.post("/api/auth/login/access-token", &body).await
}

/// Creates a new user account.
pub async fn register(api: &ApiClient, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
    api.post("/api/users", request).await
}

/// Searches users by name or email substring; matching happens server-side.
pub async fn search_users(api: &ApiClient, term: &str) -> ApiResult<Vec<UserSummary>> {
    let path = format!("/api/users/search?{}", query(&[("query", term)]));
    api.get(&path).await
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::session::SharedSession;

    #[tokio::test]
    async fn test_search_users_encodes_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/search"))
            .and(query_param("query", "ali ce"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 7, "username": "alice", "userRole": "Member"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri(), SharedSession::default());
        let users = search_users(&api, "ali ce").await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[0].user_role, "Member");
    }

    #[tokio::test]
    async fn test_register_unwraps_enveloped_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": 11, "username": "bob"}
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri(), SharedSession::default());
        let request = RegisterRequest {
            email: "bob@example.com".to_string(),
            username: "bob".to_string(),
            password: "secret1A!".to_string(),
            firstname: "Bob".to_string(),
            lastname: "Doe".to_string(),
        };

        let created = register(&api, &request).await.unwrap();
        assert_eq!(created.id, 11);
    }
}
