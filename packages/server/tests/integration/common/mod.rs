use std::net::SocketAddr;

use reqwest::Client;
use serde_json::Value;

use server::config::{AppConfig, AuthConfig};
use server::seed;
use server::state::AppState;

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";

    pub const RECHARGE: &str = "/api/v1/wallet/recharge";
    pub const WITHDRAW: &str = "/api/v1/wallet/withdraw";
    pub const ACCOUNT: &str = "/api/v1/wallet/account";
    pub const TRANSACTIONS: &str = "/api/v1/wallet/transactions";

    pub const MEMBERSHIP: &str = "/api/v1/membership";
    pub const MEMBERSHIP_PURCHASE: &str = "/api/v1/membership/purchase";
    pub const MEMBERSHIP_STATUS: &str = "/api/v1/membership/status";
    pub const MEMBERSHIP_PLANS: &str = "/api/v1/membership/plans";

    pub const CONTESTS: &str = "/api/v1/contests";
    pub const PARTICIPATIONS: &str = "/api/v1/participations";

    pub const QUESTIONS: &str = "/api/v1/questions";
    pub const ATTEMPTS: &str = "/api/v1/questions/attempts";

    pub fn contest(id: i64) -> String {
        format!("/api/v1/contests/{id}")
    }

    pub fn contest_register(id: i64) -> String {
        format!("/api/v1/contests/{id}/register")
    }

    pub fn contest_start(id: i64) -> String {
        format!("/api/v1/contests/{id}/start")
    }

    pub fn contest_answers(id: i64) -> String {
        format!("/api/v1/contests/{id}/answers")
    }

    pub fn contest_finish(id: i64) -> String {
        format!("/api/v1/contests/{id}/finish")
    }

    pub fn contest_ranking(id: i64) -> String {
        format!("/api/v1/contests/{id}/ranking")
    }

    pub fn contest_participation(id: i64) -> String {
        format!("/api/v1/contests/{id}/participation")
    }

    pub fn question(id: i64) -> String {
        format!("/api/v1/questions/{id}")
    }

    pub fn question_attempts(id: i64) -> String {
        format!("/api/v1/questions/{id}/attempts")
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = AppConfig {
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".into(),
                token_ttl_days: 1,
            },
            ..AppConfig::default()
        };
        Self::spawn_with(config).await
    }

    pub async fn spawn_with(config: AppConfig) -> Self {
        let state = AppState::new(config);
        seed::seed(&state);
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Register a user and log in, returning the auth token.
    pub async fn create_authenticated_user(&self, username: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": "pass12345",
        });

        let reg = self.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self.post_without_token(routes::LOGIN, &body).await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response missing token")
            .to_string()
    }

    /// Buy a membership; the level's gift coins land in the wallet.
    pub async fn purchase_membership(&self, token: &str, level: u8) -> TestResponse {
        let res = self
            .post_with_token(
                routes::MEMBERSHIP_PURCHASE,
                &serde_json::json!({ "level": level }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "Membership purchase failed: {}", res.text);
        res
    }

    /// Top up the wallet.
    pub async fn recharge(&self, token: &str, amount: i64) -> TestResponse {
        let res = self
            .post_with_token(
                routes::RECHARGE,
                &serde_json::json!({ "amount": amount }),
                token,
            )
            .await;
        assert_eq!(res.status, 200, "Recharge failed: {}", res.text);
        res
    }
}
