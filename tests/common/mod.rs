//! Shared harness: an in-process API server on an ephemeral port, backed by the
//! in-memory store.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use storefront_api::crypto::{HashCost, PasswordHasher, TokenIssuer};
use storefront_api::infra::config::GraphqlLimits;
use storefront_api::{transport, MemoryStore, Services};

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let hasher = PasswordHasher::new(HashCost {
            memory_kib: 1024,
            iterations: 1,
        })?;
        let services = Services::new(
            Arc::new(MemoryStore::new()),
            hasher,
            TokenIssuer::new(b"integration-test-secret", None),
        );
        let app_state =
            transport::http::AppState::new(Arc::new(services), GraphqlLimits::default());
        let router = transport::http::create_router(app_state);

        // Bind to an ephemeral port to avoid conflicts with a running server.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Posts a GraphQL operation, optionally as an authenticated caller.
    pub async fn graphql(
        &self,
        query: &str,
        variables: Value,
        token: Option<&str>,
    ) -> reqwest::Result<Value> {
        let mut request = self
            .client
            .post(format!("{}/graphql", self.base_url))
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await?.json::<Value>().await
    }

    /// Registers a user and returns a fresh token for it.
    pub async fn signed_up(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let created = self
            .graphql(
                "mutation($u: String!, $p: String!) { createUser(username: $u, password: $p, passwordConf: $p) { id } }",
                json!({ "u": username, "p": password }),
                None,
            )
            .await?;
        assert!(created["errors"].is_null(), "createUser failed: {}", created);

        let login = self
            .graphql(
                "mutation($u: String!, $p: String!) { login(username: $u, password: $p) { value } }",
                json!({ "u": username, "p": password }),
                None,
            )
            .await?;
        Ok(login["data"]["login"]["value"]
            .as_str()
            .ok_or("login returned no token")?
            .to_string())
    }

    pub async fn add_product(
        &self,
        name: &str,
        quantity: i64,
        units_sold: i64,
        categories: &[&str],
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .graphql(
                "mutation($name: String!, $q: Int!, $sold: Int!, $cats: [String!]!) {
                    addProduct(name: $name, price: 9.99, quantity: $q, categories: $cats,
                               comments: [], units_sold: $sold) {
                        id name quantity units_sold categories
                    }
                }",
                json!({ "name": name, "q": quantity, "sold": units_sold, "cats": categories }),
                None,
            )
            .await?;
        assert!(resp["errors"].is_null(), "addProduct failed: {}", resp);
        Ok(resp["data"]["addProduct"].clone())
    }
}
