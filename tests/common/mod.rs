//! Spins the router up on an ephemeral port over a fresh in-memory store.
#![allow(dead_code)]

use std::sync::Arc;
use storefront_catalog::transport;
use storefront_catalog::{AppState, FsPhotoReader, HeaderAuthenticator, MemoryStore};
use tempfile::TempDir;
use uuid::Uuid;

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: MemoryStore,
    pub admin_id: Uuid,
    pub user_id: Uuid,
    _uploads: TempDir,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl TestServer {
    pub async fn start() -> Self {
        let uploads = tempfile::tempdir().expect("upload dir");
        let store = MemoryStore::new();
        let state = AppState::with_memory_store(
            &store,
            Arc::new(FsPhotoReader),
            Arc::new(HeaderAuthenticator),
            uploads.path().to_path_buf(),
        );
        let router = transport::http::create_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let admin_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        store.register_user(admin_id, "Admin").await;
        store.register_user(user_id, "Ada").await;

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("client"),
            store,
            admin_id,
            user_id,
            _uploads: uploads,
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn as_admin(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-User-Id", self.admin_id.to_string())
            .header("X-User-Role", "1")
    }

    pub fn as_user(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-User-Id", self.user_id.to_string())
    }

    /// Creates a category through the API and returns its id.
    pub async fn create_category(&self, name: &str) -> Uuid {
        let body: serde_json::Value = self
            .as_admin(self.client.post(self.url("/api/v1/category/create-category")))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("create category")
            .json()
            .await
            .expect("category body");
        body["category"]["_id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("category id")
    }

    /// Creates a product through the API and returns the response body.
    pub async fn create_product(
        &self,
        name: &str,
        price: &str,
        category: Uuid,
        photo: Option<Vec<u8>>,
    ) -> serde_json::Value {
        let mut form = product_form(name, price, category);
        if let Some(bytes) = photo {
            form = form.part(
                "photo",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name("photo.png")
                    .mime_str("image/png")
                    .expect("mime"),
            );
        }
        let resp = self
            .as_admin(self.client.post(self.url("/api/v1/product/create-product")))
            .multipart(form)
            .send()
            .await
            .expect("create product");
        assert_eq!(resp.status(), 201, "create {} failed", name);
        resp.json().await.expect("product body")
    }
}

/// A complete, valid product form without a photo.
pub fn product_form(name: &str, price: &str, category: Uuid) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("name", name.to_string())
        .text("description", format!("{} description", name))
        .text("price", price.to_string())
        .text("category", category.to_string())
        .text("quantity", "10")
        .text("shipping", "true")
}
