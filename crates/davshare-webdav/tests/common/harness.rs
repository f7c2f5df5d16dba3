//! Test server harness for WebDAV integration tests.
//!
//! Provides a `TestServer` that serves a temporary directory populated by the
//! test, along with HTTP convenience methods. Requests carry Basic credentials
//! unless the test asks for an anonymous one.

use bytes::Bytes;
use davshare_core::{AuthGate, RootBinding};
use davshare_webdav::{ServerConfig, ShareWebDav, WebDavServer};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Credentials sent by default. Any pair passes an allow-all gate.
pub const TEST_USER: &str = "tester";
pub const TEST_SECRET: &str = "test-secret-12345";

/// Test server with HTTP client and automatic cleanup.
pub struct TestServer {
    /// The running WebDAV server.
    server: WebDavServer,
    /// HTTP client for making requests.
    client: Client,
    /// Base URL for the server.
    pub base_url: String,
    /// Credentials attached to every request.
    credentials: Option<(String, String)>,
    /// Shared directory (cleaned up on drop).
    share: TempDir,
}

impl TestServer {
    /// Start a server on the standard fixture with an allow-all gate.
    ///
    /// Fixture layout:
    /// ```text
    /// a.txt        "0123456789"
    /// .hidden      "secret"
    /// sub/b.txt    "b"
    /// sub/.git/    (hidden directory)
    /// ```
    pub async fn with_temp_share() -> Self {
        Self::with_share(populate_fixture, AuthGate::allow_all()).await
    }

    /// Start a server on an empty directory with an allow-all gate.
    pub async fn with_empty_share() -> Self {
        Self::with_share(|_| {}, AuthGate::allow_all()).await
    }

    /// Start a server on a directory prepared by `setup`, guarded by `gate`.
    pub async fn with_share(setup: impl FnOnce(&Path), gate: AuthGate) -> Self {
        Self::start(setup, gate, Some((TEST_USER.to_string(), TEST_SECRET.to_string()))).await
    }

    /// Start a server whose client sends the given credentials.
    pub async fn with_credentials(
        setup: impl FnOnce(&Path),
        gate: AuthGate,
        user: &str,
        secret: &str,
    ) -> Self {
        Self::start(setup, gate, Some((user.to_string(), secret.to_string()))).await
    }

    async fn start(
        setup: impl FnOnce(&Path),
        gate: AuthGate,
        credentials: Option<(String, String)>,
    ) -> Self {
        let share = TempDir::new().expect("Failed to create temp dir");
        setup(share.path());

        let root = RootBinding::new(share.path()).expect("Failed to bind share root");
        let fs = ShareWebDav::new(root);

        // Start server on random port
        let config = ServerConfig::default();
        let server = WebDavServer::start(fs, gate, config)
            .await
            .expect("Failed to start WebDAV server");

        let base_url = server.url();

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let test_server = Self {
            server,
            client,
            base_url,
            credentials,
            share,
        };

        // Wait for server to accept connections
        test_server.wait_ready().await;

        test_server
    }

    /// Wait for the server to be ready to accept connections.
    ///
    /// Any HTTP answer counts, including a 401 from a strict gate.
    async fn wait_ready(&self) {
        for _ in 0..50 {
            if self
                .client
                .request(Method::OPTIONS, &self.base_url)
                .send()
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("Server did not become ready in time");
    }

    /// Path of the shared directory on disk.
    pub fn share_path(&self) -> &Path {
        self.share.path()
    }

    /// Absolute on-disk path of a share-relative path.
    pub fn disk_path(&self, path: &str) -> PathBuf {
        self.share.path().join(path.trim_start_matches('/'))
    }

    /// Build a full URL from a path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.credentials {
            Some((user, secret)) => builder.basic_auth(user, Some(secret)),
            None => builder,
        }
    }

    /// Request without an `Authorization` header.
    pub fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    // ========== HTTP Convenience Methods ==========

    /// GET a file's contents.
    pub async fn get(&self, path: &str) -> Response {
        self.request(Method::GET, path)
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET with extra headers.
    pub async fn get_with(&self, path: &str, headers: &[(&str, &str)]) -> Response {
        let mut builder = self.request(Method::GET, path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.send().await.expect("GET request failed")
    }

    /// GET a file's contents as bytes.
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes, (StatusCode, String)> {
        let resp = self.get(path).await;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.bytes().await.expect("Failed to read response bytes"))
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err((status, body))
        }
    }

    /// HEAD a resource.
    pub async fn head(&self, path: &str) -> Response {
        self.request(Method::HEAD, path)
            .send()
            .await
            .expect("HEAD request failed")
    }

    /// OPTIONS on a resource.
    pub async fn options(&self, path: &str) -> Response {
        self.request(Method::OPTIONS, path)
            .send()
            .await
            .expect("OPTIONS request failed")
    }

    /// PUT file contents.
    pub async fn put(&self, path: &str, body: impl Into<reqwest::Body>) -> Response {
        self.request(Method::PUT, path)
            .body(body)
            .send()
            .await
            .expect("PUT request failed")
    }

    /// DELETE a file or directory.
    pub async fn delete(&self, path: &str) -> Response {
        self.request(Method::DELETE, path)
            .send()
            .await
            .expect("DELETE request failed")
    }

    /// Any extension method (MKCOL, MOVE, COPY, LOCK, PROPPATCH).
    pub async fn custom(&self, method: &str, path: &str) -> Response {
        self.request(Method::from_bytes(method.as_bytes()).unwrap(), path)
            .send()
            .await
            .unwrap_or_else(|e| panic!("{method} request failed: {e}"))
    }

    /// PROPFIND (list directory or get properties).
    pub async fn propfind(&self, path: &str, depth: &str) -> Response {
        self.request(Method::from_bytes(b"PROPFIND").unwrap(), path)
            .header("Depth", depth)
            .send()
            .await
            .expect("PROPFIND request failed")
    }

    /// PROPFIND and return body as string.
    pub async fn propfind_body(&self, path: &str, depth: &str) -> (StatusCode, String) {
        let resp = self.propfind(path, depth).await;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (status, body)
    }

    /// Stop the server explicitly (otherwise happens on drop).
    pub async fn stop(self) {
        self.server.stop().await;
    }
}

/// Shared test client for concurrent operations.
#[derive(Clone)]
pub struct SharedTestClient {
    client: Client,
    credentials: Option<(String, String)>,
    pub base_url: String,
}

impl SharedTestClient {
    /// GET a file's contents as bytes.
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes, (StatusCode, String)> {
        let mut builder = self.client.get(format!("{}{}", self.base_url, path));
        if let Some((user, secret)) = &self.credentials {
            builder = builder.basic_auth(user, Some(secret));
        }
        let resp = builder.send().await.expect("GET request failed");
        let status = resp.status();
        if status.is_success() {
            Ok(resp.bytes().await.expect("Failed to read response bytes"))
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err((status, body))
        }
    }
}

impl TestServer {
    /// Get a shared client for concurrent operations.
    pub fn shared_client(&self) -> SharedTestClient {
        SharedTestClient {
            client: self.client.clone(),
            credentials: self.credentials.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Populate the standard fixture under `root`.
pub fn populate_fixture(root: &Path) {
    fs::write(root.join("a.txt"), b"0123456789").unwrap();
    fs::write(root.join(".hidden"), b"secret").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("b.txt"), b"b").unwrap();
    fs::create_dir(root.join("sub").join(".git")).unwrap();
    fs::write(root.join("sub").join(".git").join("HEAD"), b"ref").unwrap();
}
