//! Listener and connection handling.
//!
//! Each connection is served by hyper with HTTP/1 and HTTP/2 negotiated
//! automatically. Requests pass the [`AuthGate`] before reaching the
//! read-only DAV handler.

use crate::auth::{is_authorized, unauthorized_response};
use crate::filesystem::ShareWebDav;
use dav_server::body::Body;
use dav_server::{DavHandler, DavMethodSet};
use davshare_core::AuthGate;
use hyper::{Request, Response};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 0 lets the OS pick a free port.
    pub port: u16,
    pub bind_address: IpAddr,
    /// Render an HTML index for `GET` on a collection.
    pub autoindex: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            autoindex: false,
        }
    }
}

/// Everything a connection needs, shared across all of them.
#[derive(Clone)]
struct ShareService {
    handler: Arc<DavHandler>,
    gate: AuthGate,
}

impl ShareService {
    async fn call(&self, peer: SocketAddr, req: Request<Incoming>) -> Response<Body> {
        if !is_authorized(&self.gate, req.headers()) {
            debug!(%peer, method = %req.method(), uri = %req.uri(), "Rejecting unauthenticated request");
            return unauthorized_response(self.gate.realm());
        }
        self.handler.handle(req).await
    }

    async fn serve_connection(self, stream: TcpStream, peer: SocketAddr) {
        let service = service_fn(move |req: Request<Incoming>| {
            let this = self.clone();
            async move { Ok::<_, Infallible>(this.call(peer, req).await) }
        });

        if let Err(e) = auto::Builder::new(TokioExecutor::new())
            .serve_connection(TokioIo::new(stream), service)
            .await
        {
            warn!(%peer, error = %e, "HTTP connection error");
        }
    }

    async fn accept_loop(self, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    tokio::spawn(self.clone().serve_connection(stream, peer));
                }
                Err(e) => error!(error = %e, "Failed to accept connection"),
            }
        }
    }
}

/// A running share. Dropping it stops the listener.
pub struct WebDavServer {
    /// Address the listener is bound to.
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl WebDavServer {
    /// Binds the listener and starts accepting connections.
    ///
    /// Every request is checked against `gate` before it reaches `fs`.
    pub async fn start(
        fs: ShareWebDav,
        gate: AuthGate,
        config: ServerConfig,
    ) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(SocketAddr::new(config.bind_address, config.port)).await?;
        let addr = listener.local_addr()?;

        info!(
            %addr,
            root = %fs.root().path().display(),
            realm = %gate.realm(),
            "Starting WebDAV server"
        );

        // No lock system: LOCK and UNLOCK stay out of the verb set
        let handler = DavHandler::builder()
            .filesystem(Box::new(fs))
            .methods(DavMethodSet::WEBDAV_RO)
            .autoindex(config.autoindex)
            .build_handler();
        let service = ShareService {
            handler: Arc::new(handler),
            gate,
        };

        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            tokio::select! {
                () = service.accept_loop(listener) => debug!("Accept loop ended"),
                _ = shutdown_rx => info!("Received shutdown signal"),
            }
        });

        Ok(Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Closes the listener and waits for the accept task to finish.
    ///
    /// Connections already being served are not awaited.
    pub async fn stop(mut self) {
        if let Some(task) = self.signal_shutdown() {
            let _ = task.await;
        }
        info!(addr = %self.addr, "WebDAV server stopped");
    }

    fn signal_shutdown(&mut self) -> Option<JoinHandle<()>> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.take()
    }
}

impl Drop for WebDavServer {
    fn drop(&mut self) {
        if let Some(task) = self.signal_shutdown() {
            task.abort();
        }
    }
}
