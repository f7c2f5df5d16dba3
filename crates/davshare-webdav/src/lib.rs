//! Read-only WebDAV server for a local directory.
//!
//! # How It Works
//!
//! 1. A [`RootBinding`](davshare_core::RootBinding) fixes the directory to share
//! 2. [`ShareWebDav`] adapts the resource tree to `dav-server`'s filesystem traits
//! 3. [`WebDavServer`] accepts HTTP connections, checks Basic credentials with an
//!    [`AuthGate`](davshare_core::AuthGate), and hands approved requests to the
//!    DAV handler
//!
//! Only `OPTIONS`, `HEAD`, `GET` and `PROPFIND` are served. Hidden entries
//! (leading `.`) never appear in listings and cannot be fetched.
//!
//! # Example
//!
//! ```ignore
//! use davshare_core::{AuthGate, RootBinding};
//! use davshare_webdav::{ServerConfig, ShareWebDav, WebDavServer};
//!
//! let fs = ShareWebDav::new(RootBinding::new("/srv/public")?);
//! let server = WebDavServer::start(fs, AuthGate::allow_all(), ServerConfig::default()).await?;
//! println!("Serving at {}", server.url());
//! ```
//!
//! # Security
//!
//! By default, the server binds to localhost (127.0.0.1) only.

mod auth;
mod dir_entry;
mod error;
mod file;
mod filesystem;
mod metadata;
mod server;

// Public exports
pub use auth::{Credentials, basic_credentials, unauthorized_response};
pub use error::{WebDavError, WebDavResult};
pub use filesystem::ShareWebDav;
pub use server::{ServerConfig, WebDavServer};
