//! Serve command - share a directory over read-only WebDAV.
//!
//! # Examples
//!
//! ```bash
//! # Share the current directory on localhost:8080
//! davshare serve
//!
//! # Share a directory on all interfaces with a single account
//! DAVSHARE_PASSWORD=hunter2 davshare serve ~/public --bind 0.0.0.0 --username guest
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use davshare_core::{AuthGate, DEFAULT_REALM, RootBinding};
use davshare_webdav::{ServerConfig, ShareWebDav, WebDavServer};

use crate::config::{AuthConfig, AuthMode, Config};

/// Port used when neither the command line nor the config file sets one.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(ClapArgs, Clone, Debug)]
pub struct Args {
    /// Directory to share (default: config `root`, then the current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Address to listen on [default: 127.0.0.1]
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<IpAddr>,

    /// Port to listen on, 0 picks a free one [default: 8080]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Realm named in authentication challenges [default: davshare]
    #[arg(long)]
    pub realm: Option<String>,

    /// Serve an HTML index when a browser opens a directory
    #[arg(long)]
    pub autoindex: bool,

    /// Accept only this username (password from --password or the config file)
    #[arg(short, long, env = "DAVSHARE_USERNAME")]
    pub username: Option<String>,

    /// Password for the static account
    #[arg(long, env = "DAVSHARE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Effective settings after merging flags over the config file.
#[derive(Debug)]
pub struct Settings {
    /// `None` shares the current directory.
    pub root: Option<PathBuf>,
    pub server: ServerConfig,
    pub realm: String,
    pub auth: AuthConfig,
}

impl Settings {
    /// Merge command-line flags over file values.
    ///
    /// Auth fields merge one by one: a username selects static
    /// authentication, a password only fills in the secret. Missing pieces
    /// are reported when the gate is built.
    pub fn resolve(args: &Args, config: Config) -> Self {
        let mut auth = config.auth;
        if let Some(username) = &args.username {
            auth.mode = AuthMode::Static;
            auth.username = Some(username.clone());
        }
        if let Some(password) = &args.password {
            auth.password = Some(password.clone());
        }

        Self {
            root: args.root.clone().or(config.root),
            server: ServerConfig {
                port: args.port.or(config.port).unwrap_or(DEFAULT_PORT),
                bind_address: args
                    .bind
                    .or(config.bind)
                    .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
                autoindex: args.autoindex || config.autoindex.unwrap_or(false),
            },
            realm: args
                .realm
                .clone()
                .or(config.realm)
                .unwrap_or_else(|| DEFAULT_REALM.to_string()),
            auth,
        }
    }
}

#[instrument(level = "info", name = "cmd::serve", skip_all)]
pub fn execute(args: &Args, config: Config) -> Result<()> {
    let settings = Settings::resolve(args, config);
    let gate = settings.auth.gate(&settings.realm)?;

    let root = match &settings.root {
        Some(path) => RootBinding::new(path)
            .with_context(|| format!("Cannot share {}", path.display()))?,
        None => RootBinding::current_dir().context("Cannot share the current directory")?,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(serve(root, gate, settings.server))
}

async fn serve(root: RootBinding, gate: AuthGate, config: ServerConfig) -> Result<()> {
    let root_display = root.path().display().to_string();
    let fs = ShareWebDav::new(root);

    let server = WebDavServer::start(fs, gate, config)
        .await
        .context("Failed to start WebDAV server")?;

    println!("Serving {root_display} at {}", server.url());
    info!(url = %server.url(), "Press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!("Shutting down");
    server.stop().await;
    Ok(())
}
