//! Resource tree over a local directory, for serving through a WebDAV engine.
//!
//! The crate translates a directory on disk into protocol-facing nodes:
//!
//! - [`RootBinding`] fixes the directory that maps to the protocol root.
//! - [`resolve`] turns one path segment into a [`ResourceNode`], refusing hidden
//!   (dot-prefixed) names.
//! - [`CollectionNode`] lists and looks up children; [`LeafNode`] exposes size,
//!   content and an entity tag.
//! - [`AuthGate`] approves a credential pair through a pluggable [`AuthPolicy`].
//!
//! Nothing is cached: every call reads the filesystem as it is at that moment.
//!
//! # Example
//!
//! ```no_run
//! use davshare_core::{ResourceNode, RootBinding};
//!
//! let root = RootBinding::new("/srv/public")?;
//! for child in root.root_node().list_children()? {
//!     println!("{} (collection: {})", child.name(), child.is_collection());
//! }
//!
//! if let ResourceNode::Leaf(leaf) = root.walk(["docs", "readme.txt"])? {
//!     println!("{} bytes, etag {}", leaf.size()?, leaf.etag()?);
//! }
//! # Ok::<(), davshare_core::TreeError>(())
//! ```

pub mod auth;
pub mod error;
pub mod tree;

pub use auth::{AllowAll, AuthGate, AuthPolicy, CallbackPolicy, DEFAULT_REALM, StaticCredentials};
pub use error::{TreeError, TreeErrorKind, TreeResult};
pub use tree::{CollectionNode, LeafNode, LeafStat, ResourceNode, RootBinding, is_hidden, resolve};
