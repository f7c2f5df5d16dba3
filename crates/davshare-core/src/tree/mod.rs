//! Directory tree exposed as collection and leaf nodes.

pub mod etag;
mod node;
mod resolver;
mod root;

pub use node::{CollectionNode, LeafNode, LeafStat, ResourceNode};
pub use resolver::{is_hidden, resolve};
pub use root::RootBinding;
