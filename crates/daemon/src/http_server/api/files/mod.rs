//! File tree routes. Listings use the flattened [`item::FileItem`] shape,
//!  single-node routes return the full node.

pub mod create;
pub mod delete;
pub mod direct;
pub mod error;
pub mod get;
pub mod info;
pub mod item;
pub mod list_children;
pub mod list_root;
pub mod root;
pub mod search;
pub mod update;
pub mod upload;

pub use create::{CreateRequest, NewNode};
pub use delete::{DeleteRequest, DeleteResponse};
pub use direct::DirectRequest;
pub use error::{ErrorResponse, FilesError};
pub use get::GetRequest;
pub use info::InfoRequest;
pub use item::FileItem;
pub use list_children::ListChildrenRequest;
pub use list_root::ListRootRequest;
pub use root::{RootRequest, RootResponse};
pub use search::SearchRequest;
pub use update::{UpdateOperation, UpdateRequest};
pub use upload::{UploadRequest, UploadTarget};
