//! Wire types for the storage API
//!
//! Records here are plain request/response payloads. The client never owns,
//! caches or diffs them; every value is whatever the server last returned.
//!
//! - **[`Directory`]**: a node in the directory tree
//! - **[`File`]**: a stored object and its storage-network details
//! - **[`DirectoryListing`]**: the `{ directories, files }` view of one directory
//! - **[`StorageClass`]**: hot / warm / glacier tiers
//! - **[`ProviderMetadata`]**: storage-network specific metadata, tagged per provider
//! - **[`TotalSize`]**: lossless byte counts

mod directory;
mod file;
mod provider;
mod size;
mod storage_class;

pub use directory::{Directory, DirectoryListing};
pub use file::{File, FileLinks};
pub use provider::{
    FileFileGoMetadata, FilecoinMetadata, IpfsMetadata, ProviderMetadata, SiaMetadata,
};
pub use size::TotalSize;
pub use storage_class::{StorageClass, StorageClassError};
