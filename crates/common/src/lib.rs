/**
 * Scope bitmask carried by an API key.
 *  - Named capability bits
 *  - Zero as the unrestricted sentinel
 */
pub mod capability;
/**
 * Pre-flight permission checks.
 * Every resource operation names the capabilities
 *  it needs and is refused locally, before any
 *  network I/O, when the key plainly lacks them.
 */
pub mod authorization;
/**
 * Decoding of the composite, dot-delimited
 *  API key into its scope and edge token.
 */
pub mod credential;
/**
 * Wire types returned by the storage API:
 *  directories, files, listings, sizes and
 *  provider-specific storage metadata.
 */
pub mod types;

pub mod prelude {
    pub use crate::authorization::{authorize, AuthorizationDenied, Operation};
    pub use crate::capability::CapabilitySet;
    pub use crate::credential::{ApiKey, CredentialError};
    pub use crate::types::{
        Directory, DirectoryListing, File, FileLinks, ProviderMetadata, StorageClass, TotalSize,
    };
}
