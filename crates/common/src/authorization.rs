//! Client-side authorization gate.
//!
//! The server remains authoritative; this check only exists so that a key
//! which plainly lacks a capability fails immediately instead of paying for
//! a round trip that is certain to be rejected.

use std::fmt;

use crate::capability::CapabilitySet;

/// Every operation the client can issue against the storage API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ReadFile,
    ListFiles,
    ReadFileLinks,
    UploadFile,
    DeleteFile,
    RenameFile,
    UpdateFile,
    ReadDirectory,
    ReadDirectoryBySegment,
    CreateDirectory,
    RenameDirectory,
    MoveNodes,
    DeleteDirectory,
    TotalSize,
    DirectorySize,
}

impl Operation {
    /// Capabilities a scope must grant for this operation,
    ///  `None` when the operation is always allowed.
    pub fn required(&self) -> Option<CapabilitySet> {
        use CapabilitySet as C;

        match self {
            Operation::ReadFile | Operation::ListFiles | Operation::ReadFileLinks => {
                Some(C::READ_FILE)
            }
            Operation::UploadFile => Some(C::UPLOAD_FILE),
            Operation::DeleteFile => Some(C::DELETE_FILE),
            // renames and updates are a combined replace on the server
            Operation::RenameFile | Operation::UpdateFile => Some(C::UPLOAD_FILE | C::DELETE_FILE),
            Operation::ReadDirectory | Operation::ReadDirectoryBySegment => {
                Some(C::READ_DIRECTORY)
            }
            Operation::CreateDirectory => Some(C::CREATE_DIRECTORY),
            Operation::RenameDirectory | Operation::MoveNodes => {
                Some(C::CREATE_DIRECTORY | C::DELETE_DIRECTORY)
            }
            Operation::DeleteDirectory => Some(C::DELETE_DIRECTORY),
            Operation::TotalSize | Operation::DirectorySize => None,
        }
    }

    pub fn denial_message(&self) -> &'static str {
        match self {
            Operation::ReadFile => "API key does not have permission to read files",
            Operation::ListFiles => "API key does not have permission to list files",
            Operation::ReadFileLinks => "API key does not have permission to read file links",
            Operation::UploadFile => "API key does not have permission to upload files",
            Operation::DeleteFile => "API key does not have permission to delete files",
            Operation::RenameFile => "API key does not have permission to rename files",
            Operation::UpdateFile => "API key does not have permission to update files",
            Operation::ReadDirectory | Operation::ReadDirectoryBySegment => {
                "API key does not have permission to read directories"
            }
            Operation::CreateDirectory => "API key does not have permission to create directories",
            Operation::RenameDirectory => "API key does not have permission to rename directories",
            Operation::MoveNodes => "API key does not have permission to move files or directories",
            Operation::DeleteDirectory => "API key does not have permission to delete directories",
            Operation::TotalSize => "API key does not have permission to read the total size",
            Operation::DirectorySize => "API key does not have permission to read directory sizes",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::ReadFile => "read_file",
            Operation::ListFiles => "list_files",
            Operation::ReadFileLinks => "read_file_links",
            Operation::UploadFile => "upload_file",
            Operation::DeleteFile => "delete_file",
            Operation::RenameFile => "rename_file",
            Operation::UpdateFile => "update_file",
            Operation::ReadDirectory => "read_directory",
            Operation::ReadDirectoryBySegment => "read_directory_by_segment",
            Operation::CreateDirectory => "create_directory",
            Operation::RenameDirectory => "rename_directory",
            Operation::MoveNodes => "move_nodes",
            Operation::DeleteDirectory => "delete_directory",
            Operation::TotalSize => "total_size",
            Operation::DirectorySize => "directory_size",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised before any network call when the session scope does not grant an
/// operation's required capabilities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthorizationDenied {
    pub operation: Operation,
    pub message: &'static str,
}

/// Check `operation` against the session's granted scope.
pub fn authorize(granted: CapabilitySet, operation: Operation) -> Result<(), AuthorizationDenied> {
    match operation.required() {
        Some(required) if !granted.grants(required) => Err(AuthorizationDenied {
            operation,
            message: operation.denial_message(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OPERATIONS: [Operation; 15] = [
        Operation::ReadFile,
        Operation::ListFiles,
        Operation::ReadFileLinks,
        Operation::UploadFile,
        Operation::DeleteFile,
        Operation::RenameFile,
        Operation::UpdateFile,
        Operation::ReadDirectory,
        Operation::ReadDirectoryBySegment,
        Operation::CreateDirectory,
        Operation::RenameDirectory,
        Operation::MoveNodes,
        Operation::DeleteDirectory,
        Operation::TotalSize,
        Operation::DirectorySize,
    ];

    #[test]
    fn test_unrestricted_scope_allows_everything() {
        for operation in ALL_OPERATIONS {
            assert!(authorize(CapabilitySet::UNRESTRICTED, operation).is_ok());
        }
    }

    #[test]
    fn test_rename_and_update_need_upload_and_delete() {
        let upload_only = CapabilitySet::UPLOAD_FILE;
        for operation in [Operation::RenameFile, Operation::UpdateFile] {
            let err = authorize(upload_only, operation).unwrap_err();
            assert_eq!(err.operation, operation);
            assert_eq!(
                operation.required(),
                Some(CapabilitySet::UPLOAD_FILE | CapabilitySet::DELETE_FILE)
            );
        }

        let both = CapabilitySet::UPLOAD_FILE | CapabilitySet::DELETE_FILE;
        assert!(authorize(both, Operation::RenameFile).is_ok());
        assert!(authorize(both, Operation::UpdateFile).is_ok());
    }

    #[test]
    fn test_directory_moves_need_create_and_delete() {
        let create_only = CapabilitySet::CREATE_DIRECTORY;
        assert!(authorize(create_only, Operation::MoveNodes).is_err());
        assert!(authorize(create_only, Operation::RenameDirectory).is_err());
        assert!(authorize(create_only, Operation::CreateDirectory).is_ok());
    }

    #[test]
    fn test_size_queries_are_always_allowed() {
        let narrow = CapabilitySet::READ_FILE;
        assert!(authorize(narrow, Operation::TotalSize).is_ok());
        assert!(authorize(narrow, Operation::DirectorySize).is_ok());
    }

    #[test]
    fn test_denial_carries_operation_message() {
        let err = authorize(CapabilitySet::from_bits(3), Operation::DeleteDirectory).unwrap_err();
        assert_eq!(err.message, Operation::DeleteDirectory.denial_message());
        assert!(err.to_string().contains("delete directories"));
    }

    #[test]
    fn test_every_gated_operation_is_denied_by_an_unrelated_bit() {
        // a scope made only of a bit no operation uses
        let unrelated = CapabilitySet::from_bits(1 << 20);
        for operation in ALL_OPERATIONS {
            let denied = authorize(unrelated, operation).is_err();
            assert_eq!(denied, operation.required().is_some(), "{}", operation);
        }
    }
}
