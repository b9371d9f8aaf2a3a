pub mod directory;
pub mod files;
pub mod size;

// Re-export for convenience
pub use directory::{
    CreateDirectoryRequest, DeleteDirectoryRequest, DirectorySizeRequest, MoveNodesRequest,
    ReadDirectoryBySegmentRequest, ReadDirectoryRequest, RenameDirectoryRequest,
};
pub use files::{
    DeleteFileRequest, ListFilesRequest, ReadFileLinksRequest, ReadFileRequest,
    RenameFileRequest, UpdateFileRequest, UploadFileRequest,
};
pub use size::{SizeResponse, TotalSizeRequest};
