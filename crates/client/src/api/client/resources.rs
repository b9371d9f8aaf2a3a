//! Named operations over files and directories.
//!
//! Each method is one gated request through [`ApiClient::call`].

use bytes::Bytes;
use common::prelude::{Directory, DirectoryListing, File, FileLinks, StorageClass};

use super::client::ApiClient;
use super::error::ApiError;
use crate::api::v0::{
    CreateDirectoryRequest, DeleteDirectoryRequest, DeleteFileRequest, DirectorySizeRequest,
    ListFilesRequest, MoveNodesRequest, ReadDirectoryBySegmentRequest, ReadDirectoryRequest,
    ReadFileLinksRequest, ReadFileRequest, RenameDirectoryRequest, RenameFileRequest,
    TotalSizeRequest, UpdateFileRequest, UploadFileRequest,
};

impl ApiClient {
    pub async fn read_file(&self, id: &str) -> Result<File, ApiError> {
        self.call(ReadFileRequest { id: id.to_string() }).await
    }

    pub async fn list_files(&self, directory_id: Option<&str>) -> Result<Vec<File>, ApiError> {
        self.call(ListFilesRequest {
            directory_id: directory_id.map(str::to_string),
        })
        .await
    }

    pub async fn read_file_links(&self, id: &str) -> Result<FileLinks, ApiError> {
        self.call(ReadFileLinksRequest { id: id.to_string() }).await
    }

    /// Upload one file, attaching the session's edge token.
    pub async fn upload_file(&self, request: UploadFileRequest) -> Result<File, ApiError> {
        let request = UploadFileRequest {
            edge_token: self.api_key().edge_token().to_string(),
            ..request
        };
        tracing::info!(
            "uploading {} ({} bytes) to collection {}",
            request.name,
            request.content.len(),
            request.collection_name
        );
        self.call(request).await
    }

    /// Shorthand for [`upload_file`](Self::upload_file) with the common fields
    pub async fn upload_bytes(
        &self,
        name: &str,
        content: impl Into<Bytes>,
        collection_name: &str,
        directory_id: Option<&str>,
        storage_classes: Option<Vec<StorageClass>>,
    ) -> Result<File, ApiError> {
        let mut request = UploadFileRequest::new(name, content, collection_name);
        request.directory_id = directory_id.map(str::to_string);
        request.storage_classes = storage_classes;
        self.upload_file(request).await
    }

    pub async fn delete_file(&self, id: &str) -> Result<(), ApiError> {
        self.call(DeleteFileRequest { id: id.to_string() }).await?;
        Ok(())
    }

    pub async fn rename_file(&self, id: &str, name: &str) -> Result<File, ApiError> {
        self.call(RenameFileRequest {
            id: id.to_string(),
            name: name.to_string(),
        })
        .await
    }

    pub async fn update_file(
        &self,
        id: &str,
        name: Option<&str>,
        storage_classes: Option<Vec<StorageClass>>,
    ) -> Result<File, ApiError> {
        self.call(UpdateFileRequest {
            id: id.to_string(),
            name: name.map(str::to_string),
            storage_classes,
        })
        .await
    }

    pub async fn read_directory(&self, id: &str) -> Result<DirectoryListing, ApiError> {
        self.call(ReadDirectoryRequest { id: id.to_string() }).await
    }

    /// Read a directory by `/`-delimited path from the root
    pub async fn read_directory_by_segment(
        &self,
        path: &str,
    ) -> Result<DirectoryListing, ApiError> {
        self.call(ReadDirectoryBySegmentRequest::from_path(path)).await
    }

    pub async fn create_directory(
        &self,
        name: &str,
        parent_directory_id: Option<&str>,
        storage_class: Option<StorageClass>,
    ) -> Result<Directory, ApiError> {
        self.call(CreateDirectoryRequest {
            name: name.to_string(),
            parent_directory_id: parent_directory_id.map(str::to_string),
            storage_class,
        })
        .await
    }

    pub async fn rename_directory(&self, id: &str, name: &str) -> Result<Directory, ApiError> {
        self.call(RenameDirectoryRequest {
            id: id.to_string(),
            name: name.to_string(),
        })
        .await
    }

    pub async fn move_nodes(
        &self,
        destination_directory_id: &str,
        directory_ids: &[String],
        file_ids: &[String],
    ) -> Result<(), ApiError> {
        self.call(MoveNodesRequest {
            destination_directory_id: destination_directory_id.to_string(),
            directory_ids: directory_ids.to_vec(),
            file_ids: file_ids.to_vec(),
        })
        .await?;
        Ok(())
    }

    pub async fn delete_directory(&self, id: &str) -> Result<(), ApiError> {
        self.call(DeleteDirectoryRequest { id: id.to_string() }).await?;
        Ok(())
    }

    /// Total bytes stored, exact beyond 2^53
    pub async fn get_total_size(&self) -> Result<u128, ApiError> {
        let response = self.call(TotalSizeRequest).await?;
        Ok(response.total_size.into())
    }

    pub async fn read_directory_size(&self, id: &str) -> Result<u128, ApiError> {
        let response = self.call(DirectorySizeRequest { id: id.to_string() }).await?;
        Ok(response.total_size.into())
    }
}
