use common::prelude::{Directory, DirectoryListing, Operation, StorageClass};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::size::SizeResponse;
use crate::api::client::{endpoint, ApiError, ApiRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadDirectoryRequest {
    pub id: String,
}

impl ApiRequest for ReadDirectoryRequest {
    type Response = DirectoryListing;

    fn operation(&self) -> Operation {
        Operation::ReadDirectory
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &["directory", self.id.as_str()])?))
    }
}

/// Read a directory by its path from the root.
///
/// Each path component is sent as its own `segment` query parameter, in
/// order; `a/b/c` becomes `?segment=a&segment=b&segment=c`. No segments at
/// all reads the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadDirectoryBySegmentRequest {
    pub segments: Vec<String>,
}

impl ReadDirectoryBySegmentRequest {
    /// Split a `/`-delimited path, dropping empty components
    pub fn from_path(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl ApiRequest for ReadDirectoryBySegmentRequest {
    type Response = DirectoryListing;

    fn operation(&self) -> Operation {
        Operation::ReadDirectoryBySegment
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let query: Vec<(&str, &str)> = self
            .segments
            .iter()
            .map(|segment| ("segment", segment.as_str()))
            .collect();
        Ok(client.get(endpoint(base_url, &["directory"])?).query(&query))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectoryRequest {
    pub name: String,
    /// Omitted for a new root directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_directory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<StorageClass>,
}

impl ApiRequest for CreateDirectoryRequest {
    type Response = Directory;

    fn operation(&self) -> Operation {
        Operation::CreateDirectory
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["directory"])?;
        Ok(client.post(url).json(&self))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameDirectoryRequest {
    #[serde(skip)]
    pub id: String,
    pub name: String,
}

impl ApiRequest for RenameDirectoryRequest {
    type Response = Directory;

    fn operation(&self) -> Operation {
        Operation::RenameDirectory
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["directory", self.id.as_str()])?;
        Ok(client.put(url).json(&self))
    }
}

/// Move directories and files under a new parent in one request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNodesRequest {
    pub destination_directory_id: String,
    pub directory_ids: Vec<String>,
    pub file_ids: Vec<String>,
}

impl ApiRequest for MoveNodesRequest {
    type Response = IgnoredAny;
    const DISCARDS_BODY: bool = true;

    fn operation(&self) -> Operation {
        Operation::MoveNodes
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["directory", "move"])?;
        Ok(client.put(url).json(&self))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDirectoryRequest {
    pub id: String,
}

impl ApiRequest for DeleteDirectoryRequest {
    type Response = IgnoredAny;
    const DISCARDS_BODY: bool = true;

    fn operation(&self) -> Operation {
        Operation::DeleteDirectory
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.delete(endpoint(base_url, &["directory", self.id.as_str()])?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySizeRequest {
    pub id: String,
}

impl ApiRequest for DirectorySizeRequest {
    type Response = SizeResponse;

    fn operation(&self) -> Operation {
        Operation::DirectorySize
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["directory", self.id.as_str(), "size"])?;
        Ok(client.get(url))
    }
}
