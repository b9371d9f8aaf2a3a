use bytes::Bytes;
use common::prelude::{File, FileLinks, Operation, StorageClass};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::api::client::{endpoint, ApiError, ApiRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadFileRequest {
    pub id: String,
}

impl ApiRequest for ReadFileRequest {
    type Response = File;

    fn operation(&self) -> Operation {
        Operation::ReadFile
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &["files", self.id.as_str()])?))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesRequest {
    /// Restrict the listing to one directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_id: Option<String>,
}

impl ApiRequest for ListFilesRequest {
    type Response = Vec<File>;

    fn operation(&self) -> Operation {
        Operation::ListFiles
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &["files"])?).query(&self))
    }
}

/// Storage status of a file: fetch links plus provider metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadFileLinksRequest {
    pub id: String,
}

impl ApiRequest for ReadFileLinksRequest {
    type Response = FileLinks;

    fn operation(&self) -> Operation {
        Operation::ReadFileLinks
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &["files", self.id.as_str(), "links"])?))
    }
}

/// Multipart upload of a single file.
///
/// `edge_token` must be the session's edge token; [`ApiClient::upload_file`]
/// fills it in from the API key.
///
/// [`ApiClient::upload_file`]: crate::api::client::ApiClient::upload_file
#[derive(Debug, Clone)]
pub struct UploadFileRequest {
    pub name: String,
    pub content: Bytes,
    pub collection_name: String,
    pub directory_id: Option<String>,
    /// Desired storage classes, sent as a JSON array
    pub storage_classes: Option<Vec<StorageClass>>,
    /// Guessed from the file name when not set
    pub content_type: Option<String>,
    pub edge_token: String,
}

impl UploadFileRequest {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Bytes>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            collection_name: collection_name.into(),
            directory_id: None,
            storage_classes: None,
            content_type: None,
            edge_token: String::new(),
        }
    }

    pub fn directory(mut self, directory_id: impl Into<String>) -> Self {
        self.directory_id = Some(directory_id.into());
        self
    }

    pub fn storage_classes(mut self, classes: Vec<StorageClass>) -> Self {
        self.storage_classes = Some(classes);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn into_form(self) -> Result<Form, ApiError> {
        let content_type = self.content_type.unwrap_or_else(|| {
            mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .to_string()
        });

        let file = Part::bytes(self.content.to_vec())
            .file_name(self.name.clone())
            .mime_str(&content_type)?;

        let mut form = Form::new()
            .text("name", self.name)
            .part("file", file)
            .text("collectionName", self.collection_name);

        if let Some(directory_id) = self.directory_id {
            form = form.text("directoryId", directory_id);
        }
        if let Some(classes) = self.storage_classes {
            form = form.text("storageClasses", serde_json::to_string(&classes)?);
        }

        Ok(form.text("edgeToken", self.edge_token))
    }
}

impl ApiRequest for UploadFileRequest {
    type Response = File;

    fn operation(&self) -> Operation {
        Operation::UploadFile
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["files"])?;
        Ok(client.post(url).multipart(self.into_form()?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    pub id: String,
}

impl ApiRequest for DeleteFileRequest {
    type Response = IgnoredAny;
    const DISCARDS_BODY: bool = true;

    fn operation(&self) -> Operation {
        Operation::DeleteFile
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.delete(endpoint(base_url, &["files", self.id.as_str()])?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameFileRequest {
    #[serde(skip)]
    pub id: String,
    pub name: String,
}

impl ApiRequest for RenameFileRequest {
    type Response = File;

    fn operation(&self) -> Operation {
        Operation::RenameFile
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["files", self.id.as_str()])?;
        Ok(client.put(url).json(&self))
    }
}

/// Change a file's name, its storage classes, or both
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_classes: Option<Vec<StorageClass>>,
}

impl ApiRequest for UpdateFileRequest {
    type Response = File;

    fn operation(&self) -> Operation {
        Operation::UpdateFile
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["files", self.id.as_str()])?;
        Ok(client.put(url).json(&self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn base() -> Url {
        Url::parse("http://localhost:3000/").unwrap()
    }

    fn body_json(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_read_file_path() {
        let request = ReadFileRequest { id: "f-1".into() }
            .build_request(&base(), &Client::new())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().as_str(), "http://localhost:3000/files/f-1");
    }

    #[test]
    fn test_list_files_query() {
        let client = Client::new();
        let all = ListFilesRequest::default()
            .build_request(&base(), &client)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(all.url().query(), None);

        let scoped = ListFilesRequest {
            directory_id: Some("d-1".into()),
        }
        .build_request(&base(), &client)
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(scoped.url().query(), Some("directoryId=d-1"));
    }

    #[test]
    fn test_rename_sends_only_name() {
        let request = RenameFileRequest {
            id: "f-1".into(),
            name: "new.txt".into(),
        }
        .build_request(&base(), &Client::new())
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.url().path(), "/files/f-1");
        assert_eq!(body_json(&request), serde_json::json!({ "name": "new.txt" }));
    }

    #[test]
    fn test_update_omits_unset_fields() {
        let request = UpdateFileRequest {
            id: "f-1".into(),
            name: None,
            storage_classes: Some(vec![StorageClass::Glacier]),
        }
        .build_request(&base(), &Client::new())
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(
            body_json(&request),
            serde_json::json!({ "storageClasses": ["glacier"] })
        );
    }

    #[test]
    fn test_upload_is_multipart_post() {
        let request = UploadFileRequest::new("notes.txt", b"hello".to_vec(), "docs")
            .directory("d-1")
            .build_request(&base(), &Client::new())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().path(), "/files");
        let content_type = request.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
    }

    #[test]
    fn test_upload_rejects_bad_content_type() {
        let result = UploadFileRequest::new("x.bin", Bytes::new(), "c")
            .content_type("not a mime")
            .build_request(&base(), &Client::new());
        assert!(result.is_err());
    }
}
