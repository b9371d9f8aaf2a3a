use common::prelude::{Operation, TotalSize};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::api::client::{endpoint, ApiError, ApiRequest};

/// Body of both size queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeResponse {
    pub total_size: TotalSize,
}

/// Bytes stored across every directory the key's owner can see
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalSizeRequest;

impl ApiRequest for TotalSizeRequest {
    type Response = SizeResponse;

    fn operation(&self) -> Operation {
        Operation::TotalSize
    }

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, &["total-size"])?))
    }
}
