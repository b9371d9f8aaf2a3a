#[allow(clippy::module_inception)]
mod client;
mod error;
mod resources;

pub use client::ApiClient;
pub use error::ApiError;

use common::prelude::Operation;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// One operation against the storage API.
///
/// Implementors describe exactly one HTTP exchange: which operation it is
/// (for the authorization gate), how to build the request, and what the
/// success body decodes into.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    /// Set for operations whose success body carries nothing the client
    /// reads; the body is then never parsed.
    const DISCARDS_BODY: bool = false;

    /// Checked against the session scope before anything is sent
    fn operation(&self) -> Operation;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// Join path segments onto the base URL, percent-encoding each one.
pub(crate) fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
