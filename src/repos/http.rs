//! Shared HTTP plumbing for the platform fetchers.
//!
//! Both fetchers speak plain JSON REST over a shared `reqwest` client; this
//! module centralises the status-to-error mapping so the 404 and non-2xx
//! contracts stay identical across platforms.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::text::excerpt;

use super::error::FetchError;
use super::locator::RepositoryPlatform;

const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// Outcome of a platform API call where a 404 is meaningful to the caller.
pub(super) enum ApiResponse<T> {
    /// The call succeeded and the body decoded.
    Ok(T),
    /// The platform returned 404 for this resource.
    NotFound,
}

/// Sends a request and decodes the JSON body.
///
/// 404 is reported as [`ApiResponse::NotFound`] so the caller can decide
/// whether it means a missing repository or merely a missing README. Other
/// non-2xx statuses and transport failures map to [`FetchError::Client`].
pub(super) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    platform: RepositoryPlatform,
) -> Result<ApiResponse<T>, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|error| transport_error(platform, &error))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(ApiResponse::NotFound);
    }
    if !status.is_success() {
        return Err(status_error(platform, status, response).await);
    }

    response
        .json::<T>()
        .await
        .map(ApiResponse::Ok)
        .map_err(|error| FetchError::Client {
            platform,
            status: Some(status.as_u16()),
            details: format!("response body decode failed: {error}"),
        })
}

/// Sends a request and returns the raw body text, with the same 404 and
/// error mapping as [`get_json`].
pub(super) async fn get_text(
    request: RequestBuilder,
    platform: RepositoryPlatform,
) -> Result<ApiResponse<String>, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|error| transport_error(platform, &error))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(ApiResponse::NotFound);
    }
    if !status.is_success() {
        return Err(status_error(platform, status, response).await);
    }

    response
        .text()
        .await
        .map(ApiResponse::Ok)
        .map_err(|error| FetchError::Client {
            platform,
            status: Some(status.as_u16()),
            details: format!("response body read failed: {error}"),
        })
}

fn transport_error(platform: RepositoryPlatform, error: &reqwest::Error) -> FetchError {
    FetchError::Client {
        platform,
        status: None,
        details: error.to_string(),
    }
}

async fn status_error(
    platform: RepositoryPlatform,
    status: StatusCode,
    response: reqwest::Response,
) -> FetchError {
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "(failed to read error response body)".to_owned());

    FetchError::Client {
        platform,
        status: Some(status.as_u16()),
        details: excerpt(&body, MAX_ERROR_DETAIL_CHARS),
    }
}
