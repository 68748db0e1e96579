pub mod google;
pub mod keyring;
pub mod ticktick;
pub mod weather;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("failed to parse response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("{0}")]
    Credentials(String),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("response is missing {0}")]
    Missing(&'static str),
    #[error("lookahead reaches past the supported date range")]
    TimeRange,
}

pub(crate) fn http_client() -> Result<Client, FetchError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Send a request and decode a JSON body, turning non-2xx into `Status`.
pub(crate) async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, FetchError> {
    let resp = req.send().await?;
    let status = resp.status();
    let url = resp.url().to_string();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(FetchError::Status {
            url,
            status,
            body: text,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
