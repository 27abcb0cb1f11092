use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{DownloadError, Result};

pub fn build_client(config: &Config) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout())
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

/// Issues the GET and accepts only `200 OK`. Any other response is dropped
/// unread.
pub fn fetch(client: &Client, url: &str) -> Result<Response> {
    debug!(url, "sending request");
    let response = client.get(url).send()?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(DownloadError::Status(status));
    }

    info!(url, content_length = ?response.content_length(), "response headers received");
    Ok(response)
}
