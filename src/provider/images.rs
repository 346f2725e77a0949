use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures_util::future::join_all;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Download every image concurrently and return them as `data:` URLs.
///
/// Output order follows `urls`, not completion order. Images that fail to
/// download are logged and left out.
pub async fn fetch_as_data_urls(client: &Client, urls: &[String], timeout: Duration) -> Vec<String> {
    let fetches = urls.iter().map(|url| fetch_one(client, url, timeout));

    join_all(fetches)
        .await
        .into_iter()
        .zip(urls)
        .filter_map(|(result, url)| match result {
            Ok(data_url) => Some(data_url),
            Err(e) => {
                warn!("Failed to fetch image {}: {:#}", url, e);
                None
            }
        })
        .collect()
}

async fn fetch_one(client: &Client, url: &str, timeout: Duration) -> Result<String> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .context("image request failed")?
        .error_for_status()
        .context("image request returned an error status")?;

    let media_type = media_type(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default(),
    );

    let bytes = response.bytes().await.context("failed to read image body")?;
    Ok(format!("data:{};base64,{}", media_type, STANDARD.encode(&bytes)))
}

fn media_type(content_type: &str) -> &'static str {
    if content_type.contains("png") {
        "image/png"
    } else if content_type.contains("gif") {
        "image/gif"
    } else if content_type.contains("webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}
