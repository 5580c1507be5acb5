use std::time::Duration;

use entity::prelude::*;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use util::config::Config;

use crate::{
    endpoint::{self, build_api_url_with_params},
    response::IntoResponse,
    ApiError, BlogApi, PostsFilter,
};

#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    client: reqwest::Client,
}

impl Client {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_base_url(
            config.api_base_url(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .into_response("failed to build http client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, Option<String>)],
    ) -> Result<T, ApiError> {
        let url = build_api_url_with_params(&self.base_url, endpoint, params)?;
        debug!(task = "request", url = %url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .into_response("failed to send")?;

        let status = response.status();
        let text = response.text().await.into_response("failed to get text")?;

        if !status.is_success() {
            return Err(ApiError::ClientError {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or_default()
                    .to_string(),
                body: text,
            });
        }

        serde_json::from_str(&text).into_response("failed to parse response")
    }

    /// Fetches the public post list once and reports whether the backend
    /// answered.
    pub async fn test_connection(&self) -> bool {
        info!(task = "connection test", base_url = self.base_url);

        match self.get_posts(PostsFilter::private_access(false)).await {
            Ok(posts) => {
                info!(task = "connection test", posts = posts.len(), "ok");
                true
            }
            Err(e) => {
                error!(task = "connection test", err = e.to_string());
                false
            }
        }
    }
}

fn ensure_id(name: &str, id: &str) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidArgument {
            message: format!("{} must not be empty", name),
        });
    }
    Ok(())
}

impl BlogApi for Client {
    async fn get_posts(
        &self,
        filter: PostsFilter,
    ) -> Result<Vec<PostItem>, ApiError> {
        self.get(
            endpoint::POSTS,
            &[(
                "private_access",
                filter.private_access.map(|v| v.to_string()),
            )],
        )
        .await
    }

    async fn get_post(&self, post_id: &str) -> Result<PostItemDetail, ApiError> {
        ensure_id("post_id", post_id)?;
        self.get(endpoint::POST, &[("post_id", Some(post_id.to_string()))])
            .await
    }

    async fn get_content(&self, item_id: &str) -> Result<Block, ApiError> {
        ensure_id("item_id", item_id)?;
        self.get(endpoint::CONTENT, &[("item_id", Some(item_id.to_string()))])
            .await
    }
}
