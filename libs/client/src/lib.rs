use std::future::Future;

use entity::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;
use util::config::Config;

mod client;
pub mod endpoint;
mod response;

pub use client::Client;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{status_text} ({status})")]
    ClientError {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request never completed.
    #[error("{message}: {source}")]
    TransportError {
        message: String,
        source: reqwest::Error,
    },

    #[error("{message}: {source}")]
    DecodeError {
        message: String,
        source: serde_json::Error,
    },

    #[error("{message}: {source}")]
    InvalidUrl {
        message: String,
        source: url::ParseError,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ClientError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Query options for the post list. Keys the backend does not know about
/// are dropped when deserializing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_access: Option<bool>,
}

impl PostsFilter {
    pub fn private_access(private_access: bool) -> Self {
        Self {
            private_access: Some(private_access),
        }
    }
}

pub trait BlogApi {
    fn get_posts(
        &self,
        filter: PostsFilter,
    ) -> impl Future<Output = Result<Vec<PostItem>, ApiError>> + Send;

    fn get_post(
        &self,
        post_id: &str,
    ) -> impl Future<Output = Result<PostItemDetail, ApiError>> + Send;

    fn get_content(
        &self,
        item_id: &str,
    ) -> impl Future<Output = Result<Block, ApiError>> + Send;
}

pub fn log_api_config(config: &Config) {
    if !config.debug_mode {
        return;
    }

    let endpoints: Vec<&str> =
        endpoint::ENDPOINTS.iter().map(|(name, _)| *name).collect();

    info!(
        task = "api config",
        mode = %config.mode,
        api_base_url = config.api_base_url(),
        ws_base_url = config.ws_base_url(),
        static_base_url = config.static_base_url(),
        media_base_url = config.media_base_url(),
        api_target = config.api_target,
        endpoints = ?endpoints
    );
}
