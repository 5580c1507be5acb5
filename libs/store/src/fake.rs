use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

use client::{ApiError, BlogApi, PostsFilter};
use entity::prelude::*;

pub fn server_error() -> ApiError {
    ApiError::ClientError {
        status: 500,
        status_text: "Internal Server Error".into(),
        body: "{\"detail\":\"boom\"}".into(),
    }
}

pub fn post(id: &str, categories: &[(&str, &str)]) -> PostItem {
    PostItem {
        id: id.into(),
        title: format!("post {}", id),
        category: categories
            .iter()
            .map(|(id, name)| Category {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect(),
        ..Default::default()
    }
}

/// Canned backend. Post lists are served from a queue; details and content
/// echo the requested id after an optional per-id delay.
#[derive(Default)]
pub struct FakeApi {
    pub posts: Mutex<VecDeque<Result<Vec<PostItem>, ApiError>>>,
    pub filters: Mutex<Vec<PostsFilter>>,
    pub delays: HashMap<String, Duration>,
    pub failing_ids: Vec<String>,
}

impl FakeApi {
    pub fn with_posts(
        results: Vec<Result<Vec<PostItem>, ApiError>>,
    ) -> Self {
        Self {
            posts: Mutex::new(results.into()),
            ..Default::default()
        }
    }

    async fn pause(&self, id: &str) {
        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
    }
}

impl BlogApi for FakeApi {
    async fn get_posts(
        &self,
        filter: PostsFilter,
    ) -> Result<Vec<PostItem>, ApiError> {
        self.filters.lock().unwrap().push(filter);
        self.posts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![]))
    }

    async fn get_post(&self, post_id: &str) -> Result<PostItemDetail, ApiError> {
        self.pause(post_id).await;
        if self.failing_ids.iter().any(|id| id == post_id) {
            return Err(server_error());
        }
        Ok(PostItemDetail {
            item: post(post_id, &[]),
            content: Block {
                id: format!("{}-root", post_id),
                r#type: "page".into(),
                ..Default::default()
            },
        })
    }

    async fn get_content(&self, item_id: &str) -> Result<Block, ApiError> {
        self.pause(item_id).await;
        if self.failing_ids.iter().any(|id| id == item_id) {
            return Err(server_error());
        }
        Ok(Block {
            id: item_id.into(),
            r#type: "paragraph".into(),
            ..Default::default()
        })
    }
}
