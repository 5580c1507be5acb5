use std::{ops::Deref, sync::Arc};

use client::BlogApi;
use entity::prelude::*;

use crate::Store;

pub struct PostItemDetailStore<A> {
    api: Arc<A>,
    store: Store<Option<PostItemDetail>>,
}

impl<A: BlogApi> PostItemDetailStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            store: Store::default(),
        }
    }

    pub async fn fetch_content(&self, post_id: &str) {
        self.store
            .run("fetch post", "failed to load the post", async {
                self.api.get_post(post_id).await.map(Some)
            })
            .await
    }
}

impl<A> Deref for PostItemDetailStore<A> {
    type Target = Store<Option<PostItemDetail>>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
