use std::{ops::Deref, sync::Arc};

use client::BlogApi;
use entity::prelude::*;

use crate::Store;

/// Holds a standalone content tree fetched by item id.
pub struct ContentStore<A> {
    api: Arc<A>,
    store: Store<Option<Block>>,
}

impl<A: BlogApi> ContentStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            store: Store::default(),
        }
    }

    pub async fn fetch_content(&self, item_id: &str) {
        self.store
            .run("fetch content", "failed to load the content", async {
                self.api.get_content(item_id).await.map(Some)
            })
            .await
    }
}

impl<A> Deref for ContentStore<A> {
    type Target = Store<Option<Block>>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{fake::FakeApi, Status};

    #[tokio::test]
    async fn test_fetch_content() {
        let store = ContentStore::new(Arc::new(FakeApi::default()));

        store.fetch_content("item-1").await;

        let state = store.state();
        assert_eq!(state.content.map(|b| b.id), Some("item-1".to_string()));
        assert_eq!(state.status, Status::Loaded);
    }

    #[tokio::test]
    async fn test_fetch_content_failure() {
        let api = FakeApi {
            failing_ids: vec!["item-2".into()],
            ..Default::default()
        };
        let store = ContentStore::new(Arc::new(api));

        store.fetch_content("item-2").await;

        let state = store.state();
        assert_eq!(state.content, None);
        assert_eq!(state.status, Status::Errored);
    }
}
