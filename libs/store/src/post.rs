use std::{ops::Deref, sync::Arc};

use client::{BlogApi, PostsFilter};
use entity::prelude::*;

use crate::Store;

pub struct PostItemStore<A> {
    api: Arc<A>,
    store: Store<Vec<PostItem>>,
}

impl<A: BlogApi> PostItemStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            store: Store::default(),
        }
    }

    pub async fn fetch_content(&self, private_access: bool) {
        let filter = PostsFilter::private_access(private_access);
        self.store
            .run(
                "fetch posts",
                "failed to load the post list",
                self.api.get_posts(filter),
            )
            .await
    }
}

impl<A> Deref for PostItemStore<A> {
    type Target = Store<Vec<PostItem>>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        fake::{post, server_error, FakeApi},
        Status,
    };

    #[tokio::test]
    async fn test_fetch_replaces_list_wholesale() {
        // Arrange
        let api = Arc::new(FakeApi::with_posts(vec![
            Ok(vec![post("1", &[]), post("2", &[])]),
            Ok(vec![post("3", &[])]),
        ]));
        let store = PostItemStore::new(api.clone());

        // Act
        store.fetch_content(false).await;
        store.fetch_content(true).await;

        // Assert
        let state = store.state();
        assert_eq!(state.content, vec![post("3", &[])]);
        assert_eq!(state.status, Status::Loaded);
        assert_eq!(
            *api.filters.lock().unwrap(),
            vec![
                PostsFilter::private_access(false),
                PostsFilter::private_access(true)
            ]
        );
    }

    #[tokio::test]
    async fn test_server_error_keeps_previous_list() {
        let api = Arc::new(FakeApi::with_posts(vec![
            Ok(vec![post("1", &[])]),
            Err(server_error()),
        ]));
        let store = PostItemStore::new(api);

        store.fetch_content(false).await;
        store.fetch_content(false).await;

        let state = store.state();
        assert_eq!(state.content, vec![post("1", &[])]);
        assert_eq!(
            state.error.as_deref(),
            Some("Internal Server Error (500)")
        );
        assert!(!state.loading);
        assert_eq!(state.status, Status::Errored);
    }

    #[tokio::test]
    async fn test_next_success_clears_error() {
        let api = Arc::new(FakeApi::with_posts(vec![
            Err(server_error()),
            Ok(vec![post("1", &[])]),
        ]));
        let store = PostItemStore::new(api);

        store.fetch_content(false).await;
        store.fetch_content(false).await;

        assert_eq!(store.state().error, None);
        assert_eq!(store.state().status, Status::Loaded);
    }
}
