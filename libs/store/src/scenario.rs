use std::{sync::Arc, time::Duration};

use axum::{http::StatusCode, routing::get, Json, Router};
use chrono::{TimeZone, Utc};
use client::Client;
use entity::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpListener;

use crate::{PostItemDetailStore, PostItemStore, Status};

async fn spawn_backend(router: Router) -> Arc<Client> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });
    Arc::new(
        Client::with_base_url(
            format!("http://{}", address),
            Duration::from_secs(15),
        )
        .unwrap(),
    )
}

#[tokio::test]
async fn test_post_detail_from_backend() {
    // Arrange
    let router = Router::new().route(
        "/post",
        get(|| async {
            Json(json!({
                "id": "abc123",
                "title": "T",
                "published_at": "2024-02-01T09:30:00Z",
                "thumbnail_url": "https://example.com/t.png",
                "hits": 3,
                "category": [{"id": "5", "name": "Rust"}],
                "content": {"id": "root", "type": "page"}
            }))
        }),
    );
    let store = PostItemDetailStore::new(spawn_backend(router).await);

    // Act
    store.fetch_content("abc123").await;

    // Assert
    let state = store.state();
    let expected = PostItemDetail {
        item: PostItem {
            id: "abc123".into(),
            title: "T".into(),
            published_at: Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap(),
            thumbnail_url: "https://example.com/t.png".into(),
            hits: 3,
            category: vec![Category {
                id: "5".into(),
                name: "Rust".into(),
            }],
        },
        content: Block {
            id: "root".into(),
            r#type: "page".into(),
            ..Default::default()
        },
    };
    assert_eq!(state.content, Some(expected));
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.status, Status::Loaded);
}

#[tokio::test]
async fn test_posts_server_error_from_backend() {
    // Arrange
    let router = Router::new().route(
        "/posts",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db down") }),
    );
    let store = PostItemStore::new(spawn_backend(router).await);
    let before = store.state().content;

    // Act
    store.fetch_content(false).await;

    // Assert
    let state = store.state();
    assert_eq!(state.content, before);
    assert!(!state.error.unwrap_or_default().is_empty());
    assert!(!state.loading);
    assert_eq!(state.status, Status::Errored);
}
