use std::net::{Ipv4Addr, SocketAddr};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use util::config::{Config, PROXY_PREFIXES};

#[derive(Clone, Debug)]
pub struct ProxyState {
    target: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("failed to reach {url}: {source}")]
    Upstream {
        url: String,
        source: reqwest::Error,
    },
    #[error("failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!(task = "proxy", err = self.to_string());
        (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
    }
}

const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::HOST,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn forwardable(name: &HeaderName) -> bool {
    !HOP_BY_HOP.contains(name) && *name != header::CONTENT_LENGTH
}

/// `/api` is only a routing prefix for the dev server; the backend serves
/// the same paths without it. Other prefixes pass through unchanged.
pub fn rewrite_path(path_and_query: &str) -> String {
    match path_and_query.strip_prefix("/api") {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('?') => format!("/{}", rest),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path_and_query.to_string(),
    }
}

pub fn router(target: impl Into<String>) -> Router {
    let state = ProxyState {
        target: target.into(),
        client: reqwest::Client::new(),
    };

    let mut router = Router::new();
    for prefix in PROXY_PREFIXES {
        router = router
            .route(prefix, any(forward))
            .route(&format!("{}/*path", prefix), any(forward));
    }

    router.layer(CorsLayer::permissive()).with_state(state)
}

pub async fn serve(config: &Config, port: u16) -> anyhow::Result<()> {
    info!(task = "start dev proxy", port, target = config.api_target);

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(&address).await?;
    Ok(axum::serve(listener, router(config.api_target.clone())).await?)
}

async fn forward(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    let url = format!(
        "{}{}",
        state.target.trim_end_matches('/'),
        rewrite_path(path)
    );
    info!(task = "proxy request", method = %method, path, url);

    let mut request = state.client.request(method, &url).body(body);
    for (name, value) in headers.iter().filter(|(name, _)| forwardable(name)) {
        request = request.header(name, value);
    }

    let upstream = match request.send().await {
        Ok(upstream) => upstream,
        Err(source) => return Err(ProxyError::Upstream { url, source }),
    };

    let status = upstream.status();
    info!(task = "proxy response", status = status.as_u16(), url);

    let mut response = Response::builder().status(status);
    for (name, value) in upstream.headers().iter() {
        if forwardable(name) {
            response = response.header(name, value);
        }
    }

    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(source) => return Err(ProxyError::Upstream { url, source }),
    };

    Ok(response.body(Body::from(bytes))?)
}

#[cfg(test)]
mod test {
    use axum::{extract::RawQuery, routing::get};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        format!("http://{}", address)
    }

    async fn backend() -> String {
        let router = Router::new()
            .route(
                "/posts",
                get(|RawQuery(query): RawQuery| async move {
                    format!("posts?{}", query.unwrap_or_default())
                }),
            )
            .route("/static/app.css", get(|| async { "body {}" }))
            .route(
                "/media/missing.png",
                get(|| async { (StatusCode::NOT_FOUND, "gone") }),
            );
        spawn(router).await
    }

    #[rstest]
    #[case("/api/posts?private_access=false", "/posts?private_access=false")]
    #[case("/api", "/")]
    #[case("/api?x=1", "/?x=1")]
    #[case("/apiary/hive", "/apiary/hive")]
    #[case("/static/app.css", "/static/app.css")]
    #[case("/media/a.png", "/media/a.png")]
    fn test_rewrite_path(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(rewrite_path(path), expected);
    }

    #[tokio::test]
    async fn test_api_prefix_is_stripped() {
        // Arrange
        let proxy = spawn(router(backend().await)).await;

        // Act
        let body = reqwest::get(format!("{}/api/posts?private_access=false", proxy))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        // Assert
        assert_eq!(body, "posts?private_access=false");
    }

    #[tokio::test]
    async fn test_static_and_media_pass_through() {
        let proxy = spawn(router(backend().await)).await;

        let css = reqwest::get(format!("{}/static/app.css", proxy))
            .await
            .unwrap();
        let media = reqwest::get(format!("{}/media/missing.png", proxy))
            .await
            .unwrap();

        assert_eq!(css.text().await.unwrap(), "body {}");
        assert_eq!(media.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_prefix_is_not_proxied() {
        let proxy = spawn(router(backend().await)).await;

        let response = reqwest::get(format!("{}/posts", proxy)).await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_backend_down_is_bad_gateway() {
        // Arrange
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        let proxy = spawn(router(format!("http://{}", address))).await;

        // Act
        let response = reqwest::get(format!("{}/api/posts", proxy)).await.unwrap();

        // Assert
        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    }
}
