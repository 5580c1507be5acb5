use std::{fmt::Display, future::Future};

use tokio::sync::watch;
use tracing::error;

pub mod category;
pub mod content;
pub mod post;
pub mod post_detail;

#[cfg(test)]
mod fake;
#[cfg(test)]
mod scenario;

pub use category::{CategoryState, CategoryStore};
pub use content::ContentStore;
pub use post::PostItemStore;
pub use post_detail::PostItemDetailStore;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StoreState<T> {
    pub content: T,
    pub loading: bool,
    pub error: Option<String>,
    pub status: Status,
}

/// Observable holder of fetched content. Only [`Store::run`] writes to it;
/// views read snapshots or subscribe for changes.
///
/// Overlapping runs are not fenced: whichever fetch resolves last decides
/// the final state.
#[derive(Debug)]
pub struct Store<T> {
    tx: watch::Sender<StoreState<T>>,
}

impl<T: Clone> Store<T> {
    pub fn new(content: T) -> Self {
        let (tx, _) = watch::channel(StoreState {
            content,
            loading: false,
            error: None,
            status: Status::Idle,
        });
        Self { tx }
    }

    pub fn state(&self) -> StoreState<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.tx.subscribe()
    }

    /// Drives one fetch through `loading` into `loaded` or `errored`.
    /// Stale content stays visible while loading and survives failures.
    pub async fn run<F, E>(&self, task: &str, fallback_message: &str, fetch: F)
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
            state.status = Status::Loading;
        });

        match fetch.await {
            Ok(content) => self.tx.send_modify(|state| {
                state.content = content;
                state.loading = false;
                state.status = Status::Loaded;
            }),
            Err(e) => {
                let message = e.to_string();
                error!(task, err = message);

                let message = if message.trim().is_empty() {
                    fallback_message.to_string()
                } else {
                    message
                };
                self.tx.send_modify(|state| {
                    state.error = Some(message);
                    state.loading = false;
                    state.status = Status::Errored;
                });
            }
        }
    }
}

impl<T: Clone + Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
