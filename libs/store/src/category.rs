use entity::prelude::*;
use tokio::sync::watch;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CategoryState {
    pub categories: Vec<Category>,
    pub selected: Option<String>,
}

/// Categories are not served by the backend; they are derived from the
/// posts already fetched.
#[derive(Debug)]
pub struct CategoryStore {
    tx: watch::Sender<CategoryState>,
}

impl Default for CategoryStore {
    fn default() -> Self {
        let (tx, _) = watch::channel(CategoryState::default());
        Self { tx }
    }
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CategoryState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CategoryState> {
        self.tx.subscribe()
    }

    pub fn extract_categories_from_posts(&self, posts: &[PostItem]) {
        let categories = unique_categories(posts);
        self.tx.send_modify(|state| state.categories = categories);
    }

    pub fn set_selected_category(&self, category_id: Option<String>) {
        self.tx.send_modify(|state| state.selected = category_id);
    }

    /// Posts in the selected category, or all of them when nothing is
    /// selected.
    pub fn filter_posts<'a>(&self, posts: &'a [PostItem]) -> Vec<&'a PostItem> {
        let state = self.tx.borrow();
        match state.selected.as_deref() {
            Some(id) => posts.iter().filter(|p| p.has_category(id)).collect(),
            None => posts.iter().collect(),
        }
    }
}
