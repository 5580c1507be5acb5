pub mod block;
pub mod post;
pub mod rich_text;

pub mod prelude {
    pub use crate::block::{
        Block, BlockKind, CodeBlock, TableBlock, UrlBlock, UrlPreview,
    };
    pub use crate::post::{
        parse_timestamp, unique_categories, Category, PostItem, PostItemDetail,
    };
    pub use crate::rich_text::{plain_text, Annotations, RichText};
}
