use serde::{Deserialize, Serialize};

use crate::rich_text::{plain_text, RichText};

/// A node of the recursive post content tree.
///
/// `type` on the wire selects the specialised shape in [`BlockKind`]; the
/// base fields are shared by every kind.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub struct Block {
    pub id: String,
    pub r#type: String,
    pub kind: BlockKind,
    pub has_children: bool,
    pub children: Vec<Block>,
    pub text: Vec<RichText>,
    pub captions: Vec<RichText>,
    pub is_file_available: bool,
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub enum BlockKind {
    #[default]
    Base,
    Code(CodeBlock),
    Table(TableBlock),
    Url(UrlBlock),
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct TableBlock {
    pub has_row_header: bool,
    pub has_column_header: bool,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct UrlBlock {
    pub url: String,
    pub preview: Option<UrlPreview>,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct UrlPreview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("block {id} of type {block_type} has no {field}")]
    MissingField {
        id: String,
        block_type: String,
        field: &'static str,
    },
}

impl Block {
    /// Children a renderer may descend into. A block claiming no children
    /// yields nothing even if the list is populated.
    pub fn renderable_children(&self) -> &[Block] {
        if self.has_children {
            &self.children
        } else {
            &[]
        }
    }

    pub fn plain_text(&self) -> String {
        plain_text(&self.text)
    }

    /// Row count and widest row of a table, counted over renderable
    /// children only.
    pub fn table_shape(&self) -> (usize, usize) {
        let rows = self.renderable_children();
        let columns = rows
            .iter()
            .map(|row| row.renderable_children().len())
            .max()
            .unwrap_or_default();
        (rows.len(), columns)
    }
}

impl TableBlock {
    pub fn is_consistent_with(&self, block: &Block) -> bool {
        let (rows, columns) = block.table_shape();
        let all_rows_full = block
            .renderable_children()
            .iter()
            .all(|row| row.renderable_children().len() == columns);
        rows == self.height as usize
            && columns == self.width as usize
            && all_rows_full
    }
}

#[derive(Serialize, Deserialize)]
struct RawBlock {
    id: String,
    r#type: String,
    #[serde(default)]
    has_children: bool,
    #[serde(default)]
    children: Vec<Block>,
    #[serde(default)]
    text: Vec<RichText>,
    #[serde(default)]
    captions: Vec<RichText>,
    #[serde(default)]
    is_file_available: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    has_row_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    has_column_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preview: Option<UrlPreview>,
}

impl TryFrom<RawBlock> for Block {
    type Error = BlockError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let kind = match raw.r#type.as_str() {
            "code" => BlockKind::Code(CodeBlock {
                language: raw
                    .language
                    .unwrap_or_else(|| "plaintext".to_string()),
                // older payloads carry the source only as rich text
                code: raw.code.unwrap_or_else(|| plain_text(&raw.text)),
            }),
            "table" => BlockKind::Table(TableBlock {
                has_row_header: raw.has_row_header.unwrap_or_default(),
                has_column_header: raw.has_column_header.unwrap_or_default(),
                width: raw.width.unwrap_or_default(),
                height: raw.height.unwrap_or_default(),
            }),
            "url" | "bookmark" | "link_preview" | "embed" => {
                let Some(url) = raw.url else {
                    return Err(BlockError::MissingField {
                        id: raw.id,
                        block_type: raw.r#type,
                        field: "url",
                    });
                };
                BlockKind::Url(UrlBlock {
                    url,
                    preview: raw.preview,
                })
            }
            _ => BlockKind::Base,
        };

        Ok(Block {
            id: raw.id,
            r#type: raw.r#type,
            kind,
            has_children: raw.has_children,
            children: raw.children,
            text: raw.text,
            captions: raw.captions,
            is_file_available: raw.is_file_available,
        })
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let mut raw = RawBlock {
            id: block.id,
            r#type: block.r#type,
            has_children: block.has_children,
            children: block.children,
            text: block.text,
            captions: block.captions,
            is_file_available: block.is_file_available,
            language: None,
            code: None,
            has_row_header: None,
            has_column_header: None,
            width: None,
            height: None,
            url: None,
            preview: None,
        };

        match block.kind {
            BlockKind::Base => {}
            BlockKind::Code(code) => {
                raw.language = Some(code.language);
                raw.code = Some(code.code);
            }
            BlockKind::Table(table) => {
                raw.has_row_header = Some(table.has_row_header);
                raw.has_column_header = Some(table.has_column_header);
                raw.width = Some(table.width);
                raw.height = Some(table.height);
            }
            BlockKind::Url(url) => {
                raw.url = Some(url.url);
                raw.preview = url.preview;
            }
        }

        raw
    }
}
