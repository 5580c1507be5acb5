use entity::prelude::*;
use highlighter::Highlighter;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::warn;

mod rich_text;

use rich_text::safe_href;

pub use rich_text::render_rich_text;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub line_numbers: bool,
    pub line_number_start: Option<usize>,
    /// Where file-backed blocks (images) are served from, keyed by block id.
    pub media_base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    fn of(block: &Block) -> Option<Self> {
        match (&block.kind, block.r#type.as_str()) {
            (BlockKind::Base, "bulleted_list_item") => Some(ListKind::Bulleted),
            (BlockKind::Base, "numbered_list_item") => Some(ListKind::Numbered),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ListKind::Bulleted => "ul",
            ListKind::Numbered => "ol",
        }
    }
}

/// Walks a block tree and produces HTML.
///
/// Dispatch is on the decoded [`BlockKind`] first and on the raw type
/// string for base blocks. Children are only visited when the block says
/// it has them.
pub struct Renderer<'a> {
    highlighter: &'a Highlighter,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(highlighter: &'a Highlighter, options: RenderOptions) -> Self {
        Self {
            highlighter,
            options,
        }
    }

    pub fn render(&self, block: &Block) -> String {
        let mut out = String::new();
        self.render_blocks(&mut out, std::slice::from_ref(block));
        out
    }

    pub fn render_post(&self, post: &PostItemDetail) -> String {
        format!(
            "<article class=\"post\" data-post-id=\"{}\"><h1 class=\"post-title\">{}</h1>{}</article>",
            encode_double_quoted_attribute(&post.item.id),
            encode_text(&post.item.title),
            self.render(&post.content)
        )
    }

    fn render_blocks(&self, out: &mut String, blocks: &[Block]) {
        let mut open_list: Option<ListKind> = None;

        for block in blocks {
            let list = ListKind::of(block);
            if open_list != list {
                if let Some(kind) = open_list {
                    out.push_str(&format!("</{}>", kind.tag()));
                }
                if let Some(kind) = list {
                    out.push_str(&format!("<{}>", kind.tag()));
                }
                open_list = list;
            }
            self.render_block(out, block);
        }

        if let Some(kind) = open_list {
            out.push_str(&format!("</{}>", kind.tag()));
        }
    }

    fn render_children(&self, out: &mut String, block: &Block) {
        let children = block.renderable_children();
        if children.is_empty() {
            return;
        }
        out.push_str("<div class=\"block-children\">");
        self.render_blocks(out, children);
        out.push_str("</div>");
    }

    fn render_block(&self, out: &mut String, block: &Block) {
        match &block.kind {
            BlockKind::Code(code) => self.render_code(out, block, code),
            BlockKind::Table(table) => self.render_table(out, block, table),
            BlockKind::Url(url) => self.render_url(out, block, url),
            BlockKind::Base => self.render_base(out, block),
        }
    }

    fn render_base(&self, out: &mut String, block: &Block) {
        let text = render_rich_text(&block.text);

        match block.r#type.as_str() {
            "page" | "column_list" | "column" | "synced_block" => {
                out.push_str(&format!(
                    "<div class=\"block-{}\">",
                    encode_double_quoted_attribute(&block.r#type)
                ));
                self.render_blocks(out, block.renderable_children());
                out.push_str("</div>");
            }
            "paragraph" => {
                out.push_str(&format!("<p>{}</p>", text));
                self.render_children(out, block);
            }
            "heading_1" | "heading_2" | "heading_3" => {
                let level = &block.r#type["heading_".len()..];
                out.push_str(&format!("<h{level}>{text}</h{level}>"));
                self.render_children(out, block);
            }
            "bulleted_list_item" | "numbered_list_item" => {
                out.push_str(&format!("<li>{}", text));
                self.render_children(out, block);
                out.push_str("</li>");
            }
            "quote" => {
                out.push_str(&format!("<blockquote>{}", text));
                self.render_children(out, block);
                out.push_str("</blockquote>");
            }
            "callout" => {
                out.push_str(&format!("<div class=\"callout\">{}", text));
                self.render_children(out, block);
                out.push_str("</div>");
            }
            "toggle" => {
                out.push_str(&format!("<details><summary>{}</summary>", text));
                self.render_children(out, block);
                out.push_str("</details>");
            }
            "divider" => out.push_str("<hr>"),
            "image" => self.render_image(out, block),
            other => {
                out.push_str(&format!(
                    "<div class=\"block block-{}\" data-block-id=\"{}\">{}",
                    encode_double_quoted_attribute(other),
                    encode_double_quoted_attribute(&block.id),
                    text
                ));
                self.render_children(out, block);
                out.push_str("</div>");
            }
        }
    }

    fn render_image(&self, out: &mut String, block: &Block) {
        let alt = plain_text(&block.captions);
        out.push_str("<figure class=\"image\">");
        match (&self.options.media_base_url, block.is_file_available) {
            (Some(media), true) => out.push_str(&format!(
                "<img src=\"{}/{}\" alt=\"{}\">",
                encode_double_quoted_attribute(media.trim_end_matches('/')),
                encode_double_quoted_attribute(&block.id),
                encode_double_quoted_attribute(&alt)
            )),
            _ => out.push_str("<div class=\"file-unavailable\"></div>"),
        }
        render_captions(out, block);
        out.push_str("</figure>");
    }

    fn render_code(&self, out: &mut String, block: &Block, code: &CodeBlock) {
        let language = highlighter::normalize_language(&code.language);
        let mut html = self.highlighter.highlight(&code.code, &language);
        if self.options.line_numbers {
            html = self
                .highlighter
                .add_line_numbers(&html, self.options.line_number_start);
        }

        out.push_str(&format!(
            "<figure class=\"code-block\" data-language=\"{lang}\">\
             <div class=\"code-language\">{name}</div>\
             <pre><code class=\"hljs language-{lang}\">{html}</code></pre>",
            lang = encode_double_quoted_attribute(&language),
            name = encode_text(&self.highlighter.language_display_name(&language)),
        ));
        render_captions(out, block);
        out.push_str("</figure>");
    }

    fn render_table(&self, out: &mut String, block: &Block, table: &TableBlock) {
        if !table.is_consistent_with(block) {
            let (rows, columns) = block.table_shape();
            warn!(
                task = "render table",
                id = block.id,
                width = table.width,
                height = table.height,
                rows,
                columns,
                "table shape does not match its rows"
            );
        }

        out.push_str("<table class=\"block-table\"><tbody>");
        for (r, row) in block.renderable_children().iter().enumerate() {
            out.push_str("<tr>");
            for (c, cell) in row.renderable_children().iter().enumerate() {
                let header = (table.has_column_header && r == 0)
                    || (table.has_row_header && c == 0);
                let tag = if header { "th" } else { "td" };
                out.push_str(&format!("<{}>", tag));
                out.push_str(&render_rich_text(&cell.text));
                self.render_children(out, cell);
                out.push_str(&format!("</{}>", tag));
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table>");
        render_captions(out, block);
    }

    fn render_url(&self, out: &mut String, block: &Block, url: &UrlBlock) {
        let id = encode_double_quoted_attribute(&block.id);
        let tag = match safe_href(&url.url) {
            Some(href) => {
                out.push_str(&format!(
                    "<a class=\"bookmark\" href=\"{}\" data-block-id=\"{}\">",
                    encode_double_quoted_attribute(href),
                    id
                ));
                "a"
            }
            None => {
                out.push_str(&format!(
                    "<div class=\"bookmark\" data-block-id=\"{}\">",
                    id
                ));
                "div"
            }
        };

        let preview = url.preview.as_ref();
        let title = preview.and_then(|p| p.title.as_deref());
        out.push_str(&format!(
            "<span class=\"bookmark-title\">{}</span>",
            encode_text(title.unwrap_or(&url.url))
        ));
        if let Some(description) = preview.and_then(|p| p.description.as_deref()) {
            out.push_str(&format!(
                "<span class=\"bookmark-description\">{}</span>",
                encode_text(description)
            ));
        }
        if let Some(image) = preview.and_then(|p| p.image.as_deref()) {
            out.push_str(&format!(
                "<img class=\"bookmark-image\" src=\"{}\" alt=\"\">",
                encode_double_quoted_attribute(image)
            ));
        }
        out.push_str(&format!("</{}>", tag));
        render_captions(out, block);
    }
}

fn render_captions(out: &mut String, block: &Block) {
    if block.captions.is_empty() {
        return;
    }
    out.push_str(&format!(
        "<figcaption>{}</figcaption>",
        render_rich_text(&block.captions)
    ));
}
