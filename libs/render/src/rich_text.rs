use entity::prelude::*;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::debug;
use url::{ParseError, Url};

/// Renders runs in order. Styling wraps from the inside out: code, bold,
/// italic, strikethrough, underline, color, then link.
pub fn render_rich_text(runs: &[RichText]) -> String {
    runs.iter().map(render_run).collect()
}

fn render_run(run: &RichText) -> String {
    let mut html = encode_text(&run.text).into_owned();

    let annotations = run.annotations;
    if annotations.code {
        html = format!("<code>{}</code>", html);
    }
    if annotations.bold {
        html = format!("<strong>{}</strong>", html);
    }
    if annotations.italic {
        html = format!("<em>{}</em>", html);
    }
    if annotations.strikethrough {
        html = format!("<s>{}</s>", html);
    }
    if annotations.underline {
        html = format!("<u>{}</u>", html);
    }

    if let Some(color) = run.color.as_deref().filter(|c| *c != "default") {
        let prefix = if run.background_colorable {
            "bg"
        } else {
            "color"
        };
        html = format!(
            "<span class=\"{}-{}\">{}</span>",
            prefix,
            encode_double_quoted_attribute(color),
            html
        );
    }

    if let Some(href) = run.href.as_deref().and_then(safe_href) {
        html = format!(
            "<a href=\"{}\">{}</a>",
            encode_double_quoted_attribute(href),
            html
        );
    }

    html
}

/// Links may be relative or use `http`, `https` or `mailto`; anything else
/// is dropped and its text rendered plain.
pub(crate) fn safe_href(href: &str) -> Option<&str> {
    match Url::parse(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https" | "mailto") => {
            Some(href)
        }
        Err(ParseError::RelativeUrlWithoutBase) => Some(href),
        _ => {
            debug!(task = "render link", href, "unsafe link dropped");
            None
        }
    }
}
