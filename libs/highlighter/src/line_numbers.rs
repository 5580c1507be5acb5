use std::fmt::Write;

#[derive(Debug, thiserror::Error)]
pub enum LineNumberError {
    #[error("unterminated tag on line {line}")]
    UnterminatedTag { line: usize },
    #[error("closing tag without opening tag on line {line}")]
    UnbalancedClose { line: usize },
    #[error("{open} tag(s) left open at end of block")]
    UnclosedTags { open: usize },
    #[error("line numbers starting at {start} overflow")]
    Overflow { start: usize },
    #[error("failed to write markup: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Wraps each line of highlighted markup in a numbered table row.
///
/// Spans that cross a line break are closed at the end of the line and
/// reopened on the next one so every row is well-formed on its own.
pub fn number_lines(html: &str, start: usize) -> Result<String, LineNumberError> {
    let mut lines: Vec<&str> = html.split('\n').collect();
    // A trailing newline, or closing tags emitted after it, is not a line.
    let mut tail = "";
    if lines.len() > 1 {
        let last = lines[lines.len() - 1];
        if last.trim_start_matches("</span>").is_empty() {
            tail = last;
            lines.pop();
        }
    }

    let mut open: Vec<&str> = vec![];
    let mut out = String::from("<table class=\"hljs-ln\"><tbody>");

    for (index, line) in lines.iter().enumerate() {
        let number = start
            .checked_add(index)
            .ok_or(LineNumberError::Overflow { start })?;
        let reopened = open.concat();
        track_spans(line, number, &mut open)?;
        let tail = if index + 1 == lines.len() { tail } else { "" };
        track_spans(tail, number, &mut open)?;
        let closing = "</span>".repeat(open.len());

        write!(
            out,
            "<tr><td class=\"hljs-ln-line hljs-ln-numbers\" data-line-number=\"{number}\">\
             <div class=\"hljs-ln-n\" data-line-number=\"{number}\"></div></td>\
             <td class=\"hljs-ln-line hljs-ln-code\" data-line-number=\"{number}\">\
             {reopened}{line}{tail}{closing}</td></tr>"
        )?;
    }

    if !open.is_empty() {
        return Err(LineNumberError::UnclosedTags { open: open.len() });
    }

    out.push_str("</tbody></table>");
    Ok(out)
}

fn track_spans<'a>(
    line: &'a str,
    number: usize,
    open: &mut Vec<&'a str>,
) -> Result<(), LineNumberError> {
    let mut rest = line;
    while let Some(at) = rest.find('<') {
        let tag_start = &rest[at..];
        let Some(end) = tag_start.find('>') else {
            return Err(LineNumberError::UnterminatedTag { line: number });
        };
        let tag = &tag_start[..=end];

        if tag.starts_with("</span") {
            if open.pop().is_none() {
                return Err(LineNumberError::UnbalancedClose { line: number });
            }
        } else if tag.starts_with("<span") && !tag.ends_with("/>") {
            open.push(tag);
        }

        rest = &tag_start[end + 1..];
    }
    Ok(())
}
