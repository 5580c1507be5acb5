use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};
use tracing::{debug, warn};

mod detect;
mod language;
mod line_numbers;

pub use detect::{Detection, SIGNATURE_RELEVANCE};
pub use language::{display_name, normalize_language, SUPPORTED_LANGUAGES};
pub use line_numbers::LineNumberError;

/// Auto-detected results at or below this score are discarded.
pub const RELEVANCE_THRESHOLD: u32 = 5;

pub const CLASS_PREFIX: &str = "hljs-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub html: String,
    /// Language the markup was produced for, if any grammar was applied.
    pub language: Option<String>,
    /// Set when the code came back escaped instead of highlighted.
    pub fallback: bool,
}

impl Highlighted {
    fn escaped(code: &str) -> Self {
        Self {
            html: escape_html(code),
            language: None,
            fallback: true,
        }
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Syntax highlighting adapter. Construct one and hand it to whatever
/// renders code blocks.
#[derive(Debug)]
pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: two_face::syntax::extra_newlines(),
        }
    }

    pub fn highlight(&self, code: &str, language: &str) -> String {
        self.highlight_detailed(code, language).html
    }

    /// Never fails: unknown languages go through detection, and anything
    /// the engine cannot handle comes back as escaped text.
    pub fn highlight_detailed(&self, code: &str, language: &str) -> Highlighted {
        if code.is_empty() {
            return Highlighted {
                html: String::new(),
                language: None,
                fallback: false,
            };
        }

        let normalized = normalize_language(language);

        if self.is_language_supported(&normalized) {
            if let Some(syntax) = self.find_syntax(&normalized) {
                return self.render_or_escape(code, syntax, normalized);
            }
            debug!(
                task = "highlight",
                language = normalized,
                "no grammar, trying detection"
            );
        }

        match self.detect(code) {
            Some((detection, syntax))
                if detection.relevance > RELEVANCE_THRESHOLD =>
            {
                debug!(
                    task = "highlight",
                    requested = language,
                    detected = %detection.language,
                    relevance = detection.relevance
                );
                self.render_or_escape(code, syntax, detection.language)
            }
            _ => Highlighted::escaped(code),
        }
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        let language = normalize_language(language);
        language::is_listed(&language) || self.find_syntax(&language).is_some()
    }

    pub fn supported_languages(&self) -> Vec<&'static str> {
        let mut languages = SUPPORTED_LANGUAGES.to_vec();
        languages.sort_unstable();
        languages
    }

    pub fn language_display_name(&self, language: &str) -> String {
        display_name(language)
    }

    /// Decorates a rendered block with line numbers starting at `start`
    /// (1 when absent). Numbering is cosmetic: on failure the markup is
    /// returned untouched.
    pub fn add_line_numbers(&self, html: &str, start: Option<usize>) -> String {
        match line_numbers::number_lines(html, start.unwrap_or(1)) {
            Ok(numbered) => numbered,
            Err(e) => {
                warn!(task = "line numbers", err = e.to_string());
                html.to_string()
            }
        }
    }

    /// Best auto-detected language together with its grammar.
    pub fn detect(&self, code: &str) -> Option<(Detection, &SyntaxReference)> {
        let first_line = code.lines().next().unwrap_or_default();
        if let Some(syntax) = self.syntaxes.find_syntax_by_first_line(first_line) {
            let language = SUPPORTED_LANGUAGES
                .iter()
                .find(|l| self.find_syntax(l).map(|s| &s.name) == Some(&syntax.name))
                .map(|l| l.to_string())
                .unwrap_or_else(|| syntax.name.to_lowercase());
            return Some((
                Detection {
                    language,
                    relevance: SIGNATURE_RELEVANCE,
                },
                syntax,
            ));
        }

        let detection =
            detect::detect(code, |language| self.find_syntax(language).is_some())?;
        let syntax = self.find_syntax(&detection.language)?;
        Some((detection, syntax))
    }

    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        self.syntaxes
            .find_syntax_by_token(language::grammar_token(language))
    }

    fn render(
        &self,
        code: &str,
        syntax: &SyntaxReference,
    ) -> Result<String, syntect::Error> {
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntaxes,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }

    fn render_or_escape(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        language: String,
    ) -> Highlighted {
        match self.render(code, syntax) {
            Ok(html) => Highlighted {
                html,
                language: Some(language),
                fallback: false,
            },
            Err(e) => {
                warn!(
                    task = "highlight",
                    language,
                    err = e.to_string(),
                    "falling back to escaped text"
                );
                Highlighted::escaped(code)
            }
        }
    }
}
