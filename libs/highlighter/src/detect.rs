/// Auto-detected language with the score that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub language: String,
    pub relevance: u32,
}

/// Relevance given to a first-line signature such as a shebang.
pub const SIGNATURE_RELEVANCE: u32 = 10;

struct Profile {
    language: &'static str,
    keywords: &'static [&'static str],
    symbols: &'static [&'static str],
    case_insensitive: bool,
}

const PROFILES: &[Profile] = &[
    Profile {
        language: "rust",
        keywords: &[
            "fn", "let", "mut", "impl", "pub", "struct", "enum", "match",
            "use", "crate", "mod", "trait", "where", "Self", "Vec", "Option",
            "Result", "unwrap",
        ],
        symbols: &["::", "->", "&mut", "#[", "println!"],
        case_insensitive: false,
    },
    Profile {
        language: "python",
        keywords: &[
            "def", "elif", "import", "self", "None", "True", "False",
            "lambda", "print", "__init__", "pass", "except", "raise", "yield",
        ],
        symbols: &["\"\"\"", "):\n", "__"],
        case_insensitive: false,
    },
    Profile {
        language: "javascript",
        keywords: &[
            "function", "const", "var", "console", "require", "undefined",
            "null", "this", "async", "await", "export", "typeof", "document",
            "window",
        ],
        symbols: &["=>", "===", "!==", "console.log"],
        case_insensitive: false,
    },
    Profile {
        language: "java",
        keywords: &[
            "public", "class", "static", "void", "private", "extends",
            "implements", "new", "package", "System", "String", "final",
            "protected",
        ],
        symbols: &["System.out", "@Override"],
        case_insensitive: false,
    },
    Profile {
        language: "go",
        keywords: &[
            "func", "package", "defer", "go", "chan", "interface", "fmt",
            "nil", "range", "struct",
        ],
        symbols: &[":=", "fmt."],
        case_insensitive: false,
    },
    Profile {
        language: "cpp",
        keywords: &[
            "int", "char", "std", "void", "nullptr", "template", "namespace",
            "cout", "endl", "include", "typename",
        ],
        symbols: &["#include", "std::", "<<"],
        case_insensitive: false,
    },
    Profile {
        language: "ruby",
        keywords: &[
            "def", "end", "require", "puts", "attr_accessor", "module",
            "elsif", "nil", "do", "unless",
        ],
        symbols: &["|", "@"],
        case_insensitive: false,
    },
    Profile {
        language: "shell",
        keywords: &[
            "echo", "fi", "then", "esac", "done", "export", "sudo", "cd",
            "grep", "apt", "chmod",
        ],
        symbols: &["$(", "${", "&&", "| "],
        case_insensitive: false,
    },
    Profile {
        language: "sql",
        keywords: &[
            "select", "from", "where", "insert", "update", "delete", "join",
            "create", "table", "into", "values", "group", "order", "by",
        ],
        symbols: &[";"],
        case_insensitive: true,
    },
    Profile {
        language: "html",
        keywords: &[],
        symbols: &["<html", "<div", "<body", "<head", "</", "<p>", "<a "],
        case_insensitive: false,
    },
    Profile {
        language: "php",
        keywords: &["echo", "function", "array", "namespace"],
        symbols: &["<?php", "$this", "->", "$"],
        case_insensitive: false,
    },
];

fn words(code: &str) -> impl Iterator<Item = &str> {
    code.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}

fn score(profile: &Profile, code: &str) -> u32 {
    let keyword_hits = words(code)
        .filter(|word| {
            profile.keywords.iter().any(|k| {
                if profile.case_insensitive {
                    k.eq_ignore_ascii_case(word)
                } else {
                    k == word
                }
            })
        })
        .count();
    let symbol_hits: usize = profile
        .symbols
        .iter()
        .map(|s| code.matches(s).count())
        .sum();

    (keyword_hits + symbol_hits) as u32
}

/// Scores `code` against every profile accepted by `available` and returns
/// the best. Ties keep the earlier profile.
pub fn detect<F>(code: &str, available: F) -> Option<Detection>
where
    F: Fn(&str) -> bool,
{
    let mut best: Option<Detection> = None;
    for profile in PROFILES.iter().filter(|p| available(p.language)) {
        let relevance = score(profile, code);
        if relevance == 0 {
            continue;
        }
        if best.as_ref().map_or(true, |b| relevance > b.relevance) {
            best = Some(Detection {
                language: profile.language.to_string(),
                relevance,
            });
        }
    }
    best
}
