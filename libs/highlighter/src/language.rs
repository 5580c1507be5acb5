/// Languages the adapter always claims, whether or not the engine ships a
/// grammar for them.
pub const SUPPORTED_LANGUAGES: [&str; 34] = [
    "javascript",
    "typescript",
    "python",
    "java",
    "csharp",
    "cpp",
    "c",
    "html",
    "css",
    "scss",
    "sass",
    "json",
    "xml",
    "yaml",
    "markdown",
    "sql",
    "shell",
    "bash",
    "powershell",
    "go",
    "rust",
    "php",
    "ruby",
    "swift",
    "kotlin",
    "dart",
    "vue",
    "jsx",
    "tsx",
    "dockerfile",
    "nginx",
    "apache",
    "plaintext",
    "text",
];

const ALIASES: [(&str, &str); 23] = [
    ("js", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("cs", "csharp"),
    ("c++", "cpp"),
    ("c#", "csharp"),
    ("html5", "html"),
    ("htm", "html"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("sh", "shell"),
    ("zsh", "shell"),
    ("fish", "shell"),
    ("ps1", "powershell"),
    ("pwsh", "powershell"),
    ("golang", "go"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("kt", "kotlin"),
    ("dockerfile", "dockerfile"),
    ("docker", "dockerfile"),
    ("text", "plaintext"),
    ("txt", "plaintext"),
];

// Canonical name -> token understood by the grammar lookup.
const GRAMMAR_TOKENS: [(&str, &str); 14] = [
    ("javascript", "js"),
    ("jsx", "js"),
    ("typescript", "ts"),
    ("python", "py"),
    ("csharp", "cs"),
    ("shell", "sh"),
    ("bash", "sh"),
    ("markdown", "md"),
    ("ruby", "rb"),
    ("rust", "rs"),
    ("plaintext", "txt"),
    ("text", "txt"),
    ("powershell", "ps1"),
    ("apache", "htaccess"),
];

const DISPLAY_NAMES: [(&str, &str); 33] = [
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("python", "Python"),
    ("java", "Java"),
    ("csharp", "C#"),
    ("cpp", "C++"),
    ("c", "C"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("sass", "Sass"),
    ("json", "JSON"),
    ("xml", "XML"),
    ("yaml", "YAML"),
    ("markdown", "Markdown"),
    ("sql", "SQL"),
    ("shell", "Shell"),
    ("bash", "Bash"),
    ("powershell", "PowerShell"),
    ("go", "Go"),
    ("rust", "Rust"),
    ("php", "PHP"),
    ("ruby", "Ruby"),
    ("swift", "Swift"),
    ("kotlin", "Kotlin"),
    ("dart", "Dart"),
    ("vue", "Vue"),
    ("jsx", "JSX"),
    ("tsx", "TSX"),
    ("dockerfile", "Dockerfile"),
    ("nginx", "Nginx"),
    ("apache", "Apache"),
    ("plaintext", "Plain Text"),
];

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Lowercases, trims and resolves aliases. Blank input means plain text.
pub fn normalize_language(language: &str) -> String {
    let language = language.trim().to_lowercase();
    if language.is_empty() {
        return "plaintext".to_string();
    }
    lookup(&ALIASES, &language)
        .map(str::to_string)
        .unwrap_or(language)
}

pub fn grammar_token(language: &str) -> &str {
    lookup(&GRAMMAR_TOKENS, language).unwrap_or(language)
}

pub fn is_listed(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}

pub fn display_name(language: &str) -> String {
    let language = normalize_language(language);
    if let Some(name) = lookup(&DISPLAY_NAMES, &language) {
        return name.to_string();
    }

    let mut chars = language.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
