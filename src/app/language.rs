use std::path::Path;

pub const DEFAULT_LANGUAGE: &str = "text";

/// Maps a file name's extension to a language tag, `"text"` when unknown.
pub fn language_for(filename: &str) -> &'static str {
    let ext = match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return DEFAULT_LANGUAGE,
    };

    match ext.as_str() {
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "cs" => "csharp",
        "rb" => "ruby",
        "go" => "go",
        "php" => "php",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        "sh" => "bash",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "md" => "markdown",
        "txt" => "text",
        _ => DEFAULT_LANGUAGE,
    }
}
