use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;

pub const IGNORE_FILE_NAME: &str = ".folderignore";

/// Reads `.folderignore` from the root, one pattern per line.
///
/// Blank lines and `#` comments are skipped. A missing file yields no
/// patterns; a file that exists but cannot be read is an error.
pub fn load_ignore_patterns(root: &Path) -> Result<Vec<String>> {
    let ignore_file = root.join(IGNORE_FILE_NAME);
    if !ignore_file.is_file() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&ignore_file)
        .with_context(|| format!("Failed to read ignore file {}", ignore_file.display()))?;

    Ok(content
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Tests entry names and full paths against a set of shell-style globs.
pub struct IgnoreMatcher {
    set: GlobSet,
}

impl IgnoreMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        Ok(Self {
            set: build_globset(patterns)?,
        })
    }

    /// True if any pattern matches either the bare name or the full path.
    pub fn is_ignored(&self, name: &str, path: &Path) -> bool {
        self.set.is_match(name) || self.set.is_match(path)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = compile(&to_glob_syntax(pat))
            .with_context(|| format!("Invalid glob pattern: {}", pat))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Rewrites a plain shell pattern so globset reads it the way `fnmatch`
/// does: no `{a,b}` alternation, no `**`, `^` opening a class is literal,
/// and an unclosed `[` is an ordinary character.
fn to_glob_syntax(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if !out.ends_with('*') {
                    out.push('*');
                }
                i += 1;
            }
            '{' => {
                out.push_str("[{]");
                i += 1;
            }
            '}' => {
                out.push_str("[}]");
                i += 1;
            }
            ']' => {
                out.push_str("[]]");
                i += 1;
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end + 1;
                }
                None => {
                    out.push_str("[[]");
                    i += 1;
                }
            },
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Index of the `]` closing the class opened at `start`, if any.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A `]` right after the opener is a member, not the close.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}

fn push_class(out: &mut String, body: &[char]) {
    match body.split_first() {
        Some(('^', [])) => out.push('^'),
        Some(('^', rest)) => {
            // Moved off the first slot so it stops meaning negation.
            out.push('[');
            out.extend(rest);
            out.push_str("^]");
        }
        _ => {
            out.push('[');
            out.extend(body);
            out.push(']');
        }
    }
}

// `*` crosses `/`, `\` is an ordinary character, case folding follows the host.
fn compile(pattern: &str) -> Result<globset::Glob, globset::Error> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .backslash_escape(false)
        .case_insensitive(cfg!(windows))
        .build()
}
