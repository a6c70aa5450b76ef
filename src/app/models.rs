use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub const ERROR_KEY: &str = "__error__";
pub const PERMISSION_DENIED: &str = "Permission Denied";

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub max_depth: usize,
    pub check_file: bool,
    pub max_file_size: u64,
    pub extra_ignore: Vec<String>,
    pub sort: bool,
    pub output: Option<PathBuf>,
}

/// Result of listing one directory.
#[derive(Debug)]
pub enum DirListing {
    Listed(Directory),
    /// The directory could not be opened. Parents drop it; at the root it
    /// serializes as `{"__error__": "Permission Denied"}`.
    Denied,
}

/// Children of a directory, kept in the order they were visited.
#[derive(Debug, Default)]
pub struct Directory {
    entries: Vec<(String, TreeNode)>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    Directory(Directory),
    File(FileNode),
}

#[derive(Debug, Serialize)]
pub struct FileNode {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub language: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<FileContent>,
}

/// What ends up in a file node's `content` field when inlining is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary,
    TooLarge(u64),
    Error(String),
}

impl Directory {
    pub fn insert(&mut self, name: String, node: TreeNode) {
        self.entries.push((name, node));
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
impl Directory {
    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
impl TreeNode {
    pub fn as_dir(&self) -> Option<&Directory> {
        match self {
            TreeNode::Directory(dir) => Some(dir),
            TreeNode::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            TreeNode::File(file) => Some(file),
            TreeNode::Directory(_) => None,
        }
    }
}

impl FileNode {
    pub fn new(name: String, language: &'static str) -> Self {
        Self {
            kind: "file",
            name,
            language,
            content: None,
        }
    }
}

impl fmt::Display for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileContent::Text(text) => f.write_str(text),
            FileContent::Binary => f.write_str("<<BINARY OR NON-TEXT FILE>>"),
            FileContent::TooLarge(size) => {
                write!(f, "<<SKIPPED: File too large ({} bytes)>>", size)
            }
            FileContent::Error(msg) => write!(f, "<<ERROR: {}>>", msg),
        }
    }
}

impl Serialize for FileContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for Directory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for DirListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DirListing::Listed(dir) => dir.serialize(serializer),
            DirListing::Denied => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(ERROR_KEY, PERMISSION_DENIED)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_render_exactly() {
        assert_eq!(
            FileContent::Binary.to_string(),
            "<<BINARY OR NON-TEXT FILE>>"
        );
        assert_eq!(
            FileContent::TooLarge(2_000_000).to_string(),
            "<<SKIPPED: File too large (2000000 bytes)>>"
        );
        assert_eq!(
            FileContent::Error("boom".into()).to_string(),
            "<<ERROR: boom>>"
        );
        assert_eq!(FileContent::Text("x = 1\n".into()).to_string(), "x = 1\n");
    }

    #[test]
    fn file_node_omits_missing_content() {
        let node = FileNode::new("a.py".into(), "python");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"type":"file","name":"a.py","language":"python"}"#);
    }

    #[test]
    fn denied_listing_serializes_as_error_map() {
        let json = serde_json::to_string(&DirListing::Denied).unwrap();
        assert_eq!(json, r#"{"__error__":"Permission Denied"}"#);
    }

    #[test]
    fn directory_keeps_insertion_order() {
        let mut dir = Directory::default();
        dir.insert("zeta".into(), TreeNode::Directory(Directory::default()));
        dir.insert(
            "alpha.md".into(),
            TreeNode::File(FileNode::new("alpha.md".into(), "markdown")),
        );
        let json = serde_json::to_string(&dir).unwrap();
        assert!(json.find("zeta").unwrap() < json.find("alpha.md").unwrap());
        assert_eq!(dir.names().collect::<Vec<_>>(), vec!["zeta", "alpha.md"]);
    }
}
