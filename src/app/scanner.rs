use crate::app::language::language_for;
use crate::app::models::{DirListing, Directory, FileContent, FileNode, RuntimeConfig, TreeNode};
use crate::app::patterns::IgnoreMatcher;
use crate::app::sniffer::is_text_file;
use anyhow::{Context, Result};
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};

/// Builds the nested folder structure for a root directory.
pub struct Scanner {
    root: PathBuf,
    max_depth: usize,
    check_file: bool,
    max_file_size: u64,
    sort: bool,
    matcher: IgnoreMatcher,
}

impl Scanner {
    /// `patterns` are resolved once by the caller and shared by every level.
    pub fn new(config: &RuntimeConfig, patterns: &[String]) -> Result<Self> {
        Ok(Self {
            root: config.root.clone(),
            max_depth: config.max_depth,
            check_file: config.check_file,
            max_file_size: config.max_file_size,
            sort: config.sort,
            matcher: IgnoreMatcher::new(patterns)?,
        })
    }

    pub fn scan(&self) -> Result<DirListing> {
        log::info!(
            "Scanning {} (depth {}, contents {})",
            self.root.display(),
            self.max_depth,
            if self.check_file { "on" } else { "off" }
        );
        let structure = self.build(&self.root, 0)?;
        match &structure {
            DirListing::Listed(dir) => log::info!(
                "Scan of {} finished: {} top-level entries",
                self.root.display(),
                dir.entry_count()
            ),
            DirListing::Denied => {
                log::info!("Scan of {} finished: root not readable", self.root.display())
            }
        }
        Ok(structure)
    }

    fn build(&self, dir: &Path, depth: usize) -> Result<DirListing> {
        if depth >= self.max_depth {
            return Ok(DirListing::Listed(Directory::default()));
        }

        let mut entries = match self.list(dir)? {
            Some(entries) => entries,
            None => {
                log::warn!("Permission denied, skipping {}", dir.display());
                return Ok(DirListing::Denied);
            }
        };
        if self.sort {
            entries.sort_by_key(|entry| entry.file_name());
        }

        let mut structure = Directory::default();
        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            if self.matcher.is_ignored(&name, &path) {
                log::debug!("Ignoring {}", path.display());
                continue;
            }

            if path.is_dir() {
                match self.build(&path, depth + 1)? {
                    DirListing::Listed(sub) => structure.insert(name, TreeNode::Directory(sub)),
                    DirListing::Denied => {}
                }
            } else if path.is_file() {
                let mut node = FileNode::new(name.clone(), language_for(&name));
                if self.check_file {
                    node.content = Some(self.read_content(&path));
                }
                structure.insert(name, TreeNode::File(node));
            }
        }

        Ok(DirListing::Listed(structure))
    }

    /// Lists a directory. `None` means the listing was refused; any other
    /// failure is returned as an error.
    fn list(&self, dir: &Path) -> Result<Option<Vec<DirEntry>>> {
        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to list {}", dir.display()))
            }
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            match entry {
                Ok(entry) => entries.push(entry),
                Err(err) if err.kind() == io::ErrorKind::PermissionDenied => return Ok(None),
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to read entry in {}", dir.display()))
                }
            }
        }
        Ok(Some(entries))
    }

    fn read_content(&self, path: &Path) -> FileContent {
        if !is_text_file(path) {
            log::debug!("Binary or non-text: {}", path.display());
            return FileContent::Binary;
        }

        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(err) => return FileContent::Error(err.to_string()),
        };
        if size > self.max_file_size {
            log::debug!("Too large ({} bytes): {}", size, path.display());
            return FileContent::TooLarge(size);
        }

        match fs::read_to_string(path) {
            Ok(text) => FileContent::Text(normalize_newlines(text)),
            Err(err) => FileContent::Error(err.to_string()),
        }
    }
}

fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}
