//! Initializer file discovery
//!
//! Files are listed up front so they can be put in dependency order, but each
//! one is only read and parsed when the iterator reaches it.

use crate::error::FileError;
use crate::resource::Resource;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_YAML_DIR: &str = "yaml";

const INITIALIZER_EXTENSION: &str = "yml";

/// A parsed initializer file for a known resource.
#[derive(Debug)]
pub struct InitializerFile {
    pub path: PathBuf,
    pub resource: Resource,
    pub content: Value,
}

impl InitializerFile {
    /// Split the document into record items.
    ///
    /// A sequence is used as-is. A mapping is read as `name -> fields`; the key
    /// becomes the `name` field when the fields do not carry one. Any other
    /// document shape yields `None`.
    pub fn into_items(self) -> Option<Vec<Value>> {
        match self.content {
            Value::Sequence(items) => Some(items),
            Value::Mapping(entries) => Some(
                entries
                    .into_iter()
                    .map(|(key, value)| match value {
                        Value::Mapping(mut fields) => {
                            if !fields.contains_key("name") {
                                fields.insert(Value::String("name".to_string()), key);
                            }
                            Value::Mapping(fields)
                        }
                        Value::Null => {
                            let mut fields = serde_yaml::Mapping::new();
                            fields.insert(Value::String("name".to_string()), key);
                            Value::Mapping(fields)
                        }
                        other => other,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// One discovered `.yml` file.
#[derive(Debug)]
pub enum Entry {
    Initializer(InitializerFile),
    /// The file name matches no NetBox resource; its content is never read.
    Unrecognized(PathBuf),
}

/// Iterator over the initializer files of a directory.
pub struct InitializerFiles {
    paths: std::vec::IntoIter<PathBuf>,
}

impl InitializerFiles {
    /// List the `.yml` files directly inside `dir`.
    pub fn open(dir: &Path) -> Result<Self, FileError> {
        if !dir.is_dir() {
            return Err(FileError::MissingDirectory { path: dir.to_path_buf() });
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() && has_initializer_extension(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        paths.sort_by_cached_key(|path| {
            let stem = file_stem(path);
            let rank = Resource::from_file_stem(&stem).map(Resource::order).unwrap_or(usize::MAX);
            (rank, stem)
        });
        tracing::debug!("Discovered {} initializer file(s) in {}", paths.len(), dir.display());

        Ok(Self { paths: paths.into_iter() })
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl Iterator for InitializerFiles {
    type Item = Result<Entry, FileError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        let Some(resource) = Resource::from_file_stem(&file_stem(&path)) else {
            return Some(Ok(Entry::Unrecognized(path)));
        };
        Some(load_file(path, resource).map(Entry::Initializer))
    }
}

fn load_file(path: PathBuf, resource: Resource) -> Result<InitializerFile, FileError> {
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) => return Err(FileError::Read { path, source }),
    };
    let content: Value = match serde_yaml::from_str(&content) {
        Ok(value) => value,
        Err(source) => return Err(FileError::Parse { path, source }),
    };
    tracing::debug!("Loaded {} for {}", path.display(), resource);
    Ok(InitializerFile { path, resource, content })
}

fn has_initializer_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(INITIALIZER_EXTENSION))
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string()
}
