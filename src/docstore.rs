//! Doc-comment lookup backed by side-channel JSON documents.
//!
//! A separate compile-time tool extracts doc comments into one JSON file per class,
//! stored at a path derived from the qualified name (`com/example/Item.json`). This
//! module only reads those files. Parsed documents are cached per class for the life
//! of the store; the cache is safe for concurrent reads, and a race that computes the
//! same entry twice is harmless.

use crate::types::TypeIndex;
use anyhow::Context;
use log::{debug, error, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Extracted documentation for one class, read exactly as the extraction tool
/// writes it. Missing sections resolve to empty values, never null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassDocs {
    /// Class-level comment
    pub comment: String,
    /// Field name -> comment and tags
    pub fields: HashMap<String, MemberDocs>,
    /// Method name -> comment, parameter comments and tags
    pub methods: HashMap<String, MethodDocs>,
}

/// Documentation of a single field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberDocs {
    pub comment: String,
    /// Named tag values, e.g. `see` or `deprecated`
    pub tags: HashMap<String, String>,
}

/// Documentation of a single method.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MethodDocs {
    pub comment: String,
    /// Parameter name -> comment
    pub parameters: HashMap<String, String>,
    /// Named tag values
    pub tags: HashMap<String, String>,
}

impl ClassDocs {
    fn field_comment(&self, field_name: &str) -> String {
        self.fields
            .get(field_name)
            .map(|f| f.comment.trim().to_string())
            .unwrap_or_default()
    }

    fn field_tag(&self, field_name: &str, tag_name: &str) -> String {
        self.fields
            .get(field_name)
            .and_then(|f| f.tags.get(tag_name))
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }

    fn method_comment(&self, method_name: &str) -> String {
        self.methods
            .get(method_name)
            .map(|m| m.comment.trim().to_string())
            .unwrap_or_default()
    }

    fn method_tag(&self, method_name: &str, tag_name: &str) -> String {
        self.methods
            .get(method_name)
            .and_then(|m| m.tags.get(tag_name))
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }

    fn method_parameter_comment(&self, method_name: &str, parameter_name: &str) -> String {
        self.methods
            .get(method_name)
            .and_then(|m| m.parameters.get(parameter_name))
            .map(|c| c.trim().to_string())
            .unwrap_or_default()
    }
}

/// Read-only store of extracted doc comments.
pub struct DocStore {
    base_dirs: Vec<PathBuf>,
    cache: RwLock<HashMap<String, Arc<ClassDocs>>>,
}

impl DocStore {
    /// Creates a store that searches the given directories in order; the first
    /// directory containing a readable document for a class wins. With no
    /// directories configured, paths are tried relative to the working directory.
    ///
    /// # Arguments
    ///
    /// * `base_dirs` - Directories holding the extracted per-class JSON files,
    ///   in lookup order
    ///
    /// # Example
    ///
    /// ```ignore
    /// use restdocs_from_types::docstore::DocStore;
    /// use std::path::PathBuf;
    ///
    /// let docs = DocStore::new(vec![PathBuf::from("./generated-javadoc-json")]);
    /// let comment = docs.field_comment("com.example.Item", "id");
    /// ```
    pub fn new<P: Into<PathBuf>>(base_dirs: Vec<P>) -> Self {
        Self {
            base_dirs: base_dirs.into_iter().map(Into::into).collect(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves the comment on a field of the addressed class.
    pub fn field_comment(&self, qualified_name: &str, field_name: &str) -> String {
        self.class_docs(qualified_name).field_comment(field_name)
    }

    /// Resolves a named tag on a field of the addressed class.
    pub fn field_tag(&self, qualified_name: &str, field_name: &str, tag_name: &str) -> String {
        self.class_docs(qualified_name).field_tag(field_name, tag_name)
    }

    /// Resolves a method comment, walking the declared class hierarchy: the
    /// addressed class first, then its superclass chain (each level including
    /// that level's interfaces) before the class's own interfaces.
    pub fn method_comment(
        &self,
        index: &TypeIndex,
        qualified_name: &str,
        method_name: &str,
    ) -> String {
        self.resolve_in_hierarchy(index, qualified_name, &|docs| {
            docs.method_comment(method_name)
        })
    }

    /// Resolves a named tag on a method, walking the class hierarchy.
    pub fn method_tag(
        &self,
        index: &TypeIndex,
        qualified_name: &str,
        method_name: &str,
        tag_name: &str,
    ) -> String {
        self.resolve_in_hierarchy(index, qualified_name, &|docs| {
            docs.method_tag(method_name, tag_name)
        })
    }

    /// Resolves the comment on a method parameter, walking the class hierarchy.
    pub fn method_parameter_comment(
        &self,
        index: &TypeIndex,
        qualified_name: &str,
        method_name: &str,
        parameter_name: &str,
    ) -> String {
        self.resolve_in_hierarchy(index, qualified_name, &|docs| {
            docs.method_parameter_comment(method_name, parameter_name)
        })
    }

    fn resolve_in_hierarchy(
        &self,
        index: &TypeIndex,
        qualified_name: &str,
        lookup: &dyn Fn(&ClassDocs) -> String,
    ) -> String {
        let value = lookup(&self.class_docs(qualified_name));
        if !value.is_empty() {
            return value;
        }

        let Some(descriptor) = index.get(qualified_name) else {
            return String::new();
        };

        // Superclass documentation takes precedence over interface documentation
        // at every level of the hierarchy.
        if let Some(supertype) = &descriptor.supertype {
            let value = self.resolve_in_hierarchy(index, supertype, lookup);
            if !value.is_empty() {
                return value;
            }
        }
        for interface in &descriptor.interfaces {
            let value = self.resolve_in_hierarchy(index, interface, lookup);
            if !value.is_empty() {
                return value;
            }
        }

        String::new()
    }

    fn class_docs(&self, qualified_name: &str) -> Arc<ClassDocs> {
        let relative_path = class_to_relative_path(qualified_name);

        if let Some(cached) = self
            .cache
            .read()
            .ok()
            .and_then(|cache| cache.get(&relative_path).cloned())
        {
            return cached;
        }

        let docs = Arc::new(self.read_files(qualified_name, &relative_path));
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(relative_path, docs.clone());
        }
        docs
    }

    fn read_files(&self, qualified_name: &str, relative_path: &str) -> ClassDocs {
        if self.base_dirs.is_empty() {
            // No base directory is configured, so try the path as-is.
            if let Some(docs) = read_file(Path::new(relative_path)) {
                return docs;
            }
        } else {
            for dir in &self.base_dirs {
                if let Some(docs) = read_file(&dir.join(relative_path)) {
                    debug!("Found documentation for {} in {}", qualified_name, dir.display());
                    return docs;
                }
            }
        }

        warn!("No extracted documentation found for class {}", qualified_name);
        ClassDocs::default()
    }
}

fn read_file(path: &Path) -> Option<ClassDocs> {
    if !path.is_file() {
        // Ignored: more than one directory may be tried, and a warning is
        // emitted once nothing is found anywhere.
        return None;
    }

    let result = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
        .and_then(|content| {
            serde_json::from_str::<ClassDocs>(&content)
                .with_context(|| format!("Failed to parse documentation file: {}", path.display()))
        });

    match result {
        Ok(docs) => Some(docs),
        Err(e) => {
            error!("{:#}", e);
            None
        }
    }
}

/// Derives the relative document path for a qualified name. Package segments
/// become directories; the class part starts at the first segment with an
/// uppercase initial, so nested classes map to `pkg/Outer.Inner.json`.
fn class_to_relative_path(qualified_name: &str) -> String {
    let segments: Vec<&str> = qualified_name.split('.').collect();
    let class_start = segments
        .iter()
        .position(|s| s.chars().next().is_some_and(|c| c.is_uppercase()))
        .unwrap_or(segments.len().saturating_sub(1));

    let mut path = PathBuf::new();
    for package_segment in &segments[..class_start] {
        path.push(package_segment);
    }
    path.push(format!("{}.json", segments[class_start..].join(".")));
    path.to_string_lossy().into_owned()
}
