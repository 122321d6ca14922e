#![deny(missing_docs)]

//! # Schema Index
//!
//! Loads every schema document under a root directory and aggregates their
//! `components/schemas` into one name -> node mapping. No network access
//! and no cross-file path resolution is performed: references are reduced
//! to bare names and looked up here.
//!
//! The index is built once per run and only borrowed afterwards.

use crate::error::{AppError, AppResult};
use crate::oas::models::{DocumentInfo, RefOr, Reference, SchemaDocument, SchemaNode};
use crate::oas::normalization::ensure_document_header;
use crate::oas::ref_utils::ref_to_schema_name;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A single loaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntry {
    /// Where the document was read from.
    pub path: PathBuf,
    /// Document metadata (synthesised for bare fragments).
    pub info: DocumentInfo,
    /// Names of the schemas this document contributed, in declaration order.
    pub schema_names: Vec<String>,
}

/// Aggregated schema index across all loaded documents.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    documents: Vec<DocumentEntry>,
    schemas: IndexMap<String, RefOr<SchemaNode>>,
}

impl SchemaIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.yaml` / `*.yml` file below `root`, recursively.
    ///
    /// A document that fails to parse is logged and skipped. A missing root
    /// yields an empty index; a root that exists but cannot be listed is an
    /// error.
    pub fn load_dir(root: &Path) -> AppResult<Self> {
        let mut index = Self::new();

        if let Err(e) = fs::read_dir(root) {
            if e.kind() == ErrorKind::NotFound {
                debug!(root = %root.display(), "schema root does not exist");
                return Ok(index);
            }
            return Err(AppError::Io(e));
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(AppError::Io(e.into())),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable schema path");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_schema_file(entry.path()) {
                continue;
            }
            match read_document(entry.path()) {
                Ok(document) => index.register(entry.path(), document),
                Err(e) => warn!(error = %e, "skipping schema document"),
            }
        }

        debug!(
            documents = index.documents.len(),
            schemas = index.schemas.len(),
            "schema index loaded"
        );
        Ok(index)
    }

    /// Parses `yaml` as a document and registers it under `path`.
    pub fn register_yaml(&mut self, path: impl Into<PathBuf>, yaml: &str) -> AppResult<()> {
        let path = path.into();
        let document = parse_document(&path, yaml)?;
        self.register(&path, document);
        Ok(())
    }

    /// Adds a parsed document. A schema name already present is replaced
    /// (last write wins) but keeps its original position.
    pub fn register(&mut self, path: &Path, document: SchemaDocument) {
        let mut schema_names = Vec::new();
        if let Some(components) = document.components {
            for (name, schema) in components.schemas {
                if self.schemas.contains_key(&name) {
                    warn!(schema = %name, path = %path.display(), "schema name redefined, later definition wins");
                }
                schema_names.push(name.clone());
                self.schemas.insert(name, schema);
            }
        }
        self.documents.push(DocumentEntry {
            path: path.to_path_buf(),
            info: document.info,
            schema_names,
        });
    }

    /// The documents loaded so far, in load order.
    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    /// Number of distinct schema names.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True when no schema is indexed.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// True when `name` is indexed.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Looks a schema up by bare name.
    ///
    /// A component that is itself only a `$ref` is followed to its target;
    /// a chain of such aliases that loops yields `None`.
    pub fn lookup(&self, name: &str) -> Option<&SchemaNode> {
        let mut current = name.to_string();
        let mut seen = HashSet::new();
        loop {
            match self.schemas.get(&current)? {
                RefOr::T(node) => return Some(node),
                RefOr::Ref(r) => {
                    if !seen.insert(current.clone()) {
                        warn!(schema = %name, "component alias chain loops");
                        return None;
                    }
                    current = ref_to_schema_name(&r.ref_location);
                }
            }
        }
    }

    /// Resolves a reference pointer against the index.
    pub fn resolve(&self, reference: &Reference) -> Option<&SchemaNode> {
        self.lookup(&ref_to_schema_name(&reference.ref_location))
    }

    /// Returns the inline node, or the resolved target of a reference.
    pub fn resolve_ref_or<'a>(&'a self, schema: &'a RefOr<SchemaNode>) -> Option<&'a SchemaNode> {
        match schema {
            RefOr::T(node) => Some(node),
            RefOr::Ref(r) => self.resolve(r),
        }
    }

    /// Iterates schema names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

/// Parses the text of one schema document.
///
/// Bare fragments (no `openapi` marker) are wrapped with a minimal header.
pub fn parse_document(path: &Path, text: &str) -> AppResult<SchemaDocument> {
    let mut raw: JsonValue = serde_yaml::from_str(text).map_err(|e| AppError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if ensure_document_header(&mut raw) {
        debug!(path = %path.display(), "wrapped bare schema fragment");
    }
    serde_json::from_value(raw).map_err(|e| AppError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_document(path: &Path) -> AppResult<SchemaDocument> {
    let text = fs::read_to_string(path).map_err(|e| AppError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_document(path, &text)
}

fn is_schema_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}
