//! The metadata descriptor of a module store: its identity, the stores it depends on, and the
//! files backing it. Descriptors are JSON documents of the form
//!
//! ```text
//! { "id": "feature", "requires": ["classes"], "files": ["feature.dex"] }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::MetadataError;

/**
  No acyclicity or uniqueness check is made on `dependencies`; whoever produces the descriptors
  is responsible for that.
*/
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct ModuleMetadata {
  id: String,
  #[serde(default, rename = "requires", alias = "dependencies")]
  dependencies: Vec<String>,
  #[serde(default)]
  files: Vec<String>,
}

impl ModuleMetadata {
  pub fn new(id: &str) -> ModuleMetadata {
    ModuleMetadata {
      id: id.to_string(),
      ..ModuleMetadata::default()
    }
  }

  /// Reads and parses the descriptor at `path`.
  pub fn parse<P: AsRef<Path>>(path: P) -> Result<ModuleMetadata, MetadataError> {
    let path = path.as_ref();
    let text =
      fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
      })?;
    let metadata = ModuleMetadata::from_json_str(&text)?;
    debug!(
      target: "dexasm::store",
      id = %metadata.id(),
      dependencies = metadata.dependencies.len(),
      files = metadata.files.len(),
      path = %path.display(),
      "parsed module metadata"
    );
    Ok(metadata)
  }

  pub fn from_json_str(text: &str) -> Result<ModuleMetadata, MetadataError> {
    Ok(serde_json::from_str(text)?)
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn set_id(&mut self, id: &str) {
    self.id = id.to_string();
  }

  pub fn dependencies(&self) -> &[String] {
    &self.dependencies
  }

  /// Mutable access to the dependency list. Changing it while a reader holds
  /// `dependencies()` is prevented by the borrow checker, not by this type.
  pub fn dependencies_mut(&mut self) -> &mut Vec<String> {
    &mut self.dependencies
  }

  pub fn files(&self) -> &[String] {
    &self.files
  }

  pub fn set_files(&mut self, files: Vec<String>) {
    self.files = files;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_requires_and_files() {
    let metadata = ModuleMetadata::from_json_str(
      r#"{"id": "feature", "requires": ["classes", "base"], "files": ["a.dex", "b.dex"]}"#
    ).unwrap();
    assert_eq!(metadata.id(), "feature");
    assert_eq!(metadata.dependencies(), &["classes".to_string(), "base".to_string()]);
    assert_eq!(metadata.files().len(), 2);
  }

  #[test]
  fn dependencies_alias_and_defaults() {
    let metadata =
      ModuleMetadata::from_json_str(r#"{"id": "x", "dependencies": ["y"]}"#).unwrap();
    assert_eq!(metadata.dependencies(), &["y".to_string()]);
    assert!(metadata.files().is_empty());
  }

  #[test]
  fn missing_id_is_an_error() {
    assert!(ModuleMetadata::from_json_str(r#"{"files": []}"#).is_err());
  }

  #[test]
  fn unreadable_file_reports_its_path() {
    let err = ModuleMetadata::parse("/nonexistent/dexasm/metadata.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/dexasm/metadata.json"));
  }

  #[test]
  fn dependencies_are_mutable_in_place() {
    let mut metadata = ModuleMetadata::new("x");
    metadata.dependencies_mut().push("classes".to_string());
    assert_eq!(metadata.dependencies(), &["classes".to_string()]);
  }
}
