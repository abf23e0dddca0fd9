/*!
  A module store groups the compiled-code files of one application module. Each file
  contributes a file-group, the ordered sequence of classes it defines. The order of
  file-groups within a store is meaningful (the first is the primary file) and is never changed.

  Stores are generic over the class handle type `C`; this crate never looks inside a class.
*/

mod classes;
mod metadata;

pub use classes::{class_scope, ClassPosition, ClassView, Classes, FileGroups};
pub use metadata::ModuleMetadata;

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};
use tracing::trace;

/// An ordered sequence of classes corresponding to one output file.
pub type FileGroup<C> = Vec<C>;

/// The name of the store holding the application's primary module.
pub const ROOT_STORE_NAME: &str = "classes";

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat = {
    let mut format = *TableFormat::consts::FORMAT_NO_BORDER_LINE_SEPARATOR;
    format.padding(1, 1);
    format
  };
}

#[derive(Debug)]
pub struct ModuleStore<C> {
  file_groups : Vec<FileGroup<C>>,
  metadata    : ModuleMetadata,
}

impl<C> ModuleStore<C> {
  pub fn new(name: &str) -> ModuleStore<C> {
    ModuleStore::from_metadata(ModuleMetadata::new(name))
  }

  pub fn from_metadata(metadata: ModuleMetadata) -> ModuleStore<C> {
    ModuleStore {
      file_groups: vec![],
      metadata,
    }
  }

  pub fn name(&self) -> &str {
    self.metadata.id()
  }

  pub fn dependencies(&self) -> &[String] {
    self.metadata.dependencies()
  }

  pub fn metadata(&self) -> &ModuleMetadata {
    &self.metadata
  }

  pub fn metadata_mut(&mut self) -> &mut ModuleMetadata {
    &mut self.metadata
  }

  pub fn file_groups(&self) -> &[FileGroup<C>] {
    &self.file_groups
  }

  /// Individual file-groups may be edited in place, but not reordered or removed.
  pub fn file_groups_mut(&mut self) -> &mut [FileGroup<C>] {
    &mut self.file_groups
  }

  /// Appends a file-group after all existing ones.
  pub fn add_classes(&mut self, classes: FileGroup<C>) {
    trace!(
      target: "dexasm::store",
      store = %self.name(),
      index = self.file_groups.len(),
      classes = classes.len(),
      "add file-group"
    );
    self.file_groups.push(classes);
  }

  pub fn is_root_store(&self) -> bool {
    self.name() == ROOT_STORE_NAME
  }

  pub fn class_count(&self) -> usize {
    self.file_groups.iter().map(Vec::len).sum()
  }
}

impl<C> Display for ModuleStore<C>
  where C: Display
{
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"File-group", ubl->"Classes"]);

    for (i, group) in self.file_groups.iter().enumerate() {
      table.add_row(
        row![
          r->format!("{}[{}]", self.name(), i),
          group.iter().map(C::to_string).collect::<Vec<String>>().join(", ")
        ]
      );
    }

    writeln!(f, "Store {} (requires: {})", self.name(), self.dependencies().join(", "))?;
    write!(f, "{}", table)
  }
}
