/*!
  Whole-program class traversal over an ordered collection of stores.

  A `ClassPosition` is the triple (store, file-group, class). Positions are kept normalized:
  every position handed out either names an existing class or is exactly `end()`, the single
  sentinel `(stores.len(), 0, 0)`. Equality is plain equality of the normalized triple, so an
  advancing position reaches `end()` no matter how many empty stores or file-groups it had to
  skip on the way.

  The view borrows the stores, so the borrow checker rules out appending stores or file-groups
  while a traversal is in flight.
*/

use tracing::trace;

use super::{FileGroup, ModuleStore};
use crate::error::StoreError;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct ClassPosition {
  pub store : usize,
  pub group : usize,
  pub class : usize,
}

/// A read-only, flattened view of every class in every file-group of every store.
#[derive(Debug)]
pub struct ClassView<'a, C> {
  stores: &'a [ModuleStore<C>],
}

// Derives would require `C: Clone`, but only the reference is copied.
impl<'a, C> Clone for ClassView<'a, C> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<'a, C> Copy for ClassView<'a, C> {}

impl<'a, C> ClassView<'a, C> {
  pub fn new(stores: &'a [ModuleStore<C>]) -> ClassView<'a, C> {
    ClassView { stores }
  }

  /**
    The position of the first class. The collection must be non-empty and its first store must
    have at least one file-group. If every file-group is empty, the result equals `end()`.
  */
  pub fn begin(&self) -> Result<ClassPosition, StoreError> {
    let first = self.stores.first().ok_or(StoreError::NoStores)?;
    if first.file_groups().is_empty() {
      return Err(StoreError::FirstStoreEmpty(first.name().to_string()));
    }
    Ok(self.normalize(ClassPosition { store: 0, group: 0, class: 0 }))
  }

  pub fn end(&self) -> ClassPosition {
    ClassPosition { store: self.stores.len(), group: 0, class: 0 }
  }

  /// The position after `position`. Advancing `end()` stays at `end()`.
  pub fn advance(&self, position: ClassPosition) -> ClassPosition {
    if position == self.end() {
      return position;
    }
    self.normalize(ClassPosition { class: position.class + 1, ..position })
  }

  pub fn get(&self, position: ClassPosition) -> Option<&'a C> {
    self.stores
        .get(position.store)?
        .file_groups()
        .get(position.group)?
        .get(position.class)
  }

  /// Moves forward from `position` to the nearest existing class, or to `end()`.
  fn normalize(&self, mut position: ClassPosition) -> ClassPosition {
    loop {
      let store =
        match self.stores.get(position.store) {
          Some(store) => store,
          None => return self.end()
        };

      match store.file_groups().get(position.group) {
        None => {
          trace!(target: "dexasm::store", store = %store.name(), "store exhausted");
          position = ClassPosition { store: position.store + 1, group: 0, class: 0 };
        }
        Some(group) if position.class >= group.len() => {
          position = ClassPosition { group: position.group + 1, class: 0, ..position };
        }
        Some(_) => return position
      }
    }
  }

  /// Iterates over every class, in store order, then file-group order, then class order.
  pub fn iter(&self) -> Result<Classes<'a, C>, StoreError> {
    let position = self.begin()?;
    Ok(Classes { view: *self, position })
  }

  /// Iterates over every file-group, including those without classes.
  pub fn file_groups(&self) -> Result<FileGroups<'a, C>, StoreError> {
    self.begin()?;
    Ok(FileGroups { stores: self.stores, store: 0, group: 0 })
  }
}

pub struct Classes<'a, C> {
  view     : ClassView<'a, C>,
  position : ClassPosition,
}

impl<'a, C> Iterator for Classes<'a, C> {
  type Item = &'a C;

  fn next(&mut self) -> Option<Self::Item> {
    if self.position == self.view.end() {
      return None;
    }
    let class = self.view.get(self.position);
    self.position = self.view.advance(self.position);
    class
  }
}

impl<'a, C> std::iter::FusedIterator for Classes<'a, C> {}

pub struct FileGroups<'a, C> {
  stores : &'a [ModuleStore<C>],
  store  : usize,
  group  : usize,
}

impl<'a, C> Iterator for FileGroups<'a, C> {
  type Item = &'a FileGroup<C>;

  fn next(&mut self) -> Option<Self::Item> {
    let stores = self.stores;
    while let Some(store) = stores.get(self.store) {
      if let Some(group) = store.file_groups().get(self.group) {
        self.group += 1;
        return Some(group);
      }
      self.store += 1;
      self.group = 0;
    }
    None
  }
}

/// Every class of every store, in traversal order. An empty collection has an empty scope.
pub fn class_scope<C: Clone>(stores: &[ModuleStore<C>]) -> Vec<C> {
  let scope: Vec<C> =
    stores
      .iter()
      .flat_map(|store| store.file_groups().iter())
      .flat_map(|group| group.iter().cloned())
      .collect();
  trace!(target: "dexasm::store", stores = stores.len(), classes = scope.len(), "built class scope");
  scope
}
