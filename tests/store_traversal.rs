//! Integration tests for module stores and the flattened class view.

use std::fs;
use std::path::PathBuf;

use dexasm::store::{class_scope, ClassView, ModuleMetadata, ModuleStore};
use dexasm::StoreError;

fn store(name: &str, groups: Vec<Vec<&'static str>>) -> ModuleStore<&'static str> {
  let mut store = ModuleStore::new(name);
  for group in groups {
    store.add_classes(group);
  }
  store
}

fn traverse(stores: &[ModuleStore<&'static str>]) -> Vec<&'static str> {
  ClassView::new(stores).iter().unwrap().copied().collect()
}

#[test]
fn classes_flatten_in_store_then_group_then_class_order() {
  let stores = vec![
    store("a", vec![vec!["c1", "c2"], vec!["c3"]]),
    store("b", vec![vec!["c4"]]),
  ];
  assert_eq!(traverse(&stores), vec!["c1", "c2", "c3", "c4"]);
  // A second traversal from the beginning sees the same sequence.
  assert_eq!(traverse(&stores), vec!["c1", "c2", "c3", "c4"]);
}

#[test]
fn store_without_file_groups_is_skipped() {
  let stores = vec![
    store("a", vec![vec!["c1"]]),
    store("empty", vec![]),
    store("b", vec![vec!["c2", "c3"]]),
  ];
  assert_eq!(traverse(&stores), vec!["c1", "c2", "c3"]);
}

#[test]
fn trailing_empty_stores_do_not_stall_termination() {
  let stores = vec![
    store("a", vec![vec!["c1"]]),
    store("b", vec![]),
    store("c", vec![vec![]]),
  ];
  assert_eq!(traverse(&stores), vec!["c1"]);
}

#[test]
fn single_class_reaches_end_after_one_advance() {
  let stores = vec![store("a", vec![vec!["only"]])];
  let view = ClassView::new(&stores);

  let begin = view.begin().unwrap();
  assert_ne!(begin, view.end());
  assert_eq!(view.get(begin), Some(&"only"));

  let next = view.advance(begin);
  assert_eq!(next, view.end());
  assert_eq!(view.get(next), None);
}

#[test]
fn manual_cursor_walk_matches_iterator() {
  let stores = vec![
    store("a", vec![vec!["c1"], vec![], vec!["c2"]]),
    store("b", vec![]),
    store("c", vec![vec!["c3", "c4"]]),
  ];
  let view = ClassView::new(&stores);

  let mut seen = vec![];
  let mut position = view.begin().unwrap();
  while position != view.end() {
    seen.push(*view.get(position).unwrap());
    position = view.advance(position);
  }
  assert_eq!(seen, traverse(&stores));
}

#[test]
fn traversal_preconditions_fail_explicitly() {
  let none: Vec<ModuleStore<&str>> = vec![];
  assert!(matches!(ClassView::new(&none).iter(), Err(StoreError::NoStores)));

  let stores = vec![store("a", vec![]), store("b", vec![vec!["c1"]])];
  let err = ClassView::new(&stores).begin().unwrap_err();
  assert_eq!(err, StoreError::FirstStoreEmpty("a".to_string()));
  assert_eq!(err.to_string(), "The first store `a` has no file-groups");
}

#[test]
fn file_group_traversal_yields_every_group() {
  let stores = vec![
    store("a", vec![vec!["c1", "c2"], vec!["c3"]]),
    store("b", vec![]),
    store("c", vec![vec!["c4"]]),
  ];
  let groups: Vec<&Vec<&str>> = ClassView::new(&stores).file_groups().unwrap().collect();
  assert_eq!(groups, vec![&vec!["c1", "c2"], &vec!["c3"], &vec!["c4"]]);
  assert_eq!(class_scope(&stores), vec!["c1", "c2", "c3", "c4"]);
}

#[test]
fn stores_load_metadata_from_disk() {
  let dir = std::env::temp_dir().join(format!("dexasm-metadata-{}", std::process::id()));
  fs::create_dir_all(&dir).unwrap();
  let path: PathBuf = dir.join("feature.json");
  fs::write(
    &path,
    r#"{"id": "feature", "requires": ["classes"], "files": ["feature.dex", "feature2.dex"]}"#,
  ).unwrap();

  let metadata = ModuleMetadata::parse(&path).unwrap();
  let mut feature: ModuleStore<&str> = ModuleStore::from_metadata(metadata);
  feature.add_classes(vec!["LFeature;"]);

  assert_eq!(feature.name(), "feature");
  assert_eq!(feature.dependencies(), &["classes".to_string()]);
  assert_eq!(feature.metadata().files(), &["feature.dex".to_string(), "feature2.dex".to_string()]);

  let mut root = ModuleStore::new("classes");
  root.add_classes(vec!["LMain;"]);
  let stores = vec![root, feature];
  assert!(stores[0].is_root_store());
  assert_eq!(traverse(&stores), vec!["LMain;", "LFeature;"]);

  fs::remove_dir_all(&dir).unwrap();
}
