//! The action table, which maps tag patterns to the action applied to them.

use std::collections::HashMap;

use crate::{
  Action, ActionCategory, ActionOverrides, CatalogError, TagCatalog,
  TagPattern,
};

/// An ordered mapping from tag patterns to actions. Each tag pattern appears
/// at most once. Inserting a pattern that is already present replaces its
/// action but keeps its original position.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionTable {
  entries: Vec<(TagPattern, Action)>,
  index: HashMap<TagPattern, usize>,
}

impl ActionTable {
  /// Creates a new empty action table.
  ///
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds an action table from a tag catalog. Categories are added in the
  /// order of [`ActionCategory::ALL`], so when a tag is in more than one
  /// category the last one wins.
  ///
  pub fn from_catalog(catalog: &TagCatalog) -> Self {
    let mut table = Self::new();

    for category in ActionCategory::ALL {
      let action = Action::from(category.action_kind());

      for entry in catalog.entries(category) {
        for pattern in entry.specification.expand() {
          table.insert(pattern, action.clone());
        }
      }
    }

    tracing::debug!(
      entries = table.len(),
      "Built action table from tag catalog"
    );

    table
  }

  /// Builds an action table from the built-in basic profile catalog.
  ///
  pub fn basic_profile() -> Result<Self, CatalogError> {
    Ok(Self::from_catalog(&TagCatalog::basic_profile()?))
  }

  /// Inserts an action for a tag pattern, replacing any existing action for
  /// the same pattern.
  ///
  pub fn insert(&mut self, pattern: TagPattern, action: Action) {
    match self.index.get(&pattern) {
      Some(i) => self.entries[*i].1 = action,
      None => {
        self.index.insert(pattern, self.entries.len());
        self.entries.push((pattern, action));
      }
    }
  }

  /// Merges overrides into this action table. Overrides win over existing
  /// entries.
  ///
  pub fn merge(&mut self, overrides: &ActionOverrides) {
    for (pattern, action) in overrides.iter() {
      self.insert(*pattern, action.clone());
    }

    tracing::debug!(
      overrides = overrides.len(),
      entries = self.len(),
      "Merged action overrides"
    );
  }

  /// Returns the action for a tag pattern.
  ///
  pub fn get(&self, pattern: &TagPattern) -> Option<&Action> {
    self.index.get(pattern).map(|i| &self.entries[*i].1)
  }

  /// Returns the number of entries in the table.
  ///
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns whether the table has no entries.
  ///
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterates over the entries in the table in insertion order.
  ///
  pub fn iter(&self) -> impl Iterator<Item = &(TagPattern, Action)> {
    self.entries.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use dcmanon_core::DataElementTag;

  use crate::{ActionKind, TagRange};

  const PATIENT_NAME: DataElementTag = DataElementTag::new(0x0010, 0x0010);

  #[test]
  fn basic_profile_test() {
    let table = ActionTable::basic_profile().unwrap();

    assert_eq!(
      table.get(&PATIENT_NAME.into()),
      Some(&Action::Builtin(ActionKind::Empty))
    );

    assert_eq!(
      table.get(&DataElementTag::new(0x0008, 0x0018).into()),
      Some(&Action::Builtin(ActionKind::ReplaceUid))
    );

    assert_eq!(
      table.get(&DataElementTag::new(0x0008, 0x1140).into()),
      Some(&Action::Builtin(ActionKind::DeleteOrEmptyOrReplaceUid))
    );

    assert_eq!(
      table.get(&TagPattern::Range(TagRange::new(0x5000, 0xFF00, 0, 0))),
      Some(&Action::Builtin(ActionKind::Delete))
    );

    assert_eq!(
      table.get(&DataElementTag::new(0x6002, 0x3000).into()),
      Some(&Action::Builtin(ActionKind::Delete))
    );
  }

  #[test]
  fn later_category_wins_test() {
    let catalog = TagCatalog::from_json(
      r#"{
        "D_TAGS": [{"name": "A", "tag": ["0010", "0010"]}],
        "X_TAGS": [
          {"name": "B", "tag": ["0010", "0020"]},
          {"name": "A", "tag": ["0010", "0010"]}
        ]
      }"#,
    )
    .unwrap();

    let table = ActionTable::from_catalog(&catalog);

    assert_eq!(
      table.iter().cloned().collect::<Vec<_>>(),
      vec![
        (PATIENT_NAME.into(), Action::Builtin(ActionKind::Delete)),
        (
          DataElementTag::new(0x0010, 0x0020).into(),
          Action::Builtin(ActionKind::Delete)
        ),
      ]
    );
  }

  #[test]
  fn merge_test() {
    let mut table = ActionTable::basic_profile().unwrap();
    let len = table.len();

    let mut overrides = ActionOverrides::new();
    overrides.insert(PATIENT_NAME, ActionKind::Keep.into());
    overrides.insert(
      DataElementTag::new(0x0011, 0x1010),
      Action::ReplaceWith("X".to_string()),
    );

    table.merge(&overrides);

    assert_eq!(table.len(), len + 1);
    assert_eq!(
      table.get(&PATIENT_NAME.into()),
      Some(&Action::Builtin(ActionKind::Keep))
    );
    assert_eq!(
      table.iter().last().map(|(pattern, _)| *pattern),
      Some(DataElementTag::new(0x0011, 0x1010).into())
    );
  }
}
