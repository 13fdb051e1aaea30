//! Applies an action table to DICOM records.

use std::sync::Arc;

use dcmanon_core::{DataSet, DicomRecord, ValueRepresentation};

use crate::{
  Action, ActionContext, ActionTable, AnonymizeError, PrivateTagSnapshot,
  TagPattern, TagRange, UidResolver,
};

/// Configuration used when anonymizing DICOM records.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnonymizeConfig {
  pub(crate) delete_private_tags: bool,
}

impl Default for AnonymizeConfig {
  fn default() -> Self {
    Self {
      delete_private_tags: true,
    }
  }
}

impl AnonymizeConfig {
  /// Whether to delete private data elements once the action table has been
  /// applied. Private data elements that were matched by an exact tag in the
  /// action table are captured before the deletion and then restored, along
  /// with the private creator of their block.
  ///
  /// When this is false, private data elements are left as they are after the
  /// action table has been applied.
  ///
  /// By default private data elements are deleted.
  ///
  pub fn delete_private_tags(mut self, value: bool) -> Self {
    self.delete_private_tags = value;
    self
  }
}

/// Anonymizes DICOM records by applying an action table to them. The action
/// table is immutable and can be shared by anonymizers running on multiple
/// threads.
///
#[derive(Clone, Debug)]
pub struct Anonymizer {
  action_table: Arc<ActionTable>,
  config: AnonymizeConfig,
}

impl Anonymizer {
  /// Creates a new anonymizer for an action table.
  ///
  pub fn new(action_table: ActionTable, config: AnonymizeConfig) -> Self {
    Self::with_shared_table(Arc::new(action_table), config)
  }

  /// Creates a new anonymizer for an action table that is shared with other
  /// anonymizers.
  ///
  pub fn with_shared_table(
    action_table: Arc<ActionTable>,
    config: AnonymizeConfig,
  ) -> Self {
    Self {
      action_table,
      config,
    }
  }

  /// Returns the action table used by this anonymizer.
  ///
  pub fn action_table(&self) -> &ActionTable {
    &self.action_table
  }

  /// Returns the configuration used by this anonymizer.
  ///
  pub fn config(&self) -> &AnonymizeConfig {
    &self.config
  }

  /// Anonymizes a DICOM record in place.
  ///
  /// Each entry in the action table is applied in order. Exact tags in the
  /// File Meta Information group are applied to the File Meta Information,
  /// and all other exact tags to the main data set. Tag ranges are matched
  /// against the data elements of the main data set and of every sequence
  /// item nested in it.
  ///
  /// If an error occurs the record is left partially anonymized.
  ///
  pub fn anonymize(
    &self,
    record: &mut DicomRecord,
    uid_resolver: &mut dyn UidResolver,
  ) -> Result<(), AnonymizeError> {
    let mut context = ActionContext::new(uid_resolver);
    let mut snapshots = vec![];

    tracing::debug!(
      entries = self.action_table.len(),
      delete_private_tags = self.config.delete_private_tags,
      "Anonymizing record"
    );

    for (pattern, action) in self.action_table.iter() {
      match pattern {
        TagPattern::Exact(tag) => {
          let data_set = record.data_set_for_tag_mut(*tag);

          action.apply(data_set, *tag, &mut context)?;

          if self.config.delete_private_tags && tag.is_private() {
            match PrivateTagSnapshot::capture(data_set, *tag) {
              Ok(Some(snapshot)) => snapshots.push(snapshot),
              Ok(None) => (),
              Err(e) => tracing::warn!(
                tag = %tag,
                "Skipping private data element: {}",
                e
              ),
            }
          }
        }

        TagPattern::Range(range) => {
          apply_range(record.data_set_mut(), range, action, &mut context)?;
        }
      }
    }

    if self.config.delete_private_tags {
      delete_private_elements(record.data_set_mut(), &snapshots);
    }

    Ok(())
  }
}

/// Applies an action to the data elements in a data set that match a tag
/// range, then to matching data elements in the items of any sequences that
/// remain. The tags of each data set are collected before any action is
/// applied to it.
///
fn apply_range(
  data_set: &mut DataSet,
  range: &TagRange,
  action: &Action,
  context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  for tag in data_set.tags() {
    if range.matches(tag) {
      action.apply(data_set, tag, context)?;
    }

    if data_set.value_representation(tag) != Some(ValueRepresentation::Sequence)
    {
      continue;
    }

    let path = context.path().clone();

    let items = data_set
      .get_value_mut(tag)
      .and_then(|value| value.sequence_items_mut())
      .map_err(|e| e.with_path(&path.with_data_element(tag)))?;

    for (index, item) in items.iter_mut().enumerate() {
      let parent_path = context.set_path(path.with_sequence_item(tag, index));
      let result = apply_range(item, range, action, context);
      context.set_path(parent_path);

      result?;
    }
  }

  Ok(())
}

/// Deletes all private data elements from a data set and then restores the
/// given snapshots into it. Snapshots that can't be restored are skipped.
///
fn delete_private_elements(
  data_set: &mut DataSet,
  snapshots: &[PrivateTagSnapshot],
) {
  data_set.delete_private_elements();

  for snapshot in snapshots {
    if let Err(e) = snapshot.restore(data_set) {
      tracing::warn!(
        group = snapshot.group,
        "Skipping private block restore: {}",
        e
      );
    }
  }

  tracing::debug!(
    restored = snapshots.len(),
    "Deleted private data elements"
  );
}

#[cfg(test)]
mod tests {
  use super::*;

  use dcmanon_core::{DataElementTag, DataElementValue};

  use crate::{ActionKind, UidCache};

  const PATIENT_NAME: DataElementTag = DataElementTag::new(0x0010, 0x0010);
  const PRIVATE_CREATOR: DataElementTag = DataElementTag::new(0x0009, 0x0010);
  const PRIVATE_ELEMENT: DataElementTag = DataElementTag::new(0x0009, 0x1002);

  fn record() -> DicomRecord {
    let mut data_set = DataSet::new();
    data_set
      .insert_string_value(
        PATIENT_NAME,
        ValueRepresentation::PersonName,
        &["Doe^John"],
      )
      .unwrap();
    data_set.insert(
      PRIVATE_CREATOR,
      DataElementValue::new_long_string(&["ACME"]).unwrap(),
    );
    data_set.insert(
      PRIVATE_ELEMENT,
      DataElementValue::new_short_string(&["secret"]).unwrap(),
    );

    DicomRecord::from(data_set)
  }

  fn anonymizer(
    entries: &[(TagPattern, Action)],
    config: AnonymizeConfig,
  ) -> Anonymizer {
    let mut table = ActionTable::new();
    for (pattern, action) in entries {
      table.insert(*pattern, action.clone());
    }

    Anonymizer::new(table, config)
  }

  #[test]
  fn exact_tag_test() {
    let mut record = record();

    anonymizer(
      &[(PATIENT_NAME.into(), ActionKind::Replace.into())],
      AnonymizeConfig::default().delete_private_tags(false),
    )
    .anonymize(&mut record, &mut UidCache::new())
    .unwrap();

    assert_eq!(record.data_set().get_string(PATIENT_NAME), Ok("Anonymized"));
    assert_eq!(record.data_set().len(), 3);
  }

  #[test]
  fn range_test() {
    let mut record = record();

    anonymizer(
      &[(
        TagPattern::Range(TagRange::new(0x0009, 0xFFFF, 0x0000, 0x0000)),
        ActionKind::Delete.into(),
      )],
      AnonymizeConfig::default().delete_private_tags(false),
    )
    .anonymize(&mut record, &mut UidCache::new())
    .unwrap();

    assert_eq!(record.data_set().tags(), vec![PATIENT_NAME]);
  }

  #[test]
  fn range_in_sequence_test() {
    let sequence = DataElementTag::new(0x0008, 0x1140);

    let mut nested_item = DataSet::new();
    nested_item.insert(
      PRIVATE_ELEMENT,
      DataElementValue::new_short_string(&["nested"]).unwrap(),
    );

    let mut item = DataSet::new();
    item.insert(
      PRIVATE_ELEMENT,
      DataElementValue::new_short_string(&["item"]).unwrap(),
    );
    item.insert(sequence, DataElementValue::new_sequence(vec![nested_item]));

    let mut record = record();
    record
      .data_set_mut()
      .insert(sequence, DataElementValue::new_sequence(vec![item]));

    anonymizer(
      &[(
        TagPattern::Range(TagRange::new(0x0009, 0xFFFF, 0x0000, 0x0000)),
        ActionKind::Delete.into(),
      )],
      AnonymizeConfig::default().delete_private_tags(false),
    )
    .anonymize(&mut record, &mut UidCache::new())
    .unwrap();

    assert_eq!(record.data_set().tags(), vec![sequence, PATIENT_NAME]);

    let items = record
      .data_set()
      .get_value(sequence)
      .unwrap()
      .sequence_items()
      .unwrap();
    assert_eq!(items[0].tags(), vec![sequence]);

    let nested_items =
      items[0].get_value(sequence).unwrap().sequence_items().unwrap();
    assert!(nested_items[0].is_empty());
  }

  #[test]
  fn private_tags_deleted_test() {
    let mut record = record();

    anonymizer(&[], AnonymizeConfig::default())
      .anonymize(&mut record, &mut UidCache::new())
      .unwrap();

    assert_eq!(record.data_set().tags(), vec![PATIENT_NAME]);
  }

  #[test]
  fn private_tags_restored_test() {
    let original = record();
    let mut record = original.clone();

    anonymizer(
      &[(PRIVATE_ELEMENT.into(), ActionKind::Keep.into())],
      AnonymizeConfig::default(),
    )
    .anonymize(&mut record, &mut UidCache::new())
    .unwrap();

    assert_eq!(record, original);
  }

  #[test]
  fn private_tag_without_creator_test() {
    let mut record = record();
    record.data_set_mut().delete(PRIVATE_CREATOR);

    anonymizer(
      &[(PRIVATE_ELEMENT.into(), ActionKind::Keep.into())],
      AnonymizeConfig::default(),
    )
    .anonymize(&mut record, &mut UidCache::new())
    .unwrap();

    assert_eq!(record.data_set().tags(), vec![PATIENT_NAME]);
  }

  #[test]
  fn error_stops_anonymization_test() {
    let mut record = record();

    let result = anonymizer(
      &[
        (PATIENT_NAME.into(), ActionKind::Clean.into()),
        (PRIVATE_ELEMENT.into(), ActionKind::Delete.into()),
      ],
      AnonymizeConfig::default(),
    )
    .anonymize(&mut record, &mut UidCache::new());

    assert!(matches!(
      result,
      Err(AnonymizeError::UnimplementedAction { .. })
    ));
    assert_eq!(record.data_set().len(), 3);
  }
}
