//! Anonymization of DICOM records using the actions of the DICOM
//! confidentiality profiles.
//!
//! A [`TagCatalog`] assigns tags to action categories, and is turned into an
//! [`ActionTable`] that caller-supplied [`ActionOverrides`] can be merged
//! into. An [`Anonymizer`] then applies the action table to records, using a
//! [`UidResolver`] to keep replaced UIDs consistent across records.
//!
//! Ref: PS3.15 E.

mod action;
mod action_table;
pub mod actions;
mod anonymize_error;
mod anonymizer;
mod catalog;
mod overrides;
mod private_tags;
mod tag_pattern;
mod uid_cache;

use dcmanon_core::DicomRecord;

pub use action::{
  Action, ActionContext, ActionFn, ActionKind, CustomAction, CustomActionFn,
};
pub use action_table::ActionTable;
pub use anonymize_error::AnonymizeError;
pub use anonymizer::{AnonymizeConfig, Anonymizer};
pub use catalog::{ActionCategory, CatalogEntry, CatalogError, TagCatalog};
pub use overrides::ActionOverrides;
pub use private_tags::PrivateTagSnapshot;
pub use tag_pattern::{
  MAX_ENUMERATED_TAGS, TagHalf, TagPattern, TagRange, TagSpecification,
};
pub use uid_cache::{SharedUidCache, UidCache, UidResolver, generate_uid};

/// Anonymizes a DICOM record using the basic profile catalog with the given
/// overrides merged in. UIDs are replaced using a new UID cache, so they are
/// consistent within the record but not with any other record.
///
pub fn anonymize(
  record: &mut DicomRecord,
  overrides: &ActionOverrides,
  delete_private_tags: bool,
) -> Result<(), AnonymizeError> {
  let mut action_table = ActionTable::basic_profile()?;
  action_table.merge(overrides);

  let config =
    AnonymizeConfig::default().delete_private_tags(delete_private_tags);

  Anonymizer::new(action_table, config).anonymize(record, &mut UidCache::new())
}

/// Adds functions to [`DicomRecord`] to perform anonymization.
///
pub trait DicomRecordAnonymizeExtensions {
  /// Anonymizes a DICOM record in place using the given anonymizer and UID
  /// resolver.
  ///
  fn anonymize(
    &mut self,
    anonymizer: &Anonymizer,
    uid_resolver: &mut dyn UidResolver,
  ) -> Result<(), AnonymizeError>;
}

impl DicomRecordAnonymizeExtensions for DicomRecord {
  fn anonymize(
    &mut self,
    anonymizer: &Anonymizer,
    uid_resolver: &mut dyn UidResolver,
  ) -> Result<(), AnonymizeError> {
    anonymizer.anonymize(self, uid_resolver)
  }
}
