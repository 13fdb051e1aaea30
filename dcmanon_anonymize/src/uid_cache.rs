//! Consistent replacement of UIDs across one or more records.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The root used for UIDs derived from a UUID.
///
/// Ref: PS3.5 B.2.
///
const UUID_DERIVED_UID_ROOT: &str = "2.25.";

/// Maps original UIDs to their replacements.
///
pub trait UidResolver {
  /// Returns the replacement for a UID, generating and remembering a new one
  /// the first time a UID is seen.
  ///
  fn resolve(&mut self, original_uid: &str) -> String;
}

/// A cache of UID replacements. The same original UID always resolves to the
/// same replacement for the lifetime of the cache.
///
#[derive(Clone, Debug, Default)]
pub struct UidCache {
  uids: HashMap<String, String>,
}

impl UidCache {
  /// Creates a new empty UID cache.
  ///
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the number of UIDs that have been replaced.
  ///
  pub fn len(&self) -> usize {
    self.uids.len()
  }

  /// Returns whether no UIDs have been replaced.
  ///
  pub fn is_empty(&self) -> bool {
    self.uids.is_empty()
  }

  /// Returns the replacement for a UID if it has already been resolved.
  ///
  pub fn get(&self, original_uid: &str) -> Option<&str> {
    self.uids.get(original_uid).map(|uid| uid.as_str())
  }
}

impl UidResolver for UidCache {
  fn resolve(&mut self, original_uid: &str) -> String {
    self
      .uids
      .entry(original_uid.to_string())
      .or_insert_with(generate_uid)
      .clone()
  }
}

/// A UID cache that can be shared between threads so that records processed
/// in parallel get consistent UID replacements.
///
#[derive(Clone, Debug, Default)]
pub struct SharedUidCache(Arc<Mutex<UidCache>>);

impl SharedUidCache {
  /// Creates a new empty shared UID cache.
  ///
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the number of UIDs that have been replaced.
  ///
  pub fn len(&self) -> usize {
    self.lock().len()
  }

  /// Returns whether no UIDs have been replaced.
  ///
  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  // Every insertion is a single map operation, so a poisoned cache is still
  // consistent
  fn lock(&self) -> std::sync::MutexGuard<'_, UidCache> {
    self.0.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl UidResolver for SharedUidCache {
  fn resolve(&mut self, original_uid: &str) -> String {
    self.lock().resolve(original_uid)
  }
}

/// Generates a new UID from a random version 4 UUID, as `2.25.` followed by
/// the UUID's value as a decimal integer. The result is at most 44 characters
/// long.
///
pub fn generate_uid() -> String {
  let mut uuid: u128 = rand::random();

  // Set the version to 4
  uuid = (uuid & !(0xF << 76)) | (0x4 << 76);

  // Set the variant to RFC 4122
  uuid = (uuid & !(0x3 << 62)) | (0x2 << 62);

  format!("{}{}", UUID_DERIVED_UID_ROOT, uuid)
}
