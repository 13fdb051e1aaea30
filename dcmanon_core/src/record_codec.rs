//! Defines the seam through which DICOM records are loaded from and saved to
//! files.

use std::path::Path;

use crate::{DcmanonError, DicomRecord};

/// Loads and saves DICOM records. Implementations define the on-disk format.
///
pub trait RecordCodec: Send + Sync {
  /// Loads a DICOM record from the file at the given path.
  ///
  fn load(&self, path: &Path) -> Result<DicomRecord, RecordIoError>;

  /// Saves a DICOM record to the file at the given path, replacing any
  /// existing file.
  ///
  fn save(&self, record: &DicomRecord, path: &Path)
  -> Result<(), RecordIoError>;
}

/// An error that occurred loading or saving a DICOM record.
///
#[derive(Clone, Debug, PartialEq)]
pub struct RecordIoError {
  /// What was being attempted when the error occurred, e.g. "Reading file".
  pub when: String,

  /// Details on the error.
  pub details: String,
}

impl RecordIoError {
  pub fn new(when: &str, details: String) -> Self {
    Self {
      when: when.to_string(),
      details,
    }
  }
}

impl core::fmt::Display for RecordIoError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    write!(f, "Record I/O error {}: {}", self.when.to_lowercase(), self.details)
  }
}

impl std::error::Error for RecordIoError {}

impl DcmanonError for RecordIoError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    vec![
      format!("Record I/O error {}", task_description),
      "".to_string(),
      format!("  When: {}", self.when),
      format!("  Details: {}", self.details),
    ]
  }
}
