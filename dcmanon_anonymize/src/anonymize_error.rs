//! Errors that stop the anonymization of a record.

use dcmanon_core::{
  DataError, DataSetPath, DcmanonError, ValueRepresentation,
};

use crate::CatalogError;

/// An error that occurred while anonymizing a DICOM record. Anonymization of
/// the record stops at the first error, and data elements already processed
/// remain modified.
///
#[derive(Clone, Debug, PartialEq)]
pub enum AnonymizeError {
  /// An action has no defined behavior for the value representation of the
  /// data element it was applied to.
  UnsupportedValueRepresentation {
    action: String,
    vr: ValueRepresentation,
    path: DataSetPath,
  },

  /// An action that isn't implemented was applied to a data element that is
  /// present.
  UnimplementedAction { action: String, path: DataSetPath },

  /// A private data element couldn't be captured or restored because its
  /// private block is malformed.
  MalformedPrivateTag { details: String, path: DataSetPath },

  /// A data element value couldn't be read or constructed.
  DataError(DataError),

  /// The tag catalog or action overrides are invalid.
  CatalogError(CatalogError),
}

impl AnonymizeError {
  /// Returns the name of the error as a human-readable string.
  ///
  pub fn name(&self) -> &'static str {
    match self {
      Self::UnsupportedValueRepresentation { .. } => {
        "Unsupported value representation"
      }
      Self::UnimplementedAction { .. } => "Unimplemented action",
      Self::MalformedPrivateTag { .. } => "Malformed private tag",
      Self::DataError(_) => "Data error",
      Self::CatalogError(_) => "Catalog error",
    }
  }
}

impl From<DataError> for AnonymizeError {
  fn from(e: DataError) -> Self {
    Self::DataError(e)
  }
}

impl From<CatalogError> for AnonymizeError {
  fn from(e: CatalogError) -> Self {
    Self::CatalogError(e)
  }
}

impl core::fmt::Display for AnonymizeError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Self::UnsupportedValueRepresentation { action, vr, path } => write!(
        f,
        "Anonymize error: {}, action: {}, VR: {}, path: {}",
        self.name(),
        action,
        vr,
        path
      ),
      Self::UnimplementedAction { action, path } => write!(
        f,
        "Anonymize error: {}, action: {}, path: {}",
        self.name(),
        action,
        path
      ),
      Self::MalformedPrivateTag { details, path } => write!(
        f,
        "Anonymize error: {}, details: {}, path: {}",
        self.name(),
        details,
        path
      ),
      Self::DataError(e) => e.fmt(f),
      Self::CatalogError(e) => e.fmt(f),
    }
  }
}

impl std::error::Error for AnonymizeError {}

impl DcmanonError for AnonymizeError {
  /// Returns lines of text that describe an anonymize error in a
  /// human-readable format.
  ///
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let (details, path) = match self {
      Self::UnsupportedValueRepresentation { action, vr, path } => (
        format!("The '{}' action does not support the {} VR", action, vr),
        path,
      ),
      Self::UnimplementedAction { action, path } => {
        (format!("The '{}' action is not implemented", action), path)
      }
      Self::MalformedPrivateTag { details, path } => (details.clone(), path),
      Self::DataError(e) => return e.to_lines(task_description),
      Self::CatalogError(e) => return e.to_lines(task_description),
    };

    let mut lines = vec![
      format!("Anonymize error {}", task_description),
      "".to_string(),
      format!("  Error: {}", self.name()),
    ];

    if let Ok(tag) = path.final_data_element() {
      lines.push(format!("  Tag: {}", tag));
    }

    if !path.is_root() {
      lines.push(format!("  Path: {}", path));
    }

    lines.push(format!("  Details: {}", details));

    lines
  }
}
