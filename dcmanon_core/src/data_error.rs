//! Errors that occur when reading or constructing data in a data set.

use crate::{DataSetPath, DcmanonError};

/// An error that occurred when retrieving or creating data in a data set. The
/// data set path, when present, gives the precise location of the data
/// element the error relates to.
///
#[derive(Clone, Debug, PartialEq)]
pub enum DataError {
  /// The data element that was requested is not present in the data set.
  TagNotPresent { path: DataSetPath },

  /// The data element does not hold a value of the requested type.
  ValueNotPresent { path: Option<DataSetPath> },

  /// The data element holds a different number of values than was expected.
  MultiplicityMismatch { path: Option<DataSetPath> },

  /// The value is invalid for its value representation.
  ValueInvalid {
    details: String,
    path: Option<DataSetPath>,
  },
}

impl DataError {
  /// Constructs a new 'Tag not present' data error.
  ///
  pub fn new_tag_not_present() -> Self {
    Self::TagNotPresent {
      path: DataSetPath::new(),
    }
  }

  /// Constructs a new 'Value not present' data error.
  ///
  pub fn new_value_not_present() -> Self {
    Self::ValueNotPresent { path: None }
  }

  /// Constructs a new 'Multiplicity mismatch' data error.
  ///
  pub fn new_multiplicity_mismatch() -> Self {
    Self::MultiplicityMismatch { path: None }
  }

  /// Constructs a new 'Value invalid' data error.
  ///
  pub fn new_value_invalid(details: String) -> Self {
    Self::ValueInvalid {
      details,
      path: None,
    }
  }

  /// Returns the data set path for a data error, if one is set.
  ///
  pub fn path(&self) -> Option<&DataSetPath> {
    match self {
      Self::TagNotPresent { path } => Some(path),
      Self::ValueNotPresent { path }
      | Self::MultiplicityMismatch { path }
      | Self::ValueInvalid { path, .. } => path.as_ref(),
    }
  }

  /// Adds a data set path to a data error. This indicates the exact location
  /// that the error occurred in a data set.
  ///
  pub fn with_path(self, path: &DataSetPath) -> Self {
    match self {
      Self::TagNotPresent { .. } => Self::TagNotPresent { path: path.clone() },
      Self::ValueNotPresent { .. } => Self::ValueNotPresent {
        path: Some(path.clone()),
      },
      Self::MultiplicityMismatch { .. } => Self::MultiplicityMismatch {
        path: Some(path.clone()),
      },
      Self::ValueInvalid { details, .. } => Self::ValueInvalid {
        details,
        path: Some(path.clone()),
      },
    }
  }

  /// Returns the name of the error as a human-readable string.
  ///
  pub fn name(&self) -> &'static str {
    match self {
      Self::TagNotPresent { .. } => "Tag not present",
      Self::ValueNotPresent { .. } => "Value not present",
      Self::MultiplicityMismatch { .. } => "Multiplicity mismatch",
      Self::ValueInvalid { .. } => "Invalid value",
    }
  }
}

impl core::fmt::Display for DataError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    let mut s = format!("DICOM data error: {}", self.name());

    if let Some(path) = self.path() {
      s.push_str(&format!(", path: {}", path));
    }

    if let Self::ValueInvalid { details, .. } = self {
      s.push_str(&format!(", details: {}", details));
    }

    f.write_str(&s)
  }
}

impl std::error::Error for DataError {}

impl DcmanonError for DataError {
  /// Returns lines of text that describe a DICOM data error in a
  /// human-readable format.
  ///
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let mut lines = vec![
      format!("DICOM data error {}", task_description),
      "".to_string(),
      format!("  Error: {}", self.name()),
    ];

    if let Some(path) = self.path() {
      if let Ok(tag) = path.final_data_element() {
        lines.push(format!("  Tag: {}", tag));
      }

      if !path.is_root() {
        lines.push(format!("  Path: {}", path));
      }
    }

    if let Self::ValueInvalid { details, .. } = self {
      lines.push(format!("  Details: {}", details));
    }

    lines
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::DataElementTag;

  #[test]
  fn to_string_test() {
    assert_eq!(
      DataError::new_value_invalid("Bad".to_string()).to_string(),
      "DICOM data error: Invalid value, details: Bad"
    );

    assert_eq!(
      DataError::new_value_not_present()
        .with_path(&DataSetPath::new_with_data_element(DataElementTag::new(
          0x0010, 0x0010
        )))
        .to_string(),
      "DICOM data error: Value not present, path: 00100010"
    );
  }

  #[test]
  fn to_lines_test() {
    let error = DataError::new_multiplicity_mismatch().with_path(
      &DataSetPath::new_with_data_element(DataElementTag::new(0x0008, 0x0018)),
    );

    assert_eq!(
      error.to_lines("reading value"),
      vec![
        "DICOM data error reading value".to_string(),
        "".to_string(),
        "  Error: Multiplicity mismatch".to_string(),
        "  Tag: (0008,0018)".to_string(),
      ]
    );
  }
}
