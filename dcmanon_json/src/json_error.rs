use dcmanon_core::{DataError, DataSetPath, DcmanonError};

/// Occurs when an error is encountered converting to the DICOM JSON model.
///
#[derive(Clone, Debug, PartialEq)]
pub enum JsonSerializeError {
  /// The data to be serialized to the DICOM JSON model is invalid. Details of
  /// the issue are contained in the contained [`DataError`].
  DataError(DataError),
}

/// Occurs when an error is encountered converting from the DICOM JSON model.
///
#[derive(Clone, Debug, PartialEq)]
pub enum JsonDeserializeError {
  /// The DICOM JSON data to be deserialized is invalid.
  JsonInvalid { details: String, path: DataSetPath },
}

impl core::fmt::Display for JsonSerializeError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      JsonSerializeError::DataError(e) => e.fmt(f),
    }
  }
}

impl core::fmt::Display for JsonDeserializeError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      JsonDeserializeError::JsonInvalid { details, path } => {
        write!(
          f,
          "DICOM JSON deserialize error, details: {}, path: {}",
          details, path,
        )
      }
    }
  }
}

impl std::error::Error for JsonSerializeError {}

impl std::error::Error for JsonDeserializeError {}

impl DcmanonError for JsonSerializeError {
  /// Returns lines of text that describe a DICOM JSON serialize error in a
  /// human-readable format.
  ///
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      JsonSerializeError::DataError(e) => e.to_lines(task_description),
    }
  }
}

impl DcmanonError for JsonDeserializeError {
  /// Returns lines of text that describe a DICOM JSON deserialize error in a
  /// human-readable format.
  ///
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      JsonDeserializeError::JsonInvalid { details, path } => {
        let mut lines = vec![];

        lines.push(format!("DICOM JSON deserialize error {task_description}"));
        lines.push("".to_string());
        lines.push(format!("  Details: {details}"));

        if let Ok(tag) = path.final_data_element() {
          lines.push(format!("  Tag: {tag}"));
        }

        if !path.is_root() {
          lines.push(format!("  Path: {path}"));
        }

        lines
      }
    }
  }
}
