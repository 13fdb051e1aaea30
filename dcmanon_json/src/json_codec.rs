use std::path::Path;

use dcmanon_core::{DicomRecord, RecordCodec, RecordIoError};

use crate::{DicomJsonConfig, DicomRecordJsonExtensions};

/// Loads and saves DICOM records as DICOM JSON files.
///
#[derive(Clone, Debug, Default)]
pub struct DicomJsonCodec {
  config: DicomJsonConfig,
}

impl DicomJsonCodec {
  /// Creates a new DICOM JSON codec that writes using the given config.
  ///
  pub fn new(config: DicomJsonConfig) -> Self {
    Self { config }
  }
}

impl RecordCodec for DicomJsonCodec {
  fn load(&self, path: &Path) -> Result<DicomRecord, RecordIoError> {
    let json = std::fs::read_to_string(path)
      .map_err(|e| RecordIoError::new("Reading file", e.to_string()))?;

    DicomRecord::from_json(&json)
      .map_err(|e| RecordIoError::new("Parsing DICOM JSON", e.to_string()))
  }

  fn save(
    &self,
    record: &DicomRecord,
    path: &Path,
  ) -> Result<(), RecordIoError> {
    let json = record
      .to_json(self.config.clone())
      .map_err(|e| RecordIoError::new("Serializing DICOM JSON", e.to_string()))?;

    std::fs::write(path, json)
      .map_err(|e| RecordIoError::new("Writing file", e.to_string()))
  }
}
