//! Converts DICOM records to and from the DICOM JSON model, and provides a
//! [`RecordCodec`](dcmanon_core::RecordCodec) that stores records as DICOM
//! JSON files.
//!
//! Ref: PS3.18 F.2.

mod json_codec;
mod json_config;
mod json_error;
mod json_read;
mod json_write;

use dcmanon_core::DicomRecord;

pub use json_codec::DicomJsonCodec;
pub use json_config::DicomJsonConfig;
pub use json_error::{JsonDeserializeError, JsonSerializeError};

/// Adds functions to [`DicomRecord`] for converting to and from the DICOM JSON
/// model.
///
pub trait DicomRecordJsonExtensions
where
  Self: Sized,
{
  /// Converts a DICOM record to DICOM JSON. File Meta Information data
  /// elements are written into the same JSON object as the main data set.
  ///
  fn to_json(&self, config: DicomJsonConfig)
  -> Result<String, JsonSerializeError>;

  /// Converts DICOM JSON into a DICOM record. Data elements in group 0x0002
  /// are placed in the File Meta Information.
  ///
  fn from_json(json: &str) -> Result<Self, JsonDeserializeError>;
}

impl DicomRecordJsonExtensions for DicomRecord {
  fn to_json(
    &self,
    config: DicomJsonConfig,
  ) -> Result<String, JsonSerializeError> {
    json_write::record_to_json(self, &config)
  }

  fn from_json(json: &str) -> Result<Self, JsonDeserializeError> {
    json_read::record_from_json(json)
  }
}
