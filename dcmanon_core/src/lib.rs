//! Core DICOM data model used by dcmanon: data element tags, value
//! representations, data element values, data sets, and the records that
//! combine a data set with its File Meta Information.

pub mod data_element_tag;
pub mod data_element_value;
pub mod data_error;
pub mod data_set;
pub mod data_set_path;
pub mod dicom_record;
pub mod error;
pub mod record_codec;
pub mod value_representation;

pub use data_element_tag::DataElementTag;
pub use data_element_value::DataElementValue;
pub use data_error::DataError;
pub use data_set::DataSet;
pub use data_set_path::DataSetPath;
pub use dicom_record::DicomRecord;
pub use error::{DcmanonError, print_error_lines};
pub use record_codec::{RecordCodec, RecordIoError};
pub use value_representation::ValueRepresentation;
