//! A DICOM record made up of File Meta Information and a main data set.

use crate::{DataElementTag, DataSet};

/// A DICOM record, i.e. the File Meta Information header that holds the
/// group 0x0002 data elements, and the main data set that holds everything
/// else.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DicomRecord {
  file_meta_information: DataSet,
  data_set: DataSet,
}

impl DicomRecord {
  /// Creates a new DICOM record from its File Meta Information and main data
  /// set.
  ///
  pub fn new(file_meta_information: DataSet, data_set: DataSet) -> Self {
    Self {
      file_meta_information,
      data_set,
    }
  }

  /// Returns the File Meta Information of a DICOM record.
  ///
  pub fn file_meta_information(&self) -> &DataSet {
    &self.file_meta_information
  }

  /// Returns a mutable reference to the File Meta Information of a DICOM
  /// record.
  ///
  pub fn file_meta_information_mut(&mut self) -> &mut DataSet {
    &mut self.file_meta_information
  }

  /// Returns the main data set of a DICOM record.
  ///
  pub fn data_set(&self) -> &DataSet {
    &self.data_set
  }

  /// Returns a mutable reference to the main data set of a DICOM record.
  ///
  pub fn data_set_mut(&mut self) -> &mut DataSet {
    &mut self.data_set
  }

  /// Returns the data set that holds the given tag. Group 0x0002 tags live in
  /// the File Meta Information, all others in the main data set.
  ///
  pub fn data_set_for_tag(&self, tag: DataElementTag) -> &DataSet {
    if tag.is_file_meta_information() {
      &self.file_meta_information
    } else {
      &self.data_set
    }
  }

  /// Mutable version of [`Self::data_set_for_tag()`].
  ///
  pub fn data_set_for_tag_mut(&mut self, tag: DataElementTag) -> &mut DataSet {
    if tag.is_file_meta_information() {
      &mut self.file_meta_information
    } else {
      &mut self.data_set
    }
  }

  /// Splits a DICOM record into its File Meta Information and main data set.
  ///
  pub fn into_parts(self) -> (DataSet, DataSet) {
    (self.file_meta_information, self.data_set)
  }
}

impl From<DataSet> for DicomRecord {
  /// Creates a DICOM record with empty File Meta Information.
  ///
  fn from(data_set: DataSet) -> Self {
    Self::new(DataSet::new(), data_set)
  }
}
