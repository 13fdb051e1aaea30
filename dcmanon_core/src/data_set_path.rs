//! Locations of data elements inside nested sequences, used when reporting
//! errors.

use crate::DataElementTag;

/// The location of a data element or sequence item in a data set, e.g.
/// `00081140/[1]/00081155` for the Referenced SOP Instance UID in the second
/// item of the Referenced Image Sequence. The empty path is the root data set.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSetPath(Vec<DataSetPathEntry>);

#[derive(Clone, Copy, Debug, PartialEq)]
enum DataSetPathEntry {
  DataElement(DataElementTag),
  SequenceItem(usize),
}

impl DataSetPath {
  /// Creates a path to the root data set.
  ///
  pub fn new() -> Self {
    Self(vec![])
  }

  /// Creates a path to a data element in the root data set.
  ///
  pub fn new_with_data_element(tag: DataElementTag) -> Self {
    Self(vec![DataSetPathEntry::DataElement(tag)])
  }

  /// Returns whether the path points at the root data set or at one of its
  /// data elements.
  ///
  pub fn is_root(&self) -> bool {
    self.0.len() <= 1
      && !matches!(self.0.first(), Some(DataSetPathEntry::SequenceItem(_)))
  }

  /// Returns the data element the path ends at.
  ///
  #[allow(clippy::result_unit_err)]
  pub fn final_data_element(&self) -> Result<DataElementTag, ()> {
    match self.0.last() {
      Some(DataSetPathEntry::DataElement(tag)) => Ok(*tag),
      _ => Err(()),
    }
  }

  /// Descends into a data element. The path must be at a data set, i.e. empty
  /// or ending in a sequence item.
  ///
  pub fn add_data_element(
    &mut self,
    tag: DataElementTag,
  ) -> Result<(), String> {
    if let Some(DataSetPathEntry::DataElement(_)) = self.0.last() {
      return Err(format!(
        "Invalid data set path entry: {}",
        tag.to_hex_string()
      ));
    }

    self.0.push(DataSetPathEntry::DataElement(tag));
    Ok(())
  }

  /// Descends into an item of the sequence the path ends at.
  ///
  pub fn add_sequence_item(&mut self, index: usize) -> Result<(), String> {
    let Some(DataSetPathEntry::DataElement(_)) = self.0.last() else {
      return Err(format!("Invalid data set path entry: [{index}]"));
    };

    self.0.push(DataSetPathEntry::SequenceItem(index));
    Ok(())
  }

  /// Ascends one level.
  ///
  pub fn pop(&mut self) -> Result<(), String> {
    self
      .0
      .pop()
      .map(|_| ())
      .ok_or_else(|| "Data set path is empty".to_string())
  }

  /// Returns this path pointing at a data element of the current data set. A
  /// path that already ends at a data element has that element swapped out.
  ///
  pub fn with_data_element(&self, tag: DataElementTag) -> Self {
    let mut path = self.clone();

    if let Some(DataSetPathEntry::DataElement(_)) = path.0.last() {
      path.0.pop();
    }

    path.0.push(DataSetPathEntry::DataElement(tag));
    path
  }

  /// Returns this path pointing at an item of a sequence in the current data
  /// set.
  ///
  pub fn with_sequence_item(&self, tag: DataElementTag, index: usize) -> Self {
    let mut path = self.with_data_element(tag);
    path.0.push(DataSetPathEntry::SequenceItem(index));

    path
  }
}

impl core::fmt::Display for DataSetPath {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    for (i, entry) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("/")?;
      }

      match entry {
        DataSetPathEntry::DataElement(tag) => {
          f.write_str(&tag.to_hex_string())?
        }
        DataSetPathEntry::SequenceItem(index) => write!(f, "[{index}]")?,
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const REFERENCED_IMAGE_SEQUENCE: DataElementTag =
    DataElementTag::new(0x0008, 0x1140);
  const REFERENCED_SOP_INSTANCE_UID: DataElementTag =
    DataElementTag::new(0x0008, 0x1155);

  #[test]
  fn add_and_pop_test() {
    let mut path = DataSetPath::new();
    assert!(path.is_root());

    path.add_data_element(REFERENCED_IMAGE_SEQUENCE).unwrap();
    assert!(path.is_root());
    assert_eq!(
      path.add_data_element(REFERENCED_SOP_INSTANCE_UID),
      Err("Invalid data set path entry: 00081155".to_string())
    );

    path.add_sequence_item(1).unwrap();
    assert!(!path.is_root());
    assert_eq!(
      path.add_sequence_item(2),
      Err("Invalid data set path entry: [2]".to_string())
    );

    path.add_data_element(REFERENCED_SOP_INSTANCE_UID).unwrap();
    assert_eq!(path.to_string(), "00081140/[1]/00081155");
    assert_eq!(path.final_data_element(), Ok(REFERENCED_SOP_INSTANCE_UID));

    path.pop().unwrap();
    assert_eq!(path.final_data_element(), Err(()));
    path.pop().unwrap();
    path.pop().unwrap();
    assert_eq!(path.pop(), Err("Data set path is empty".to_string()));
  }

  #[test]
  fn with_data_element_test() {
    assert_eq!(
      DataSetPath::new().with_data_element(REFERENCED_SOP_INSTANCE_UID),
      DataSetPath::new_with_data_element(REFERENCED_SOP_INSTANCE_UID)
    );

    assert_eq!(
      DataSetPath::new_with_data_element(REFERENCED_IMAGE_SEQUENCE)
        .with_data_element(REFERENCED_SOP_INSTANCE_UID),
      DataSetPath::new_with_data_element(REFERENCED_SOP_INSTANCE_UID)
    );
  }

  #[test]
  fn with_sequence_item_test() {
    let path = DataSetPath::new()
      .with_sequence_item(REFERENCED_IMAGE_SEQUENCE, 1)
      .with_sequence_item(DataElementTag::new(0x0008, 0x1199), 0);

    assert_eq!(path.to_string(), "00081140/[1]/00081199/[0]");
    assert_eq!(DataSetPath::new().to_string(), "");
  }
}
