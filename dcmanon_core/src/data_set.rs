//! A DICOM data set, defined as a map of data element tags to data element
//! values.

use std::collections::BTreeMap;

use crate::{
  DataElementTag, DataElementValue, DataError, DataSetPath, ValueRepresentation,
};

/// A DICOM data set that is a mapping of data element tags to data element
/// values. Data elements are kept in ascending tag order.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet(BTreeMap<DataElementTag, DataElementValue>);

/// The first and last element numbers that a private creator data element can
/// use to reserve a block of 256 private data elements.
///
/// Ref: PS3.5 7.8.1.
///
const PRIVATE_CREATOR_ELEMENTS: core::ops::RangeInclusive<u16> = 0x0010..=0x00FF;

impl DataSet {
  /// Returns a new empty data set.
  ///
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  /// Returns the number of data elements in a data set.
  ///
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Returns whether a data set is empty and contains no data elements.
  ///
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Returns whether a data element with the specified tag exists in a data
  /// set.
  ///
  pub fn has(&self, tag: DataElementTag) -> bool {
    self.0.contains_key(&tag)
  }

  /// Inserts a data element tag and value into a data set. If there is already
  /// a value for the tag then it is replaced with the new value.
  ///
  pub fn insert(&mut self, tag: DataElementTag, value: DataElementValue) {
    self.0.insert(tag, value);
  }

  /// Inserts a string value into a data set with the given VR.
  ///
  pub fn insert_string_value(
    &mut self,
    tag: DataElementTag,
    vr: ValueRepresentation,
    values: &[&str],
  ) -> Result<(), DataError> {
    let value = DataElementValue::new_strings(vr, values)
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))?;

    self.insert(tag, value);

    Ok(())
  }

  /// Returns the value for a data element in a data set.
  ///
  pub fn get_value(
    &self,
    tag: DataElementTag,
  ) -> Result<&DataElementValue, DataError> {
    self.0.get(&tag).ok_or_else(|| {
      DataError::new_tag_not_present()
        .with_path(&DataSetPath::new_with_data_element(tag))
    })
  }

  /// Returns a mutable reference to the value for a data element in a data
  /// set.
  ///
  pub fn get_value_mut(
    &mut self,
    tag: DataElementTag,
  ) -> Result<&mut DataElementValue, DataError> {
    self.0.get_mut(&tag).ok_or_else(|| {
      DataError::new_tag_not_present()
        .with_path(&DataSetPath::new_with_data_element(tag))
    })
  }

  /// Returns the value representation of a data element in a data set, or
  /// `None` if it isn't present.
  ///
  pub fn value_representation(
    &self,
    tag: DataElementTag,
  ) -> Option<ValueRepresentation> {
    self.0.get(&tag).map(|value| value.value_representation())
  }

  /// Returns the singular string value for a data element in a data set.
  ///
  pub fn get_string(&self, tag: DataElementTag) -> Result<&str, DataError> {
    self
      .get_value(tag)?
      .get_string()
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))
  }

  /// Returns all of the string values for a data element in a data set.
  ///
  pub fn get_strings(
    &self,
    tag: DataElementTag,
  ) -> Result<Vec<&str>, DataError> {
    self
      .get_value(tag)?
      .get_strings()
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))
  }

  /// Deletes a data element from a data set, returning its value if it was
  /// present.
  ///
  pub fn delete(&mut self, tag: DataElementTag) -> Option<DataElementValue> {
    self.0.remove(&tag)
  }

  /// Returns the tags of all data elements in a data set, in ascending order.
  ///
  pub fn tags(&self) -> Vec<DataElementTag> {
    self.0.keys().copied().collect()
  }

  /// Returns an iterator over the data elements in a data set.
  ///
  pub fn iter(
    &self,
  ) -> std::collections::btree_map::Iter<'_, DataElementTag, DataElementValue>
  {
    self.0.iter()
  }

  /// Retains only the data elements specified by the predicate.
  ///
  pub fn retain<F>(&mut self, mut f: F)
  where
    F: FnMut(DataElementTag, &DataElementValue) -> bool,
  {
    self.0.retain(|tag, value| f(*tag, value));
  }

  /// Deletes all private data elements, i.e. all data elements in odd groups,
  /// including the private creators. Sequence items are processed
  /// recursively.
  ///
  pub fn delete_private_elements(&mut self) {
    self.retain(|tag, _| !tag.is_private());

    for value in self.0.values_mut() {
      if let Ok(items) = value.sequence_items_mut() {
        for item in items.iter_mut() {
          item.delete_private_elements();
        }
      }
    }
  }

  /// Returns the private creators in the given private group, along with the
  /// tag of the data element that holds each one.
  ///
  pub fn private_creators(&self, group: u16) -> Vec<(DataElementTag, &str)> {
    self
      .0
      .range(
        DataElementTag::new(group, *PRIVATE_CREATOR_ELEMENTS.start())
          ..=DataElementTag::new(group, *PRIVATE_CREATOR_ELEMENTS.end()),
      )
      .filter(|(tag, _)| tag.is_private_creator())
      .filter_map(|(tag, value)| {
        value.get_string().ok().map(|creator| (*tag, creator.trim()))
      })
      .collect()
  }

  /// Returns the private creator name for the block that the given private
  /// data element is in.
  ///
  pub fn private_creator_for(
    &self,
    tag: DataElementTag,
  ) -> Result<&str, DataError> {
    let creator_tag = if tag.is_private_creator() {
      tag
    } else {
      match tag.private_block_location() {
        Some((creator_tag, _)) => creator_tag,
        None => {
          return Err(
            DataError::new_value_invalid(format!(
              "Tag {} is not in a private block",
              tag
            ))
            .with_path(&DataSetPath::new_with_data_element(tag)),
          );
        }
      }
    };

    self
      .get_string(creator_tag)
      .map(|creator| creator.trim())
  }

  /// Returns the block number, i.e. the high byte of the element numbers of
  /// its data elements, of the private block reserved by the given private
  /// creator in a private group.
  ///
  pub fn private_block(
    &self,
    group: u16,
    private_creator: &str,
  ) -> Result<u8, DataError> {
    self
      .private_creators(group)
      .into_iter()
      .find(|(_, creator)| *creator == private_creator.trim())
      .map(|(tag, _)| tag.element as u8)
      .ok_or_else(|| {
        DataError::new_value_invalid(format!(
          "Private creator '{}' is not present in group {:04X}",
          private_creator, group
        ))
      })
  }

  /// Returns the block number of the private block reserved by the given
  /// private creator in a private group, reserving a new block for it if one
  /// doesn't exist. New blocks take the lowest unused private creator
  /// element.
  ///
  pub fn private_block_or_insert(
    &mut self,
    group: u16,
    private_creator: &str,
  ) -> Result<u8, DataError> {
    if group % 2 == 0 {
      return Err(DataError::new_value_invalid(format!(
        "Group {:04X} is not a private group",
        group
      )));
    }

    if let Ok(block) = self.private_block(group, private_creator) {
      return Ok(block);
    }

    let element = PRIVATE_CREATOR_ELEMENTS
      .clone()
      .find(|element| !self.has(DataElementTag::new(group, *element)))
      .ok_or_else(|| {
        DataError::new_value_invalid(format!(
          "No free private blocks remain in group {:04X}",
          group
        ))
      })?;

    self.insert(
      DataElementTag::new(group, element),
      DataElementValue::new_long_string(&[private_creator.trim()])?,
    );

    Ok(element as u8)
  }

  /// Inserts a data element into a private block at the given offset,
  /// returning the tag it was stored under.
  ///
  pub fn insert_private_element(
    &mut self,
    group: u16,
    block: u8,
    offset: u8,
    value: DataElementValue,
  ) -> DataElementTag {
    let tag = DataElementTag::new(group, (u16::from(block) << 8) | u16::from(offset));

    self.insert(tag, value);

    tag
  }
}

impl<'a> IntoIterator for &'a DataSet {
  type Item = (&'a DataElementTag, &'a DataElementValue);
  type IntoIter =
    std::collections::btree_map::Iter<'a, DataElementTag, DataElementValue>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

impl FromIterator<(DataElementTag, DataElementValue)> for DataSet {
  fn from_iter<T: IntoIterator<Item = (DataElementTag, DataElementValue)>>(
    iter: T,
  ) -> Self {
    Self(iter.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn private_data_set() -> DataSet {
    let mut data_set = DataSet::new();

    data_set.insert(
      DataElementTag::new(0x0009, 0x0010),
      DataElementValue::new_long_string(&["ACME 1.1"]).unwrap(),
    );
    data_set.insert(
      DataElementTag::new(0x0009, 0x1005),
      DataElementValue::new_short_string(&["Secret"]).unwrap(),
    );
    data_set.insert(
      DataElementTag::new(0x0010, 0x0010),
      DataElementValue::new_person_name(&["Doe^John"]).unwrap(),
    );

    data_set
  }

  #[test]
  fn get_value_test() {
    let data_set = private_data_set();

    assert_eq!(
      data_set.get_string(DataElementTag::new(0x0010, 0x0010)),
      Ok("Doe^John")
    );

    assert_eq!(
      data_set.get_value(DataElementTag::new(0x0010, 0x0020)),
      Err(DataError::TagNotPresent {
        path: DataSetPath::new_with_data_element(DataElementTag::new(
          0x0010, 0x0020
        ))
      })
    );
  }

  #[test]
  fn tags_test() {
    assert_eq!(
      private_data_set().tags(),
      vec![
        DataElementTag::new(0x0009, 0x0010),
        DataElementTag::new(0x0009, 0x1005),
        DataElementTag::new(0x0010, 0x0010),
      ]
    );
  }

  #[test]
  fn delete_private_elements_test() {
    let mut data_set = private_data_set();
    data_set.delete_private_elements();

    assert_eq!(data_set.tags(), vec![DataElementTag::new(0x0010, 0x0010)]);

    let mut data_set = DataSet::new();
    data_set.insert(
      DataElementTag::new(0x0008, 0x1140),
      DataElementValue::new_sequence(vec![private_data_set()]),
    );
    data_set.delete_private_elements();

    assert_eq!(
      data_set
        .get_value(DataElementTag::new(0x0008, 0x1140))
        .unwrap()
        .sequence_items()
        .unwrap()[0]
        .tags(),
      vec![DataElementTag::new(0x0010, 0x0010)]
    );
  }

  #[test]
  fn private_creators_test() {
    let data_set = private_data_set();

    assert_eq!(
      data_set.private_creators(0x0009),
      vec![(DataElementTag::new(0x0009, 0x0010), "ACME 1.1")]
    );
    assert_eq!(data_set.private_creators(0x0011), vec![]);
  }

  #[test]
  fn private_creator_for_test() {
    let data_set = private_data_set();

    assert_eq!(
      data_set.private_creator_for(DataElementTag::new(0x0009, 0x1005)),
      Ok("ACME 1.1")
    );
    assert_eq!(
      data_set.private_creator_for(DataElementTag::new(0x0009, 0x0010)),
      Ok("ACME 1.1")
    );
    assert!(
      data_set
        .private_creator_for(DataElementTag::new(0x0009, 0x2001))
        .is_err()
    );
    assert!(
      data_set
        .private_creator_for(DataElementTag::new(0x0010, 0x0010))
        .is_err()
    );
  }

  #[test]
  fn private_block_or_insert_test() {
    let mut data_set = private_data_set();

    assert_eq!(data_set.private_block(0x0009, "ACME 1.1"), Ok(0x10));
    assert_eq!(data_set.private_block_or_insert(0x0009, "ACME 1.1"), Ok(0x10));
    assert_eq!(data_set.private_block_or_insert(0x0009, "OTHER"), Ok(0x11));
    assert_eq!(
      data_set.get_string(DataElementTag::new(0x0009, 0x0011)),
      Ok("OTHER")
    );

    assert!(data_set.private_block_or_insert(0x0010, "OTHER").is_err());
  }

  #[test]
  fn insert_private_element_test() {
    let mut data_set = DataSet::new();

    let block = data_set.private_block_or_insert(0x0029, "ACME").unwrap();
    let tag = data_set.insert_private_element(
      0x0029,
      block,
      0x05,
      DataElementValue::new_short_string(&["X"]).unwrap(),
    );

    assert_eq!(tag, DataElementTag::new(0x0029, 0x1005));
    assert_eq!(data_set.get_string(tag), Ok("X"));
  }
}
