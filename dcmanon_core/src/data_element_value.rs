//! A data element value that can hold any of the DICOM value representations.
//! Data element values are usually stored in a [`DataSet`] which maps data
//! element tags to data element values.

use crate::{DataElementTag, DataError, DataSet, ValueRepresentation};

/// A DICOM data element value that holds one of the following types of data:
///
/// 1. String values. Used by all string VRs. VRs that allow multiplicity hold
///    one string per value, while the text VRs that don't allow multiplicity
///    hold at most one string.
///
/// 2. Integer values. Used by the binary integer VRs, e.g.
///    [`ValueRepresentation::UnsignedShort`]. Values are range checked against
///    the VR when the value is constructed.
///
/// 3. Float values. Used by [`ValueRepresentation::FloatingPointSingle`] and
///    [`ValueRepresentation::FloatingPointDouble`].
///
/// 4. Binary value. Raw bytes for the `O*` VRs and
///    [`ValueRepresentation::Unknown`].
///
/// 5. Attribute tag values. Used by [`ValueRepresentation::AttributeTag`].
///
/// 6. Sequence value. A list of nested data sets used to create hierarchies of
///    data elements in a DICOM data set.
///
/// Ref: PS3.5 6.2.
///
#[derive(Clone, Debug, PartialEq)]
pub struct DataElementValue(RawDataElementValue);

#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::enum_variant_names)]
enum RawDataElementValue {
  StringValue {
    vr: ValueRepresentation,
    values: Vec<String>,
  },
  IntegerValue {
    vr: ValueRepresentation,
    values: Vec<i128>,
  },
  FloatValue {
    vr: ValueRepresentation,
    values: Vec<f64>,
  },
  BinaryValue {
    vr: ValueRepresentation,
    bytes: Vec<u8>,
  },
  AttributeTagValue {
    values: Vec<DataElementTag>,
  },
  SequenceValue {
    items: Vec<DataSet>,
  },
}

impl DataElementValue {
  /// Constructs a new data element value holding strings. The VR must be a
  /// string VR. VRs that don't allow multiplicity accept at most one string,
  /// and for VRs that do allow multiplicity no string may contain a
  /// backslash, as that is the value delimiter.
  ///
  pub fn new_strings(
    vr: ValueRepresentation,
    values: &[&str],
  ) -> Result<Self, DataError> {
    if !vr.is_string() {
      return Err(DataError::new_value_invalid(format!(
        "Value representation '{}' is not valid for string data",
        vr
      )));
    }

    if vr.is_single_string() {
      if values.len() > 1 {
        return Err(DataError::new_value_invalid(format!(
          "Value representation '{}' does not allow multiple values",
          vr
        )));
      }
    } else if values.iter().any(|s| s.contains('\\')) {
      return Err(DataError::new_value_invalid(format!(
        "Value for '{}' contains a backslash",
        vr
      )));
    }

    Ok(Self(RawDataElementValue::StringValue {
      vr,
      values: values.iter().map(|s| s.to_string()).collect(),
    }))
  }

  /// Constructs a new data element value holding integers. The VR must be a
  /// binary integer VR, and all values must be in range for it.
  ///
  pub fn new_ints(
    vr: ValueRepresentation,
    values: Vec<i128>,
  ) -> Result<Self, DataError> {
    let Some((min, max)) = vr.integer_range() else {
      return Err(DataError::new_value_invalid(format!(
        "Value representation '{}' is not valid for integer data",
        vr
      )));
    };

    if let Some(i) = values.iter().find(|i| **i < min || **i > max) {
      return Err(DataError::new_value_invalid(format!(
        "Value {} is out of range for '{}'",
        i, vr
      )));
    }

    Ok(Self(RawDataElementValue::IntegerValue { vr, values }))
  }

  /// Constructs a new data element value holding floats. The VR must be
  /// either [`ValueRepresentation::FloatingPointSingle`] or
  /// [`ValueRepresentation::FloatingPointDouble`].
  ///
  pub fn new_floats(
    vr: ValueRepresentation,
    values: Vec<f64>,
  ) -> Result<Self, DataError> {
    if !vr.is_float() {
      return Err(DataError::new_value_invalid(format!(
        "Value representation '{}' is not valid for float data",
        vr
      )));
    }

    Ok(Self(RawDataElementValue::FloatValue { vr, values }))
  }

  /// Constructs a new data element binary value with the specified value
  /// representation, which must be one of the `O*` VRs or
  /// [`ValueRepresentation::Unknown`].
  ///
  pub fn new_binary(
    vr: ValueRepresentation,
    bytes: Vec<u8>,
  ) -> Result<Self, DataError> {
    if !vr.is_binary() {
      return Err(DataError::new_value_invalid(format!(
        "Value representation '{}' is not valid for binary data",
        vr
      )));
    }

    Ok(Self(RawDataElementValue::BinaryValue { vr, bytes }))
  }

  /// Creates a new `AgeString` data element value.
  ///
  pub fn new_age_string(value: &str) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::AgeString, &[value])
  }

  /// Creates a new `AttributeTag` data element value.
  ///
  pub fn new_attribute_tag(value: &[DataElementTag]) -> Self {
    Self(RawDataElementValue::AttributeTagValue {
      values: value.to_vec(),
    })
  }

  /// Creates a new `CodeString` data element value.
  ///
  pub fn new_code_string(value: &[&str]) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::CodeString, value)
  }

  /// Creates a new `Date` data element value from a string in the DICOM
  /// `YYYYMMDD` format.
  ///
  pub fn new_date(value: &str) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::Date, &[value])
  }

  /// Creates a new `DateTime` data element value from a string in the DICOM
  /// `YYYYMMDDHHMMSS.FFFFFF&ZZXX` format.
  ///
  pub fn new_date_time(value: &str) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::DateTime, &[value])
  }

  /// Creates a new `DecimalString` data element value.
  ///
  pub fn new_decimal_string(value: &[f64]) -> Result<Self, DataError> {
    let strings = value.iter().map(|f| f.to_string()).collect::<Vec<_>>();

    Self::new_strings(
      ValueRepresentation::DecimalString,
      &strings.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    )
  }

  /// Creates a new `FloatingPointDouble` data element value.
  ///
  pub fn new_floating_point_double(value: &[f64]) -> Result<Self, DataError> {
    Self::new_floats(ValueRepresentation::FloatingPointDouble, value.to_vec())
  }

  /// Creates a new `FloatingPointSingle` data element value.
  ///
  pub fn new_floating_point_single(value: &[f32]) -> Result<Self, DataError> {
    Self::new_floats(
      ValueRepresentation::FloatingPointSingle,
      value.iter().map(|f| f64::from(*f)).collect(),
    )
  }

  /// Creates a new `IntegerString` data element value.
  ///
  pub fn new_integer_string(value: &[i32]) -> Result<Self, DataError> {
    let strings = value.iter().map(|i| i.to_string()).collect::<Vec<_>>();

    Self::new_strings(
      ValueRepresentation::IntegerString,
      &strings.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    )
  }

  /// Creates a new `LongString` data element value.
  ///
  pub fn new_long_string(value: &[&str]) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::LongString, value)
  }

  /// Creates a new `LongText` data element value.
  ///
  pub fn new_long_text(value: &str) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::LongText, &[value])
  }

  /// Creates a new `OtherByteString` data element value.
  ///
  pub fn new_other_byte_string(value: Vec<u8>) -> Result<Self, DataError> {
    Self::new_binary(ValueRepresentation::OtherByteString, value)
  }

  /// Creates a new `PersonName` data element value. Each name holds its
  /// alphabetic, ideographic, and phonetic component groups separated by
  /// `=`.
  ///
  pub fn new_person_name(value: &[&str]) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::PersonName, value)
  }

  /// Creates a new `Sequence` data element value.
  ///
  pub fn new_sequence(items: Vec<DataSet>) -> Self {
    Self(RawDataElementValue::SequenceValue { items })
  }

  /// Creates a new `ShortString` data element value.
  ///
  pub fn new_short_string(value: &[&str]) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::ShortString, value)
  }

  /// Creates a new `ShortText` data element value.
  ///
  pub fn new_short_text(value: &str) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::ShortText, &[value])
  }

  /// Creates a new `SignedLong` data element value.
  ///
  pub fn new_signed_long(value: &[i32]) -> Result<Self, DataError> {
    Self::new_ints(
      ValueRepresentation::SignedLong,
      value.iter().map(|i| i128::from(*i)).collect(),
    )
  }

  /// Creates a new `SignedShort` data element value.
  ///
  pub fn new_signed_short(value: &[i16]) -> Result<Self, DataError> {
    Self::new_ints(
      ValueRepresentation::SignedShort,
      value.iter().map(|i| i128::from(*i)).collect(),
    )
  }

  /// Creates a new `Time` data element value from a string in the DICOM
  /// `HHMMSS.FFFFFF` format.
  ///
  pub fn new_time(value: &str) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::Time, &[value])
  }

  /// Creates a new `UniqueIdentifier` data element value.
  ///
  pub fn new_unique_identifier(value: &[&str]) -> Result<Self, DataError> {
    if let Some(uid) = value.iter().find(|uid| !is_valid_uid(uid)) {
      return Err(DataError::new_value_invalid(format!(
        "UID is invalid: {:?}",
        uid
      )));
    }

    Self::new_strings(ValueRepresentation::UniqueIdentifier, value)
  }

  /// Creates a new `Unknown` data element value.
  ///
  pub fn new_unknown(value: Vec<u8>) -> Result<Self, DataError> {
    Self::new_binary(ValueRepresentation::Unknown, value)
  }

  /// Creates a new `UnlimitedText` data element value.
  ///
  pub fn new_unlimited_text(value: &str) -> Result<Self, DataError> {
    Self::new_strings(ValueRepresentation::UnlimitedText, &[value])
  }

  /// Creates a new `UnsignedLong` data element value.
  ///
  pub fn new_unsigned_long(value: &[u32]) -> Result<Self, DataError> {
    Self::new_ints(
      ValueRepresentation::UnsignedLong,
      value.iter().map(|i| i128::from(*i)).collect(),
    )
  }

  /// Creates a new `UnsignedShort` data element value.
  ///
  pub fn new_unsigned_short(value: &[u16]) -> Result<Self, DataError> {
    Self::new_ints(
      ValueRepresentation::UnsignedShort,
      value.iter().map(|i| i128::from(*i)).collect(),
    )
  }

  /// Returns the value representation for a data element value.
  ///
  pub fn value_representation(&self) -> ValueRepresentation {
    match &self.0 {
      RawDataElementValue::StringValue { vr, .. }
      | RawDataElementValue::IntegerValue { vr, .. }
      | RawDataElementValue::FloatValue { vr, .. }
      | RawDataElementValue::BinaryValue { vr, .. } => *vr,
      RawDataElementValue::AttributeTagValue { .. } => {
        ValueRepresentation::AttributeTag
      }
      RawDataElementValue::SequenceValue { .. } => {
        ValueRepresentation::Sequence
      }
    }
  }

  /// Returns the number of values held by a data element value. For binary
  /// values this is one if there are any bytes and zero otherwise, and for
  /// sequences it is the number of items.
  ///
  pub fn multiplicity(&self) -> usize {
    match &self.0 {
      RawDataElementValue::StringValue { values, .. } => values.len(),
      RawDataElementValue::IntegerValue { values, .. } => values.len(),
      RawDataElementValue::FloatValue { values, .. } => values.len(),
      RawDataElementValue::BinaryValue { bytes, .. } => {
        usize::from(!bytes.is_empty())
      }
      RawDataElementValue::AttributeTagValue { values } => values.len(),
      RawDataElementValue::SequenceValue { items } => items.len(),
    }
  }

  /// Returns whether a data element value holds no data.
  ///
  pub fn is_empty(&self) -> bool {
    self.multiplicity() == 0
  }

  /// For data element values that hold binary data, returns that data.
  ///
  pub fn bytes(&self) -> Result<&[u8], DataError> {
    match &self.0 {
      RawDataElementValue::BinaryValue { bytes, .. } => Ok(bytes),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For data element values that hold a sequence, returns a reference to the
  /// sequence's items.
  ///
  pub fn sequence_items(&self) -> Result<&[DataSet], DataError> {
    match &self.0 {
      RawDataElementValue::SequenceValue { items } => Ok(items),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For data element values that hold a sequence, returns a mutable reference
  /// to the sequence's items.
  ///
  pub fn sequence_items_mut(&mut self) -> Result<&mut Vec<DataSet>, DataError> {
    match &mut self.0 {
      RawDataElementValue::SequenceValue { items } => Ok(items),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the string contained in a data element value. This is only
  /// supported for string VRs when exactly one string is present.
  ///
  pub fn get_string(&self) -> Result<&str, DataError> {
    let strings = self.get_strings()?;

    match strings.as_slice() {
      [s] => Ok(s),
      _ => Err(DataError::new_multiplicity_mismatch()),
    }
  }

  /// Returns the strings contained in a data element value. This is only
  /// supported for string VRs.
  ///
  pub fn get_strings(&self) -> Result<Vec<&str>, DataError> {
    match &self.0 {
      RawDataElementValue::StringValue { values, .. } => {
        Ok(values.iter().map(|s| s.as_str()).collect())
      }
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the integer contained in a data element value. This is only
  /// supported for binary integer VRs when exactly one integer is present.
  ///
  pub fn get_int<T: num_traits::PrimInt + TryFrom<i128>>(
    &self,
  ) -> Result<T, DataError> {
    let ints = self.get_ints()?;

    match ints.as_slice() {
      [i] => Ok(*i),
      _ => Err(DataError::new_multiplicity_mismatch()),
    }
  }

  /// Returns the integers contained in a data element value. This is only
  /// supported for binary integer VRs.
  ///
  pub fn get_ints<T: num_traits::PrimInt + TryFrom<i128>>(
    &self,
  ) -> Result<Vec<T>, DataError> {
    match &self.0 {
      RawDataElementValue::IntegerValue { values, .. } => values
        .iter()
        .map(|i| {
          T::try_from(*i).map_err(|_| {
            DataError::new_value_invalid(format!(
              "Value {} is out of range for the requested integer type",
              i
            ))
          })
        })
        .collect(),

      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the float contained in a data element value. This is only
  /// supported for floating point VRs when exactly one float is present.
  ///
  pub fn get_float(&self) -> Result<f64, DataError> {
    let floats = self.get_floats()?;

    match floats.as_slice() {
      [f] => Ok(*f),
      _ => Err(DataError::new_multiplicity_mismatch()),
    }
  }

  /// Returns the floats contained in a data element value. This is only
  /// supported for floating point VRs.
  ///
  pub fn get_floats(&self) -> Result<Vec<f64>, DataError> {
    match &self.0 {
      RawDataElementValue::FloatValue { values, .. } => Ok(values.clone()),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the data element tags contained in an `AttributeTag` data
  /// element value.
  ///
  pub fn get_attribute_tags(&self) -> Result<&[DataElementTag], DataError> {
    match &self.0 {
      RawDataElementValue::AttributeTagValue { values } => Ok(values),
      _ => Err(DataError::new_value_not_present()),
    }
  }
}

/// Returns whether a string is a valid UID: at most 64 characters made up of
/// digit components separated by periods, with no leading zeros other than a
/// component that is exactly `"0"`. An empty string is allowed, as it is the
/// empty value.
///
/// Ref: PS3.5 9.1.
///
pub fn is_valid_uid(uid: &str) -> bool {
  if uid.is_empty() {
    return true;
  }

  uid.len() <= 64
    && uid.split('.').all(|component| {
      !component.is_empty()
        && component.bytes().all(|b| b.is_ascii_digit())
        && (component == "0" || !component.starts_with('0'))
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn value_representation_test() {
    assert_eq!(
      DataElementValue::new_long_string(&["123"])
        .unwrap()
        .value_representation(),
      ValueRepresentation::LongString
    );

    assert_eq!(
      DataElementValue::new_floating_point_single(&[1.0])
        .unwrap()
        .value_representation(),
      ValueRepresentation::FloatingPointSingle
    );

    assert_eq!(
      DataElementValue::new_unsigned_short(&[1])
        .unwrap()
        .value_representation(),
      ValueRepresentation::UnsignedShort
    );

    assert_eq!(
      DataElementValue::new_attribute_tag(&[]).value_representation(),
      ValueRepresentation::AttributeTag
    );

    assert_eq!(
      DataElementValue::new_sequence(vec![]).value_representation(),
      ValueRepresentation::Sequence
    );
  }

  #[test]
  fn new_strings_test() {
    assert_eq!(
      DataElementValue::new_strings(ValueRepresentation::UnsignedShort, &["1"]),
      Err(DataError::new_value_invalid(
        "Value representation 'US' is not valid for string data".to_string()
      ))
    );

    assert_eq!(
      DataElementValue::new_strings(ValueRepresentation::LongText, &["A", "B"]),
      Err(DataError::new_value_invalid(
        "Value representation 'LT' does not allow multiple values".to_string()
      ))
    );

    assert_eq!(
      DataElementValue::new_long_string(&["A\\B"]),
      Err(DataError::new_value_invalid(
        "Value for 'LO' contains a backslash".to_string()
      ))
    );

    assert!(DataElementValue::new_long_text("A\\B").is_ok());
  }

  #[test]
  fn new_ints_test() {
    assert_eq!(
      DataElementValue::new_ints(ValueRepresentation::UnsignedShort, vec![-1]),
      Err(DataError::new_value_invalid(
        "Value -1 is out of range for 'US'".to_string()
      ))
    );

    assert!(
      DataElementValue::new_ints(ValueRepresentation::LongString, vec![1])
        .is_err()
    );
  }

  #[test]
  fn new_binary_test() {
    assert!(DataElementValue::new_unknown(vec![1, 2]).is_ok());

    assert_eq!(
      DataElementValue::new_binary(ValueRepresentation::LongString, vec![]),
      Err(DataError::new_value_invalid(
        "Value representation 'LO' is not valid for binary data".to_string()
      ))
    );
  }

  #[test]
  fn new_unique_identifier_test() {
    assert!(DataElementValue::new_unique_identifier(&["1.2.840.10008"]).is_ok());
    assert!(DataElementValue::new_unique_identifier(&[""]).is_ok());
    assert!(DataElementValue::new_unique_identifier(&["1.02"]).is_err());
    assert!(DataElementValue::new_unique_identifier(&["1..2"]).is_err());
    assert!(DataElementValue::new_unique_identifier(&["1.2a"]).is_err());
  }

  #[test]
  fn multiplicity_test() {
    assert_eq!(
      DataElementValue::new_code_string(&["A", "B"])
        .unwrap()
        .multiplicity(),
      2
    );

    assert!(DataElementValue::new_code_string(&[]).unwrap().is_empty());
    assert!(DataElementValue::new_unknown(vec![]).unwrap().is_empty());
    assert!(!DataElementValue::new_unknown(vec![0]).unwrap().is_empty());
  }

  #[test]
  fn get_string_test() {
    assert_eq!(
      DataElementValue::new_long_text("A").unwrap().get_string(),
      Ok("A")
    );

    assert_eq!(
      DataElementValue::new_code_string(&["A", "B"])
        .unwrap()
        .get_string(),
      Err(DataError::new_multiplicity_mismatch())
    );

    assert_eq!(
      DataElementValue::new_code_string(&["A", "B"])
        .unwrap()
        .get_strings(),
      Ok(vec!["A", "B"])
    );

    assert_eq!(
      DataElementValue::new_unsigned_short(&[1]).unwrap().get_strings(),
      Err(DataError::new_value_not_present())
    );
  }

  #[test]
  fn get_int_test() {
    let value = DataElementValue::new_unsigned_long(&[70000]).unwrap();

    assert_eq!(value.get_int::<u32>(), Ok(70000));
    assert!(value.get_int::<u16>().is_err());

    assert_eq!(
      DataElementValue::new_signed_short(&[-1, 2])
        .unwrap()
        .get_ints::<i32>(),
      Ok(vec![-1, 2])
    );
  }

  #[test]
  fn get_float_test() {
    assert_eq!(
      DataElementValue::new_floating_point_double(&[1.5])
        .unwrap()
        .get_float(),
      Ok(1.5)
    );

    assert_eq!(
      DataElementValue::new_decimal_string(&[1.5])
        .unwrap()
        .get_strings(),
      Ok(vec!["1.5"])
    );
  }

  #[test]
  fn sequence_items_test() {
    let mut value = DataElementValue::new_sequence(vec![DataSet::new()]);

    assert_eq!(value.sequence_items().map(|items| items.len()), Ok(1));

    value.sequence_items_mut().unwrap().push(DataSet::new());
    assert_eq!(value.multiplicity(), 2);

    assert_eq!(
      DataElementValue::new_unknown(vec![]).unwrap().sequence_items(),
      Err(DataError::new_value_not_present())
    );
  }
}
