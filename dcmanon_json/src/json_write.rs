//! Converts DICOM records to DICOM JSON.

use base64::prelude::*;
use serde_json::{Map, Value};

use dcmanon_core::{
  DataElementValue, DataError, DataSet, DataSetPath, DicomRecord,
  ValueRepresentation,
};

use crate::{DicomJsonConfig, JsonSerializeError};

/// Converts a DICOM record to a DICOM JSON string.
///
pub fn record_to_json(
  record: &DicomRecord,
  config: &DicomJsonConfig,
) -> Result<String, JsonSerializeError> {
  let mut path = DataSetPath::new();
  let mut json = Map::new();

  write_data_set(record.file_meta_information(), &mut json, &mut path)
    .map_err(JsonSerializeError::DataError)?;
  write_data_set(record.data_set(), &mut json, &mut path)
    .map_err(JsonSerializeError::DataError)?;

  let json = Value::Object(json);

  // Serializing a `serde_json::Value` can't fail
  let s = if config.pretty_print {
    serde_json::to_string_pretty(&json)
  } else {
    serde_json::to_string(&json)
  };

  Ok(s.unwrap_or_default())
}

/// Adds the data elements in a data set to a DICOM JSON object.
///
fn write_data_set(
  data_set: &DataSet,
  json: &mut Map<String, Value>,
  path: &mut DataSetPath,
) -> Result<(), DataError> {
  for (tag, value) in data_set {
    path.add_data_element(*tag).map_err(DataError::new_value_invalid)?;

    let mut element = Map::new();
    element.insert(
      "vr".to_string(),
      Value::String(value.value_representation().to_str().to_string()),
    );

    if !value.is_empty() {
      match value.value_representation() {
        vr if vr.is_binary() => {
          element.insert(
            "InlineBinary".to_string(),
            Value::String(BASE64_STANDARD.encode(value.bytes()?)),
          );
        }

        ValueRepresentation::Sequence => {
          let mut items = vec![];

          for (i, item) in value.sequence_items()?.iter().enumerate() {
            path.add_sequence_item(i).map_err(DataError::new_value_invalid)?;

            let mut item_json = Map::new();
            write_data_set(item, &mut item_json, path)?;
            items.push(Value::Object(item_json));

            path.pop().map_err(DataError::new_value_invalid)?;
          }

          element.insert("Value".to_string(), Value::Array(items));
        }

        _ => {
          let values =
            convert_value_to_json(value).map_err(|e| e.with_path(path))?;
          element.insert("Value".to_string(), Value::Array(values));
        }
      }
    }

    json.insert(tag.to_hex_string(), Value::Object(element));

    path.pop().map_err(DataError::new_value_invalid)?;
  }

  Ok(())
}

/// Converts a data element value that isn't binary data or a sequence to the
/// items of a DICOM JSON "Value" array.
///
fn convert_value_to_json(
  value: &DataElementValue,
) -> Result<Vec<Value>, DataError> {
  match value.value_representation() {
    ValueRepresentation::AttributeTag => Ok(
      value
        .get_attribute_tags()?
        .iter()
        .map(|tag| Value::String(tag.to_hex_string()))
        .collect(),
    ),

    // JSON doesn't allow NaN or Infinity values so they are converted to
    // strings
    ValueRepresentation::FloatingPointDouble
    | ValueRepresentation::FloatingPointSingle => Ok(
      value
        .get_floats()?
        .into_iter()
        .map(|f| match serde_json::Number::from_f64(f) {
          Some(n) => Value::Number(n),
          None if f.is_nan() => Value::String("NaN".to_string()),
          None if f > 0.0 => Value::String("Infinity".to_string()),
          None => Value::String("-Infinity".to_string()),
        })
        .collect(),
    ),

    // Integers outside the range of an i64 are written as strings
    ValueRepresentation::SignedLong
    | ValueRepresentation::SignedShort
    | ValueRepresentation::SignedVeryLong
    | ValueRepresentation::UnsignedLong
    | ValueRepresentation::UnsignedShort
    | ValueRepresentation::UnsignedVeryLong => Ok(
      value
        .get_ints::<i128>()?
        .into_iter()
        .map(|i| match i64::try_from(i) {
          Ok(i) => Value::from(i),
          Err(_) => Value::String(i.to_string()),
        })
        .collect(),
    ),

    // Written as numbers when they parse, otherwise passed through as
    // strings
    ValueRepresentation::DecimalString => Ok(
      value
        .get_strings()?
        .into_iter()
        .map(|s| {
          let s = s.trim();

          match s.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            Some(n) => Value::Number(n),
            None => prepare_json_string(s),
          }
        })
        .collect(),
    ),

    ValueRepresentation::IntegerString => Ok(
      value
        .get_strings()?
        .into_iter()
        .map(|s| {
          let s = s.trim();

          match s.parse::<i64>() {
            Ok(i) => Value::from(i),
            Err(_) => prepare_json_string(s),
          }
        })
        .collect(),
    ),

    ValueRepresentation::PersonName => value
      .get_strings()?
      .into_iter()
      .map(convert_person_name_to_json)
      .collect(),

    ValueRepresentation::AgeString
    | ValueRepresentation::ApplicationEntity
    | ValueRepresentation::CodeString
    | ValueRepresentation::Date
    | ValueRepresentation::DateTime
    | ValueRepresentation::LongString
    | ValueRepresentation::LongText
    | ValueRepresentation::ShortString
    | ValueRepresentation::ShortText
    | ValueRepresentation::Time
    | ValueRepresentation::UniqueIdentifier
    | ValueRepresentation::UniversalResourceIdentifier
    | ValueRepresentation::UnlimitedCharacters
    | ValueRepresentation::UnlimitedText => Ok(
      value
        .get_strings()?
        .into_iter()
        .map(|s| prepare_json_string(s.trim_end_matches(' ')))
        .collect(),
    ),

    vr => Err(DataError::new_value_invalid(format!(
      "Value representation '{}' can't be converted to a JSON value",
      vr
    ))),
  }
}

/// Converts a person name to a DICOM JSON object with "Alphabetic",
/// "Ideographic", and "Phonetic" component groups.
///
fn convert_person_name_to_json(name: &str) -> Result<Value, DataError> {
  if name.is_empty() {
    return Ok(Value::Null);
  }

  let component_groups: Vec<&str> = name.split('=').collect();
  if component_groups.len() > 3 {
    return Err(DataError::new_value_invalid(format!(
      "PersonName has too many component groups: {}",
      component_groups.len()
    )));
  }

  let mut result = Map::new();

  for (i, component_group) in component_groups.into_iter().enumerate() {
    let component_group = component_group.trim_end_matches(' ');
    if component_group.is_empty() {
      continue;
    }

    result.insert(
      ["Alphabetic", "Ideographic", "Phonetic"][i].to_string(),
      Value::String(component_group.to_string()),
    );
  }

  Ok(Value::Object(result))
}

fn prepare_json_string(value: &str) -> Value {
  if value.is_empty() {
    Value::Null
  } else {
    Value::String(value.to_string())
  }
}
