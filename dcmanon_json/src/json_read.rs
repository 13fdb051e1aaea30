//! Converts DICOM JSON to DICOM records.

use base64::prelude::*;
use serde_json::{Map, Value};

use dcmanon_core::{
  DataElementTag, DataElementValue, DataSet, DataSetPath, DicomRecord,
  ValueRepresentation,
};

use crate::JsonDeserializeError;

/// Converts a DICOM JSON string to a DICOM record.
///
pub fn record_from_json(json: &str) -> Result<DicomRecord, JsonDeserializeError> {
  let mut path = DataSetPath::new();

  let json: Value =
    serde_json::from_str(json).map_err(|e| JsonDeserializeError::JsonInvalid {
      details: format!("Input is not valid JSON: {}", e),
      path: path.clone(),
    })?;

  let Value::Object(json) = json else {
    return Err(JsonDeserializeError::JsonInvalid {
      details: "Root is not an object".to_string(),
      path,
    });
  };

  let mut data_set = read_data_set(&json, &mut path)?;

  let mut file_meta_information = data_set.clone();
  file_meta_information.retain(|tag, _| tag.is_file_meta_information());
  data_set.retain(|tag, _| !tag.is_file_meta_information());

  Ok(DicomRecord::new(file_meta_information, data_set))
}

fn read_data_set(
  json: &Map<String, Value>,
  path: &mut DataSetPath,
) -> Result<DataSet, JsonDeserializeError> {
  let mut data_set = DataSet::new();

  for (key, element) in json {
    let tag = DataElementTag::from_hex_string(key).map_err(|_| {
      JsonDeserializeError::JsonInvalid {
        details: format!("Invalid data set tag: {}", key),
        path: path.clone(),
      }
    })?;

    path
      .add_data_element(tag)
      .map_err(|details| JsonDeserializeError::JsonInvalid {
        details,
        path: path.clone(),
      })?;

    let value = read_data_element(element, path)?;
    data_set.insert(tag, value);

    path.pop().map_err(|details| JsonDeserializeError::JsonInvalid {
      details,
      path: path.clone(),
    })?;
  }

  Ok(data_set)
}

fn read_data_element(
  json: &Value,
  path: &mut DataSetPath,
) -> Result<DataElementValue, JsonDeserializeError> {
  let invalid = |details: String, path: &DataSetPath| {
    JsonDeserializeError::JsonInvalid {
      details,
      path: path.clone(),
    }
  };

  let Value::Object(json) = json else {
    return Err(invalid("Data element is not an object".to_string(), path));
  };

  let vr = match json.get("vr") {
    Some(Value::String(vr)) => ValueRepresentation::from_bytes(vr.as_bytes())
      .map_err(|_| invalid(format!("VR is invalid: {}", vr), path))?,
    _ => return Err(invalid("VR is missing".to_string(), path)),
  };

  if json.contains_key("BulkDataURI") {
    return Err(invalid("BulkDataURI is not supported".to_string(), path));
  }

  if vr.is_binary() {
    let bytes = match json.get("InlineBinary") {
      Some(Value::String(s)) => BASE64_STANDARD
        .decode(s)
        .map_err(|_| invalid("InlineBinary is not valid Base64".to_string(), path))?,
      Some(_) => {
        return Err(invalid("InlineBinary is not a string".to_string(), path));
      }
      None => vec![],
    };

    return DataElementValue::new_binary(vr, bytes)
      .map_err(|e| invalid(e.to_string(), path));
  }

  let values = match json.get("Value") {
    Some(Value::Array(values)) => values.as_slice(),
    Some(_) => return Err(invalid("Value is not an array".to_string(), path)),
    None => &[],
  };

  if vr == ValueRepresentation::Sequence {
    let mut items = Vec::with_capacity(values.len());

    for (i, item) in values.iter().enumerate() {
      path
        .add_sequence_item(i)
        .map_err(|details| invalid(details, path))?;

      let Value::Object(item) = item else {
        return Err(invalid("Sequence item is not an object".to_string(), path));
      };
      items.push(read_data_set(item, path)?);

      path.pop().map_err(|details| invalid(details, path))?;
    }

    return Ok(DataElementValue::new_sequence(items));
  }

  let value = match vr {
    ValueRepresentation::AttributeTag => {
      let tags = values
        .iter()
        .map(|value| {
          value
            .as_str()
            .and_then(|s| DataElementTag::from_hex_string(s).ok())
            .ok_or_else(|| invalid(format!("Invalid AT value: {}", value), path))
        })
        .collect::<Result<Vec<_>, _>>()?;

      Ok(DataElementValue::new_attribute_tag(&tags))
    }

    ValueRepresentation::FloatingPointDouble
    | ValueRepresentation::FloatingPointSingle => {
      let floats = values
        .iter()
        .map(|value| match value {
          Value::Number(n) => n.as_f64(),
          Value::String(s) if s == "NaN" => Some(f64::NAN),
          Value::String(s) if s == "Infinity" => Some(f64::INFINITY),
          Value::String(s) if s == "-Infinity" => Some(f64::NEG_INFINITY),
          _ => None,
        })
        .map(|f| {
          f.ok_or_else(|| invalid("Invalid float value".to_string(), path))
        })
        .collect::<Result<Vec<_>, _>>()?;

      DataElementValue::new_floats(vr, floats)
    }

    ValueRepresentation::SignedLong
    | ValueRepresentation::SignedShort
    | ValueRepresentation::SignedVeryLong
    | ValueRepresentation::UnsignedLong
    | ValueRepresentation::UnsignedShort
    | ValueRepresentation::UnsignedVeryLong => {
      let ints = values
        .iter()
        .map(|value| match value {
          Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
          Value::String(s) => s.trim().parse::<i128>().ok(),
          _ => None,
        })
        .map(|i| {
          i.ok_or_else(|| invalid("Invalid integer value".to_string(), path))
        })
        .collect::<Result<Vec<_>, _>>()?;

      DataElementValue::new_ints(vr, ints)
    }

    ValueRepresentation::PersonName => {
      let names = values
        .iter()
        .map(|value| read_person_name(value).map_err(|d| invalid(d, path)))
        .collect::<Result<Vec<_>, _>>()?;

      DataElementValue::new_strings(
        vr,
        &names.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
      )
    }

    _ => {
      let strings = values
        .iter()
        .map(|value| match value {
          Value::Null => Ok(String::new()),
          Value::String(s) => Ok(s.clone()),
          Value::Number(n)
            if vr == ValueRepresentation::DecimalString
              || vr == ValueRepresentation::IntegerString =>
          {
            Ok(n.to_string())
          }
          _ => Err(invalid(format!("Invalid {} value: {}", vr, value), path)),
        })
        .collect::<Result<Vec<_>, _>>()?;

      DataElementValue::new_strings(
        vr,
        &strings.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
      )
    }
  };

  value.map_err(|e| invalid(e.to_string(), path))
}

/// Reads a person name from its DICOM JSON object form and joins its
/// component groups with '='.
///
fn read_person_name(value: &Value) -> Result<String, String> {
  let obj = match value {
    Value::Null => return Ok(String::new()),
    Value::Object(obj) => obj,
    _ => return Err("PersonName value is not an object".to_string()),
  };

  let mut component_groups = ["Alphabetic", "Ideographic", "Phonetic"]
    .iter()
    .map(|name| match obj.get(*name) {
      None | Some(Value::Null) => Ok(""),
      Some(Value::String(s)) => Ok(s.as_str()),
      Some(_) => Err(format!("PersonName {} is not a string", name)),
    })
    .collect::<Result<Vec<_>, _>>()?;

  while component_groups.last() == Some(&"") {
    component_groups.pop();
  }

  Ok(component_groups.join("="))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn read_strings_test() {
    let record = record_from_json(
      r#"{
        "00020003": {"vr": "UI", "Value": ["1.2.3"]},
        "00080060": {"vr": "CS", "Value": ["CT", null]},
        "00100010": {"vr": "PN", "Value": [{"Alphabetic": "Doe^John"}]},
        "00101010": {"vr": "AS"}
      }"#,
    )
    .unwrap();

    assert_eq!(
      record
        .file_meta_information()
        .get_string(DataElementTag::new(0x0002, 0x0003)),
      Ok("1.2.3")
    );
    assert!(!record.data_set().has(DataElementTag::new(0x0002, 0x0003)));

    assert_eq!(
      record
        .data_set()
        .get_strings(DataElementTag::new(0x0008, 0x0060)),
      Ok(vec!["CT", ""])
    );
    assert_eq!(
      record
        .data_set()
        .get_string(DataElementTag::new(0x0010, 0x0010)),
      Ok("Doe^John")
    );
    assert!(
      record
        .data_set()
        .get_value(DataElementTag::new(0x0010, 0x1010))
        .unwrap()
        .is_empty()
    );
  }

  #[test]
  fn read_numbers_test() {
    let record = record_from_json(
      r#"{
        "00180050": {"vr": "DS", "Value": [2.5]},
        "00280010": {"vr": "US", "Value": [512]},
        "00181310": {"vr": "FD", "Value": ["NaN", 1.0]}
      }"#,
    )
    .unwrap();

    let data_set = record.data_set();

    assert_eq!(
      data_set.get_string(DataElementTag::new(0x0018, 0x0050)),
      Ok("2.5")
    );
    assert_eq!(
      data_set
        .get_value(DataElementTag::new(0x0028, 0x0010))
        .unwrap()
        .get_int::<u16>(),
      Ok(512)
    );

    let floats = data_set
      .get_value(DataElementTag::new(0x0018, 0x1310))
      .unwrap()
      .get_floats()
      .unwrap();
    assert!(floats[0].is_nan());
    assert_eq!(floats[1], 1.0);
  }

  #[test]
  fn read_sequence_test() {
    let record = record_from_json(
      r#"{"00081140": {"vr": "SQ", "Value": [
        {"00081155": {"vr": "UI", "Value": ["1.2"]}},
        {"00091001": {"vr": "UN", "InlineBinary": "AQID"}}
      ]}}"#,
    )
    .unwrap();

    let items = record
      .data_set()
      .get_value(DataElementTag::new(0x0008, 0x1140))
      .unwrap()
      .sequence_items()
      .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(
      items[1]
        .get_value(DataElementTag::new(0x0009, 0x1001))
        .unwrap()
        .bytes(),
      Ok([1u8, 2, 3].as_slice())
    );
  }

  #[test]
  fn invalid_json_test() {
    assert_eq!(
      record_from_json(r#"{"00081140": {"vr": "SQ", "Value": [1]}}"#),
      Err(JsonDeserializeError::JsonInvalid {
        details: "Sequence item is not an object".to_string(),
        path: DataSetPath::new()
          .with_sequence_item(DataElementTag::new(0x0008, 0x1140), 0),
      })
    );

    assert_eq!(
      record_from_json(r#"{"00100010": {"vr": "ZZ"}}"#),
      Err(JsonDeserializeError::JsonInvalid {
        details: "VR is invalid: ZZ".to_string(),
        path: DataSetPath::new_with_data_element(DataElementTag::new(
          0x0010, 0x0010
        )),
      })
    );

    assert!(record_from_json("[]").is_err());
  }
}
