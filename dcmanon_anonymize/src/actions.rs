//! The action functions that implement the confidentiality profile actions.
//! Each one looks up the data element for a tag in a data set, does nothing
//! if it isn't present, and otherwise transforms it based on its value
//! representation. Sequences are processed recursively with the same action.

use dcmanon_core::{
  DataElementTag, DataElementValue, DataError, DataSet, ValueRepresentation,
};

use crate::{ActionContext, AnonymizeError};

/// The text used to replace string values.
///
pub const REPLACEMENT_TEXT: &str = "Anonymized";

/// The neutral date used in place of an empty or removed date.
///
pub const NEUTRAL_DATE: &str = "00010101";

/// The neutral time used in place of an empty time.
///
pub const NEUTRAL_TIME: &str = "000000.00";

/// The neutral date time used in place of an empty date time.
///
pub const NEUTRAL_DATE_TIME: &str = "00010101010101.000000+0000";

/// Leaves a data element unchanged.
///
pub fn keep(
  _data_set: &mut DataSet,
  _tag: DataElementTag,
  _context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  Ok(())
}

/// Removes a data element. Dates are set to [`NEUTRAL_DATE`] instead of being
/// removed, and sequences have the action applied to all the data elements in
/// their items before being removed.
///
pub fn delete(
  data_set: &mut DataSet,
  tag: DataElementTag,
  context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  let Some(vr) = data_set.value_representation(tag) else {
    return Ok(());
  };

  match vr {
    ValueRepresentation::Date => set_value(
      data_set,
      tag,
      DataElementValue::new_date(NEUTRAL_DATE),
      context,
    ),

    ValueRepresentation::Sequence => {
      apply_to_sequence_items(data_set, tag, context, delete)?;
      data_set.delete(tag);
      Ok(())
    }

    _ => {
      data_set.delete(tag);
      Ok(())
    }
  }
}

/// Sets a data element to an empty value. Dates and times are set to neutral
/// values rather than being emptied, and numeric values are set to zero.
///
pub fn empty(
  data_set: &mut DataSet,
  tag: DataElementTag,
  context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  let Some(vr) = data_set.value_representation(tag) else {
    return Ok(());
  };

  let value = match vr {
    ValueRepresentation::AgeString
    | ValueRepresentation::CodeString
    | ValueRepresentation::LongString
    | ValueRepresentation::LongText
    | ValueRepresentation::PersonName
    | ValueRepresentation::ShortString
    | ValueRepresentation::ShortText
    | ValueRepresentation::UniqueIdentifier
    | ValueRepresentation::UnlimitedText => {
      DataElementValue::new_strings(vr, &[])
    }

    ValueRepresentation::Date => DataElementValue::new_date(NEUTRAL_DATE),
    ValueRepresentation::DateTime => {
      DataElementValue::new_date_time(NEUTRAL_DATE_TIME)
    }
    ValueRepresentation::Time => DataElementValue::new_time(NEUTRAL_TIME),

    ValueRepresentation::DecimalString | ValueRepresentation::IntegerString => {
      DataElementValue::new_strings(vr, &["0"])
    }

    ValueRepresentation::FloatingPointDouble
    | ValueRepresentation::FloatingPointSingle => {
      DataElementValue::new_floats(vr, vec![0.0])
    }

    ValueRepresentation::SignedLong
    | ValueRepresentation::SignedShort
    | ValueRepresentation::UnsignedLong
    | ValueRepresentation::UnsignedShort => {
      DataElementValue::new_ints(vr, vec![0])
    }

    ValueRepresentation::Unknown => DataElementValue::new_binary(vr, vec![]),

    ValueRepresentation::Sequence => {
      return apply_to_sequence_items(data_set, tag, context, empty);
    }

    ValueRepresentation::ApplicationEntity
    | ValueRepresentation::AttributeTag
    | ValueRepresentation::OtherByteString
    | ValueRepresentation::OtherDoubleString
    | ValueRepresentation::OtherFloatString
    | ValueRepresentation::OtherLongString
    | ValueRepresentation::OtherVeryLongString
    | ValueRepresentation::OtherWordString
    | ValueRepresentation::SignedVeryLong
    | ValueRepresentation::UniversalResourceIdentifier
    | ValueRepresentation::UnlimitedCharacters
    | ValueRepresentation::UnsignedVeryLong => {
      return Err(unsupported("empty", vr, tag, context));
    }
  };

  set_value(data_set, tag, value, context)
}

/// Sets a data element to a non-empty dummy value: [`REPLACEMENT_TEXT`] for
/// text, zero for numbers, neutral values for dates and times, and a new
/// UID for UIDs.
///
pub fn replace(
  data_set: &mut DataSet,
  tag: DataElementTag,
  context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  let Some(vr) = data_set.value_representation(tag) else {
    return Ok(());
  };

  let value = match vr {
    ValueRepresentation::CodeString
    | ValueRepresentation::LongString
    | ValueRepresentation::LongText
    | ValueRepresentation::PersonName
    | ValueRepresentation::ShortString
    | ValueRepresentation::ShortText
    | ValueRepresentation::UnlimitedText => {
      DataElementValue::new_strings(vr, &[REPLACEMENT_TEXT])
    }

    ValueRepresentation::UniqueIdentifier => {
      return replace_uid(data_set, tag, context);
    }

    ValueRepresentation::Date => DataElementValue::new_date(NEUTRAL_DATE),
    ValueRepresentation::DateTime => {
      DataElementValue::new_date_time(NEUTRAL_DATE_TIME)
    }
    ValueRepresentation::Time => DataElementValue::new_time(NEUTRAL_TIME),

    ValueRepresentation::DecimalString | ValueRepresentation::IntegerString => {
      DataElementValue::new_strings(vr, &["0"])
    }

    ValueRepresentation::FloatingPointDouble
    | ValueRepresentation::FloatingPointSingle => {
      DataElementValue::new_floats(vr, vec![0.0])
    }

    ValueRepresentation::SignedLong
    | ValueRepresentation::SignedShort
    | ValueRepresentation::UnsignedLong
    | ValueRepresentation::UnsignedShort => {
      DataElementValue::new_ints(vr, vec![0])
    }

    ValueRepresentation::Unknown => {
      DataElementValue::new_binary(vr, REPLACEMENT_TEXT.as_bytes().to_vec())
    }

    ValueRepresentation::Sequence => {
      return apply_to_sequence_items(data_set, tag, context, replace);
    }

    ValueRepresentation::AgeString
    | ValueRepresentation::ApplicationEntity
    | ValueRepresentation::AttributeTag
    | ValueRepresentation::OtherByteString
    | ValueRepresentation::OtherDoubleString
    | ValueRepresentation::OtherFloatString
    | ValueRepresentation::OtherLongString
    | ValueRepresentation::OtherVeryLongString
    | ValueRepresentation::OtherWordString
    | ValueRepresentation::SignedVeryLong
    | ValueRepresentation::UniversalResourceIdentifier
    | ValueRepresentation::UnlimitedCharacters
    | ValueRepresentation::UnsignedVeryLong => {
      return Err(unsupported("replace", vr, tag, context));
    }
  };

  set_value(data_set, tag, value, context)
}

/// Replaces each UID in a data element with its replacement from the UID
/// resolver, so that the same original UID always gets the same replacement.
/// Empty values are left empty.
///
pub fn replace_uid(
  data_set: &mut DataSet,
  tag: DataElementTag,
  context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  let Some(vr) = data_set.value_representation(tag) else {
    return Ok(());
  };

  match vr {
    ValueRepresentation::UniqueIdentifier => {
      let uids = data_set
        .get_strings(tag)
        .map_err(|e| e.with_path(&context.element_path(tag)))?;

      let new_uids: Vec<String> = uids
        .into_iter()
        .map(|uid| uid.trim_end_matches('\0'))
        .map(|uid| {
          if uid.is_empty() {
            String::new()
          } else {
            context.resolve_uid(uid)
          }
        })
        .collect();

      let new_uids: Vec<&str> = new_uids.iter().map(|s| s.as_str()).collect();

      set_value(
        data_set,
        tag,
        DataElementValue::new_unique_identifier(&new_uids),
        context,
      )
    }

    ValueRepresentation::Sequence => {
      apply_to_sequence_items(data_set, tag, context, replace_uid)
    }

    _ => Err(unsupported("replace_UID", vr, tag, context)),
  }
}

/// Replaces UIDs using [`replace_uid()`] and empties all other values using
/// [`empty()`].
///
pub fn replace_uid_or_empty(
  data_set: &mut DataSet,
  tag: DataElementTag,
  context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  match data_set.value_representation(tag) {
    None => Ok(()),
    Some(ValueRepresentation::UniqueIdentifier) => {
      replace_uid(data_set, tag, context)
    }
    Some(ValueRepresentation::Sequence) => {
      apply_to_sequence_items(data_set, tag, context, replace_uid_or_empty)
    }
    Some(_) => empty(data_set, tag, context),
  }
}

/// Reports that cleaning isn't implemented if the data element is present.
///
pub fn clean(
  data_set: &mut DataSet,
  tag: DataElementTag,
  context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  if data_set.has(tag) {
    return Err(AnonymizeError::UnimplementedAction {
      action: "clean".to_string(),
      path: context.element_path(tag),
    });
  }

  Ok(())
}

/// Replaces a string value with the given text.
///
pub fn replace_with(
  data_set: &mut DataSet,
  tag: DataElementTag,
  text: &str,
  context: &mut ActionContext,
) -> Result<(), AnonymizeError> {
  let Some(vr) = data_set.value_representation(tag) else {
    return Ok(());
  };

  if vr == ValueRepresentation::Sequence {
    return apply_to_sequence_items(
      data_set,
      tag,
      context,
      |item, item_tag, context| replace_with(item, item_tag, text, context),
    );
  }

  if !vr.is_string() {
    return Err(unsupported("replace", vr, tag, context));
  }

  set_value(data_set, tag, DataElementValue::new_strings(vr, &[text]), context)
}

/// Applies an action to every data element in every item of a sequence.
///
fn apply_to_sequence_items<F>(
  data_set: &mut DataSet,
  tag: DataElementTag,
  context: &mut ActionContext,
  action: F,
) -> Result<(), AnonymizeError>
where
  F: Fn(
    &mut DataSet,
    DataElementTag,
    &mut ActionContext,
  ) -> Result<(), AnonymizeError>,
{
  let path = context.path().clone();

  let items = data_set
    .get_value_mut(tag)
    .and_then(|value| value.sequence_items_mut())
    .map_err(|e| e.with_path(&path.with_data_element(tag)))?;

  for (index, item) in items.iter_mut().enumerate() {
    let parent_path = context.set_path(path.with_sequence_item(tag, index));

    let result = item
      .tags()
      .into_iter()
      .try_for_each(|item_tag| action(item, item_tag, context));

    context.set_path(parent_path);

    result?;
  }

  Ok(())
}

fn set_value(
  data_set: &mut DataSet,
  tag: DataElementTag,
  value: Result<DataElementValue, DataError>,
  context: &ActionContext,
) -> Result<(), AnonymizeError> {
  let value = value.map_err(|e| e.with_path(&context.element_path(tag)))?;

  data_set.insert(tag, value);

  Ok(())
}

fn unsupported(
  action: &str,
  vr: ValueRepresentation,
  tag: DataElementTag,
  context: &ActionContext,
) -> AnonymizeError {
  AnonymizeError::UnsupportedValueRepresentation {
    action: action.to_string(),
    vr,
    path: context.element_path(tag),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use dcmanon_core::DataSetPath;

  use crate::{ActionFn, UidCache};

  const PATIENT_NAME: DataElementTag = DataElementTag::new(0x0010, 0x0010);
  const PATIENT_BIRTH_DATE: DataElementTag = DataElementTag::new(0x0010, 0x0030);
  const STUDY_TIME: DataElementTag = DataElementTag::new(0x0008, 0x0030);
  const ACQUISITION_DATE_TIME: DataElementTag =
    DataElementTag::new(0x0008, 0x002A);
  const SLICE_THICKNESS: DataElementTag = DataElementTag::new(0x0018, 0x0050);
  const ROWS: DataElementTag = DataElementTag::new(0x0028, 0x0010);
  const REFERENCED_IMAGE_SEQUENCE: DataElementTag =
    DataElementTag::new(0x0008, 0x1140);
  const REFERENCED_SOP_INSTANCE_UID: DataElementTag =
    DataElementTag::new(0x0008, 0x1155);
  const RETRIEVE_AE_TITLE: DataElementTag = DataElementTag::new(0x0008, 0x0054);
  const PRIVATE_UNKNOWN: DataElementTag = DataElementTag::new(0x0009, 0x1001);

  fn run(
    action: ActionFn,
    data_set: &mut DataSet,
    tag: DataElementTag,
  ) -> Result<(), AnonymizeError> {
    let mut uid_cache = UidCache::new();
    let mut context = ActionContext::new(&mut uid_cache);

    action(data_set, tag, &mut context)
  }

  fn sample_data_set() -> DataSet {
    let mut data_set = DataSet::new();

    data_set.insert(
      PATIENT_NAME,
      DataElementValue::new_person_name(&["Doe^John"]).unwrap(),
    );
    data_set.insert(
      PATIENT_BIRTH_DATE,
      DataElementValue::new_date("19800102").unwrap(),
    );
    data_set.insert(STUDY_TIME, DataElementValue::new_time("101500").unwrap());
    data_set.insert(
      ACQUISITION_DATE_TIME,
      DataElementValue::new_date_time("20200101101500").unwrap(),
    );
    data_set.insert(
      SLICE_THICKNESS,
      DataElementValue::new_decimal_string(&[2.5]).unwrap(),
    );
    data_set.insert(ROWS, DataElementValue::new_unsigned_short(&[512]).unwrap());
    data_set.insert(
      RETRIEVE_AE_TITLE,
      DataElementValue::new_strings(ValueRepresentation::ApplicationEntity, &[
        "PACS",
      ])
      .unwrap(),
    );
    data_set.insert(
      PRIVATE_UNKNOWN,
      DataElementValue::new_unknown(vec![1, 2, 3, 4]).unwrap(),
    );

    data_set
  }

  fn sequence_data_set() -> DataSet {
    let items = ["1.2.3", "1.2.4"]
      .into_iter()
      .map(|uid| {
        let mut item = DataSet::new();
        item.insert(
          REFERENCED_SOP_INSTANCE_UID,
          DataElementValue::new_unique_identifier(&[uid]).unwrap(),
        );
        item.insert(
          PATIENT_NAME,
          DataElementValue::new_person_name(&["Doe^John"]).unwrap(),
        );
        item
      })
      .collect();

    let mut data_set = DataSet::new();
    data_set
      .insert(REFERENCED_IMAGE_SEQUENCE, DataElementValue::new_sequence(items));

    data_set
  }

  fn sequence_items(data_set: &DataSet) -> &[DataSet] {
    data_set
      .get_value(REFERENCED_IMAGE_SEQUENCE)
      .unwrap()
      .sequence_items()
      .unwrap()
  }

  #[test]
  fn missing_data_element_test() {
    let actions: [ActionFn; 7] = [
      keep,
      delete,
      empty,
      replace,
      replace_uid,
      replace_uid_or_empty,
      clean,
    ];

    for action in actions {
      let mut data_set = DataSet::new();
      assert_eq!(run(action, &mut data_set, PATIENT_NAME), Ok(()));
      assert!(data_set.is_empty());
    }
  }

  #[test]
  fn keep_test() {
    let mut data_set = sample_data_set();
    run(keep, &mut data_set, PATIENT_NAME).unwrap();

    assert_eq!(data_set, sample_data_set());
  }

  #[test]
  fn delete_test() {
    let mut data_set = sample_data_set();

    run(delete, &mut data_set, PATIENT_NAME).unwrap();
    assert!(!data_set.has(PATIENT_NAME));

    run(delete, &mut data_set, STUDY_TIME).unwrap();
    assert!(!data_set.has(STUDY_TIME));

    run(delete, &mut data_set, PATIENT_BIRTH_DATE).unwrap();
    assert_eq!(data_set.get_string(PATIENT_BIRTH_DATE), Ok(NEUTRAL_DATE));
  }

  #[test]
  fn delete_sequence_test() {
    let mut data_set = sequence_data_set();
    run(delete, &mut data_set, REFERENCED_IMAGE_SEQUENCE).unwrap();

    assert!(data_set.is_empty());
  }

  #[test]
  fn empty_test() {
    let mut data_set = sample_data_set();

    for tag in [
      PATIENT_NAME,
      PATIENT_BIRTH_DATE,
      STUDY_TIME,
      ACQUISITION_DATE_TIME,
      SLICE_THICKNESS,
      ROWS,
      PRIVATE_UNKNOWN,
    ] {
      run(empty, &mut data_set, tag).unwrap();
    }

    assert!(data_set.get_value(PATIENT_NAME).unwrap().is_empty());
    assert_eq!(data_set.get_string(PATIENT_BIRTH_DATE), Ok(NEUTRAL_DATE));
    assert_eq!(data_set.get_string(STUDY_TIME), Ok(NEUTRAL_TIME));
    assert_eq!(
      data_set.get_string(ACQUISITION_DATE_TIME),
      Ok(NEUTRAL_DATE_TIME)
    );
    assert_eq!(data_set.get_string(SLICE_THICKNESS), Ok("0"));
    assert_eq!(
      data_set.get_value(ROWS).unwrap().get_int::<u16>(),
      Ok(0)
    );
    assert_eq!(
      data_set.get_value(PRIVATE_UNKNOWN).unwrap().bytes(),
      Ok([].as_slice())
    );
  }

  #[test]
  fn replace_test() {
    let mut data_set = sample_data_set();

    for tag in [PATIENT_NAME, PATIENT_BIRTH_DATE, SLICE_THICKNESS, ROWS] {
      run(replace, &mut data_set, tag).unwrap();
    }
    run(replace, &mut data_set, PRIVATE_UNKNOWN).unwrap();

    assert_eq!(data_set.get_string(PATIENT_NAME), Ok(REPLACEMENT_TEXT));
    assert_eq!(data_set.get_string(PATIENT_BIRTH_DATE), Ok(NEUTRAL_DATE));
    assert_eq!(data_set.get_string(SLICE_THICKNESS), Ok("0"));
    assert_eq!(
      data_set.get_value(ROWS).unwrap().get_int::<u16>(),
      Ok(0)
    );
    assert_eq!(
      data_set.get_value(PRIVATE_UNKNOWN).unwrap().bytes(),
      Ok(b"Anonymized".as_slice())
    );
  }

  #[test]
  fn unsupported_value_representation_test() {
    let mut data_set = sample_data_set();

    assert_eq!(
      run(replace, &mut data_set, RETRIEVE_AE_TITLE),
      Err(AnonymizeError::UnsupportedValueRepresentation {
        action: "replace".to_string(),
        vr: ValueRepresentation::ApplicationEntity,
        path: DataSetPath::new_with_data_element(RETRIEVE_AE_TITLE),
      })
    );

    assert!(run(empty, &mut data_set, RETRIEVE_AE_TITLE).is_err());
    assert!(run(replace_uid, &mut data_set, PATIENT_NAME).is_err());
  }

  #[test]
  fn clean_test() {
    let mut data_set = sample_data_set();

    assert_eq!(
      run(clean, &mut data_set, PATIENT_NAME),
      Err(AnonymizeError::UnimplementedAction {
        action: "clean".to_string(),
        path: DataSetPath::new_with_data_element(PATIENT_NAME),
      })
    );
    assert_eq!(data_set, sample_data_set());
  }

  #[test]
  fn replace_uid_test() {
    let mut data_set = DataSet::new();
    data_set.insert(
      REFERENCED_SOP_INSTANCE_UID,
      DataElementValue::new_unique_identifier(&["1.2.3", "1.2.4", "1.2.3", ""])
        .unwrap(),
    );

    let mut uid_cache = UidCache::new();
    let mut context = ActionContext::new(&mut uid_cache);
    replace_uid(&mut data_set, REFERENCED_SOP_INSTANCE_UID, &mut context)
      .unwrap();

    let uids = data_set.get_strings(REFERENCED_SOP_INSTANCE_UID).unwrap();

    assert_eq!(uids.len(), 4);
    assert!(uids[0].starts_with("2.25."));
    assert_eq!(uids[0], uids[2]);
    assert_ne!(uids[0], uids[1]);
    assert_eq!(uids[3], "");
    assert_eq!(uid_cache.get("1.2.3"), Some(uids[0]));
  }

  #[test]
  fn replace_sequence_test() {
    let mut data_set = sequence_data_set();

    let mut uid_cache = UidCache::new();
    let mut context = ActionContext::new(&mut uid_cache);
    replace(&mut data_set, REFERENCED_IMAGE_SEQUENCE, &mut context).unwrap();

    for item in sequence_items(&data_set) {
      assert_eq!(item.get_string(PATIENT_NAME), Ok(REPLACEMENT_TEXT));
      assert!(
        item
          .get_string(REFERENCED_SOP_INSTANCE_UID)
          .unwrap()
          .starts_with("2.25.")
      );
    }

    assert_eq!(uid_cache.len(), 2);
  }

  #[test]
  fn replace_uid_or_empty_test() {
    let mut data_set = sequence_data_set();
    run(replace_uid_or_empty, &mut data_set, REFERENCED_IMAGE_SEQUENCE)
      .unwrap();

    for item in sequence_items(&data_set) {
      assert!(item.get_value(PATIENT_NAME).unwrap().is_empty());
      assert!(
        item
          .get_string(REFERENCED_SOP_INSTANCE_UID)
          .unwrap()
          .starts_with("2.25.")
      );
    }
  }

  #[test]
  fn replace_with_test() {
    let mut data_set = sequence_data_set();

    let mut uid_cache = UidCache::new();
    let mut context = ActionContext::new(&mut uid_cache);
    replace_with(
      &mut data_set,
      REFERENCED_IMAGE_SEQUENCE,
      "X",
      &mut context,
    )
    .unwrap();

    for item in sequence_items(&data_set) {
      assert_eq!(item.get_string(PATIENT_NAME), Ok("X"));
    }
  }

  #[test]
  fn sequence_error_path_test() {
    let mut item = DataSet::new();
    item.insert(
      RETRIEVE_AE_TITLE,
      DataElementValue::new_strings(ValueRepresentation::ApplicationEntity, &[
        "PACS",
      ])
      .unwrap(),
    );

    let mut data_set = DataSet::new();
    data_set.insert(
      REFERENCED_IMAGE_SEQUENCE,
      DataElementValue::new_sequence(vec![DataSet::new(), item]),
    );

    let error = run(replace, &mut data_set, REFERENCED_IMAGE_SEQUENCE)
      .unwrap_err();

    assert_eq!(
      error,
      AnonymizeError::UnsupportedValueRepresentation {
        action: "replace".to_string(),
        vr: ValueRepresentation::ApplicationEntity,
        path: DataSetPath::new()
          .with_sequence_item(REFERENCED_IMAGE_SEQUENCE, 1)
          .with_data_element(DataElementTag::new(0x0008, 0x0054)),
      }
    );
  }
}
