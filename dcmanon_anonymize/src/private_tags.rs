//! Capture and restoration of private data elements across the bulk deletion
//! of private data.

use dcmanon_core::{DataElementTag, DataElementValue, DataSet, DataSetPath};

use crate::AnonymizeError;

/// A restorable description of a private data element: the private block it
/// belongs to, identified by its group and private creator, and for data
/// elements other than the private creator itself, the offset inside the
/// block and the value.
///
#[derive(Clone, Debug, PartialEq)]
pub struct PrivateTagSnapshot {
  pub group: u16,
  pub creator: String,
  pub element: Option<(u8, DataElementValue)>,
}

impl PrivateTagSnapshot {
  /// Captures a snapshot of a private data element. Returns `None` if the tag
  /// isn't private or isn't present in the data set.
  ///
  pub fn capture(
    data_set: &DataSet,
    tag: DataElementTag,
  ) -> Result<Option<Self>, AnonymizeError> {
    if !tag.is_private() {
      return Ok(None);
    }

    let Ok(value) = data_set.get_value(tag) else {
      return Ok(None);
    };

    let malformed = |details: String| AnonymizeError::MalformedPrivateTag {
      details,
      path: DataSetPath::new_with_data_element(tag),
    };

    if tag.is_private_creator() {
      let creator = value
        .get_string()
        .map_err(|_| malformed("Private creator is not a string".to_string()))?;

      return Ok(Some(Self {
        group: tag.group,
        creator: creator.trim().to_string(),
        element: None,
      }));
    }

    let (creator_tag, offset) = tag
      .private_block_location()
      .ok_or_else(|| malformed("Tag is not in a private block".to_string()))?;

    let creator = data_set.get_string(creator_tag).map_err(|_| {
      malformed(format!("Private creator {} is not present", creator_tag))
    })?;

    Ok(Some(Self {
      group: tag.group,
      creator: creator.trim().to_string(),
      element: Some((offset, value.clone())),
    }))
  }

  /// Restores the private block, and the data element if there is one, into
  /// a data set. The private block is reserved if it isn't already present,
  /// so the restored data element may be stored under a different block
  /// number than it was captured from.
  ///
  pub fn restore(&self, data_set: &mut DataSet) -> Result<(), AnonymizeError> {
    let block = data_set
      .private_block_or_insert(self.group, &self.creator)
      .map_err(|e| AnonymizeError::MalformedPrivateTag {
        details: e.to_string(),
        path: DataSetPath::new(),
      })?;

    if let Some((offset, value)) = &self.element {
      data_set.insert_private_element(self.group, block, *offset, value.clone());
    }

    Ok(())
  }
}
