//! A data element tag, defined as a 16-bit `group` and 16-bit `element` value.

/// A data element tag that identifies a data element in a data set.
///
/// Tags sort by group and then element, which matches the order data elements
/// are stored in on disk.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataElementTag {
  pub group: u16,
  pub element: u16,
}

impl DataElementTag {
  /// The zero tag, `(0000,0000)`.
  ///
  pub const ZERO: DataElementTag = DataElementTag::new(0, 0);

  /// The group that holds the File Meta Information of a DICOM P10 file.
  ///
  pub const FILE_META_INFORMATION_GROUP: u16 = 0x0002;

  /// Constructs a new data element tag from a group and element.
  ///
  pub const fn new(group: u16, element: u16) -> Self {
    Self { group, element }
  }

  /// Returns whether the tag is private, which is the case for all tags that
  /// have an odd group number.
  ///
  pub fn is_private(&self) -> bool {
    self.group % 2 == 1
  }

  /// Returns whether the tag is for a private creator, which is the case when
  /// the group is odd and the element is in the range 0x0010-0x00FF.
  ///
  /// Ref: PS3.5 7.8.1.
  ///
  pub fn is_private_creator(&self) -> bool {
    self.is_private() && (0x0010..=0x00FF).contains(&self.element)
  }

  /// Returns whether the tag is in the File Meta Information group.
  ///
  pub fn is_file_meta_information(&self) -> bool {
    self.group == Self::FILE_META_INFORMATION_GROUP
  }

  /// For a private data element that isn't a private creator, returns the
  /// tag of the private creator that reserves the block it is in, and its
  /// offset inside that block. E.g. `(0009,1005)` is at offset `0x05` in the
  /// block reserved by `(0009,0010)`.
  ///
  pub fn private_block_location(&self) -> Option<(DataElementTag, u8)> {
    if !self.is_private() || self.element < 0x1000 {
      return None;
    }

    let creator = DataElementTag::new(self.group, self.element >> 8);
    let offset = (self.element & 0xFF) as u8;

    Some((creator, offset))
  }

  /// Converts the tag to a 32-bit integer where the group is in the high 16
  /// bits and the element is in the low 16 bits.
  ///
  pub fn to_int(&self) -> u32 {
    ((self.group as u32) << 16) | self.element as u32
  }

  /// Creates a tag from a 32-bit integer where the group is in the high 16
  /// bits and the element is in the low 16 bits.
  ///
  pub fn from_int(value: u32) -> Self {
    Self::new((value >> 16) as u16, (value & 0xFFFF) as u16)
  }

  /// Formats the tag as an eight character hex string, e.g. `"00100010"`.
  ///
  pub fn to_hex_string(&self) -> String {
    format!("{:04X}{:04X}", self.group, self.element)
  }

  /// Parses a tag from a hex string. The following formats are accepted:
  ///
  /// - `"GGGGEEEE"`
  /// - `"GGGG,EEEE"`
  /// - `"(GGGG,EEEE)"`
  ///
  #[allow(clippy::result_unit_err)]
  pub fn from_hex_string(s: &str) -> Result<Self, ()> {
    let s = s.trim();
    let s = s
      .strip_prefix('(')
      .and_then(|s| s.strip_suffix(')'))
      .unwrap_or(s);

    let (group, element) = match s.split_once(',') {
      Some((group, element)) => (group.trim(), element.trim()),
      None if s.len() == 8 && s.is_char_boundary(4) => s.split_at(4),
      None => return Err(()),
    };

    if group.len() != 4 || element.len() != 4 {
      return Err(());
    }

    let group = u16::from_str_radix(group, 16).map_err(|_| ())?;
    let element = u16::from_str_radix(element, 16).map_err(|_| ())?;

    Ok(Self::new(group, element))
  }
}

impl core::fmt::Display for DataElementTag {
  /// Formats the tag as `(GGGG,EEEE)`.
  ///
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    write!(f, "({:04X},{:04X})", self.group, self.element)
  }
}
