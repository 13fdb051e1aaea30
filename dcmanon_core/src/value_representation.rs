//! The DICOM value representations (VRs).
//!
//! Ref: PS3.5 6.2.

/// All DICOM value representations (VRs).
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueRepresentation {
  AgeString,
  ApplicationEntity,
  AttributeTag,
  CodeString,
  Date,
  DateTime,
  DecimalString,
  FloatingPointDouble,
  FloatingPointSingle,
  IntegerString,
  LongString,
  LongText,
  OtherByteString,
  OtherDoubleString,
  OtherFloatString,
  OtherLongString,
  OtherVeryLongString,
  OtherWordString,
  PersonName,
  Sequence,
  ShortString,
  ShortText,
  SignedLong,
  SignedShort,
  SignedVeryLong,
  Time,
  UniqueIdentifier,
  UniversalResourceIdentifier,
  Unknown,
  UnlimitedCharacters,
  UnlimitedText,
  UnsignedLong,
  UnsignedShort,
  UnsignedVeryLong,
}

impl ValueRepresentation {
  /// Every value representation, in alphabetical order of its two-character
  /// code.
  ///
  pub const ALL: [ValueRepresentation; 34] = [
    Self::ApplicationEntity,
    Self::AgeString,
    Self::AttributeTag,
    Self::CodeString,
    Self::Date,
    Self::DecimalString,
    Self::DateTime,
    Self::FloatingPointDouble,
    Self::FloatingPointSingle,
    Self::IntegerString,
    Self::LongString,
    Self::LongText,
    Self::OtherByteString,
    Self::OtherDoubleString,
    Self::OtherFloatString,
    Self::OtherLongString,
    Self::OtherVeryLongString,
    Self::OtherWordString,
    Self::PersonName,
    Self::ShortString,
    Self::SignedLong,
    Self::Sequence,
    Self::SignedShort,
    Self::ShortText,
    Self::SignedVeryLong,
    Self::Time,
    Self::UnlimitedCharacters,
    Self::UniqueIdentifier,
    Self::UnsignedLong,
    Self::Unknown,
    Self::UniversalResourceIdentifier,
    Self::UnsignedShort,
    Self::UnlimitedText,
    Self::UnsignedVeryLong,
  ];

  /// Converts a two-character code, e.g. `b"PN"`, into a value
  /// representation.
  ///
  #[allow(clippy::result_unit_err)]
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, ()> {
    match bytes {
      b"AE" => Ok(Self::ApplicationEntity),
      b"AS" => Ok(Self::AgeString),
      b"AT" => Ok(Self::AttributeTag),
      b"CS" => Ok(Self::CodeString),
      b"DA" => Ok(Self::Date),
      b"DS" => Ok(Self::DecimalString),
      b"DT" => Ok(Self::DateTime),
      b"FD" => Ok(Self::FloatingPointDouble),
      b"FL" => Ok(Self::FloatingPointSingle),
      b"IS" => Ok(Self::IntegerString),
      b"LO" => Ok(Self::LongString),
      b"LT" => Ok(Self::LongText),
      b"OB" => Ok(Self::OtherByteString),
      b"OD" => Ok(Self::OtherDoubleString),
      b"OF" => Ok(Self::OtherFloatString),
      b"OL" => Ok(Self::OtherLongString),
      b"OV" => Ok(Self::OtherVeryLongString),
      b"OW" => Ok(Self::OtherWordString),
      b"PN" => Ok(Self::PersonName),
      b"SH" => Ok(Self::ShortString),
      b"SL" => Ok(Self::SignedLong),
      b"SQ" => Ok(Self::Sequence),
      b"SS" => Ok(Self::SignedShort),
      b"ST" => Ok(Self::ShortText),
      b"SV" => Ok(Self::SignedVeryLong),
      b"TM" => Ok(Self::Time),
      b"UC" => Ok(Self::UnlimitedCharacters),
      b"UI" => Ok(Self::UniqueIdentifier),
      b"UL" => Ok(Self::UnsignedLong),
      b"UN" => Ok(Self::Unknown),
      b"UR" => Ok(Self::UniversalResourceIdentifier),
      b"US" => Ok(Self::UnsignedShort),
      b"UT" => Ok(Self::UnlimitedText),
      b"UV" => Ok(Self::UnsignedVeryLong),
      _ => Err(()),
    }
  }

  /// Returns the two-character code for a value representation, e.g. `"PN"`.
  ///
  pub fn to_str(&self) -> &'static str {
    match self {
      Self::AgeString => "AS",
      Self::ApplicationEntity => "AE",
      Self::AttributeTag => "AT",
      Self::CodeString => "CS",
      Self::Date => "DA",
      Self::DateTime => "DT",
      Self::DecimalString => "DS",
      Self::FloatingPointDouble => "FD",
      Self::FloatingPointSingle => "FL",
      Self::IntegerString => "IS",
      Self::LongString => "LO",
      Self::LongText => "LT",
      Self::OtherByteString => "OB",
      Self::OtherDoubleString => "OD",
      Self::OtherFloatString => "OF",
      Self::OtherLongString => "OL",
      Self::OtherVeryLongString => "OV",
      Self::OtherWordString => "OW",
      Self::PersonName => "PN",
      Self::Sequence => "SQ",
      Self::ShortString => "SH",
      Self::ShortText => "ST",
      Self::SignedLong => "SL",
      Self::SignedShort => "SS",
      Self::SignedVeryLong => "SV",
      Self::Time => "TM",
      Self::UniqueIdentifier => "UI",
      Self::UniversalResourceIdentifier => "UR",
      Self::Unknown => "UN",
      Self::UnlimitedCharacters => "UC",
      Self::UnlimitedText => "UT",
      Self::UnsignedLong => "UL",
      Self::UnsignedShort => "US",
      Self::UnsignedVeryLong => "UV",
    }
  }

  /// Returns the human-readable name of a value representation, e.g.
  /// `"PersonName"`.
  ///
  pub fn name(&self) -> &'static str {
    match self {
      Self::AgeString => "AgeString",
      Self::ApplicationEntity => "ApplicationEntity",
      Self::AttributeTag => "AttributeTag",
      Self::CodeString => "CodeString",
      Self::Date => "Date",
      Self::DateTime => "DateTime",
      Self::DecimalString => "DecimalString",
      Self::FloatingPointDouble => "FloatingPointDouble",
      Self::FloatingPointSingle => "FloatingPointSingle",
      Self::IntegerString => "IntegerString",
      Self::LongString => "LongString",
      Self::LongText => "LongText",
      Self::OtherByteString => "OtherByteString",
      Self::OtherDoubleString => "OtherDoubleString",
      Self::OtherFloatString => "OtherFloatString",
      Self::OtherLongString => "OtherLongString",
      Self::OtherVeryLongString => "OtherVeryLongString",
      Self::OtherWordString => "OtherWordString",
      Self::PersonName => "PersonName",
      Self::Sequence => "Sequence",
      Self::ShortString => "ShortString",
      Self::ShortText => "ShortText",
      Self::SignedLong => "SignedLong",
      Self::SignedShort => "SignedShort",
      Self::SignedVeryLong => "SignedVeryLong",
      Self::Time => "Time",
      Self::UniqueIdentifier => "UniqueIdentifier",
      Self::UniversalResourceIdentifier => "UniversalResourceIdentifier",
      Self::Unknown => "Unknown",
      Self::UnlimitedCharacters => "UnlimitedCharacters",
      Self::UnlimitedText => "UnlimitedText",
      Self::UnsignedLong => "UnsignedLong",
      Self::UnsignedShort => "UnsignedShort",
      Self::UnsignedVeryLong => "UnsignedVeryLong",
    }
  }

  /// Returns whether a value representation stores string data.
  ///
  pub fn is_string(&self) -> bool {
    matches!(
      self,
      Self::AgeString
        | Self::ApplicationEntity
        | Self::CodeString
        | Self::Date
        | Self::DateTime
        | Self::DecimalString
        | Self::IntegerString
        | Self::LongString
        | Self::LongText
        | Self::PersonName
        | Self::ShortString
        | Self::ShortText
        | Self::Time
        | Self::UniqueIdentifier
        | Self::UniversalResourceIdentifier
        | Self::UnlimitedCharacters
        | Self::UnlimitedText
    )
  }

  /// Returns whether a value representation stores a single string that may
  /// contain backslashes, i.e. it doesn't allow multiplicity.
  ///
  pub fn is_single_string(&self) -> bool {
    matches!(
      self,
      Self::LongText
        | Self::ShortText
        | Self::UniversalResourceIdentifier
        | Self::UnlimitedText
    )
  }

  /// Returns whether a value representation stores binary integer data.
  ///
  pub fn is_integer(&self) -> bool {
    matches!(
      self,
      Self::SignedLong
        | Self::SignedShort
        | Self::SignedVeryLong
        | Self::UnsignedLong
        | Self::UnsignedShort
        | Self::UnsignedVeryLong
    )
  }

  /// Returns whether a value representation stores binary floating point
  /// data.
  ///
  pub fn is_float(&self) -> bool {
    matches!(self, Self::FloatingPointDouble | Self::FloatingPointSingle)
  }

  /// Returns whether a value representation stores opaque bytes.
  ///
  pub fn is_binary(&self) -> bool {
    matches!(
      self,
      Self::OtherByteString
        | Self::OtherDoubleString
        | Self::OtherFloatString
        | Self::OtherLongString
        | Self::OtherVeryLongString
        | Self::OtherWordString
        | Self::Unknown
    )
  }

  /// Returns the range of integer values that a binary integer value
  /// representation can hold, or `None` if this isn't an integer VR.
  ///
  pub fn integer_range(&self) -> Option<(i128, i128)> {
    match self {
      Self::SignedShort => Some((i16::MIN.into(), i16::MAX.into())),
      Self::UnsignedShort => Some((0, u16::MAX.into())),
      Self::SignedLong => Some((i32::MIN.into(), i32::MAX.into())),
      Self::UnsignedLong => Some((0, u32::MAX.into())),
      Self::SignedVeryLong => Some((i64::MIN.into(), i64::MAX.into())),
      Self::UnsignedVeryLong => Some((0, u64::MAX.into())),
      _ => None,
    }
  }
}

impl core::fmt::Display for ValueRepresentation {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    f.write_str(self.to_str())
  }
}
