/// Config options used when converting a DICOM record to DICOM JSON.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DicomJsonConfig {
  /// Whether to format the DICOM JSON for readability with newlines and
  /// indentation. This increases the size of the output but is easier to
  /// directly inspect.
  ///
  pub pretty_print: bool,
}

impl DicomJsonConfig {
  /// Sets whether the DICOM JSON is pretty printed.
  ///
  pub fn pretty_print(mut self, pretty_print: bool) -> Self {
    self.pretty_print = pretty_print;
    self
  }
}
