use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Options applied by a [`DocumentBuilder`](crate::DocumentBuilder) while a tree is constructed.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BuilderOptions {
    /// Whether to trim whitespace from text node values. Defaults to false.
    #[serde(default)]
    pub trim_text: bool,
    /// Whether `build` logs a warning for nodes that were created but never
    /// attached below the document element. Defaults to true.
    #[serde(default = "default_report_detached")]
    pub report_detached: bool,
}

fn default_report_detached() -> bool {
    true
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            trim_text: false,
            report_detached: true,
        }
    }
}

impl BuilderOptions {
    /// Creates `BuilderOptions` from a YAML file.
    ///
    /// # Errors
    ///
    /// *   `Error::Io`: If an I/O error occurs while opening or reading the file.
    /// *   `Error::Yaml`: If there is an error parsing the YAML data.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(Error::Yaml)
    }

    /// Writes the options to a YAML file.
    ///
    /// # Errors
    ///
    /// *   `Error::Io`: If an I/O error occurs while creating or writing to the file.
    /// *   `Error::Yaml`: If there is an error serializing the options to YAML.
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self).map_err(Error::Yaml)
    }

    pub fn trim_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }

    pub fn report_detached(mut self, report_detached: bool) -> Self {
        self.report_detached = report_detached;
        self
    }
}

/// Creates `BuilderOptions` from a YAML string.
///
/// Panics if the YAML is invalid.
#[macro_export]
macro_rules! options_from_yaml {
    ($yaml:expr) => {{
        match $crate::serde_yaml::from_str::<$crate::config::BuilderOptions>($yaml) {
            Ok(options) => options,
            Err(e) => panic!("Invalid YAML builder options: {}", e),
        }
    }};
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_yaml_options_roundtrip(
        #[values(
            BuilderOptions::default(),
            BuilderOptions::default().trim_text(true).report_detached(false)
        )]
        options: BuilderOptions,
    ) {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        options.to_yaml_file(&path).unwrap();

        let read_options = BuilderOptions::from_yaml_file(&path).unwrap();
        assert_eq!(options, read_options);
    }

    #[test]
    fn test_yaml_from_file_invalid_content() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        std::fs::write(&path, "trim_text: [not, a, bool]").unwrap();
        let result = BuilderOptions::from_yaml_file(&path);
        assert!(matches!(result.unwrap_err(), Error::Yaml(_)));
    }

    #[test]
    fn test_yaml_from_file_not_found() {
        let result = BuilderOptions::from_yaml_file(PathBuf::from("not_existing.yaml"));
        assert!(matches!(result.unwrap_err(), Error::Io(_)));
    }

    #[test]
    fn test_yaml_to_file_invalid_path() {
        let result =
            BuilderOptions::default().to_yaml_file(PathBuf::from("/not/existing/path/options.yaml"));
        assert!(matches!(result.unwrap_err(), Error::Io(_)));
    }

    #[rstest]
    #[case("{}", false, true)]
    #[case("trim_text: true", true, true)]
    #[case("report_detached: false", false, false)]
    fn test_yaml_defaults(
        #[case] yaml: &str,
        #[case] trim_text: bool,
        #[case] report_detached: bool,
    ) {
        let options: BuilderOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(options.trim_text, trim_text);
        assert_eq!(options.report_detached, report_detached);
    }

    #[test]
    fn test_options_from_yaml_macro() {
        let options = crate::options_from_yaml!("trim_text: true");
        assert!(options.trim_text);
    }
}
