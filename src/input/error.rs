//! Configuration errors

use std::fmt;
use std::error::Error;

/// Which stage of reading the configuration failed
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum InputErrorKind {
    /// The file could not be opened or is not YAML
    File,
    /// A section or key is missing
    Location,
    /// A value is present but has the wrong form
    Conversion,
}

/// Error returned when the configuration cannot be loaded or read.
pub struct InputError {
    kind: InputErrorKind,
    path: String,
    cause: String,
    expected: Option<String>,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let usage = "Usage: pandel [--verbose] input-file";
        match self.kind {
            InputErrorKind::File => {
                write!(f, "Unable to open or parse the configuration file.\n{}", usage)
            },
            InputErrorKind::Location => {
                write!(f, "No \"{}\" in the configuration (looking for \"{}\").\n{}", self.cause, self.path, usage)
            },
            InputErrorKind::Conversion => {
                let expected = self.expected.as_deref().unwrap_or("the required type");
                write!(f, "Value of \"{}\" (at \"{}\") is not {}.\n{}", self.cause, self.path, expected, usage)
            },
        }
    }
}

impl fmt::Debug for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for InputError {}

impl InputError {
    fn new(kind: InputErrorKind, path: &str, cause: &str) -> Self {
        Self {
            kind,
            path: path.to_owned(),
            cause: cause.to_owned(),
            expected: None,
        }
    }

    pub fn file() -> Self {
        Self::new(InputErrorKind::File, "", "")
    }

    pub fn location(path: &str, cause: &str) -> Self {
        Self::new(InputErrorKind::Location, path, cause)
    }

    pub fn conversion(path: &str, cause: &str) -> Self {
        Self::new(InputErrorKind::Conversion, path, cause)
    }

    /// Describes the form the value should have taken,
    /// e.g. "a list of [time, charge] pairs".
    pub fn expecting(self, expected: &str) -> Self {
        Self {expected: Some(expected.to_owned()), ..self}
    }

    pub fn kind(&self) -> InputErrorKind {
        self.kind
    }

    /// The colon-separated path that was being read, empty for file errors.
    pub fn path(&self) -> &str {
        &self.path
    }
}
