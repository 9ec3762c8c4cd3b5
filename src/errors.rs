//! # Error Types Module
//!
//! Error types for the few fallible operations around the engine: loading
//! timeline templates, reading configuration and parsing pan shapes.
//! Parsing, conversion, scaling and aggregation never fail; they report
//! unresolvable values as `None`.

/// Errors raised while loading timeline templates
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// Template file could not be read
    Io(String),
    /// Template document is not valid JSON or has the wrong shape
    Parse(String),
    /// Two templates in one document share an id
    DuplicateId(String),
    /// A template was declared with an empty id
    MissingId,
    /// A step starts or ends too far from the bake
    InvalidOffset {
        template: String,
        step: String,
        offset_minutes: i64,
    },
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::Io(msg) => write!(f, "Template file error: {msg}"),
            TemplateError::Parse(msg) => write!(f, "Template parse error: {msg}"),
            TemplateError::DuplicateId(id) => write!(f, "Duplicate template id: {id}"),
            TemplateError::MissingId => write!(f, "Template id must not be empty"),
            TemplateError::InvalidOffset {
                template,
                step,
                offset_minutes,
            } => write!(
                f,
                "Step {step:?} of template {template} is out of range ({offset_minutes} minutes from bake)"
            ),
        }
    }
}

impl std::error::Error for TemplateError {}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        TemplateError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Parse(err.to_string())
    }
}

/// Errors raised while reading engine configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A configuration key carried a value that could not be interpreted
    InvalidValue { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {key}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Returned when a pan shape name is not one of the supported shapes
#[derive(Debug, Clone, PartialEq)]
pub struct ParsePanShapeError(pub String);

impl std::fmt::Display for ParsePanShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown pan shape: {}", self.0)
    }
}

impl std::error::Error for ParsePanShapeError {}
