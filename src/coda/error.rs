use std::fmt;
use thiserror::Error;

/// Why a template could not be turned into a document tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateFormatError {
    #[error("Invalid YAML: {0}")]
    InvalidYaml(String),

    #[error("Invalid template: missing 'document' key")]
    MissingDocument,

    #[error("Invalid template structure: {0}")]
    InvalidStructure(String),
}

/// What the API was asked to create when it refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationTarget {
    Document,
    Section(String),
}

/// The API answered a create call with `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationError {
    pub target: CreationTarget,
    pub message: String,
}

impl fmt::Display for CreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            CreationTarget::Document => write!(f, "Document creation failed: {}", self.message),
            CreationTarget::Section(name) => {
                write!(f, "Section '{}' creation failed: {}", name, self.message)
            }
        }
    }
}

impl std::error::Error for CreationError {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Template '{0}' not found in registry")]
    NotFound(String),

    #[error("Invalid template registration: {0}")]
    Invalid(String),

    #[error("Registry store error: {0}")]
    Store(String),
}

/// Stages of `import_template`, named in the wrapped error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Parse,
    Create,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStage::Parse => write!(f, "template parsing"),
            ImportStage::Create => write!(f, "document creation"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CodaError {
    #[error("API request '{operation}' failed for {target}: {message}")]
    Transport {
        operation: &'static str,
        target: String,
        message: String,
    },

    #[error("Bad data in {context}: {message}")]
    Data { context: String, message: String },

    #[error(transparent)]
    TemplateFormat(#[from] TemplateFormatError),

    #[error(transparent)]
    Creation(#[from] CreationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Import failed during {stage}: {source}")]
    Import {
        stage: ImportStage,
        #[source]
        source: Box<CodaError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad command-line input, reported verbatim.
    #[error("{0}")]
    Usage(String),
}

impl CodaError {
    pub fn transport(
        operation: &'static str,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CodaError::Transport {
            operation,
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn data(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodaError::Data {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn import(stage: ImportStage, source: CodaError) -> Self {
        CodaError::Import {
            stage,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodaError>;
