use crate::model::{CreatedDocument, Record};

pub mod extract;
pub mod import;
pub mod query;
pub mod registry;
pub mod render;
pub mod table;
pub mod variables;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A registered template as listed by `list-templates`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub name: String,
    pub doc_id: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Normalized API records for query commands.
    pub records: Vec<Record>,
    /// Rendered output (template YAML, CSV) meant for stdout or a file.
    pub output: Option<String>,
    pub created: Option<CreatedDocument>,
    pub templates: Vec<TemplateEntry>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_created(mut self, created: CreatedDocument) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_templates(mut self, templates: Vec<TemplateEntry>) -> Self {
        self.templates = templates;
        self
    }
}
