//! # Data Model
//!
//! Two families of types live here:
//!
//! - The **document structure** (`DocumentStructure` and its parts), built by the
//!   extractor from API records. Each record is decoded once into one of these typed
//!   structs; nothing downstream looks at raw JSON maps again.
//! - The **template tree** (`Template` and its parts), which is both what the renderer
//!   serializes and what the importer parses back. The serde attributes on these types
//!   carry the omission rules of the template format: a section without tables has no
//!   `tables` key, a table without columns has no `columns` key, and a column only
//!   carries `format`, `display`, `calculated` and `formula` when they mean something.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One API entity as returned by the normalizer.
pub type Record = serde_json::Map<String, Value>;

/// Required fields of the document metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    pub name: String,
    #[serde(rename = "ownerName")]
    pub owner_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

/// Reference from a table to the section (page) that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableParent {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<TableParent>,
    #[serde(skip)]
    pub columns: Vec<Column>,
}

impl Table {
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// The API reports `"type": "column"` on every column; the value type sits in
    /// `format.type`. Either may be absent depending on the endpoint version.
    #[serde(rename = "type", default)]
    pub column_type: Option<String>,
    #[serde(default)]
    pub format: Option<Value>,
    #[serde(default)]
    pub display: Option<bool>,
    #[serde(default)]
    pub calculated: bool,
    #[serde(default)]
    pub formula: Option<String>,
}

impl Column {
    /// The type written to templates: the record's own `type`, else `format.type`.
    pub fn template_type(&self) -> String {
        self.column_type
            .clone()
            .or_else(|| {
                self.format
                    .as_ref()
                    .and_then(|f| f.get("type"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "text".to_string())
    }
}

/// The normalized export unit. Built fresh per export and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStructure {
    pub id: String,
    pub name: String,
    pub owner_name: String,
    pub sections: Vec<Section>,
    pub tables: Vec<Table>,
}

/// Detected template variables, in emission order.
pub type VariableMap = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub document: TemplateDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    pub name: String,
    #[serde(default)]
    pub sections: Vec<TemplateSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub name: String,
    #[serde(rename = "type", default = "default_section_type")]
    pub section_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TemplateTable>,
}

fn default_section_type() -> String {
    "canvas".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateTable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<TemplateColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

/// What `import_template` reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDocument {
    pub id: String,
    pub name: String,
    pub sections: Vec<CreatedSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSection {
    pub id: String,
    pub name: String,
}
