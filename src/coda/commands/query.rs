use crate::client::CodaClient;
use crate::error::Result;
use crate::model::Record;
use crate::normalize::{normalize, normalize_with_shape};

/// A document-scoped resource that can be listed or fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Doc,
    Sections,
    Section(String),
    Tables,
    Views,
    Columns { table: String },
    Column { table: String, column: String },
    Rows { table: String },
    Controls,
    Folders,
    Formulas,
}

impl Resource {
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Doc => "doc",
            Resource::Sections => "sections",
            Resource::Section(_) => "section",
            Resource::Tables => "tables",
            Resource::Views => "views",
            Resource::Columns { .. } => "columns",
            Resource::Column { .. } => "column",
            Resource::Rows { .. } => "rows",
            Resource::Controls => "controls",
            Resource::Folders => "folders",
            Resource::Formulas => "formulas",
        }
    }
}

pub fn list_docs<C: CodaClient>(client: &C) -> Result<Vec<Record>> {
    Ok(normalize(&client.list_docs()?))
}

pub fn run<C: CodaClient>(client: &C, doc_id: &str, resource: &Resource) -> Result<Vec<Record>> {
    let text = match resource {
        Resource::Doc => client.get_doc(doc_id)?,
        Resource::Sections => client.list_sections(doc_id)?,
        Resource::Section(section) => client.get_section(doc_id, section)?,
        Resource::Tables => client.list_tables(doc_id)?,
        Resource::Views => client.list_views(doc_id)?,
        Resource::Columns { table } => client.list_columns(doc_id, table)?,
        Resource::Column { table, column } => client.get_column(doc_id, table, column)?,
        Resource::Rows { table } => client.list_rows(doc_id, table)?,
        Resource::Controls => client.list_controls(doc_id)?,
        Resource::Folders => client.list_folders(doc_id)?,
        Resource::Formulas => client.list_formulas(doc_id)?,
    };
    let (shape, records) = normalize_with_shape(&text);
    tracing::debug!(
        doc_id,
        resource = resource.name(),
        ?shape,
        count = records.len(),
        "query"
    );
    Ok(records)
}
