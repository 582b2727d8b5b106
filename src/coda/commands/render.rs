//! Template rendering: [`DocumentStructure`] + variables → YAML template text.
//!
//! The API lists tables flat, each pointing at its section through `parent`. Rendering
//! nests every table under the first section carrying that parent name. Tables whose
//! parent matches no section are dropped; they never surface at the document level.

use crate::error::Result;
use crate::model::{
    Column, DocumentStructure, Table, Template, TemplateColumn, TemplateDocument,
    TemplateSection, TemplateTable, VariableMap,
};
use std::collections::HashMap;

pub fn run(structure: &DocumentStructure, variables: &VariableMap) -> Result<String> {
    let template = build(structure, variables);
    Ok(serde_yaml::to_string(&template)?)
}

/// Build the template tree without serializing it.
pub fn build(structure: &DocumentStructure, variables: &VariableMap) -> Template {
    let mut groups = group_tables(&structure.tables);

    let sections = structure
        .sections
        .iter()
        .map(|section| {
            let tables = groups
                .remove(section.name.as_str())
                .unwrap_or_default()
                .into_iter()
                .map(template_table)
                .collect();
            TemplateSection {
                name: section.name.clone(),
                section_type: section.content_type.clone(),
                tables,
            }
        })
        .collect();

    for (parent, orphans) in &groups {
        tracing::debug!(
            parent = %parent,
            count = orphans.len(),
            "dropping tables whose parent section does not exist"
        );
    }

    Template {
        document: TemplateDocument {
            name: placeholder_name(&structure.name, variables),
            sections,
        },
    }
}

/// Replace each detected literal in `name` with its `{{VAR}}` placeholder, in order.
pub fn placeholder_name(name: &str, variables: &VariableMap) -> String {
    variables
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .fold(name.to_string(), |acc, (var, value)| {
            acc.replace(value.as_str(), &format!("{{{{{}}}}}", var))
        })
}

fn group_tables(tables: &[Table]) -> HashMap<&str, Vec<&Table>> {
    let mut groups: HashMap<&str, Vec<&Table>> = HashMap::new();
    for table in tables {
        match table.parent_name() {
            Some(parent) => groups.entry(parent).or_default().push(table),
            None => tracing::debug!(table = %table.name, "table has no parent section"),
        }
    }
    groups
}

fn template_table(table: &Table) -> TemplateTable {
    TemplateTable {
        name: table.name.clone(),
        columns: table.columns.iter().map(template_column).collect(),
    }
}

fn template_column(column: &Column) -> TemplateColumn {
    TemplateColumn {
        name: column.name.clone(),
        column_type: column.template_type(),
        format: column.format.clone(),
        display: column.display,
        calculated: column.calculated.then_some(true),
        formula: if column.calculated {
            column.formula.clone()
        } else {
            None
        },
    }
}
