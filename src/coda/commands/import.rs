//! Template import: text → substituted text → template tree → new document.
//!
//! Substitution runs on the raw text before any parsing, so a template stays valid YAML
//! with literal `{{NAME}}` tokens until values are supplied. Placeholders without a
//! value are left as they are.
//!
//! Creation is not atomic. Sections are added one at a time after the document exists;
//! if one fails, the document and the sections created before it remain.

use crate::client::CodaClient;
use crate::error::{
    CodaError, CreationError, CreationTarget, ImportStage, Result, TemplateFormatError,
};
use crate::model::{CreatedDocument, CreatedSection, Template, TemplateSection};
use crate::normalize::normalize;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"));

/// Replace `{{NAME}}` with `variables[NAME]` wherever a value is supplied.
pub fn substitute(text: &str, variables: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

pub fn parse(text: &str) -> std::result::Result<Template, TemplateFormatError> {
    if text.trim().is_empty() {
        return Err(TemplateFormatError::MissingDocument);
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| TemplateFormatError::InvalidYaml(e.to_string()))?;

    if value.get("document").is_none() {
        return Err(TemplateFormatError::MissingDocument);
    }

    serde_yaml::from_value(value).map_err(|e| TemplateFormatError::InvalidStructure(e.to_string()))
}

pub fn create<C: CodaClient>(template: &Template, client: &C) -> Result<CreatedDocument> {
    let doc = &template.document;
    let reply = client.create_document(&doc.name)?;
    let (id, name) = created_ids(&reply, CreationTarget::Document, &doc.name)?;
    tracing::debug!(id = %id, name = %name, "created document");

    let mut sections = Vec::with_capacity(doc.sections.len());
    for section in &doc.sections {
        let reply = client.add_section(
            &id,
            &section.name,
            &section.section_type,
            &section_content(section),
        )?;
        let target = CreationTarget::Section(section.name.clone());
        let (section_id, section_name) = created_ids(&reply, target, &section.name)?;
        tracing::debug!(id = %section_id, name = %section_name, "added section");
        sections.push(CreatedSection {
            id: section_id,
            name: section_name,
        });
    }

    Ok(CreatedDocument { id, name, sections })
}

/// substitute → parse → create, reporting the failing stage.
pub fn run<C: CodaClient>(
    text: &str,
    variables: &HashMap<String, String>,
    client: &C,
) -> Result<CreatedDocument> {
    let substituted = substitute(text, variables);
    let template = parse(&substituted)
        .map_err(|e| CodaError::import(ImportStage::Parse, e.into()))?;
    create(&template, client).map_err(|e| CodaError::import(ImportStage::Create, e))
}

/// Read `{id, name}` out of a create reply, turning `{error}` into a creation error.
fn created_ids(reply: &str, target: CreationTarget, fallback_name: &str) -> Result<(String, String)> {
    let record = normalize(reply).into_iter().next().unwrap_or_default();

    if let Some(error) = record.get("error") {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(CreationError { target, message }.into());
    }

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| CreationError {
            target,
            message: "response carried no id".to_string(),
        })?
        .to_string();
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(fallback_name)
        .to_string();

    Ok((id, name))
}

/// Markdown body for a new section: one heading and header row per table.
fn section_content(section: &TemplateSection) -> String {
    let mut out = String::new();
    for table in &section.tables {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("## {}\n", table.name));
        if table.columns.is_empty() {
            continue;
        }
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        out.push_str(&format!("\n| {} |\n", names.join(" | ")));
        out.push_str(&format!("|{}\n", " --- |".repeat(names.len())));
    }
    out
}
