//! Structure extraction: API records for one document → [`DocumentStructure`].
//!
//! Calls are issued in a fixed order (metadata, sections, tables, then columns for each
//! table in table order), one at a time. Transport failures propagate untouched; a
//! record missing a required field aborts with a data error naming the record.

use crate::client::CodaClient;
use crate::error::{CodaError, Result};
use crate::model::{Column, DocumentMeta, DocumentStructure, Record, Section, Table};
use crate::normalize::normalize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const REQUIRED_META_FIELDS: [&str; 3] = ["id", "name", "ownerName"];

pub fn run<C: CodaClient>(client: &C, doc_id: &str) -> Result<DocumentStructure> {
    let meta = fetch_meta(client, doc_id)?;
    tracing::debug!(doc_id, name = %meta.name, "fetched document metadata");

    let sections: Vec<Section> = decode_all(normalize(&client.list_sections(doc_id)?), "section")?;
    let mut tables: Vec<Table> = decode_all(normalize(&client.list_tables(doc_id)?), "table")?;

    for table in &mut tables {
        let records = normalize(&client.list_columns(doc_id, &table.id)?);
        table.columns = decode_all(records, &format!("column of table '{}'", table.name))?;
    }

    tracing::debug!(
        doc_id,
        sections = sections.len(),
        tables = tables.len(),
        "extracted document structure"
    );

    Ok(DocumentStructure {
        id: meta.id,
        name: meta.name,
        owner_name: meta.owner_name,
        sections,
        tables,
    })
}

fn fetch_meta<C: CodaClient>(client: &C, doc_id: &str) -> Result<DocumentMeta> {
    let context = format!("metadata of document '{}'", doc_id);
    let record = normalize(&client.get_doc(doc_id)?)
        .into_iter()
        .next()
        .ok_or_else(|| CodaError::data(&context, "empty response"))?;

    for field in REQUIRED_META_FIELDS {
        if !record.get(field).is_some_and(Value::is_string) {
            return Err(CodaError::data(
                &context,
                format!("missing required field '{}'", field),
            ));
        }
    }

    decode(record, &context)
}

fn decode_all<T: DeserializeOwned>(records: Vec<Record>, kind: &str) -> Result<Vec<T>> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| decode(record, &format!("{} #{}", kind, i + 1)))
        .collect()
}

fn decode<T: DeserializeOwned>(record: Record, context: &str) -> Result<T> {
    serde_json::from_value(Value::Object(record)).map_err(|e| CodaError::data(context, e.to_string()))
}
