use crate::client::CodaClient;
use crate::error::{CodaError, Result};
use crate::model::Record;
use crate::normalize::normalize;
use serde_json::Value;

/// Export one table as CSV: a header of column names, then one line per row.
///
/// Returns an empty string when the table reports no columns.
pub fn run<C: CodaClient>(client: &C, doc_id: &str, table_id: &str) -> Result<String> {
    let columns = normalize(&client.list_columns(doc_id, table_id)?);
    if columns.is_empty() {
        return Ok(String::new());
    }
    let rows = normalize(&client.list_rows(doc_id, table_id)?);
    tracing::debug!(
        doc_id,
        table_id,
        columns = columns.len(),
        rows = rows.len(),
        "exporting table"
    );
    write_csv(&columns, &rows)
}

fn write_csv(columns: &[Record], rows: &[Record]) -> Result<String> {
    let keys: Vec<(String, Option<String>)> = columns
        .iter()
        .map(|c| {
            (
                string_field(c, "name").unwrap_or_default(),
                string_field(c, "id"),
            )
        })
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(keys.iter().map(|(name, _)| name.as_str()))?;

    for row in rows {
        let values = row.get("values").and_then(Value::as_object);
        let cells: Vec<String> = keys
            .iter()
            .map(|(name, id)| {
                values
                    .and_then(|v| id.as_ref().and_then(|id| v.get(id)).or_else(|| v.get(name)))
                    .map(cell_text)
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&cells)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CodaError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CodaError::data("CSV output", e.to_string()))
}

fn string_field(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::{MemClient, Operation};
    use serde_json::json;

    fn client_with(columns: Value, rows: Value) -> MemClient {
        let client = MemClient::new();
        client
            .respond(Operation::ListColumns, "doc/table", columns.to_string())
            .respond(Operation::ListRows, "doc/table", rows.to_string());
        client
    }

    fn parse(csv_text: &str) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(csv_text.as_bytes())
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_values_are_looked_up_by_column_id() {
        let client = client_with(
            json!([{"id": "c-1", "name": "Task"}, {"id": "c-2", "name": "Done"}]),
            json!([{"values": {"c-1": "Setup", "c-2": true}}]),
        );
        let out = run(&client, "doc", "table").unwrap();
        assert_eq!(parse(&out), vec![vec!["Task", "Done"], vec!["Setup", "true"]]);
    }

    #[test]
    fn test_values_fall_back_to_column_name() {
        let client = client_with(
            json!([{"name": "项目"}, {"name": "Müller"}]),
            json!([{"values": {"项目": "测试项目", "Müller": "José García"}}]),
        );
        let out = run(&client, "doc", "table").unwrap();
        assert!(out.contains("项目,Müller"));
        assert!(out.contains("测试项目,José García"));
    }

    #[test]
    fn test_special_characters_are_quoted() {
        let client = client_with(
            json!([{"name": "Description"}, {"name": "Notes"}, {"name": "Empty"}]),
            json!([
                {"values": {"Description": "Task with, comma", "Notes": "Text with \"quotes\"", "Empty": ""}},
                {"values": {"Description": "Text with\nnewline", "Notes": "Normal text", "Empty": null}}
            ]),
        );
        let rows = parse(&run(&client, "doc", "table").unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["Task with, comma", "Text with \"quotes\"", ""]);
        assert_eq!(rows[2], vec!["Text with\nnewline", "Normal text", ""]);
    }

    #[test]
    fn test_no_columns_means_empty_output() {
        let client = MemClient::new();
        assert_eq!(run(&client, "doc", "table").unwrap(), "");
        // Rows are never requested without columns
        assert!(client.calls_to(Operation::ListRows).is_empty());
    }

    #[test]
    fn test_columns_without_rows_give_header_only() {
        let client = client_with(json!([{"name": "A"}, {"name": "B"}]), json!({}));
        assert_eq!(run(&client, "doc", "table").unwrap(), "A,B\n");
    }

    #[test]
    fn test_row_without_values_is_blank() {
        let client = client_with(json!([{"name": "A"}]), json!([{"id": "r-1"}]));
        assert_eq!(parse(&run(&client, "doc", "table").unwrap())[1], vec![""]);
    }
}
