use crate::client::memory::{MemClient, Operation};
use serde_json::json;

pub const SAMPLE_DOC_ID: &str = "test-doc-123";

/// A client serving the two-section "ProjectAlpha" document.
///
/// Section One owns "Rich Table" (a text column and a calculated currency column),
/// Section Two owns "Simple Table".
pub fn sample_client() -> MemClient {
    let client = MemClient::new();
    client
        .respond(
            Operation::GetDoc,
            SAMPLE_DOC_ID,
            json!({
                "id": SAMPLE_DOC_ID,
                "name": "ProjectAlpha",
                "owner": "test@example.com",
                "ownerName": "Test User"
            })
            .to_string(),
        )
        .respond(
            Operation::ListSections,
            SAMPLE_DOC_ID,
            json!([
                {"id": "canvas-section1", "name": "Section One", "contentType": "canvas", "type": "page"},
                {"id": "canvas-section2", "name": "Section Two", "contentType": "canvas", "type": "page"}
            ])
            .to_string(),
        )
        .respond(
            Operation::ListTables,
            SAMPLE_DOC_ID,
            json!([
                {"id": "grid-table1", "type": "table", "name": "Rich Table",
                 "parent": {"id": "canvas-section1", "name": "Section One"}},
                {"id": "grid-table2", "type": "table", "name": "Simple Table",
                 "parent": {"id": "canvas-section2", "name": "Section Two"}}
            ])
            .to_string(),
        )
        .respond(
            Operation::ListColumns,
            "test-doc-123/grid-table1",
            json!([
                {"id": "col-text", "type": "column", "name": "Text Field",
                 "format": {"type": "text"}, "display": true},
                {"id": "col-calc", "type": "column", "name": "Total Cost", "calculated": true,
                 "formula": "Quantity * Price",
                 "format": {"type": "currency", "currencyCode": "USD"}, "display": true}
            ])
            .to_string(),
        )
        .respond(
            Operation::ListColumns,
            "test-doc-123/grid-table2",
            json!([
                {"id": "col-simple", "type": "column", "name": "Name",
                 "format": {"type": "text"}, "display": true}
            ])
            .to_string(),
        );
    client
}
