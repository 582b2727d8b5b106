use super::CodaClient;
use crate::error::{CodaError, Result};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Operations of the [`CodaClient`] capability, used to key canned responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListDocs,
    GetDoc,
    ListSections,
    GetSection,
    ListTables,
    ListViews,
    ListColumns,
    GetColumn,
    ListRows,
    ListControls,
    ListFolders,
    ListFormulas,
    CreateDocument,
    AddSection,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListDocs => "list-docs",
            Operation::GetDoc => "get-doc",
            Operation::ListSections => "list-sections",
            Operation::GetSection => "get-section",
            Operation::ListTables => "list-tables",
            Operation::ListViews => "list-views",
            Operation::ListColumns => "list-columns",
            Operation::GetColumn => "get-column",
            Operation::ListRows => "list-rows",
            Operation::ListControls => "list-controls",
            Operation::ListFolders => "list-folders",
            Operation::ListFormulas => "list-formulas",
            Operation::CreateDocument => "create-document",
            Operation::AddSection => "add-section",
        }
    }
}

/// One recorded call: the operation and its arguments in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub args: Vec<String>,
}

/// In-memory client for testing.
///
/// Responses are keyed by operation and the call's identifying argument (the doc id,
/// or `doc/table` for table-scoped calls). Reads without a canned response return
/// `{}`; creates without one succeed with a generated id.
///
/// Uses `RefCell` for interior mutability since the trait takes `&self`.
#[derive(Default)]
pub struct MemClient {
    responses: RefCell<HashMap<(Operation, String), String>>,
    failures: RefCell<HashMap<Operation, String>>,
    calls: RefCell<Vec<Call>>,
    next_id: Cell<usize>,
}

impl MemClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response for `operation` called with `key`.
    pub fn respond(&self, operation: Operation, key: &str, body: impl Into<String>) -> &Self {
        self.responses
            .borrow_mut()
            .insert((operation, key.to_string()), body.into());
        self
    }

    /// Make every call to `operation` fail with a transport error.
    pub fn fail(&self, operation: Operation, message: &str) -> &Self {
        self.failures
            .borrow_mut()
            .insert(operation, message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Arguments of every call to `operation`, in call order.
    pub fn calls_to(&self, operation: Operation) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.operation == operation)
            .map(|c| c.args.clone())
            .collect()
    }

    fn record(&self, operation: Operation, args: &[&str]) -> Result<()> {
        self.calls.borrow_mut().push(Call {
            operation,
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        match self.failures.borrow().get(&operation) {
            Some(message) => Err(CodaError::transport(
                operation.name(),
                args.join("/"),
                message.clone(),
            )),
            None => Ok(()),
        }
    }

    fn read(&self, operation: Operation, args: &[&str]) -> Result<String> {
        self.record(operation, args)?;
        let key = args.join("/");
        Ok(self
            .responses
            .borrow()
            .get(&(operation, key))
            .cloned()
            .unwrap_or_else(|| "{}".to_string()))
    }

    fn generated_id(&self, prefix: &str) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("{}-{}", prefix, n)
    }
}

impl CodaClient for MemClient {
    fn list_docs(&self) -> Result<String> {
        self.read(Operation::ListDocs, &[])
    }

    fn get_doc(&self, doc_id: &str) -> Result<String> {
        self.read(Operation::GetDoc, &[doc_id])
    }

    fn list_sections(&self, doc_id: &str) -> Result<String> {
        self.read(Operation::ListSections, &[doc_id])
    }

    fn get_section(&self, doc_id: &str, section_id: &str) -> Result<String> {
        self.read(Operation::GetSection, &[doc_id, section_id])
    }

    fn list_tables(&self, doc_id: &str) -> Result<String> {
        self.read(Operation::ListTables, &[doc_id])
    }

    fn list_views(&self, doc_id: &str) -> Result<String> {
        self.read(Operation::ListViews, &[doc_id])
    }

    fn list_columns(&self, doc_id: &str, table_id: &str) -> Result<String> {
        self.read(Operation::ListColumns, &[doc_id, table_id])
    }

    fn get_column(&self, doc_id: &str, table_id: &str, column_id: &str) -> Result<String> {
        self.read(Operation::GetColumn, &[doc_id, table_id, column_id])
    }

    fn list_rows(&self, doc_id: &str, table_id: &str) -> Result<String> {
        self.read(Operation::ListRows, &[doc_id, table_id])
    }

    fn list_controls(&self, doc_id: &str) -> Result<String> {
        self.read(Operation::ListControls, &[doc_id])
    }

    fn list_folders(&self, doc_id: &str) -> Result<String> {
        self.read(Operation::ListFolders, &[doc_id])
    }

    fn list_formulas(&self, doc_id: &str) -> Result<String> {
        self.read(Operation::ListFormulas, &[doc_id])
    }

    fn create_document(&self, name: &str) -> Result<String> {
        self.record(Operation::CreateDocument, &[name])?;
        if let Some(body) = self
            .responses
            .borrow()
            .get(&(Operation::CreateDocument, name.to_string()))
        {
            return Ok(body.clone());
        }
        Ok(json!({ "id": self.generated_id("doc"), "name": name }).to_string())
    }

    fn add_section(
        &self,
        doc_id: &str,
        name: &str,
        section_type: &str,
        content: &str,
    ) -> Result<String> {
        self.record(Operation::AddSection, &[doc_id, name, section_type, content])?;
        if let Some(body) = self
            .responses
            .borrow()
            .get(&(Operation::AddSection, name.to_string()))
        {
            return Ok(body.clone());
        }
        Ok(json!({ "id": self.generated_id("canvas"), "name": name }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_read_returns_empty_object() {
        let client = MemClient::new();
        assert_eq!(client.list_sections("doc-1").unwrap(), "{}");
        assert_eq!(client.calls_to(Operation::ListSections), vec![vec!["doc-1"]]);
    }

    #[test]
    fn test_failure_injection_is_transport_error() {
        let client = MemClient::new();
        client.fail(Operation::ListTables, "connection reset");
        let err = client.list_tables("doc-1").unwrap_err();
        assert!(matches!(err, CodaError::Transport { operation: "list-tables", .. }));
    }

    #[test]
    fn test_create_generates_ids() {
        let client = MemClient::new();
        let first = client.create_document("A").unwrap();
        let second = client.create_document("B").unwrap();
        assert!(first.contains("doc-1"));
        assert!(second.contains("doc-2"));
    }
}
