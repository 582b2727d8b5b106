//! # API Client Layer
//!
//! This module defines the capability the rest of the crate uses to talk to the Coda
//! API. The [`CodaClient`] trait is deliberately narrow: every call returns the raw JSON
//! text of the response and leaves its interpretation to the caller (see
//! [`crate::normalize`]).
//!
//! ## Implementations
//!
//! - [`http::HttpClient`]: Production client over the REST API
//!   - Blocking `reqwest` with bearer-token auth
//!   - Follows `nextPageToken` pagination on list endpoints
//!   - One timeout applied to every request
//!
//! - [`memory::MemClient`]: Canned responses for testing
//!   - Records every call, in order
//!   - Per-operation failure injection
//!
//! ## Error Contract
//!
//! A call that could not complete (network, auth, HTTP status on read endpoints)
//! returns [`CodaError::Transport`](crate::error::CodaError::Transport). Create calls
//! are different: when the API refuses the request, the client returns
//! `{"error": "<message>"}` as a successful response so the importer can report a
//! creation failure with the API's own text.

use crate::error::Result;

pub mod http;
pub mod memory;

/// Abstract interface to the document API.
///
/// All methods take `&self`; the tool is single-threaded and issues one blocking call
/// at a time.
pub trait CodaClient {
    /// List documents owned by the caller.
    fn list_docs(&self) -> Result<String>;

    /// Get a document's metadata (`id`, `name`, `ownerName`, ...).
    fn get_doc(&self, doc_id: &str) -> Result<String>;

    /// List the sections (pages) of a document.
    fn list_sections(&self, doc_id: &str) -> Result<String>;

    /// Get a single section.
    fn get_section(&self, doc_id: &str, section_id: &str) -> Result<String>;

    /// List tables, each with a `parent` reference to its section.
    fn list_tables(&self, doc_id: &str) -> Result<String>;

    /// List views (view-type tables).
    fn list_views(&self, doc_id: &str) -> Result<String>;

    fn list_columns(&self, doc_id: &str, table_id: &str) -> Result<String>;

    fn get_column(&self, doc_id: &str, table_id: &str, column_id: &str) -> Result<String>;

    fn list_rows(&self, doc_id: &str, table_id: &str) -> Result<String>;

    fn list_controls(&self, doc_id: &str) -> Result<String>;

    fn list_folders(&self, doc_id: &str) -> Result<String>;

    fn list_formulas(&self, doc_id: &str) -> Result<String>;

    /// Create a new, empty document. Returns `{id, name}` or `{error}`.
    fn create_document(&self, name: &str) -> Result<String>;

    /// Add a section with markdown content. Returns `{id, name}` or `{error}`.
    fn add_section(
        &self,
        doc_id: &str,
        name: &str,
        section_type: &str,
        content: &str,
    ) -> Result<String>;
}
