//! # Coda Architecture
//!
//! `coda` is a library for working with documents in the Coda API that happens to ship
//! a CLI. Its main job is the template round trip: read a live document, reduce it to
//! an editable YAML template with `{{VARIABLE}}` placeholders, and later re-create a
//! document from that template with new values.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints records/messages, writes files  │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Resolves template names to document ids                  │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - extract → variables → render (export)                    │
//! │  - substitute → parse → create (import)                     │
//! │  - table CSV export, queries, registry maintenance          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client & Registry (client/, registry/)                     │
//! │  - CodaClient trait: HttpClient (production), MemClient     │
//! │  - RegistryStore trait: FsRegistry (production), MemRegistry│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every API response is raw JSON text; [`normalize`] turns whatever shape arrives
//! (array, object, several concatenated objects, nothing) into a list of records
//! before any command reads it.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`client`]: API capability and its implementations
//! - [`registry`]: Template name registry and its stores
//! - [`normalize`]: Response normalization
//! - [`model`]: Document structure and template types
//! - [`config`]: Configuration loading
//! - [`init`]: Builds the production context
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod normalize;
pub mod registry;

#[cfg(test)]
pub mod test_utils;
