//! # CLI Behavior
//!
//! This is **one possible UI client** for the library, not the application itself.
//! It is the only place that knows about terminal I/O, exit codes and files given on
//! the command line.
//!
//! ## Output Streams
//!
//! - Query commands print records to stdout, as JSON (default) or aligned text.
//! - `export-template` and `export-table` print the YAML or CSV payload to stdout when
//!   no `--output` is given; their status messages then go to stderr so the payload
//!   can be piped. With `--output` the payload goes to the file and messages to stdout.
//! - Logging always goes to stderr.
//!
//! ## Module Structure
//!
//! - `commands`: `run()` and the per-command handlers
//! - `print`: Record, template and message rendering
//! - `setup`: Argument parsing via clap, grouped help

mod commands;
mod print;
pub mod setup;

pub use commands::run;
