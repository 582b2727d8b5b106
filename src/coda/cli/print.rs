use super::setup::OutputFormat;
use coda::commands::{CmdMessage, MessageLevel, TemplateEntry};
use coda::model::Record;
use colored::Colorize;
use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const COLUMN_GAP: usize = 2;

fn styled(message: &CmdMessage) -> String {
    match message.level {
        MessageLevel::Info => message.content.dimmed().to_string(),
        MessageLevel::Success => message.content.green().to_string(),
        MessageLevel::Warning => message.content.yellow().to_string(),
    }
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        println!("{}", styled(message));
    }
}

/// Messages for commands whose stdout carries YAML or CSV.
pub(super) fn eprint_messages(messages: &[CmdMessage]) {
    for message in messages {
        eprintln!("{}", styled(message));
    }
}

/// Render records for a list (`single == false`) or get command.
pub(super) fn render_records(records: &[Record], format: OutputFormat, single: bool) -> String {
    match format {
        OutputFormat::Json => render_json(records, single),
        OutputFormat::Text => render_text(records),
    }
}

fn render_json(records: &[Record], single: bool) -> String {
    let value = match (single, records) {
        (true, [one]) => Value::Object(one.clone()),
        _ => Value::Array(records.iter().cloned().map(Value::Object).collect()),
    };
    // A Value built from maps always serializes
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

fn render_text(records: &[Record]) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let rows: Vec<(String, String)> = records.iter().map(text_row).collect();
    let id_width = rows.iter().map(|(id, _)| id.width()).max().unwrap_or(0);

    let mut out = String::new();
    for (id, label) in &rows {
        let padding = id_width.saturating_sub(id.width()) + COLUMN_GAP;
        let available = LINE_WIDTH.saturating_sub(id_width + COLUMN_GAP);
        out.push_str(id);
        out.push_str(&" ".repeat(padding));
        out.push_str(&truncate_to_width(label, available));
        out.push('\n');
    }
    out
}

fn text_row(record: &Record) -> (String, String) {
    let field = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
    match (field("id"), field("name")) {
        (Some(id), Some(name)) => (id, name),
        (Some(id), None) => (id, String::new()),
        (None, Some(name)) => ("-".to_string(), name),
        (None, None) => ("-".to_string(), Value::Object(record.clone()).to_string()),
    }
}

pub(super) fn render_templates(templates: &[TemplateEntry]) -> String {
    let name_width = templates.iter().map(|t| t.name.width()).max().unwrap_or(0);
    let mut out = String::new();
    for t in templates {
        let padding = name_width.saturating_sub(t.name.width()) + COLUMN_GAP;
        out.push_str(&format!("{}{}{}\n", t.name, " ".repeat(padding), t.doc_id));
    }
    out
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
