use super::{CmdMessage, CmdResult, TemplateEntry};
use crate::error::Result;
use crate::registry::{RegistryStore, TemplateRegistry};

pub fn register<S: RegistryStore>(
    registry: &mut TemplateRegistry<S>,
    name: &str,
    doc_id: &str,
    description: Option<&str>,
) -> Result<CmdResult> {
    let previous = registry.register(name, doc_id)?;
    let mut result = CmdResult::default();
    if let Some(old) = previous.filter(|old| old != doc_id) {
        result.add_message(CmdMessage::info(format!(
            "Template '{}' previously pointed at {}",
            name, old
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Template '{}' registered successfully with document ID: {}",
        name, doc_id
    )));
    if let Some(d) = description.map(str::trim).filter(|d| !d.is_empty()) {
        result.add_message(CmdMessage::info(format!("Description: {}", d)));
    }
    Ok(result)
}

pub fn list<S: RegistryStore>(registry: &TemplateRegistry<S>) -> CmdResult {
    let templates: Vec<TemplateEntry> = registry
        .list()
        .into_iter()
        .map(|(name, doc_id)| TemplateEntry {
            name: name.to_string(),
            doc_id: doc_id.to_string(),
        })
        .collect();

    let mut result = CmdResult::default();
    if templates.is_empty() {
        result.add_message(CmdMessage::info("No templates registered"));
    }
    result.with_templates(templates)
}

pub fn remove<S: RegistryStore>(registry: &mut TemplateRegistry<S>, name: &str) -> Result<CmdResult> {
    let removed = registry.remove(name)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Template '{}' removed (was document ID: {})",
        name, removed
    )));
    Ok(result)
}
