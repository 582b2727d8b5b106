//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for every operation, whatever UI drives it.
//!
//! The facade:
//! - **Dispatches** to the matching `commands/*.rs` function
//! - **Normalizes inputs**: any document argument may be a registered template name
//! - **Returns structured types** (`Result<CmdResult>`), never prints
//!
//! `CodaApi<C, R>` is generic over the API client and the registry store:
//! production uses `CodaApi<HttpClient, FsRegistry>`, tests use
//! `CodaApi<MemClient, MemRegistry>`.

use crate::client::CodaClient;
use crate::commands::query::{self, Resource};
use crate::commands::{self, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{DocumentStructure, VariableMap};
use crate::registry::{RegistryStore, TemplateRegistry};
use std::collections::HashMap;

pub struct CodaApi<C: CodaClient, R: RegistryStore> {
    client: C,
    registry: TemplateRegistry<R>,
}

impl<C: CodaClient, R: RegistryStore> CodaApi<C, R> {
    pub fn new(client: C, registry: TemplateRegistry<R>) -> Self {
        Self { client, registry }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolve a registered template name to its document id.
    ///
    /// Anything that is not a registered name is returned unchanged and treated as a
    /// raw document id.
    pub fn resolve_doc_id(&self, doc: &str) -> String {
        match self.registry.lookup(doc) {
            Some(id) => {
                tracing::debug!(template = doc, doc_id = id, "resolved template name");
                id.to_string()
            }
            None => doc.to_string(),
        }
    }

    pub fn list_docs(&self) -> Result<CmdResult> {
        let records = query::list_docs(&self.client)?;
        Ok(CmdResult::default().with_records(records))
    }

    pub fn query(&self, doc: &str, resource: &Resource) -> Result<CmdResult> {
        let doc_id = self.resolve_doc_id(doc);
        let records = query::run(&self.client, &doc_id, resource)?;
        Ok(CmdResult::default().with_records(records))
    }

    pub fn extract_structure(&self, doc: &str) -> Result<DocumentStructure> {
        commands::extract::run(&self.client, &self.resolve_doc_id(doc))
    }

    /// Extract, detect variables and render the document as template YAML.
    pub fn export_template(&self, doc: &str) -> Result<CmdResult> {
        let structure = self.extract_structure(doc)?;
        let variables: VariableMap = commands::variables::detect(&structure);
        let yaml = commands::render::run(&structure, &variables)?;

        let mut result = CmdResult::default().with_output(yaml);
        for (name, value) in &variables {
            result.add_message(CmdMessage::info(format!(
                "Detected variable {} = {}",
                name, value
            )));
        }
        result.add_message(CmdMessage::success(format!(
            "Exported template from '{}' ({} sections, {} tables)",
            structure.name,
            structure.sections.len(),
            structure.tables.len()
        )));
        Ok(result)
    }

    pub fn import_template(
        &self,
        text: &str,
        variables: &HashMap<String, String>,
    ) -> Result<CmdResult> {
        let created = commands::import::run(text, variables, &self.client)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Document created successfully: ID={}, Name='{}'",
            created.id, created.name
        )));
        for section in &created.sections {
            result.add_message(CmdMessage::info(format!(
                "  Section '{}' (ID={})",
                section.name, section.id
            )));
        }
        Ok(result.with_created(created))
    }

    pub fn export_table(&self, doc: &str, table_id: &str) -> Result<CmdResult> {
        let doc_id = self.resolve_doc_id(doc);
        let csv = commands::table::run(&self.client, &doc_id, table_id)?;
        let mut result = CmdResult::default();
        if csv.is_empty() {
            result.add_message(CmdMessage::warning(
                "No data found for the specified table",
            ));
            return Ok(result);
        }
        Ok(result.with_output(csv))
    }

    pub fn register_template(
        &mut self,
        name: &str,
        doc_id: &str,
        description: Option<&str>,
    ) -> Result<CmdResult> {
        commands::registry::register(&mut self.registry, name, doc_id, description)
    }

    pub fn list_templates(&self) -> Result<CmdResult> {
        Ok(commands::registry::list(&self.registry))
    }

    pub fn remove_template(&mut self, name: &str) -> Result<CmdResult> {
        commands::registry::remove(&mut self.registry, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::{MemClient, Operation};
    use crate::commands::MessageLevel;
    use crate::registry::memory::MemRegistry;
    use crate::test_utils::{sample_client, SAMPLE_DOC_ID};

    fn api_with(client: MemClient, entries: &[(&str, &str)]) -> CodaApi<MemClient, MemRegistry> {
        let store = MemRegistry::with_entries(entries.iter().copied());
        CodaApi::new(client, TemplateRegistry::open(store).unwrap())
    }

    #[test]
    fn test_registered_name_resolves_to_doc_id() {
        let api = api_with(MemClient::new(), &[("kickoff", "doc-abc")]);
        assert_eq!(api.resolve_doc_id("kickoff"), "doc-abc");
    }

    #[test]
    fn test_unknown_name_is_used_as_raw_id() {
        let api = api_with(MemClient::new(), &[]);
        assert_eq!(api.resolve_doc_id("doc-raw"), "doc-raw");
    }

    #[test]
    fn test_query_goes_through_resolution() {
        let api = api_with(MemClient::new(), &[("kickoff", "doc-abc")]);
        api.query("kickoff", &Resource::Tables).unwrap();
        assert_eq!(
            api.client().calls_to(Operation::ListTables),
            vec![vec!["doc-abc"]]
        );
    }

    #[test]
    fn test_export_template_by_name() {
        let api = api_with(sample_client(), &[("alpha", SAMPLE_DOC_ID)]);
        let result = api.export_template("alpha").unwrap();

        let yaml = result.output.unwrap();
        assert!(yaml.contains("{{DOC_NAME}}"));
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "Detected variable DOC_NAME = ProjectAlpha"));
    }

    #[test]
    fn test_import_reports_created_document() {
        let api = api_with(MemClient::new(), &[]);
        let text = "document:\n  name: '{{DOC_NAME}}'\n  sections:\n  - name: Intro\n    type: canvas\n";
        let vars = HashMap::from([("DOC_NAME".to_string(), "Launch".to_string())]);

        let result = api.import_template(text, &vars).unwrap();
        let created = result.created.unwrap();
        assert_eq!(created.name, "Launch");
        assert_eq!(created.sections.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Success);
    }

    #[test]
    fn test_export_empty_table_warns() {
        let api = api_with(MemClient::new(), &[]);
        let result = api.export_table("doc", "grid-1").unwrap();
        assert!(result.output.is_none());
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn test_registry_round_trip() {
        let mut api = api_with(MemClient::new(), &[]);
        api.register_template("weekly", "doc-w", None).unwrap();
        assert_eq!(api.list_templates().unwrap().templates.len(), 1);
        api.remove_template("weekly").unwrap();
        assert!(api.list_templates().unwrap().templates.is_empty());
    }
}
