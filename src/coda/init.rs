use crate::api::CodaApi;
use crate::client::http::HttpClient;
use crate::config::CodaConfig;
use crate::error::{CodaError, Result};
use crate::registry::fs::FsRegistry;
use crate::registry::TemplateRegistry;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Overrides where the template registry lives.
pub const ENV_HOME: &str = "CODA_HOME";

pub struct CodaContext {
    pub api: CodaApi<HttpClient, FsRegistry>,
    pub registry_path: PathBuf,
}

/// Directory holding `templates.json`: `home_override` if given, else the platform
/// data directory.
pub fn data_dir(home_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = home_override.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(home);
    }
    ProjectDirs::from("io", "coda", "coda")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| CodaError::Config("could not determine a data directory".to_string()))
}

pub fn initialize(cwd: &Path) -> Result<CodaContext> {
    let config = CodaConfig::load(cwd)?;

    let data_dir = data_dir(std::env::var_os(ENV_HOME).map(PathBuf::from))?;
    let store = FsRegistry::in_dir(&data_dir);
    let registry_path = store.path().to_path_buf();
    let registry = TemplateRegistry::open_or_empty(store);

    let client = HttpClient::new(
        config.api_key.as_deref(),
        &config.api_base,
        config.timeout(),
    )?;
    tracing::debug!(
        api_base = %config.api_base,
        registry = %registry_path.display(),
        "initialized"
    );

    Ok(CodaContext {
        api: CodaApi::new(client, registry),
        registry_path,
    })
}
