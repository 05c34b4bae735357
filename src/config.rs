use crate::error::{Error, Result};
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;

/// Extraction configuration.
///
/// All fields are optional in the YAML file; empty strings mean "not configured".
/// The scan scope (project path) comes from the command line, everything else from
/// here. Configured type names are resolved against the source index at the start
/// of the run; an unresolvable name is a startup configuration error, not a
/// mid-run surprise.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Suffix locating the separate documentation counterpart of a controller
    /// (e.g. "Documentation" finds `CustomerControllerDocumentation`). When empty
    /// the controller itself carries the documentation attributes.
    pub documentation_suffix: String,

    /// Trailing suffix stripped from data type names for display (e.g. "VO").
    pub data_type_suffix: String,

    /// Name of an additional attribute that excludes a method from documentation.
    pub custom_ignore_attribute: String,

    /// Name of the value-object base type. When set, the registry walks `extends`
    /// chains up to (not including) this type and rejects structural types whose
    /// chain does not reach it.
    pub base_type_name: String,

    /// Abstract controller whose error-handler chain seeds the common error set.
    pub common_error_controller: String,

    /// Controller type at which error-handler inheritance walks stop (exclusive).
    pub stop_error_inspection_at: String,

    /// When a handler declares no explicit error code, synthesize one from a
    /// default instance of the handled exception type.
    pub synthesize_error_codes: bool,

    /// Fail the run when undocumented items remain after the report is printed.
    pub break_on_undocumented: bool,
}

impl Config {
    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Config> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid config file {}: {}", path.display(), e)))?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn has_documentation_suffix(&self) -> bool {
        !self.documentation_suffix.is_empty()
    }

    pub fn has_base_type(&self) -> bool {
        !self.base_type_name.is_empty()
    }

    /// Strip the configured data type suffix from a type name for display.
    pub fn strip_data_type_suffix<'a>(&self, name: &'a str) -> &'a str {
        if !self.data_type_suffix.is_empty() {
            if let Some(stripped) = name.strip_suffix(&self.data_type_suffix) {
                if !stripped.is_empty() {
                    return stripped;
                }
            }
        }
        name
    }
}
