//! Rendering the finished documentation model.
//!
//! Renderers get read-only access to the model and turn it into one output
//! document. The two built-in renderers are thin serde dumps; anything richer
//! hangs off the same trait.

use crate::error::Result;
use crate::model::DocumentationModel;
use log::info;
use std::path::Path;

pub trait Renderer {
    fn render(&self, model: &DocumentationModel) -> Result<String>;
    fn file_extension(&self) -> &'static str;
}

/// Pretty-printed JSON dump of the model.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, model: &DocumentationModel) -> Result<String> {
        Ok(serde_json::to_string_pretty(model)?)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

/// YAML dump of the model.
pub struct YamlRenderer;

impl Renderer for YamlRenderer {
    fn render(&self, model: &DocumentationModel) -> Result<String> {
        Ok(serde_yaml::to_string(model)?)
    }

    fn file_extension(&self) -> &'static str {
        "yaml"
    }
}

/// Renders the model and writes it to the given path.
pub fn write_to_file(
    renderer: &dyn Renderer,
    model: &DocumentationModel,
    path: &Path,
) -> Result<()> {
    let rendered = renderer.render(model)?;
    std::fs::write(path, rendered)?;
    info!("Documentation written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiError, DataType, Domain, Operation, Property};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_model() -> DocumentationModel {
        let mut domain = Domain {
            order: 1,
            name: "Customer".to_string(),
            short_description: "Customer management".to_string(),
            ..Domain::default()
        };
        domain.operations.push(Operation {
            order: 1,
            path: "/customers/{id}".to_string(),
            http_method: "GET".to_string(),
            nickname: "getCustomer".to_string(),
            ..Operation::default()
        });
        let mut common_errors = std::collections::BTreeSet::new();
        common_errors.insert(ApiError {
            status: 500,
            code: "INTERNAL".to_string(),
            description: "Internal Server Error".to_string(),
        });
        DocumentationModel {
            domains: vec![domain],
            data_types: vec![DataType {
                name: "Customer".to_string(),
                properties: vec![Property {
                    name: "name".to_string(),
                    type_name: "String".to_string(),
                    ..Property::default()
                }],
                ..DataType::default()
            }],
            common_errors,
        }
    }

    #[test]
    fn test_json_renderer_output() {
        let rendered = JsonRenderer.render(&sample_model()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["domains"][0]["name"], "Customer");
        assert_eq!(value["domains"][0]["operations"][0]["nickname"], "getCustomer");
        // The serde rename on the property type field
        assert_eq!(value["data_types"][0]["properties"][0]["type"], "String");
        assert_eq!(value["common_errors"][0]["status"], 500);
    }

    #[test]
    fn test_yaml_renderer_output() {
        let rendered = YamlRenderer.render(&sample_model()).unwrap();

        assert!(rendered.contains("name: Customer"));
        assert!(rendered.contains("nickname: getCustomer"));
        assert!(rendered.contains("/customers/{id}"));
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("api.json");

        write_to_file(&JsonRenderer, &sample_model(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("getCustomer"));
    }

    #[test]
    fn test_file_extensions() {
        assert_eq!(JsonRenderer.file_extension(), "json");
        assert_eq!(YamlRenderer.file_extension(), "yaml");
    }
}
