//! Descriptor parser: converts raw YAML/JSON text into [`DeploymentSchema`].

use crate::error::EngineError;

use super::schema::DeploymentSchema;

/// Supported descriptor input formats.
#[derive(Debug, Clone, Copy)]
pub enum DescriptorFormat {
    /// YAML format (`.yaml` / `.yml`).
    Yaml,
    /// JSON format (`.json`).
    Json,
}

/// Parse descriptor content into a [`DeploymentSchema`].
pub fn parse_descriptors(
    content: &str,
    format: DescriptorFormat,
) -> Result<DeploymentSchema, EngineError> {
    match format {
        DescriptorFormat::Yaml => {
            serde_saphyr::from_str(content).map_err(|e| EngineError::DescriptorParse(e.to_string()))
        }
        DescriptorFormat::Json => {
            serde_json::from_str(content).map_err(|e| EngineError::DescriptorParse(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ResourceKind;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
name: jenkins
resources:
  - id: network
    kind: network
    properties:
      cidr: 10.0.0.0/16
  - id: cluster
    kind: cluster
    depends_on: [network]
"#;
        let schema = parse_descriptors(yaml, DescriptorFormat::Yaml).unwrap();
        assert_eq!(schema.name.as_deref(), Some("jenkins"));
        assert_eq!(schema.resources.len(), 2);
        assert_eq!(schema.resources[0].kind, ResourceKind::Network);
        assert_eq!(schema.resources[1].depends_on, vec!["network"]);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "resources": [
                {"id": "fs", "kind": "file-system", "properties": {"size_gb": 50}}
            ]
        }"#;
        let schema = parse_descriptors(json, DescriptorFormat::Json).unwrap();
        assert_eq!(schema.resources[0].id, "fs");
        assert_eq!(schema.resources[0].kind, ResourceKind::FileSystem);
        assert_eq!(schema.resources[0].properties["size_gb"], 50);
    }

    #[test]
    fn test_parse_invalid_yaml_fails() {
        let err = parse_descriptors(": not valid", DescriptorFormat::Yaml).unwrap_err();
        assert!(matches!(err, EngineError::DescriptorParse(_)));
    }

    #[test]
    fn test_parse_missing_resources_fails() {
        let err = parse_descriptors("{}", DescriptorFormat::Json).unwrap_err();
        assert!(matches!(err, EngineError::DescriptorParse(_)));
    }
}
