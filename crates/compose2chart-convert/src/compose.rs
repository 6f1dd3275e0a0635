//! Compose document ingestion
//!
//! The compose file is decoded into a generic YAML tree and validated into
//! [`ServiceEntry`] values here, so the port parser and the renderer only
//! ever see well-typed input. Only `services.<name>.image` and
//! `services.<name>.ports` are read; every other key is ignored.

use serde_yaml::{Mapping, Value};

use crate::error::{ConvertError, Result};

/// One item of a service's `ports` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPort {
    /// Short syntax (`"8080:80/udp"`), numbers included
    Short(String),
    /// Anything else, described by its YAML type
    Unsupported(String),
}

impl RawPort {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(spec) => Self::Short(spec.clone()),
            Value::Number(number) => Self::Short(number.to_string()),
            other => Self::Unsupported(describe(other).to_string()),
        }
    }
}

/// A service entry whose body is a mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Service key as declared
    pub raw_name: String,
    /// Image reference, empty when absent
    pub image: String,
    /// Port list items in declaration order
    pub ports: Vec<RawPort>,
    /// Fields that were present but had the wrong type
    pub issues: Vec<String>,
}

/// A validated `services` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEntry {
    Valid(ServiceDefinition),
    Malformed { raw_name: String, reason: String },
}

impl ServiceEntry {
    pub fn raw_name(&self) -> &str {
        match self {
            Self::Valid(definition) => &definition.raw_name,
            Self::Malformed { raw_name, .. } => raw_name,
        }
    }
}

/// The parts of a compose file the converter understands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeDocument {
    /// Services in document order
    pub services: Vec<ServiceEntry>,
}

impl ComposeDocument {
    /// Parse a compose file's content
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(ConvertError::InvalidDocument {
                message: "the document is empty".to_string(),
            });
        }
        let root: Value = serde_yaml::from_str(content).map_err(ConvertError::ParseCompose)?;
        Self::from_value(&root)
    }

    /// Validate an already decoded YAML tree
    pub fn from_value(root: &Value) -> Result<Self> {
        let root = root.as_mapping().ok_or_else(|| ConvertError::InvalidDocument {
            message: format!("expected a mapping at the top level, found {}", describe(root)),
        })?;

        let services = match root.get("services") {
            None | Some(Value::Null) => return Err(ConvertError::MissingServices),
            Some(Value::Mapping(services)) => services,
            Some(other) => {
                return Err(ConvertError::InvalidServices {
                    found: describe(other).to_string(),
                });
            }
        };

        let services = services
            .iter()
            .map(|(key, body)| match key_name(key) {
                Some(raw_name) => parse_service(raw_name, body),
                None => ServiceEntry::Malformed {
                    raw_name: format!("<{}>", describe(key)),
                    reason: "service names must be strings".to_string(),
                },
            })
            .collect();

        Ok(Self { services })
    }
}

fn parse_service(raw_name: String, body: &Value) -> ServiceEntry {
    let empty = Mapping::new();
    let body = match body {
        Value::Null => &empty,
        Value::Mapping(body) => body,
        other => {
            return ServiceEntry::Malformed {
                raw_name,
                reason: format!("expected a mapping, found {}", describe(other)),
            };
        }
    };

    let mut definition = ServiceDefinition {
        raw_name,
        ..Default::default()
    };

    match body.get("image") {
        None | Some(Value::Null) => {}
        Some(Value::String(image)) => definition.image = image.clone(),
        Some(other) => definition.issues.push(format!(
            "'image' must be a string, found {}",
            describe(other)
        )),
    }

    match body.get("ports") {
        None | Some(Value::Null) => {}
        Some(Value::Sequence(items)) => {
            definition.ports = items.iter().map(RawPort::from_value).collect();
        }
        Some(other) => definition.issues.push(format!(
            "'ports' must be a list, found {}",
            describe(other)
        )),
    }

    ServiceEntry::Valid(definition)
}

fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(name) => Some(name.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(entry: &ServiceEntry) -> &ServiceDefinition {
        match entry {
            ServiceEntry::Valid(definition) => definition,
            ServiceEntry::Malformed { raw_name, reason } => {
                panic!("{raw_name} is malformed: {reason}")
            }
        }
    }

    #[test]
    fn test_parse_minimal() {
        let doc = ComposeDocument::parse(
            r#"
version: "3"
services:
  web:
    image: nginx:alpine
    ports:
      - "8080:80"
"#,
        )
        .unwrap();

        assert_eq!(doc.services.len(), 1);
        let web = valid(&doc.services[0]);
        assert_eq!(web.raw_name, "web");
        assert_eq!(web.image, "nginx:alpine");
        assert_eq!(web.ports, vec![RawPort::Short("8080:80".to_string())]);
        assert!(web.issues.is_empty());
    }

    #[test]
    fn test_keeps_document_order() {
        let doc = ComposeDocument::parse(
            r#"
services:
  zeta: {}
  alpha: {}
  mid: {}
"#,
        )
        .unwrap();

        let names: Vec<&str> = doc.services.iter().map(ServiceEntry::raw_name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_numeric_ports() {
        let doc = ComposeDocument::parse(
            r#"
services:
  dns:
    image: coredns
    ports:
      - 53
      - "53:53/udp"
      - target: 80
        published: 8080
"#,
        )
        .unwrap();

        let dns = valid(&doc.services[0]);
        assert_eq!(
            dns.ports,
            vec![
                RawPort::Short("53".to_string()),
                RawPort::Short("53:53/udp".to_string()),
                RawPort::Unsupported("a mapping".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_fields() {
        let doc = ComposeDocument::parse("services:\n  worker:\n").unwrap();
        let worker = valid(&doc.services[0]);
        assert_eq!(worker.image, "");
        assert!(worker.ports.is_empty());
    }

    #[test]
    fn test_wrong_field_types() {
        let doc = ComposeDocument::parse(
            r#"
services:
  odd:
    image: [nginx]
    ports: "80"
"#,
        )
        .unwrap();

        let odd = valid(&doc.services[0]);
        assert_eq!(odd.image, "");
        assert!(odd.ports.is_empty());
        assert_eq!(odd.issues.len(), 2);
        assert!(odd.issues[0].contains("'image'"));
        assert!(odd.issues[1].contains("'ports'"));
    }

    #[test]
    fn test_malformed_service_body() {
        let doc = ComposeDocument::parse("services:\n  broken: [1, 2]\n  ok: {}\n").unwrap();
        assert!(matches!(
            &doc.services[0],
            ServiceEntry::Malformed { raw_name, .. } if raw_name == "broken"
        ));
        assert!(matches!(&doc.services[1], ServiceEntry::Valid(_)));
    }

    #[test]
    fn test_numeric_service_key() {
        let doc = ComposeDocument::parse("services:\n  8080: {}\n").unwrap();
        assert_eq!(doc.services[0].raw_name(), "8080");
    }

    #[test]
    fn test_non_string_service_keys() {
        let doc = ComposeDocument::parse("services:\n  true: {}\n  [a]: {}\n  web: {}\n").unwrap();
        assert_eq!(doc.services.len(), 3);

        match &doc.services[0] {
            ServiceEntry::Malformed { raw_name, reason } => {
                assert_eq!(raw_name, "<a boolean>");
                assert_eq!(reason, "service names must be strings");
            }
            other => panic!("expected a malformed entry, got {other:?}"),
        }
        assert_eq!(doc.services[1].raw_name(), "<a list>");
        assert!(matches!(&doc.services[1], ServiceEntry::Malformed { .. }));
        assert_eq!(valid(&doc.services[2]).raw_name, "web");
    }

    #[test]
    fn test_missing_services() {
        let err = ComposeDocument::parse("version: \"3\"\n").unwrap_err();
        assert!(matches!(err, ConvertError::MissingServices));

        let err = ComposeDocument::parse("services:\n").unwrap_err();
        assert!(matches!(err, ConvertError::MissingServices));
    }

    #[test]
    fn test_services_not_a_mapping() {
        let err = ComposeDocument::parse("services:\n  - web\n").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidServices { .. }));
    }

    #[test]
    fn test_top_level_not_a_mapping() {
        let err = ComposeDocument::parse("- web\n").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidDocument { .. }));

        let err = ComposeDocument::parse("").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidDocument { .. }));
    }

    #[test]
    fn test_undecodable_document() {
        let err = ComposeDocument::parse("services: [unclosed").unwrap_err();
        assert!(matches!(err, ConvertError::ParseCompose(_)));
    }
}
