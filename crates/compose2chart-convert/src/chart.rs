//! Chart.yaml and values.yaml generation

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ConvertError, Result};
use crate::manifest::ServiceSpec;
use crate::naming::is_dns_label;
use crate::ports::PortMapping;
use crate::yaml;

/// Helm chart API version written to Chart.yaml
pub const CHART_API_VERSION: &str = "v2";

/// Helm Chart.yaml structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub api_version: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub chart_type: String,
    /// Chart version (SemVer)
    pub version: String,
    pub app_version: String,
}

impl ChartMetadata {
    /// Validate the chart name and version and build the metadata
    pub fn new(name: &str, version: &str, app_version: &str) -> Result<Self> {
        if !is_dns_label(name) {
            return Err(ConvertError::InvalidChartName(name.to_string()));
        }

        semver::Version::parse(version).map_err(|source| ConvertError::InvalidChartVersion {
            version: version.to_string(),
            source,
        })?;

        Ok(Self {
            api_version: CHART_API_VERSION.to_string(),
            name: name.to_string(),
            description: "A Helm chart generated from docker-compose services".to_string(),
            chart_type: "application".to_string(),
            version: version.to_string(),
            app_version: app_version.to_string(),
        })
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        yaml::to_string(self)
    }
}

/// values.yaml content: what each service was generated from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartValues {
    pub services: BTreeMap<String, ServiceValues>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceValues {
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortMapping>,
}

impl ChartValues {
    pub fn from_services(services: &[ServiceSpec]) -> Self {
        let services = services
            .iter()
            .map(|spec| {
                (
                    spec.name.clone(),
                    ServiceValues {
                        image: spec.image.clone(),
                        ports: spec.ports.clone(),
                    },
                )
            })
            .collect();

        Self { services }
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        yaml::to_string(self)
    }
}
