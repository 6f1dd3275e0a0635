//! Main converter logic
//!
//! Orchestrates the conversion of a compose file to a Helm chart. Planning
//! (sanitize → parse ports → render) is pure and produces every byte of
//! output up front; only then is anything written to disk.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::chart::{ChartMetadata, ChartValues};
use crate::compose::{ComposeDocument, RawPort, ServiceDefinition, ServiceEntry};
use crate::error::{ConversionWarning, ConvertError, Result, WarningSeverity};
use crate::manifest::{self, RenderedManifests, ServiceSpec};
use crate::naming::sanitize_name;
use crate::ports::parse_port_spec;

/// Directory below the output directory that holds the manifests
pub const TEMPLATES_DIR: &str = "templates";

/// Options for the converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Path to the compose file
    pub compose_file: PathBuf,
    /// Chart output directory
    pub out_dir: PathBuf,
    /// Chart name
    pub chart_name: String,
    /// Chart appVersion
    pub app_version: String,
    /// Chart version (SemVer)
    pub version: String,
    /// Only report what would be written
    pub dry_run: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            compose_file: PathBuf::from("docker-compose.yml"),
            out_dir: PathBuf::from("./chart"),
            chart_name: "generated-chart".to_string(),
            app_version: "0.1.0".to_string(),
            version: "0.1.0".to_string(),
            dry_run: false,
        }
    }
}

/// A compose service after name sanitizing and port parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOutcome {
    pub spec: ServiceSpec,
    /// Problems with this service that did not stop it from being rendered
    pub warnings: Vec<ConversionWarning>,
}

/// Everything a conversion will write, computed without touching the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPlan {
    pub chart: ChartMetadata,
    pub values: ChartValues,
    /// Ordered by sanitized name
    pub services: Vec<RenderedManifests>,
    pub warnings: Vec<ConversionWarning>,
}

/// Result of a conversion
#[derive(Debug, Default)]
pub struct ConversionResult {
    /// Files written (or that would be written in dry-run mode)
    pub written_files: Vec<PathBuf>,
    /// Sanitized names of the converted services
    pub services: Vec<String>,
    /// Warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionResult {
    /// Number of warnings with the given severity
    pub fn count_by_severity(&self, severity: WarningSeverity) -> usize {
        self.warnings.iter().filter(|w| w.severity == severity).count()
    }

    pub fn success_message(&self) -> String {
        let services = self.services.len();
        let files = self.written_files.len();

        let mut msg = format!(
            "Converted {} service{} into {} file{}",
            services,
            if services == 1 { "" } else { "s" },
            files,
            if files == 1 { "" } else { "s" },
        );

        let warnings = self.warnings.len();
        if warnings > 0 {
            msg.push_str(&format!(
                " with {} warning{}",
                warnings,
                if warnings == 1 { "" } else { "s" }
            ));
        }

        msg
    }
}

/// Sanitize the name and parse the ports of one service
///
/// Port specifications that fail to parse are skipped and reported.
pub fn build_service(definition: &ServiceDefinition) -> ServiceOutcome {
    let service = definition.raw_name.as_str();
    let mut warnings: Vec<ConversionWarning> = definition
        .issues
        .iter()
        .map(|issue| ConversionWarning::definition(service, issue))
        .collect();

    let mut ports = Vec::new();
    for raw in &definition.ports {
        match raw {
            RawPort::Short(spec) => match parse_port_spec(spec) {
                Ok(mappings) => ports.extend(mappings),
                Err(e) => {
                    debug!(service, spec = spec.as_str(), "skipping port: {}", e);
                    warnings.push(ConversionWarning::port(service, &e));
                }
            },
            RawPort::Unsupported(found) => {
                warnings.push(ConversionWarning::unsupported_port(service, found));
            }
        }
    }

    ServiceOutcome {
        spec: ServiceSpec {
            name: sanitize_name(service),
            raw_name: definition.raw_name.clone(),
            image: definition.image.clone(),
            ports,
        },
        warnings,
    }
}

/// Plan a chart: validate chart metadata, convert every service and render
/// its manifests
///
/// Warnings keep document order. Services are sorted by sanitized name so
/// the output does not depend on how the compose file orders them.
pub fn plan(document: &ComposeDocument, options: &ConvertOptions) -> Result<ChartPlan> {
    let chart = ChartMetadata::new(&options.chart_name, &options.version, &options.app_version)?;

    let mut warnings = Vec::new();
    let mut specs = Vec::new();

    for entry in &document.services {
        match entry {
            ServiceEntry::Valid(definition) => {
                let outcome = build_service(definition);
                warnings.extend(outcome.warnings);
                specs.push(outcome.spec);
            }
            ServiceEntry::Malformed { raw_name, reason } => {
                warnings.push(ConversionWarning::malformed_service(raw_name, reason));
            }
        }
    }

    specs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.raw_name.cmp(&b.raw_name)));

    if let Some(pair) = specs.windows(2).find(|pair| pair[0].name == pair[1].name) {
        return Err(ConvertError::DuplicateServiceName {
            name: pair[0].name.clone(),
            first: pair[0].raw_name.clone(),
            second: pair[1].raw_name.clone(),
        });
    }

    let services = specs
        .iter()
        .map(manifest::render)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ChartPlan {
        chart,
        values: ChartValues::from_services(&specs),
        services,
        warnings,
    })
}

/// Convert a compose file to a Helm chart
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Read the compose file and write the chart
    pub fn convert(&self) -> Result<ConversionResult> {
        let path = &self.options.compose_file;
        let content = fs::read_to_string(path).map_err(|source| ConvertError::ReadCompose {
            path: path.clone(),
            source,
        })?;

        self.convert_str(&content)
    }

    /// Convert compose content that has already been read
    pub fn convert_str(&self, content: &str) -> Result<ConversionResult> {
        let document = ComposeDocument::parse(content)?;
        let plan = plan(&document, &self.options)?;
        self.write(plan)
    }

    /// Write a plan to the output directory
    ///
    /// Files written before an I/O failure stay on disk.
    pub fn write(&self, plan: ChartPlan) -> Result<ConversionResult> {
        let out_dir = &self.options.out_dir;
        let templates_dir = out_dir.join(TEMPLATES_DIR);

        if !self.options.dry_run {
            fs::create_dir_all(&templates_dir).map_err(|source| ConvertError::Io {
                path: templates_dir.clone(),
                source,
            })?;
        }

        let mut result = ConversionResult {
            warnings: plan.warnings,
            ..Default::default()
        };

        self.write_file(&out_dir.join("Chart.yaml"), &plan.chart.to_yaml()?, &mut result)?;
        self.write_file(&out_dir.join("values.yaml"), &plan.values.to_yaml()?, &mut result)?;

        for manifests in &plan.services {
            self.write_file(
                &templates_dir.join(manifests.deployment_file_name()),
                &manifests.deployment,
                &mut result,
            )?;

            if let Some(ref service) = manifests.service {
                self.write_file(
                    &templates_dir.join(manifests.service_file_name()),
                    service,
                    &mut result,
                )?;
            }

            result.services.push(manifests.name.clone());
        }

        Ok(result)
    }

    fn write_file(&self, path: &Path, content: &str, result: &mut ConversionResult) -> Result<()> {
        if !self.options.dry_run {
            fs::write(path, content).map_err(|source| ConvertError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "wrote file");
        }
        result.written_files.push(path.to_path_buf());
        Ok(())
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Quick convert function
pub fn convert(options: ConvertOptions) -> Result<ConversionResult> {
    Converter::new(options).convert()
}

/// Convert compose content without reading `options.compose_file`
pub fn convert_str(content: &str, options: ConvertOptions) -> Result<ConversionResult> {
    Converter::new(options).convert_str(content)
}
