//! compose2chart Convert - docker-compose to Helm chart converter
//!
//! This crate turns the `services` of a compose file into a Helm chart: one
//! `Deployment` per service and, when the service publishes ports, one
//! `Service`.
//!
//! | Compose                        | Kubernetes                                   |
//! |--------------------------------|----------------------------------------------|
//! | service key `My_App`           | resource name `my-app`                        |
//! | `image: nginx:alpine`          | container image                               |
//! | `ports: ["8080:80"]`           | containerPort 80, Service port 8080 → 80      |
//! | `ports: ["53:53/udp"]`         | protocol `UDP`                                |
//! | `ports: ["8000-8001:80-81"]`   | one port per range offset                     |
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use compose2chart_convert::{convert, ConvertOptions};
//!
//! let options = ConvertOptions {
//!     compose_file: PathBuf::from("docker-compose.yml"),
//!     out_dir: PathBuf::from("./chart"),
//!     ..Default::default()
//! };
//!
//! let result = convert(options).unwrap();
//! for warning in &result.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! println!("{}", result.success_message());
//! ```
//!
//! The building blocks are usable on their own:
//!
//! ```
//! use compose2chart_convert::{parse_port_spec, sanitize_name, Protocol};
//!
//! let ports = parse_port_spec("8080:80/udp").unwrap();
//! assert_eq!(ports[0].host_port, Some(8080));
//! assert_eq!(ports[0].protocol, Protocol::Udp);
//!
//! assert_eq!(sanitize_name("My_App! 1"), "my-app-1");
//! ```

pub mod chart;
pub mod compose;
pub mod converter;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod ports;
pub mod yaml;

// Re-exports
pub use chart::{ChartMetadata, ChartValues};
pub use compose::{ComposeDocument, RawPort, ServiceDefinition, ServiceEntry};
pub use converter::{
    ChartPlan, ConversionResult, ConvertOptions, Converter, ServiceOutcome, build_service,
    convert, convert_str, plan,
};
pub use error::{ConversionWarning, ConvertError, Result, WarningCategory, WarningSeverity};
pub use manifest::{RenderedManifests, ServiceSpec, render};
pub use naming::sanitize_name;
pub use ports::{PortMapping, PortParseError, Protocol, parse_port_spec};
