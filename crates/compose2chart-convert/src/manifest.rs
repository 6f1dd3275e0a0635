//! Kubernetes manifest rendering
//!
//! Each compose service becomes a `Deployment` and, when it exposes at least
//! one port, a `Service`. Manifests are built as typed `k8s-openapi` objects
//! and serialized through [`crate::yaml`], so the same input always yields
//! the same bytes and names like `y` or `on` stay strings for Helm.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, Service, ServicePort,
    ServiceSpec as KubeServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::ports::PortMapping;
use crate::yaml;

/// Label key used for selectors and pod template labels
pub const APP_LABEL: &str = "app";

/// A compose service ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Sanitized resource name
    pub name: String,
    /// Service key as declared in the compose file
    pub raw_name: String,
    pub image: String,
    /// Successfully parsed ports, in declaration order
    pub ports: Vec<PortMapping>,
}

/// Rendered manifest text for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManifests {
    pub name: String,
    pub deployment: String,
    /// Present iff the service has at least one port
    pub service: Option<String>,
}

impl RenderedManifests {
    pub fn deployment_file_name(&self) -> String {
        format!("{}-deployment.yaml", self.name)
    }

    pub fn service_file_name(&self) -> String {
        format!("{}-service.yaml", self.name)
    }
}

/// Render both manifests for a service
pub fn render(spec: &ServiceSpec) -> Result<RenderedManifests, serde_yaml::Error> {
    Ok(RenderedManifests {
        name: spec.name.clone(),
        deployment: render_deployment(&spec.name, &spec.image, &spec.ports)?,
        service: render_service(&spec.name, &spec.ports)?,
    })
}

pub fn render_deployment(
    name: &str,
    image: &str,
    ports: &[PortMapping],
) -> Result<String, serde_yaml::Error> {
    yaml::to_string(&build_deployment(name, image, ports))
}

/// `None` when there are no ports to expose
pub fn render_service(
    name: &str,
    ports: &[PortMapping],
) -> Result<Option<String>, serde_yaml::Error> {
    build_service(name, ports)
        .map(|service| yaml::to_string(&service))
        .transpose()
}

/// Single-container Deployment selecting `app: <name>`
pub fn build_deployment(name: &str, image: &str, ports: &[PortMapping]) -> Deployment {
    let container_ports: Vec<ContainerPort> = ports
        .iter()
        .map(|port| ContainerPort {
            container_port: i32::from(port.container_port),
            protocol: Some(port.protocol.kubernetes_name().to_string()),
            ..Default::default()
        })
        .collect();

    let container = Container {
        name: name.to_string(),
        image: Some(image.to_string()),
        ports: (!container_ports.is_empty()).then_some(container_ports),
        ..Default::default()
    };

    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            selector: LabelSelector {
                match_labels: Some(app_labels(name)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(app_labels(name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Service exposing every port, named `p<index>` by position
pub fn build_service(name: &str, ports: &[PortMapping]) -> Option<Service> {
    if ports.is_empty() {
        return None;
    }

    let service_ports = ports
        .iter()
        .enumerate()
        .map(|(index, port)| ServicePort {
            name: Some(format!("p{index}")),
            port: i32::from(port.service_port()),
            target_port: Some(IntOrString::Int(i32::from(port.container_port))),
            protocol: Some(port.protocol.kubernetes_name().to_string()),
            ..Default::default()
        })
        .collect();

    Some(Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Some(KubeServiceSpec {
            selector: Some(app_labels(name)),
            ports: Some(service_ports),
            ..Default::default()
        }),
        ..Default::default()
    })
}

fn app_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), name.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Protocol;
    use serde_yaml::Value;

    fn web_ports() -> Vec<PortMapping> {
        vec![
            PortMapping::container(80).with_host_port(8080),
            PortMapping::container(53).with_protocol(Protocol::Udp),
        ]
    }

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_deployment_structure() {
        let yaml = render_deployment("web", "nginx:alpine", &web_ports()).unwrap();
        let doc = parse(&yaml);

        assert_eq!(doc["apiVersion"], "apps/v1");
        assert_eq!(doc["kind"], "Deployment");
        assert_eq!(doc["metadata"]["name"], "web");
        assert_eq!(doc["spec"]["selector"]["matchLabels"]["app"], "web");
        assert_eq!(doc["spec"]["template"]["metadata"]["labels"]["app"], "web");

        let containers = doc["spec"]["template"]["spec"]["containers"]
            .as_sequence()
            .unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0]["name"], "web");
        assert_eq!(containers[0]["image"], "nginx:alpine");

        let ports = containers[0]["ports"].as_sequence().unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0]["containerPort"], 80);
        assert_eq!(ports[0]["protocol"], "TCP");
        assert_eq!(ports[1]["containerPort"], 53);
        assert_eq!(ports[1]["protocol"], "UDP");
    }

    #[test]
    fn test_deployment_without_ports() {
        let yaml = render_deployment("worker", "busybox", &[]).unwrap();
        let doc = parse(&yaml);

        let container = &doc["spec"]["template"]["spec"]["containers"][0];
        assert!(container.get("ports").is_none());
        assert!(!yaml.contains("containerPort"));
    }

    #[test]
    fn test_empty_image_is_kept() {
        let yaml = render_deployment("web", "", &[]).unwrap();
        let doc = parse(&yaml);
        assert_eq!(doc["spec"]["template"]["spec"]["containers"][0]["image"], "");
    }

    #[test]
    fn test_service_structure() {
        let yaml = render_service("web", &web_ports()).unwrap().unwrap();
        let doc = parse(&yaml);

        assert_eq!(doc["apiVersion"], "v1");
        assert_eq!(doc["kind"], "Service");
        assert_eq!(doc["metadata"]["name"], "web");
        assert_eq!(doc["spec"]["selector"]["app"], "web");

        let ports = doc["spec"]["ports"].as_sequence().unwrap();
        assert_eq!(ports.len(), 2);

        assert_eq!(ports[0]["name"], "p0");
        assert_eq!(ports[0]["port"], 8080);
        assert_eq!(ports[0]["targetPort"], 80);
        assert_eq!(ports[0]["protocol"], "TCP");

        // No host port: the service port mirrors the container port
        assert_eq!(ports[1]["name"], "p1");
        assert_eq!(ports[1]["port"], 53);
        assert_eq!(ports[1]["targetPort"], 53);
        assert_eq!(ports[1]["protocol"], "UDP");
    }

    #[test]
    fn test_no_service_without_ports() {
        assert_eq!(render_service("worker", &[]).unwrap(), None);
        assert!(build_service("worker", &[]).is_none());
    }

    #[test]
    fn test_port_names_follow_position() {
        let ports = vec![
            PortMapping::container(53),
            PortMapping::container(53).with_protocol(Protocol::Udp),
        ];
        let service = build_service("dns", &ports).unwrap();
        let names: Vec<_> = service
            .spec
            .unwrap()
            .ports
            .unwrap()
            .into_iter()
            .map(|p| p.name.unwrap())
            .collect();
        assert_eq!(names, vec!["p0", "p1"]);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let spec = ServiceSpec {
            name: "web".to_string(),
            raw_name: "Web".to_string(),
            image: "nginx:alpine".to_string(),
            ports: web_ports(),
        };

        let first = render(&spec).unwrap();
        let second = render(&spec).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.deployment_file_name(), "web-deployment.yaml");
        assert_eq!(first.service_file_name(), "web-service.yaml");
    }

    #[test]
    fn test_boolean_like_names_stay_strings() {
        let ports = vec![PortMapping::container(80)];

        let deployment = render_deployment("y", "on", &ports).unwrap();
        assert!(deployment.contains("  name: 'y'\n"), "{deployment}");
        assert!(deployment.contains("app: 'y'"), "{deployment}");
        assert!(deployment.contains("image: 'on'"), "{deployment}");
        assert!(!deployment.contains(": y\n"), "{deployment}");

        let doc = parse(&deployment);
        assert_eq!(doc["metadata"]["name"], "y");
        assert_eq!(doc["spec"]["template"]["spec"]["containers"][0]["image"], "on");

        let service = render_service("no", &ports).unwrap().unwrap();
        assert!(service.contains("name: 'no'"), "{service}");
        assert!(service.contains("app: 'no'"), "{service}");
        assert_eq!(parse(&service)["spec"]["selector"]["app"], "no");
    }

    #[test]
    fn test_manifest_starts_with_api_version() {
        let yaml = render_deployment("web", "nginx", &[]).unwrap();
        assert!(yaml.starts_with("apiVersion: apps/v1\nkind: Deployment\n"));
    }
}
