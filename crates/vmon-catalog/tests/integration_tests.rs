//! Integration tests for vmon-catalog

use std::io::Write;
use vmon_catalog::{CatalogError, ServiceCatalog, ServiceType, parser};

const CATALOG: &str = r#"
services:
  lwsmd:
    servicename: lwsmd
    description: Likewise Service Manager
    id: 1
    parent_id: null
    level: 0
    type: system-control
    profile: [ALL, HACore]
    dp_service: []
  vmafd:
    servicename: vmafd
    description: VMware Authentication Framework
    id: 2
    parent_id: 1
    level: 1
    type: vmon-control
    serviceprestart: /usr/lib/vmware-vmafd/vmafd-prestart.sh
    servicehealthcmd: /usr/lib/vmware-vmafd/health.sh
    nameinlog: vmafd
    profile: [ALL, HACore]
    log: [/var/log/vmware/vmafd/vmafd.log]
    dp_service: [lwsmd]
  vpxd:
    servicename: vpxd
    description: VMware vCenter Server
    id: 12
    parent_id: 2
    level: 3
    type: vmon-control
    serviceprestart: /usr/lib/vmware-vpx/vpxd-prestart.sh
    profile: [ALL]
    dp_service: [vmafd, vmware-postgres]
  analytics:
    description: VMware Analytics Service
    id: 30
    level: 4
    type: vmon-control
    profile: [ALL]
    dp_service: [vpxd]
  legacy:
    id: 40
    type: deprecated
"#;

#[test]
fn test_full_catalog_parsing() {
    let catalog = parser::parse_str(CATALOG).unwrap();

    assert_eq!(catalog.len(), 5);
    assert_eq!(
        catalog.service_names(),
        vec!["analytics", "legacy", "lwsmd", "vmafd", "vpxd"]
    );

    let vmafd = catalog.service_info("vmafd").unwrap();
    assert_eq!(vmafd.id, Some(2));
    assert_eq!(vmafd.parent_id, Some(1));
    assert_eq!(vmafd.level, Some(1));
    assert_eq!(vmafd.service_type, Some(ServiceType::VmonControl));
    assert_eq!(vmafd.description.as_deref(), Some("VMware Authentication Framework"));
    assert_eq!(vmafd.name_in_log.as_deref(), Some("vmafd"));
    assert_eq!(vmafd.log_files, vec!["/var/log/vmware/vmafd/vmafd.log"]);
    assert!(vmafd.has_prestart());

    let legacy = catalog.service_info("legacy").unwrap();
    assert_eq!(legacy.service_type, Some(ServiceType::Other("deprecated".to_string())));
    assert!(legacy.profiles.is_empty());
}

#[test]
fn test_profile_and_type_queries() {
    let catalog = parser::parse_str(CATALOG).unwrap();

    assert_eq!(
        catalog.services_by_profile("ALL"),
        vec!["lwsmd", "vmafd", "vpxd", "analytics"]
    );
    assert_eq!(catalog.services_by_profile("HACore"), vec!["lwsmd", "vmafd"]);
    assert!(catalog.services_by_profile("NONE").is_empty());

    assert_eq!(catalog.services_by_type(&ServiceType::SystemControl), vec!["lwsmd"]);
    assert_eq!(catalog.services_by_level(3), vec!["vpxd"]);
    assert_eq!(catalog.services_with_prestart(), vec!["vmafd", "vpxd"]);
}

#[test]
fn test_reverse_dependencies_span_the_whole_catalog() {
    let catalog = parser::parse_str(CATALOG).unwrap();
    let graph = catalog.dependency_graph();

    // analytics is only in ALL, but still shows up as a dependent of vpxd
    // when looking at the HACore subset.
    assert!(!catalog.services_by_profile("HACore").contains(&"analytics".to_string()));
    assert_eq!(graph.dependents_of("vpxd"), ["analytics"]);
    assert_eq!(graph.dependents_of("vmafd"), ["vpxd"]);
    assert_eq!(graph.dependents_of("lwsmd"), ["vmafd"]);
    assert_eq!(graph.dependents_of("vmware-postgres"), ["vpxd"]);
    assert_eq!(
        graph.transitive_dependents("lwsmd"),
        vec!["analytics", "vmafd", "vpxd"]
    );
}

#[test]
fn test_lint_reports_dangling_dependency() {
    let catalog = parser::parse_str(CATALOG).unwrap();
    let warnings: Vec<String> = catalog.lint().iter().map(ToString::to_string).collect();

    assert_eq!(
        warnings,
        vec![
            "Service 'vpxd' depends on unknown service 'vmware-postgres'",
            "Service 'legacy' belongs to no profile",
        ]
    );
}

#[test]
fn test_parse_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();

    let catalog = parser::parse_file(file.path()).unwrap();
    assert_eq!(catalog.len(), 5);
}

#[test]
fn test_parse_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = parser::parse_file(dir.path().join("vcsa8u3-all-services.yaml"));
    assert!(matches!(result, Err(CatalogError::ReadError(_))));
}
