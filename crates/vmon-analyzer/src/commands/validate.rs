use super::CatalogArgs;
use anyhow::Result;
use tracing::debug;
use vmon_catalog::{ServiceCatalog, ServiceType};

pub fn run(catalog_args: &CatalogArgs) -> Result<()> {
    let path = catalog_args.path();
    println!("Validating {}...", path.display());

    let catalog = catalog_args.load()?;

    println!("✓ Catalog valid");
    println!("  Services: {}", catalog.len());
    println!(
        "  With pre-start command: {}",
        catalog.services_with_prestart().len()
    );

    let mut types: Vec<ServiceType> = Vec::new();
    let mut levels: Vec<u32> = Vec::new();
    for descriptor in catalog.descriptors() {
        if let Some(service_type) = &descriptor.service_type {
            if !types.contains(service_type) {
                types.push(service_type.clone());
            }
        }
        if let Some(level) = descriptor.level {
            if !levels.contains(&level) {
                levels.push(level);
            }
        }
    }
    levels.sort_unstable();

    if !types.is_empty() {
        println!("  Types:");
        for service_type in &types {
            println!(
                "    {}: {}",
                service_type,
                catalog.services_by_type(service_type).len()
            );
        }
    }

    if !levels.is_empty() {
        println!("  Levels:");
        for level in levels {
            println!("    {}: {}", level, catalog.services_by_level(level).len());
        }
    }

    println!("  Profiles:");
    for profile in catalog.profiles() {
        println!(
            "    {}: {}",
            profile,
            catalog.services_by_profile(&profile).len()
        );
    }

    let warnings = catalog.lint();
    for warning in &warnings {
        debug!("Catalog lint: {}", warning);
        println!("  ⚠ {}", warning);
    }
    if warnings.is_empty() {
        println!("  No warnings");
    }

    Ok(())
}
