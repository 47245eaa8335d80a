use super::CatalogArgs;
use anyhow::Result;

pub fn run(service: &str, catalog_args: &CatalogArgs) -> Result<()> {
    let catalog = catalog_args.load()?;
    let descriptor = catalog.require(service)?;
    let graph = catalog.dependency_graph();

    println!("Service: {}", descriptor.name);
    if let Some(level) = descriptor.level {
        println!("  Level: {}", level);
    }
    if !descriptor.profiles.is_empty() {
        println!("  Profiles: {}", descriptor.profiles.join(", "));
    }

    print_list("Depends on", graph.dependencies_of(service));
    print_list("Required by", graph.dependents_of(service));
    print_list(
        "Required by (transitive)",
        &graph.transitive_dependents(service),
    );

    Ok(())
}

fn print_list(label: &str, services: &[String]) {
    if services.is_empty() {
        println!("  {}: none", label);
    } else {
        println!("  {}: {}", label, services.join(", "));
    }
}
