use colored::Colorize;
use dcflow_core::{RuleSpec, load_datacenter, load_hosted_zone};
use std::path::Path;

/// Load both files; nothing here needs credentials
pub fn handle(datacenter: &Path, hosted_zone: &Path) -> anyhow::Result<()> {
    println!("{}", "Validating configuration...".blue());

    let datacenter = load_datacenter(datacenter)?;
    let hosted_zone = load_hosted_zone(hosted_zone)?;

    println!("{}", "✓ Configuration is valid".green().bold());
    println!();
    println!("Summary:");
    println!(
        "  VPC: {} ({})",
        datacenter.network.name.to_string().cyan(),
        datacenter.network.cidr
    );
    println!("  Subnets: {}", datacenter.subnets.len());
    for subnet in &datacenter.subnets {
        println!(
            "    - {} ({}, {})",
            subnet.name.to_string().cyan(),
            subnet.az,
            subnet.cidr
        );
    }
    println!("  Security groups: {}", datacenter.firewall_groups.len());
    for group in &datacenter.firewall_groups {
        let referencing = group
            .rules
            .iter()
            .filter(|r| matches!(r, RuleSpec::Group(_)))
            .count();
        println!(
            "    - {} ({} rules, {} group references)",
            group.name.to_string().cyan(),
            group.rules.len(),
            referencing
        );
    }
    println!("  Instances: {}", datacenter.instances.len());
    for instance in &datacenter.instances {
        println!(
            "    - {} ({}, {})",
            instance.name.to_string().cyan(),
            instance.instance_type(),
            instance.fqdn().unwrap_or("no DNS")
        );
    }
    match hosted_zone.registered_domain.as_deref() {
        Some(domain) if hosted_zone.is_enabled() => println!("  Hosted zone: {}", domain.cyan()),
        _ => println!("  Hosted zone: {}", "disabled".dimmed()),
    }
    Ok(())
}
