use super::{Session, print_report};
use colored::Colorize;
use std::path::Path;

pub async fn handle(datacenter: &Path, hosted_zone: &Path) -> anyhow::Result<()> {
    let session = Session::open(datacenter, hosted_zone).await?;
    println!(
        "{} {}",
        "Provisioning datacenter".blue(),
        session.datacenter.network.name.to_string().cyan()
    );

    let outcome = session
        .engine
        .provision(&session.datacenter, &session.hosted_zone)
        .await?;
    print_report("Provision", &outcome.report);

    if !outcome.inventory.is_empty() {
        println!();
        println!("{}", "Instances:".bold());
        for instance in &outcome.inventory {
            println!(
                "  {} {} {}",
                instance.name.cyan(),
                instance.public_ip.as_deref().unwrap_or("-"),
                instance.dns_name.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}
