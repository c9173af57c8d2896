use crate::cli::options::OutputFormat;
use crate::inventory::Inventory;
use crate::types::DeploymentReport;

/// Print deployment report in the requested format
pub fn print_deployment_report(
    report: &DeploymentReport,
    format: OutputFormat,
) -> serde_json::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => print_report_text(report),
    }
    Ok(())
}

fn print_report_text(report: &DeploymentReport) {
    if report.dry_run {
        println!("🔍 Dry run for release {}", report.release_name);
    } else {
        println!("📦 Release {} ({})", report.release_name, report.archive);
    }

    for host in &report.hosts {
        println!("  • {} [{}]", host.host, host.address);
        println!("      upload -> {}", host.upload_path);
        if report.dry_run {
            for command in &host.commands {
                println!("      $ {command}");
            }
        } else {
            println!(
                "      {} command(s) in {:.2}s",
                host.commands.len(),
                host.duration.as_secs_f64()
            );
        }
    }
}

/// Print resolved inventory
pub fn print_hosts(inventory: &Inventory, format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(inventory)?),
        OutputFormat::Text => {
            println!("🎯 Hosts ({}):", inventory.hosts.len());
            for host in &inventory.hosts {
                match host.connection.method {
                    crate::types::ConnectionMethod::Ssh => {
                        println!("  • {} via ssh ({})", host, host.ssh_destination())
                    }
                    crate::types::ConnectionMethod::Local => println!("  • {host} (local)"),
                }
            }
            println!();
            println!("📁 Layout:");
            println!("  releases: {}", inventory.layout.releases_dir);
            println!("  current:  {}", inventory.layout.current_link);
            println!("  upload:   {}", inventory.layout.tmp_dir);
        }
    }
    Ok(())
}
