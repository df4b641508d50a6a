use access_policy::AccessPolicy;
use anyhow::Result;
use colored::*;
use std::path::Path;

/// Show the effective policy configuration and where it came from
pub fn show(policy: &AccessPolicy, source: Option<&Path>, format: &str) -> Result<()> {
    let config = policy.config();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        "yaml" => {
            print!("{}", config.to_yaml()?);
        }
        _ => {
            println!("{}", "=== Access Policy Configuration ===".bold());
            println!();

            let source = match source {
                Some(path) => path.display().to_string(),
                None => "defaults".to_string(),
            };
            println!("{}: {}", "Source".bold(), source.cyan());
            println!();
            println!(
                "  {}: {}",
                "max_bulk_selection".yellow(),
                config.max_bulk_selection
            );
            println!(
                "  {}: {}",
                "territoryless_resources_visible".yellow(),
                config.territoryless_resources_visible
            );
        }
    }

    Ok(())
}
