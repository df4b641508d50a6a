use crate::utils::fixtures;
use access_policy::{AccessPolicy, Action, Resource};
use anyhow::Result;
use colored::*;
use std::path::Path;

/// Print the subset of resources the principal may act on
pub fn execute(
    policy: &AccessPolicy,
    principal_path: &Path,
    resources_path: &Path,
    action: &str,
    format: &str,
) -> Result<()> {
    let action: Action = action.parse()?;
    let principal = fixtures::load_principal(principal_path)?;
    let resources = fixtures::load_resources(resources_path)?;

    let accessible = policy.filter_accessible_resources(Some(&principal), &resources, action);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&accessible)?);
        }
        "yaml" => {
            print!("{}", serde_yaml::to_string(&accessible)?);
        }
        _ => {
            print_resources_text(&accessible, resources.len(), action);
        }
    }

    Ok(())
}

fn print_resources_text(accessible: &[&Resource], total: usize, action: Action) {
    println!("{}", format!("=== Accessible Resources ({}) ===", action).bold());
    println!();

    if accessible.is_empty() {
        println!("{}", "No accessible resources".yellow());
    }

    for resource in accessible {
        println!(
            "  {}  territory={}  assigned_to={}",
            resource.id.cyan(),
            resource.territory.as_deref().unwrap_or("-"),
            resource.assigned_to.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!(
        "{}",
        format!("Accessible: {} of {}", accessible.len(), total).green()
    );
}
