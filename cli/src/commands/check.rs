use crate::utils::fixtures;
use access_policy::{AccessPolicy, Decision, Principal, Resource};
use anyhow::Result;
use colored::*;
use std::path::Path;

/// Evaluate a single decision. Returns whether access was granted.
///
/// The action is passed through as a string so unknown names surface as an
/// `INVALID_ACTION` decision rather than a usage error.
pub fn execute(
    policy: &AccessPolicy,
    principal_path: &Path,
    resource_path: &Path,
    action: &str,
    format: &str,
) -> Result<bool> {
    let principal = fixtures::load_principal(principal_path)?;
    let resource = fixtures::load_resource(resource_path)?;

    let decision = policy.can_perform_action(Some(&principal), Some(&resource), action);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        "yaml" => {
            print!("{}", serde_yaml::to_string(&decision)?);
        }
        _ => {
            print_decision_text(&principal, &resource, action, &decision);
        }
    }

    Ok(decision.has_access)
}

fn print_decision_text(principal: &Principal, resource: &Resource, action: &str, decision: &Decision) {
    println!("{}", "=== Access Decision ===".bold());
    println!();
    println!(
        "{}: {} ({})",
        "Principal".bold(),
        principal.user_id().cyan(),
        principal.role().as_str().yellow()
    );
    println!("{}: {}", "Resource".bold(), resource.id.cyan());
    println!("{}: {}", "Action".bold(), action.cyan());
    println!();

    match decision.reason {
        None => println!("{}: {}", "Decision".bold(), "ALLOWED".green().bold()),
        Some(reason) => {
            println!("{}: {}", "Decision".bold(), "DENIED".red().bold());
            println!("{}: {}", "Reason".bold(), reason.code().yellow());
            println!("{}: {}", "Message".bold(), decision.message);
        }
    }
}
