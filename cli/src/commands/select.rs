use crate::utils::fixtures;
use access_policy::{AccessPolicy, Action, BulkSelection};
use anyhow::{bail, Result};
use colored::*;
use std::path::Path;

/// Which resources the user asked to select
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRequest {
    Ids(Vec<String>),
    All,
}

impl SelectionRequest {
    pub fn from_flags(ids: Vec<String>, all: bool) -> Result<Self> {
        let ids: Vec<String> = ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        match (all, ids.is_empty()) {
            (true, _) => Ok(SelectionRequest::All),
            (false, false) => Ok(SelectionRequest::Ids(ids)),
            (false, true) => bail!("Nothing to select: pass --ids or --all"),
        }
    }
}

pub fn execute(
    policy: &AccessPolicy,
    principal_path: &Path,
    resources_path: &Path,
    action: &str,
    request: SelectionRequest,
    format: &str,
) -> Result<()> {
    let action: Action = action.parse()?;
    let principal = fixtures::load_principal(principal_path)?;
    let resources = fixtures::load_resources(resources_path)?;

    let selection = match &request {
        SelectionRequest::All => policy.select_all_accessible(Some(&principal), &resources, action),
        SelectionRequest::Ids(ids) => {
            policy.select_for_bulk_action(Some(&principal), &resources, action, ids)
        }
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&selection)?);
        }
        "yaml" => {
            print!("{}", serde_yaml::to_string(&selection)?);
        }
        _ => {
            print_selection_text(&selection, action);
        }
    }

    Ok(())
}

fn print_selection_text(selection: &BulkSelection, action: Action) {
    println!("{}", format!("=== Bulk Selection ({}) ===", action).bold());
    println!();

    for id in selection.selected() {
        println!("  {} {}", "+".green(), id);
    }
    for id in selection.denied_ids() {
        println!("  {} {}", "-".red(), id.dimmed());
    }

    println!();
    println!("{}", summary(selection).green());
    if let Some(warning) = denied_warning(selection) {
        println!("{}", warning.yellow());
    }
}

fn summary(selection: &BulkSelection) -> String {
    let count = selection.selected().len();
    if selection.is_capped() {
        format!("{} leads selected (maximum)", count)
    } else {
        format!("{} leads selected", count)
    }
}

fn denied_warning(selection: &BulkSelection) -> Option<String> {
    match selection.denied_ids().len() {
        0 => None,
        n => Some(format!(
            "{} skipped. You can only perform actions on accessible leads",
            n
        )),
    }
}
