use access_policy::{Principal, Resource, SessionUser};
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a JSON or YAML file, picking the parser from the file extension
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display())),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in {}", path.display())),
        _ => Err(anyhow!(
            "Unsupported file format for {}: expected .json, .yaml or .yml",
            path.display()
        )),
    }
}

/// Load a session user and validate it into a principal
pub fn load_principal(path: &Path) -> Result<Principal> {
    let session: SessionUser = load(path)?;
    let principal = Principal::try_from(session)
        .with_context(|| format!("Invalid principal in {}", path.display()))?;

    debug!(
        path = %path.display(),
        user_id = principal.user_id(),
        role = principal.role().as_str(),
        territories = principal.territories().len(),
        authenticated = principal.is_authenticated(),
        "Loaded principal"
    );
    Ok(principal)
}

pub fn load_resource(path: &Path) -> Result<Resource> {
    let resource: Resource = load(path)?;
    debug!(path = %path.display(), id = %resource.id, "Loaded resource");
    Ok(resource)
}

pub fn load_resources(path: &Path) -> Result<Vec<Resource>> {
    let resources: Vec<Resource> = load(path)?;
    debug!(path = %path.display(), count = resources.len(), "Loaded resources");
    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_policy::Role;
    use tempfile::TempDir;

    #[test]
    fn test_load_principal_json_and_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let json = temp_dir.path().join("kam.json");
        let yaml = temp_dir.path().join("kam.yaml");
        fs::write(&json, r#"{"userId": "kam-1", "role": "KAM", "territories": ["North"]}"#).unwrap();
        fs::write(&yaml, "userId: kam-1\nrole: kam\nterritories:\n  - North\n").unwrap();

        let from_json = load_principal(&json).unwrap();
        let from_yaml = load_principal(&yaml).unwrap();
        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json.role(), Role::Kam);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ghost.json");
        fs::write(&path, r#"{"userId": "g-1", "role": "ghost"}"#).unwrap();

        let err = load_principal(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown role: ghost"));
    }

    #[test]
    fn test_load_resources_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leads.yml");
        fs::write(
            &path,
            "- id: lead-1\n  territory: North\n- id: lead-2\n  assignedTo: cp-1\n",
        )
        .unwrap();

        let resources = load_resources(&path).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1].assigned_to.as_deref(), Some("cp-1"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lead.csv");
        fs::write(&path, "id\nlead-1\n").unwrap();

        let err = load_resource(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }
}
