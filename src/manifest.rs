//! Version propagation across project manifests.
//!
//! Planning reads the manifests under a root and returns the rewritten
//! contents without touching disk; [`stage_manifest_updates`] turns them
//! into temp files that the caller persists once every output is staged.
//!
//! Supported:
//! - root `package.json` plus every workspace `package.json` matched by its
//!   `workspaces` globs. Intra-workspace dependency ranges become `^X.Y.Z`.
//! - root `Cargo.toml` (`[package]` and `[workspace.package]` versions),
//!   edited format-preserving.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ManifestError;
use crate::staged::StagedFile;

const DEPENDENCY_TABLES: [&str; 3] = ["dependencies", "devDependencies", "peerDependencies"];

/// The kind of manifest an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    CargoToml,
}

impl std::fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestKind::PackageJson => write!(f, "package.json"),
            ManifestKind::CargoToml => write!(f, "Cargo.toml"),
        }
    }
}

/// New contents for one manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestUpdate {
    pub path: PathBuf,
    pub kind: ManifestKind,
    pub contents: String,
}

/// Read the current version from the root manifest, `package.json` first.
pub fn detect_version(root: &Path) -> Result<Option<Version>, ManifestError> {
    let package_path = root.join("package.json");
    if package_path.exists() {
        let json = read_json(&package_path)?;
        if let Some(v) = json.get("version").and_then(Value::as_str) {
            return parse_version(&package_path, v).map(Some);
        }
    }

    let cargo_path = root.join("Cargo.toml");
    if cargo_path.exists() {
        let doc = read_toml(&cargo_path)?;
        let version = doc
            .get("package")
            .and_then(|p| p.get("version"))
            .and_then(|v| v.as_str())
            .or_else(|| {
                doc.get("workspace")
                    .and_then(|w| w.get("package"))
                    .and_then(|p| p.get("version"))
                    .and_then(|v| v.as_str())
            });
        if let Some(v) = version {
            return parse_version(&cargo_path, v).map(Some);
        }
    }

    Ok(None)
}

/// Compute every manifest rewrite needed to move the project to `version`.
pub fn plan_manifest_updates(
    root: &Path,
    version: &Version,
) -> Result<Vec<ManifestUpdate>, ManifestError> {
    let mut updates = Vec::new();

    let package_path = root.join("package.json");
    if package_path.exists() {
        updates.extend(plan_package_json(root, &package_path, version)?);
    }

    let cargo_path = root.join("Cargo.toml");
    if cargo_path.exists() {
        if let Some(update) = plan_cargo_toml(&cargo_path, version)? {
            updates.push(update);
        }
    }

    debug!(count = updates.len(), %version, "Planned manifest updates");
    Ok(updates)
}

/// Stage every planned update next to its manifest.
///
/// On error, files staged so far are dropped and no manifest changes.
pub fn stage_manifest_updates(updates: &[ManifestUpdate]) -> Result<Vec<StagedFile>, ManifestError> {
    updates
        .iter()
        .map(|update| {
            StagedFile::new(&update.path, update.contents.as_bytes()).map_err(|e| {
                ManifestError::WriteFailed {
                    path: update.path.clone(),
                    source: e,
                }
            })
        })
        .collect()
}

// --- package.json ---

fn plan_package_json(
    root: &Path,
    package_path: &Path,
    version: &Version,
) -> Result<Vec<ManifestUpdate>, ManifestError> {
    let mut root_json = read_json(package_path)?;
    let patterns = workspace_patterns(&root_json);

    set_json_version(package_path, &mut root_json, version)?;
    let mut updates = vec![ManifestUpdate {
        path: package_path.to_path_buf(),
        kind: ManifestKind::PackageJson,
        contents: to_json_string(package_path, &root_json)?,
    }];

    let mut members: Vec<(PathBuf, Value)> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::from([package_path.to_path_buf()]);
    for pattern in patterns {
        for path in expand_workspace(root, &pattern)? {
            if !seen.insert(path.clone()) {
                continue;
            }
            let json = read_json(&path)?;
            members.push((path, json));
        }
    }

    let names: HashSet<String> = members
        .iter()
        .filter_map(|(_, json)| json.get("name").and_then(Value::as_str).map(String::from))
        .collect();
    let range = format!("^{}", version);

    for (path, mut json) in members {
        set_json_version(&path, &mut json, version)?;

        for table in DEPENDENCY_TABLES {
            if let Some(deps) = json.get_mut(table).and_then(Value::as_object_mut) {
                for (dep, spec) in deps.iter_mut() {
                    if names.contains(dep) {
                        *spec = Value::String(range.clone());
                    }
                }
            }
        }

        let contents = to_json_string(&path, &json)?;
        updates.push(ManifestUpdate {
            path,
            kind: ManifestKind::PackageJson,
            contents,
        });
    }

    Ok(updates)
}

fn set_json_version(path: &Path, json: &mut Value, version: &Version) -> Result<(), ManifestError> {
    let obj = json.as_object_mut().ok_or_else(|| ManifestError::Invalid {
        path: path.to_path_buf(),
        reason: "Top-level value is not an object".into(),
    })?;
    obj.insert("version".to_string(), Value::String(version.to_string()));
    Ok(())
}

/// `workspaces` is either an array of globs or `{ "packages": [...] }`.
fn workspace_patterns(json: &Value) -> Vec<String> {
    let list = match json.get("workspaces") {
        Some(Value::Array(items)) => Some(items),
        Some(Value::Object(obj)) => obj.get("packages").and_then(Value::as_array),
        _ => None,
    };

    list.map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn expand_workspace(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, ManifestError> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full = Path::new(&escaped_root).join(pattern).join("package.json");
    let full = full.to_string_lossy();

    let entries = glob::glob(&full).map_err(|e| ManifestError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ManifestError::ReadFailed {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

fn read_json(path: &Path) -> Result<Value, ManifestError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| ManifestError::Invalid {
        path: path.to_path_buf(),
        reason: format!("Invalid JSON: {}", e),
    })
}

/// Four-space indent with a trailing newline.
fn to_json_string(path: &Path, value: &Value) -> Result<String, ManifestError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ManifestError::Invalid {
            path: path.to_path_buf(),
            reason: format!("Failed to serialize JSON: {}", e),
        })?;

    let mut out = String::from_utf8(buf).map_err(|e| ManifestError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    out.push('\n');
    Ok(out)
}

// --- Cargo.toml ---

fn plan_cargo_toml(path: &Path, version: &Version) -> Result<Option<ManifestUpdate>, ManifestError> {
    let mut doc = read_toml(path)?;
    let mut changed = false;

    if doc.get("package").and_then(|p| p.get("version")).is_some() {
        doc["package"]["version"] = toml_edit::value(version.to_string());
        changed = true;
    }
    if doc
        .get("workspace")
        .and_then(|w| w.get("package"))
        .and_then(|p| p.get("version"))
        .is_some()
    {
        doc["workspace"]["package"]["version"] = toml_edit::value(version.to_string());
        changed = true;
    }

    Ok(changed.then(|| ManifestUpdate {
        path: path.to_path_buf(),
        kind: ManifestKind::CargoToml,
        contents: doc.to_string(),
    }))
}

fn read_toml(path: &Path) -> Result<toml_edit::DocumentMut, ManifestError> {
    let content = read_file(path)?;
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| ManifestError::Invalid {
            path: path.to_path_buf(),
            reason: format!("Invalid TOML: {}", e),
        })
}

// --- Shared helpers ---

fn parse_version(path: &Path, raw: &str) -> Result<Version, ManifestError> {
    Version::parse(raw).map_err(|e| ManifestError::Invalid {
        path: path.to_path_buf(),
        reason: format!("Invalid version '{}': {}", raw, e),
    })
}

fn read_file(path: &Path) -> Result<String, ManifestError> {
    std::fs::read_to_string(path).map_err(|e| ManifestError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
