//! Dependency manifest parsing.
//!
//! Produces a `name -> version specifier` map from the first manifest found
//! in a repository. Unknown file names and malformed content yield an empty
//! map; a broken manifest is a signal about the repository, not an error.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

/// Manifest file names recognised by basename, in lookup priority.
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "go.mod",
    "Cargo.toml",
    "pyproject.toml",
];

/// Specifier recorded when a manifest names a dependency without a version.
const ANY_VERSION: &str = "*";

/// Parse the dependencies declared by a manifest.
pub fn parse_dependencies(file_name: &str, content: &str) -> IndexMap<String, String> {
    let parsed = match file_name {
        "package.json" => parse_package_json(content),
        "Cargo.toml" => parse_cargo_toml(content),
        "requirements.txt" => Some(parse_requirements(content)),
        "go.mod" => Some(parse_go_mod(content)),
        "pyproject.toml" => parse_pyproject(content),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        debug!(file_name, "manifest not parsed, recording no dependencies");
        IndexMap::new()
    })
}

type DependencyTable = IndexMap<String, toml::Value>;

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: IndexMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: IndexMap<String, serde_json::Value>,
}

/// `dependencies` followed by `devDependencies`.
fn parse_package_json(content: &str) -> Option<IndexMap<String, String>> {
    let manifest: PackageJson = serde_json::from_str(content).ok()?;
    let deps = manifest
        .dependencies
        .into_iter()
        .chain(manifest.dev_dependencies)
        .map(|(name, spec)| {
            let spec = spec.as_str().unwrap_or(ANY_VERSION).to_string();
            (name, spec)
        })
        .collect();
    Some(deps)
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CargoManifest {
    #[serde(default)]
    dependencies: DependencyTable,
    #[serde(default)]
    dev_dependencies: DependencyTable,
    #[serde(default)]
    build_dependencies: DependencyTable,
}

fn parse_cargo_toml(content: &str) -> Option<IndexMap<String, String>> {
    let manifest: CargoManifest = toml::from_str(content).ok()?;
    let mut deps = IndexMap::new();
    for table in [
        &manifest.dependencies,
        &manifest.dev_dependencies,
        &manifest.build_dependencies,
    ] {
        collect_toml_table(table, &mut deps);
    }
    Some(deps)
}

#[derive(Deserialize)]
struct PyProject {
    #[serde(default)]
    project: Option<PyProjectMetadata>,
    #[serde(default)]
    tool: Option<PyProjectTools>,
}

#[derive(Deserialize)]
struct PyProjectMetadata {
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Deserialize)]
struct PyProjectTools {
    #[serde(default)]
    poetry: Option<Poetry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Poetry {
    #[serde(default)]
    dependencies: DependencyTable,
    #[serde(default)]
    dev_dependencies: DependencyTable,
    #[serde(default)]
    group: IndexMap<String, PoetryGroup>,
}

#[derive(Deserialize)]
struct PoetryGroup {
    #[serde(default)]
    dependencies: DependencyTable,
}

/// PEP 621 `project.dependencies` strings, then Poetry tables.
fn parse_pyproject(content: &str) -> Option<IndexMap<String, String>> {
    let manifest: PyProject = toml::from_str(content).ok()?;
    let mut deps = IndexMap::new();

    if let Some(project) = &manifest.project {
        for requirement in &project.dependencies {
            if let Some((name, spec)) = split_requirement(requirement) {
                deps.insert(name, spec);
            }
        }
    }

    if let Some(poetry) = manifest.tool.as_ref().and_then(|t| t.poetry.as_ref()) {
        collect_toml_table(&poetry.dependencies, &mut deps);
        collect_toml_table(&poetry.dev_dependencies, &mut deps);
        for group in poetry.group.values() {
            collect_toml_table(&group.dependencies, &mut deps);
        }
        // Poetry lists the interpreter itself among dependencies.
        deps.shift_remove("python");
    }

    Some(deps)
}

/// Insert `name = "spec"` and `name = { version = "spec", ... }` entries.
fn collect_toml_table(table: &DependencyTable, deps: &mut IndexMap<String, String>) {
    for (name, spec) in table {
        let version = match spec {
            toml::Value::String(v) => v.clone(),
            toml::Value::Table(t) => t
                .get("version")
                .and_then(|v| v.as_str())
                .unwrap_or(ANY_VERSION)
                .to_string(),
            _ => ANY_VERSION.to_string(),
        };
        deps.insert(name.clone(), version);
    }
}

/// One requirement per line; comments, blank lines and pip options skipped.
fn parse_requirements(content: &str) -> IndexMap<String, String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .filter_map(split_requirement)
        .collect()
}

/// Split a PEP 508 requirement into name and version specifier.
///
/// Extras and environment markers are dropped: `uvicorn[standard]>=0.20; python_version>"3.8"`
/// becomes `("uvicorn", ">=0.20")`.
fn split_requirement(requirement: &str) -> Option<(String, String)> {
    let requirement = requirement.split(';').next()?.trim();
    let name_end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(requirement.len());
    let name = &requirement[..name_end];
    if name.is_empty() {
        return None;
    }

    let mut rest = requirement[name_end..].trim_start();
    if rest.starts_with('[') {
        rest = rest.find(']').map(|i| rest[i + 1..].trim_start()).unwrap_or_default();
    }
    let spec = if rest.is_empty() { ANY_VERSION } else { rest };
    Some((name.to_string(), spec.to_string()))
}

/// `require` directives, single-line and block form.
fn parse_go_mod(content: &str) -> IndexMap<String, String> {
    let mut deps = IndexMap::new();
    let mut in_block = false;

    for line in content.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let entry = if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            line
        } else if let Some(rest) = line.strip_prefix("require") {
            let rest = rest.trim();
            if rest == "(" {
                in_block = true;
                continue;
            }
            rest
        } else {
            continue;
        };

        let mut parts = entry.split_whitespace();
        if let (Some(module), Some(version)) = (parts.next(), parts.next()) {
            deps.insert(module.to_string(), version.to_string());
        }
    }

    deps
}
