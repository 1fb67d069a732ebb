//! # Create Action — Scaffold a New Bundle
//!
//! Provides `packwright --create <name>`, which writes a ready-to-edit
//! bundle skeleton for the requested package version. Templates are
//! embedded in the binary and applied in layers: every version starts
//! from the shared base layer and later layers overwrite earlier ones,
//! so a version only carries the files that changed since the layer it
//! builds on.
//!
//! Every scaffolded skeleton passes its own version's validation
//! untouched; the round-trip test below keeps that promise honest.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use packwright_rules::{VersionMappingEntry, VersionTable};

/// One embedded template file: bundle-relative path and content.
/// `{bundle_name}` placeholders are substituted on write.
type TemplateFile = (&'static str, &'static str);

const BASE_README: &str = r#"# {bundle_name}

Describe the bundle here: what it deploys, which platform releases it
supports, and any manual steps an operator must take.
"#;

const BASE_DEPLOY_SCRIPT: &str = r#"#!/bin/bash
set -eu

echo "{bundle_name}: nothing to deploy yet"
"#;

const LEGACY_TASKS: &str = r#"# Task records executed around deployment. Each record carries a
# stage, a role selector and type-specific parameters.
- type: shell
  stage: post_deployment
  role: '*'
  parameters:
    cmd: bash deploy.sh
    timeout: 42
"#;

const DEPLOYMENT_TASKS: &str = r#"# Graph-based deployment task records.
- id: {bundle_name}_group
  type: group
  role: ['{bundle_name}']
  parameters:
    strategy:
      type: parallel
- id: {bundle_name}_deployment
  type: puppet
  groups: ['{bundle_name}']
  parameters:
    puppet_manifest: deploy.pp
    puppet_modules: modules
    timeout: 3600
"#;

const V1_METADATA: &str = r#"# Bundle manifest.
name: {bundle_name}
title: {bundle_name}
version: '1.0.0'
package_version: '1.0.0'
description: 'Describe {bundle_name} here'
platform_version: ['6.0']
licenses: ['Apache License Version 2.0']
authors: ['Specify author or company name']
homepage: 'https://example.com/{bundle_name}'
"#;

const V2_METADATA: &str = r#"# Bundle manifest.
name: {bundle_name}
title: {bundle_name}
version: '1.0.0'
package_version: '2.0.0'
description: 'Describe {bundle_name} here'
platform_version: ['6.1']
licenses: ['Apache License Version 2.0']
authors: ['Specify author or company name']
homepage: 'https://example.com/{bundle_name}'
"#;

const V2_ENV_CONFIG: &str = r#"# Environment attributes contributed by the bundle.
attributes:
  metadata:
    label: '{bundle_name} settings'
    weight: 25
  enabled:
    type: checkbox
    label: 'Enable {bundle_name}'
    weight: 10
    value: true
"#;

const V3_METADATA: &str = r#"# Bundle manifest.
name: {bundle_name}
title: {bundle_name}
version: '1.0.0'
package_version: '3.0.0'
description: 'Describe {bundle_name} here'
platform_version: ['7.0']
licenses: ['Apache License Version 2.0']
authors: ['Specify author or company name']
homepage: 'https://example.com/{bundle_name}'
releases:
  - version: '7.0'
    os: ubuntu
    mode: ['ha']
    deployment_scripts_path: deployment_scripts
"#;

const V4_METADATA: &str = r#"# Bundle manifest.
name: {bundle_name}
title: {bundle_name}
version: '1.0.0'
package_version: '4.0.0'
description: 'Describe {bundle_name} here'
platform_version: ['8.0']
licenses: ['Apache License Version 2.0']
authors: ['Specify author or company name']
homepage: 'https://example.com/{bundle_name}'
groups: ['network']
is_hotpluggable: false
releases:
  - version: '8.0'
    os: ubuntu
    mode: ['ha']
    deployment_scripts_path: deployment_scripts
"#;

const V4_COMPONENTS: &str = r#"# Components contributed to the platform component registry.
- name: 'network:{bundle_name}'
  label: '{bundle_name}'
  description: 'Describe the component here'
"#;

const V5_METADATA: &str = r#"# Bundle manifest.
name: {bundle_name}
title: {bundle_name}
version: '1.0.0'
package_version: '5.0.0'
description: 'Describe {bundle_name} here'
platform_version: ['8.0']
licenses: ['Apache License Version 2.0']
authors: ['Specify author or company name']
homepage: 'https://example.com/{bundle_name}'
is_hotpluggable: false
releases:
  - version: '8.0'
    os: ubuntu
    deployment_scripts_path: deployment_scripts
"#;

const BASE_FILES: &[TemplateFile] = &[
    ("README.md", BASE_README),
    ("deployment_scripts/deploy.sh", BASE_DEPLOY_SCRIPT),
];

const V1_FILES: &[TemplateFile] = &[
    ("metadata.yaml", V1_METADATA),
    ("tasks.yaml", LEGACY_TASKS),
];

const V2_FILES: &[TemplateFile] = &[
    ("metadata.yaml", V2_METADATA),
    ("tasks.yaml", LEGACY_TASKS),
    ("environment_config.yaml", V2_ENV_CONFIG),
];

const V3_FILES: &[TemplateFile] = &[
    ("metadata.yaml", V3_METADATA),
    ("deployment_tasks.yaml", DEPLOYMENT_TASKS),
];

const V4_FILES: &[TemplateFile] = &[
    ("metadata.yaml", V4_METADATA),
    ("components.yaml", V4_COMPONENTS),
];

const V5_FILES: &[TemplateFile] = &[
    ("metadata.yaml", V5_METADATA),
    ("deployment_tasks.yaml", DEPLOYMENT_TASKS),
];

fn layer_files(layer: &str) -> Result<&'static [TemplateFile]> {
    match layer {
        "templates/base" => Ok(BASE_FILES),
        "templates/v1" => Ok(V1_FILES),
        "templates/v2/bundle_data" => Ok(V2_FILES),
        "templates/v3/bundle_data" => Ok(V3_FILES),
        "templates/v4/bundle_data" => Ok(V4_FILES),
        "templates/v5/bundle_data" => Ok(V5_FILES),
        other => bail!("no embedded template layer named \"{other}\""),
    }
}

fn validate_bundle_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        bail!("Plugin name is invalid, use only lower case letters, numbers, '_', '-' symbols")
    }
}

/// Write the skeleton for `entry`'s package version under `target`.
///
/// Template layers apply in [`VersionMappingEntry::template_paths`]
/// order; a file written by a later layer replaces the earlier one.
pub fn scaffold_bundle(target: &Path, name: &str, entry: &VersionMappingEntry) -> Result<()> {
    if target.exists() {
        bail!(
            "\"{}\" already exists, remove it or pick another name",
            target.display()
        );
    }

    for layer in entry.template_paths() {
        for &(relative, content) in layer_files(layer)? {
            let rendered = content.replace("{bundle_name}", name);
            let path = target.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory: {}", parent.display()))?;
            }
            fs::write(&path, rendered)
                .with_context(|| format!("writing template file: {}", path.display()))?;
        }
    }

    tracing::debug!(
        name,
        version = entry.version(),
        target = %target.display(),
        "bundle skeleton written"
    );
    Ok(())
}

/// Execute `packwright --create <name>`.
pub fn run_create(name: &str, package_version: &str, table: &VersionTable) -> Result<u8> {
    validate_bundle_name(name)?;
    let entry = table.entry(package_version)?;

    let cwd = std::env::current_dir().context("resolving current directory")?;
    let target = cwd.join(name);
    scaffold_bundle(&target, name, entry)?;

    println!("Bundle skeleton created:");
    println!("  name:             {name}");
    println!("  package_version:  {}", entry.version());
    println!("  path:             {}", target.display());
    println!();
    println!("Next steps:");
    println!("  1. Describe the bundle in {name}/metadata.yaml");
    println!("  2. Validate:  packwright --check {name}");
    println!("  3. Package:   packwright --build {name}");

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use packwright_schema::FormatRegistry;

    fn table() -> VersionTable {
        let formats = Arc::new(FormatRegistry::with_builtins().unwrap());
        VersionTable::new(&formats).unwrap()
    }

    #[test]
    fn bundle_name_rules() {
        for good in ["demo", "demo_bundle", "demo-2", "0day"] {
            assert!(validate_bundle_name(good).is_ok(), "{good:?} rejected");
        }
        for bad in ["", "Has Space", "UPPER", "semi;colon", "dotted.name"] {
            assert!(validate_bundle_name(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn layer_tables_cover_every_mapped_path() {
        let table = table();
        for version in table.versions() {
            let entry = table.entry(version).unwrap();
            for layer in entry.template_paths() {
                assert!(
                    layer_files(layer).is_ok(),
                    "version {version} maps unknown layer {layer}"
                );
            }
        }
    }

    #[test]
    fn scaffold_refuses_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let entry = table.entry("1.0.0").unwrap();

        let err = scaffold_bundle(dir.path(), "demo", entry).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn scaffold_substitutes_bundle_name() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let target = dir.path().join("my_bundle");
        scaffold_bundle(&target, "my_bundle", table.entry("5.0.0").unwrap()).unwrap();

        let metadata = fs::read_to_string(target.join("metadata.yaml")).unwrap();
        assert!(metadata.contains("name: my_bundle"));
        assert!(!metadata.contains("{bundle_name}"));
    }

    #[test]
    fn scaffold_layers_override_in_order() {
        // 4.0.0 stacks its own bundle data over the 3.0.0 layer: the
        // manifest comes from the later layer, the deployment tasks
        // from the earlier one.
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let target = dir.path().join("demo");
        scaffold_bundle(&target, "demo", table.entry("4.0.0").unwrap()).unwrap();

        let metadata = fs::read_to_string(target.join("metadata.yaml")).unwrap();
        assert!(metadata.contains("package_version: '4.0.0'"));
        assert!(target.join("deployment_tasks.yaml").is_file());
        assert!(target.join("components.yaml").is_file());
        assert!(target.join("deployment_scripts/deploy.sh").is_file());
    }

    #[test]
    fn scaffolded_bundles_pass_their_own_checks() {
        let table = table();
        for version in table.versions() {
            let dir = tempfile::tempdir().unwrap();
            let entry = table.entry(version).unwrap();
            let target = dir.path().join("demo");
            scaffold_bundle(&target, "demo", entry).unwrap();

            let report = entry.validator().validate(&target).unwrap();
            assert!(
                !report.is_failed(),
                "version {version} skeleton fails its own validation:\n{report}"
            );
        }
    }
}
