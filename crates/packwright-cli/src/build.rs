//! # Build Action — Package a Validated Bundle
//!
//! Provides `packwright --build <path>`. The bundle is validated first
//! and packaging is refused when the report fails. The artifact is a
//! zip archive named `{name}-{version}.zip` next to the bundle files;
//! the package version's builder decides what else ships inside:
//!
//! - [`BuilderKind::ArchiveV1`] / [`BuilderKind::ArchiveV2`] — the
//!   bundle files alone.
//! - [`BuilderKind::PackageV3`] — the bundle files plus a
//!   `checksums.sha256` manifest (per-file digests in `sha256sum`
//!   format) and a `build.yaml` provenance record.
//!
//! Previously built artifacts at the bundle root are never packed into
//! a new archive, so rebuilds are stable.

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use packwright_core::load_yaml;
use packwright_rules::{BuilderKind, VersionLookup, VersionTable, METADATA_FILE};

use crate::print_verdict;

/// Execute `packwright --build <path>`.
///
/// Returns `0` when the artifact was written, `1` when validation
/// failed and packaging was refused.
pub fn run_build(bundle_path: &Path, table: &VersionTable) -> Result<u8> {
    let entry = match table.resolve(bundle_path)? {
        VersionLookup::Resolved(entry) => entry,
        VersionLookup::LoadFailed(report) => return Ok(print_verdict(&report)),
    };

    let report = entry.validator().validate(bundle_path)?;
    if report.is_failed() {
        let code = print_verdict(&report);
        eprintln!("Refusing to package a bundle that fails validation.");
        return Ok(code);
    }

    let metadata = load_yaml(&bundle_path.join(METADATA_FILE))?;
    let name = metadata
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("bundle");
    let version = metadata
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or("0");
    let artifact_name = format!("{name}-{version}.zip");
    let artifact_path = bundle_path.join(&artifact_name);

    tracing::info!(
        builder = ?entry.builder(),
        artifact = %artifact_path.display(),
        "packaging bundle"
    );

    let files = bundle_files(bundle_path)?;
    match entry.builder() {
        BuilderKind::ArchiveV1 | BuilderKind::ArchiveV2 => {
            write_archive(&files, &[], &artifact_path)?;
        }
        BuilderKind::PackageV3 => {
            let checksums = checksum_manifest(&files)?;
            let build_info = build_manifest(entry.version())?;
            write_archive(
                &files,
                &[
                    ("checksums.sha256", &checksums),
                    ("build.yaml", &build_info),
                ],
                &artifact_path,
            )?;
        }
    }

    println!("Bundle packaged:");
    println!("  artifact: {}", artifact_path.display());
    Ok(0)
}

/// Provenance record embedded in `PackageV3` archives.
#[derive(Serialize)]
struct BuildManifest<'a> {
    build_date: String,
    builder_version: &'static str,
    package_version: &'a str,
}

fn build_manifest(package_version: &str) -> Result<String> {
    let manifest = BuildManifest {
        build_date: chrono::Utc::now().to_rfc3339(),
        builder_version: env!("CARGO_PKG_VERSION"),
        package_version,
    };
    serde_yaml::to_string(&manifest).context("serializing build manifest")
}

/// Per-file digests of the staged files, in `sha256sum` output format.
fn checksum_manifest(files: &[(PathBuf, String)]) -> Result<String> {
    let mut manifest = String::new();
    for (path, relative) in files {
        let contents =
            fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        manifest.push_str(&format!("{}  {relative}\n", sha256_hex(&contents)));
    }
    Ok(manifest)
}

/// Collect every file under `bundle_root` in deterministic order,
/// skipping previously built artifacts at the root.
fn bundle_files(bundle_root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(bundle_root).min_depth(1).sort_by_file_name() {
        let entry = entry.context("walking bundle directory")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(bundle_root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if is_artifact(&relative) {
            continue;
        }
        files.push((entry.path().to_path_buf(), relative));
    }
    Ok(files)
}

/// A root-level archive from a previous build run.
fn is_artifact(relative: &str) -> bool {
    !relative.contains('/') && relative.ends_with(".zip")
}

fn write_archive(
    files: &[(PathBuf, String)],
    extras: &[(&str, &str)],
    artifact_path: &Path,
) -> Result<()> {
    let file = File::create(artifact_path)
        .with_context(|| format!("creating archive: {}", artifact_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (path, relative) in files {
        zip.start_file(relative.as_str(), options)?;
        let contents =
            fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        zip.write_all(&contents)?;
    }
    for (name, contents) in extras {
        zip.start_file(*name, options)?;
        zip.write_all(contents.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
