//! Directory writer for annotated containers.
//!
//! Layout of an output directory:
//!
//! ```text
//! obs.csv            sample index + per-sample columns
//! var.csv            assay index + per-assay columns
//! X.csv              primary matrix, samples by assays
//! layers/<key>.csv   one file per layer, same layout as X.csv
//! uns.json           dataset metadata lists
//! manifest.json      provenance and shape
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tau_transform::AnnotatedContainer;
use tracing::{debug, info};

use crate::common::{compute_file_sha256, ensure_output_dir, write_csv, write_json};
use crate::tables::layer_frame;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Options for writing a container.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Source table the container was converted from; hashed into the manifest.
    pub source: Option<PathBuf>,
}

impl WriteOptions {
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }
}

/// Source table provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: String,
    pub sha256: String,
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub tool_version: String,
    /// RFC 3339, UTC.
    pub created_at: String,
    pub primary_layer: String,
    pub n_obs: usize,
    pub n_vars: usize,
    pub obs_index: String,
    pub var_index: String,
    pub layers: Vec<String>,
    pub uns_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
}

/// Files written by [`write_container`], relative to the output directory.
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    pub files: Vec<PathBuf>,
}

/// Write a container into `output_dir`, creating it if needed.
pub fn write_container(
    container: &AnnotatedContainer,
    output_dir: &Path,
    options: &WriteOptions,
) -> Result<WrittenFiles> {
    let start = Instant::now();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let mut written = WrittenFiles::default();
    let obs_name = container.obs().index_name();

    let mut obs = container.obs().to_frame().context("build obs table")?;
    write_csv(&mut obs, &output_dir.join("obs.csv"))?;
    written.files.push(PathBuf::from("obs.csv"));

    let mut var = container.var().to_frame().context("build var table")?;
    write_csv(&mut var, &output_dir.join("var.csv"))?;
    written.files.push(PathBuf::from("var.csv"));

    let primary = container
        .layer(container.primary_key())
        .with_context(|| format!("primary layer {} missing", container.primary_key()))?;
    let mut x = layer_frame(primary, obs_name).context("build X table")?;
    write_csv(&mut x, &output_dir.join("X.csv"))?;
    written.files.push(PathBuf::from("X.csv"));

    let layers_dir = ensure_output_dir(output_dir, "layers")?;
    for layer in container.layers() {
        let mut frame = layer_frame(layer, obs_name)
            .with_context(|| format!("build layer {}", layer.key))?;
        let file_name = format!("{}.csv", layer.key);
        write_csv(&mut frame, &layers_dir.join(&file_name))?;
        debug!(layer = %layer.key, "layer written");
        written.files.push(Path::new("layers").join(file_name));
    }

    write_json(container.uns(), &output_dir.join("uns.json"))?;
    written.files.push(PathBuf::from("uns.json"));

    let manifest = build_manifest(container, options)?;
    write_json(&manifest, &output_dir.join(MANIFEST_FILE))?;
    written.files.push(PathBuf::from(MANIFEST_FILE));

    info!(
        output_dir = %output_dir.display(),
        files = written.files.len(),
        duration_ms = start.elapsed().as_millis(),
        "container written"
    );
    Ok(written)
}

fn build_manifest(container: &AnnotatedContainer, options: &WriteOptions) -> Result<Manifest> {
    let source = match &options.source {
        Some(path) => Some(SourceInfo {
            path: path.display().to_string(),
            sha256: compute_file_sha256(path)?,
        }),
        None => None,
    };
    let (n_obs, n_vars) = container.shape();
    Ok(Manifest {
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        primary_layer: container.primary_key().to_string(),
        n_obs,
        n_vars,
        obs_index: container.obs().index_name().to_string(),
        var_index: container.var().index_name().to_string(),
        layers: container
            .layer_keys()
            .into_iter()
            .map(str::to_string)
            .collect(),
        uns_keys: container.uns().keys().cloned().collect(),
        source,
    })
}
