// src/output.rs

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

use crate::process::raw_table::TitledTable;

/// Write `tables` as pretty JSON to `path`.
///
/// - parent directories are created as needed
/// - the file is written to a hidden sibling, then renamed over `path`
pub fn write_tables(path: impl AsRef<Path>, tables: &[TitledTable]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let file_name = path
        .file_name()
        .with_context(|| format!("output path {} has no file name", path.display()))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    let file = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, tables).context("serializing tables")?;
    w.write_all(b"\n")
        .with_context(|| format!("writing {}", tmp_path.display()))?;
    w.flush()
        .with_context(|| format!("flushing {}", tmp_path.display()))?;
    drop(w);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    info!(path = %path.display(), tables = tables.len(), "wrote tables");
    Ok(())
}
