//! Long-format trace tables (`point, run, sample, x, y`) written with polars.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use linkplate::linkage::{Mechanism, PointId, Trace};
use polars::prelude::*;

/// One row per sampled position; `sample` counts from 0 within each run.
pub fn traces_frame(mech: &Mechanism, traces: &BTreeMap<PointId, Trace>) -> PolarsResult<DataFrame> {
    let mut point = Vec::new();
    let mut run = Vec::new();
    let mut sample = Vec::new();
    let mut x = Vec::new();
    let mut y = Vec::new();
    for (&id, trace) in traces {
        for (r, positions) in trace.iter().enumerate() {
            for (s, p) in positions.iter().enumerate() {
                point.push(mech.name(id).to_string());
                run.push(r as u32);
                sample.push(s as u32);
                x.push(p.x);
                y.push(p.y);
            }
        }
    }
    df!(
        "point" => point,
        "run" => run,
        "sample" => sample,
        "x" => x,
        "y" => y,
    )
}

/// Write `df` as Parquet when the path ends in `.parquet`, CSV otherwise.
pub fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let parquet = path.extension().is_some_and(|e| e == "parquet");
    if parquet {
        ParquetWriter::new(file)
            .finish(df)
            .with_context(|| format!("writing parquet {}", path.display()))?;
    } else {
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .with_context(|| format!("writing csv {}", path.display()))?;
    }
    tracing::info!(rows = df.height(), path = %path.display(), parquet, "wrote trace table");
    Ok(())
}
