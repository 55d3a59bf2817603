use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkplate::api::{self, GeomCfg, LayerCfg, Linkage};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod render;
mod table;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Evaluate planar linkages and layer their plates for fabrication")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print every point's position at one drive angle
    Eval {
        #[arg(long)]
        linkage: PathBuf,
        /// Drive angle in radians
        #[arg(long, default_value_t = 0.0)]
        theta: f64,
    },
    /// Sample a full cycle and write per-point traces (CSV, or Parquet by extension)
    Traces {
        #[arg(long)]
        linkage: PathBuf,
        #[arg(long, default_value_t = GeomCfg::default().samples)]
        samples: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the rigid plates
    Plates {
        #[arg(long)]
        linkage: PathBuf,
    },
    /// Layer the plates into the fewest planes
    Planes {
        #[arg(long)]
        linkage: PathBuf,
        #[arg(long, default_value_t = GeomCfg::default().samples)]
        samples: usize,
        /// Pass-through distance around connection points
        #[arg(long, default_value_t = GeomCfg::default().pass_thru_margin)]
        margin: f64,
        /// Stop the search after this many placements
        #[arg(long)]
        max_frames: Option<usize>,
        /// Report every optimum instead of the first
        #[arg(long)]
        all_optima: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Eval { linkage, theta } => eval(&linkage, theta),
        Action::Traces {
            linkage,
            samples,
            out,
        } => traces(&linkage, samples, &out),
        Action::Plates { linkage } => plates(&linkage),
        Action::Planes {
            linkage,
            samples,
            margin,
            max_frames,
            all_optima,
            out,
        } => {
            let geom = GeomCfg {
                samples,
                pass_thru_margin: margin,
                ..GeomCfg::default()
            };
            let layer = LayerCfg {
                max_frames,
                enumerate_ties: all_optima,
            };
            planes(&linkage, geom, layer, out.as_deref())
        }
        Action::Report => report(),
    }
}

fn load(path: &Path) -> Result<Linkage> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading linkage {}", path.display()))?;
    let linkage: Linkage = serde_json::from_str(&text)
        .with_context(|| format!("parsing linkage {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        links = linkage.links.len(),
        params = linkage.params.len(),
        "loaded linkage"
    );
    Ok(linkage)
}

fn print(v: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

fn eval(path: &Path, theta: f64) -> Result<()> {
    let linkage = load(path)?;
    let mech = linkage.mechanism().context("compiling linkage")?;
    let pose = mech
        .evaluate(theta)
        .with_context(|| format!("evaluating at theta={theta}"))?;
    print(&render::pose(&mech, &pose))
}

fn traces(path: &Path, samples: usize, out: &Path) -> Result<()> {
    let linkage = load(path)?;
    let mech = linkage.mechanism().context("compiling linkage")?;
    let sampling = mech.sample(samples);
    tracing::info!(
        samples,
        feasible = sampling.poses.len(),
        runs = sampling.run_count(),
        "sampled cycle"
    );
    let mut df = table::traces_frame(&mech, &sampling.traces(&mech))?;
    table::write_frame(&mut df, out)?;
    provenance::write_sidecar(
        out,
        Payload::new(json!({"command": "traces", "samples": samples})).with_input(path),
    )?;
    Ok(())
}

fn plates(path: &Path) -> Result<()> {
    let linkage = load(path)?;
    let mech = linkage.mechanism().context("compiling linkage")?;
    let plates = linkplate::plates::build_plates(&mech);
    print(&render::plates(&mech, &plates))
}

fn planes(path: &Path, geom: GeomCfg, layer: LayerCfg, out: Option<&Path>) -> Result<()> {
    let linkage = load(path)?;
    let mech = linkage.mechanism().context("compiling linkage")?;
    let layout = api::layout(&linkage, &geom, &layer).context("layering plates")?;
    tracing::info!(
        plates = layout.plates.len(),
        score = layout.layering.score,
        optima = layout.layering.solutions.len(),
        "layered plates"
    );
    let doc = render::layout(&mech, &layout);
    let Some(out) = out else {
        return print(&doc);
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let params = json!({
        "command": "planes",
        "samples": geom.samples,
        "margin": geom.pass_thru_margin,
        "max_frames": layer.max_frames,
        "all_optima": layer.enumerate_ties,
    });
    provenance::write_sidecar(out, Payload::new(params).with_input(path))?;
    Ok(())
}

fn report() -> Result<()> {
    print(&provenance::document(json!({}), &[], &[]))
}
