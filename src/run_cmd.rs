use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use pluvio_io::{
    ArtifactPaths, RunManifest, WriterConfig, read_manifest, write_extremes, write_manifest,
    write_mapping, write_series,
};
use pluvio_pipeline::{CombinationOutput, run_all};

use crate::cli::RunArgs;
use crate::config::{self, PluvioConfig};
use crate::convert;
use crate::inputs;

/// Final state of one combination in the run report.
enum Status {
    Ok,
    Cached,
    Failed(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("ok"),
            Status::Cached => f.write_str("skipped (cached)"),
            Status::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Run every configured combination and write its artifacts.
pub fn run(args: RunArgs) -> Result<()> {
    let mut config = config::load(&args.config)?;
    apply_overrides(&mut config, &args);
    let seed = resolve_seed(args.seed.or(config.seed));
    run_with(&config, seed, args.force)
}

fn apply_overrides(config: &mut PluvioConfig, args: &RunArgs) {
    if let Some(ref dir) = args.output_dir {
        config.io.output_dir = dir.clone();
    }
    if let Some(workers) = args.workers {
        config.n_workers = workers;
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed: u64 = rand::random();
        info!(seed, "no seed configured, drew one");
        seed
    })
}

/// Runs `config` with a resolved base seed.
fn run_with(config: &PluvioConfig, seed: u64, force: bool) -> Result<()> {
    let pipeline_cfg = convert::build_pipeline_config(config, seed)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let planned = inputs::plan(config);
    if planned.is_empty() {
        bail!("nothing to run: set `hindcast = true` or add [[combination]] entries");
    }
    let out_dir = &config.io.output_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;

    let mut statuses: Vec<Option<Status>> = planned.iter().map(|_| None).collect();
    let mut pending = Vec::new();
    let mut combinations = Vec::new();
    for (i, p) in planned.iter().enumerate() {
        let fingerprint = p.fingerprint(config, seed)?;
        let paths = p.artifacts(out_dir);
        if !force && is_cached(&paths, &fingerprint, out_dir) {
            info!(combination = %p.id, "outputs up to date, skipping");
            statuses[i] = Some(Status::Cached);
            continue;
        }
        match p.load(config) {
            Ok(combination) => {
                pending.push((i, paths, fingerprint));
                combinations.push(combination);
            }
            Err(e) => {
                warn!(combination = %p.id, error = %format!("{e:#}"), "cannot load inputs");
                statuses[i] = Some(Status::Failed(format!("io: {e:#}")));
            }
        }
    }

    if !combinations.is_empty() {
        let observed = inputs::load_observed(config)?;
        let outcomes = run_all(&observed, &combinations, &pipeline_cfg)?;
        for ((i, paths, fingerprint), outcome) in pending.into_iter().zip(outcomes) {
            let status = match outcome.result {
                Ok(output) => match write_outputs(&paths, &output, &fingerprint, &writer_cfg) {
                    Ok(()) => Status::Ok,
                    Err(e) => {
                        warn!(combination = %outcome.id, error = %format!("{e:#}"), "cannot write outputs");
                        Status::Failed(format!("io: {e:#}"))
                    }
                },
                Err(e) => Status::Failed(format!("{}: {e}", e.kind())),
            };
            statuses[i] = Some(status);
        }
    }

    let mut n_failed = 0;
    for (p, status) in planned.iter().zip(&statuses) {
        match status {
            Some(s) => {
                if matches!(s, Status::Failed(_)) {
                    n_failed += 1;
                }
                println!("{:<40} {s}", p.id);
            }
            None => println!("{:<40} not run", p.id),
        }
    }

    if n_failed == planned.len() {
        bail!("all {n_failed} combination(s) failed");
    }
    if n_failed > 0 {
        warn!(n_failed, n_total = planned.len(), "run finished with failures");
    }
    Ok(())
}

fn is_cached(paths: &ArtifactPaths, fingerprint: &str, dir: &Path) -> bool {
    match read_manifest(&paths.manifest()) {
        Ok(Some(manifest)) => manifest.is_current(fingerprint, dir),
        Ok(None) => false,
        Err(e) => {
            warn!(path = %paths.manifest().display(), error = %e, "ignoring unreadable manifest");
            false
        }
    }
}

/// Writes data files, then the manifest. An old manifest is removed first
/// so an interrupted write never looks complete.
fn write_outputs(
    paths: &ArtifactPaths,
    output: &CombinationOutput,
    fingerprint: &str,
    writer_cfg: &WriterConfig,
) -> Result<()> {
    let manifest_path = paths.manifest();
    if manifest_path.exists() {
        std::fs::remove_file(&manifest_path)
            .with_context(|| format!("failed to remove {}", manifest_path.display()))?;
    }
    write_series(&paths.series(), &output.series, writer_cfg)?;
    write_mapping(&paths.mapping(), &output.mapping, writer_cfg)?;
    write_extremes(&paths.extremes(), &output.extremes, writer_cfg)?;
    let manifest = RunManifest::new(fingerprint, &output.id, output.seed, paths);
    write_manifest(&manifest_path, &manifest)?;
    info!(
        combination = %output.id,
        path = %paths.series().display(),
        n_days = output.series.len(),
        "outputs written"
    );
    Ok(())
}
