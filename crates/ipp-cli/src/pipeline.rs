//! One merge run, from source tables to written parameter files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use ipp_ingest::{
    CollectOptions, CollectedTable, collect_table, load_baseline, load_rewrite_rules,
    load_source_tables,
};
use ipp_merge::{apply_rewrites, merge};
use ipp_model::{Diagnostic, Diagnostics, Node, Origin};
use ipp_output::write_tree;
use ipp_transform::build_tree;

/// Inputs of a run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source_dir: PathBuf,
    pub baseline: PathBuf,
    pub rewrites: Option<PathBuf>,
    pub target: PathBuf,
    pub options: CollectOptions,
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

/// Counts for one child of the merged root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSummary {
    pub code: String,
    pub origin: Origin,
    pub parameters: usize,
    pub conflicts: usize,
}

#[derive(Debug, Serialize)]
pub struct RunResult {
    /// Source tables with at least one dated row.
    pub tables: usize,
    pub branches: Vec<BranchSummary>,
    pub diagnostics: Vec<Diagnostic>,
    pub written: Vec<PathBuf>,
    pub dry_run: bool,
}

impl RunResult {
    pub fn parameters(&self) -> usize {
        self.branches.iter().map(|branch| branch.parameters).sum()
    }

    pub fn conflicts(&self) -> usize {
        self.branches.iter().map(|branch| branch.conflicts).sum()
    }

    /// Write the run as pretty JSON.
    pub fn write_report(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize run report")?;
        fs::write(path, json).with_context(|| format!("write report {}", path.display()))
    }
}

pub fn run(request: &RunRequest) -> Result<RunResult> {
    let run_span = info_span!("run", source = %request.source_dir.display());
    let _run_guard = run_span.enter();
    let mut diagnostics = Diagnostics::new();

    let collect_start = Instant::now();
    let tables = info_span!("collect").in_scope(|| {
        collect_tables(&request.source_dir, &request.options, &mut diagnostics)
    })?;
    info!(
        tables = tables.len(),
        duration_ms = collect_start.elapsed().as_millis(),
        "collect complete"
    );

    let source = info_span!("materialize")
        .in_scope(|| build_tree(&tables, &mut diagnostics))
        .context("build parameter tree")?;

    let merged = info_span!("merge", baseline = %request.baseline.display()).in_scope(|| {
        let baseline = load_baseline(&request.baseline).context("load baseline")?;
        let baseline = match &request.rewrites {
            Some(path) => {
                let rules = load_rewrite_rules(path).context("load rewrite rules")?;
                info!(rules = rules.len(), "applying rewrite rules");
                apply_rewrites(baseline, &rules).context("rewrite baseline")?
            }
            None => baseline,
        };
        merge(source, baseline).context("merge with baseline")
    })?;

    let written = if request.dry_run {
        info!("dry run, nothing written");
        Vec::new()
    } else {
        info_span!("write", target = %request.target.display())
            .in_scope(|| write_tree(&request.target, &merged))
            .context("write parameter files")?
    };

    Ok(RunResult {
        tables: tables.len(),
        branches: branch_summaries(&merged),
        diagnostics: diagnostics.entries().to_vec(),
        written,
        dry_run: request.dry_run,
    })
}

fn collect_tables(
    source_dir: &Path,
    options: &CollectOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<CollectedTable>> {
    let sources = load_source_tables(source_dir, diagnostics).context("load source tables")?;
    Ok(sources
        .iter()
        .map(|table| collect_table(table, options, diagnostics))
        .filter(|table| !table.is_empty())
        .collect())
}

pub fn branch_summaries(root: &Node) -> Vec<BranchSummary> {
    root.children()
        .map(|children| {
            children
                .values()
                .map(|child| BranchSummary {
                    code: child.code.clone(),
                    origin: child.origin,
                    parameters: child.parameter_count(),
                    conflicts: child.conflict_count(),
                })
                .collect()
        })
        .unwrap_or_default()
}
