//! High-level orchestration: repository → SPSR graph → training corpus.
//!
//! The public entry point is [`build_corpus`]. It scans the repository, parses
//! and segments every file on the rayon pool, resolves symbols against a
//! repository-wide index, builds the graph, samples one chain per target unit,
//! assembles the samples and writes all artifacts into
//! `<root>/spsr_corpus/<timestamp>/` (or `output.out_dir`).
//!
//! Failure policy: a missing repository or an unreadable file aborts the run;
//! a file that fails to parse is recorded and skipped; a sample whose target
//! alone exceeds the budget is dropped.

use crate::{
    assemble::Assembler,
    config::model::CorpusConfig,
    core::{
        fs_scan::{self, ScannedFile},
        ids::hash_content,
        parse::{ParseFailure, TreeSitterParser},
        summary::{Counts, RunReport, SummaryStopwatch},
    },
    error::CorpusError,
    export::save_all::{self, PersistSummary},
    graph::{GraphBuilder, SpsrGraph},
    model::sample::TrainingSample,
    resolve::{FileAnalysis, SymbolIndex, analyze_source},
    traverse::ChainGenerator,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main pipeline: build the graph, sample the corpus and persist everything.
///
/// # Arguments
/// * `root` - repository root.
/// * `cfg` - validated again here; CLI/env overrides may have changed it.
///
/// # Returns
/// [`PersistSummary`] with artifact paths and the run report.
#[tracing::instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn build_corpus(root: &Path, cfg: &CorpusConfig) -> Result<PersistSummary> {
    let mut sw = SummaryStopwatch::start();
    let (root_path, graph, mut report) = graph_phase(root, cfg, &mut sw)?;

    let samples = sample_corpus(&graph, cfg, &mut report.counts);
    sw.stop_sampling();

    let out_dir: PathBuf = match &cfg.output.out_dir {
        Some(dir) => dir.clone(),
        None => {
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
            root_path.join("spsr_corpus").join(timestamp)
        }
    };

    // summary.json carries every phase but persist itself
    report.timings_ms = sw.timings();
    let mut summary = save_all::persist_all(&out_dir, &graph, &samples, report, &cfg.output)?;
    sw.stop_persist();
    summary.report.timings_ms = sw.into_timings();

    info!(
        out_dir = %out_dir.display(),
        samples = summary.report.counts.samples_produced,
        dropped = summary.report.counts.samples_dropped,
        "Corpus saved"
    );
    Ok(summary)
}

/// Build the SPSR graph only (no sampling, nothing written).
pub fn build_graph(root: &Path, cfg: &CorpusConfig) -> Result<(SpsrGraph, RunReport)> {
    let mut sw = SummaryStopwatch::start();
    let (_, graph, mut report) = graph_phase(root, cfg, &mut sw)?;
    report.timings_ms = sw.into_timings();
    Ok((graph, report))
}

fn graph_phase(
    root: &Path,
    cfg: &CorpusConfig,
    sw: &mut SummaryStopwatch,
) -> Result<(PathBuf, SpsrGraph, RunReport)> {
    let root_path = dunce::canonicalize(root)
        .map_err(|_| CorpusError::RepositoryNotFound(root.to_path_buf()))?;
    cfg.validate()?;

    let mut report = RunReport::new(&root_path);

    // 1. Scan
    let scan = fs_scan::scan_repo(&root_path, cfg)?;
    report.counts.record_scan(&scan);
    sw.stop_scan();

    // 2. Read (fatal on I/O error), then drop exact duplicates in file order
    let contents: Vec<(&ScannedFile, Vec<u8>)> = scan
        .files
        .par_iter()
        .map(|f| {
            std::fs::read(&f.path)
                .map(|bytes| (f, bytes))
                .map_err(|e| CorpusError::io(&f.path, e))
        })
        .collect::<Result<_, CorpusError>>()
        .context("read repository files")?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(contents.len());
    for (f, bytes) in contents {
        if cfg.filters.dedupe_by_content && !seen.insert(hash_content(&bytes)) {
            report.counts.files_deduplicated += 1;
            continue;
        }
        unique.push((f, bytes));
    }

    // 3. Parse + segment + extract, per file
    let parser = TreeSitterParser::new(cfg.limits.max_ast_depth, cfg.limits.strict_syntax);
    let outcomes: Vec<(&ScannedFile, Result<FileAnalysis, ParseFailure>)> = unique
        .into_par_iter()
        .map(|(f, bytes)| {
            let analysis = String::from_utf8(bytes)
                .map_err(|_| ParseFailure::NotUtf8)
                .and_then(|text| analyze_source(&parser, &f.rel_path, f.language, text));
            (f, analysis)
        })
        .collect();

    let mut analyses = Vec::with_capacity(outcomes.len());
    for (f, outcome) in outcomes {
        match outcome {
            Ok(fa) => {
                if fa.truncated {
                    report.counts.files_truncated += 1;
                }
                analyses.push(fa);
            }
            Err(err) => {
                warn!(file = %f.rel_path, error = %err, "parse failure, file skipped");
                report.record_failure(f.rel_path.clone(), &err);
            }
        }
    }
    report.counts.files_processed = analyses.len();
    info!(
        processed = report.counts.files_processed,
        failed = report.counts.files_failed,
        deduplicated = report.counts.files_deduplicated,
        "Segmented files"
    );
    sw.stop_parse_segment();

    // 4. Index + graph
    let index = SymbolIndex::build(&analyses);
    let graph = GraphBuilder::new(&index).build(analyses);
    report.counts.record_graph(&graph);
    info!(
        units = report.counts.units_total,
        edges = report.counts.edges_total,
        unresolved = report.counts.unresolved_references,
        "Built graph"
    );
    sw.stop_graph_build();

    Ok((root_path, graph, report))
}

/// One sample per target unit, in graph order. Dropped samples are counted.
#[tracing::instrument(level = "info", skip_all)]
pub fn sample_corpus(
    graph: &SpsrGraph,
    cfg: &CorpusConfig,
    counts: &mut Counts,
) -> Vec<TrainingSample> {
    let generator = ChainGenerator::new(graph, &cfg.sampling);
    let assembler = Assembler::new(
        graph,
        cfg.sampling.length_budget,
        &cfg.output.file_separator,
    );

    let targets: Vec<_> = generator.targets().collect();
    let outcomes: Vec<crate::Result<TrainingSample>> = targets
        .par_iter()
        .map(|u| generator.chain_from(&u.id).and_then(|c| assembler.assemble(&c)))
        .collect();

    let mut samples = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(sample) => {
                if sample.truncated {
                    counts.samples_truncated += 1;
                }
                samples.push(sample);
            }
            Err(err) => {
                warn!(error = %err, "sample dropped");
                counts.samples_dropped += 1;
            }
        }
    }
    counts.samples_produced = samples.len();
    info!(
        produced = counts.samples_produced,
        dropped = counts.samples_dropped,
        truncated = counts.samples_truncated,
        "Sampled corpus"
    );
    samples
}
