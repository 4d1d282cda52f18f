//! Offline ranking from a JSON file.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tablerank_ranking::{
    load_weights, ranking_change, RankInput, RankOutcome, Ranker, WeightsConfig, DEFAULT_TOP_N,
};

/// Input file layout: the subject, its competitors and optionally the rank
/// from a previous run.
#[derive(Debug, Deserialize)]
pub(crate) struct RankFile {
    pub subject: RankInput,
    #[serde(default)]
    pub competitors: Vec<RankInput>,
    #[serde(default)]
    pub previous_rank: Option<usize>,
}

pub(crate) fn parse_rank_file(content: &str) -> anyhow::Result<RankFile> {
    serde_json::from_str(content).context("rank input must be a JSON object with a `subject`")
}

/// Rank, counts and the best [`DEFAULT_TOP_N`] candidates as a text table.
pub(crate) fn render_outcome(outcome: &RankOutcome, previous_rank: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Rank: {} of {}",
        outcome.rank,
        outcome.total_competitors + 1
    );
    let _ = writeln!(out, "Similar restaurants: {}", outcome.similar_restaurants);
    let _ = writeln!(out, "Stronger competitors: {}", outcome.stronger_competitors);
    if let Some(previous) = previous_rank {
        let change = ranking_change(outcome.rank, Some(previous));
        let _ = writeln!(out, "Change: {}", change.message);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<4}{:<6}{:<6}{:<6}{:<8}NAME",
        "#", "SIM", "DIST", "PROM", "SCORE"
    );
    for (position, candidate) in outcome.top(DEFAULT_TOP_N).iter().enumerate() {
        let name = candidate.name.as_deref().unwrap_or("(unnamed)");
        let marker = if candidate.is_subject { " *" } else { "" };
        let _ = writeln!(
            out,
            "{:<4}{:<6}{:<6}{:<6}{:<8.1}{name}{marker}",
            position + 1,
            candidate.similarity,
            candidate.distance,
            candidate.prominence,
            candidate.ranking_score,
        );
    }
    out
}

pub(crate) fn run_rank(input: &Path, weights_path: Option<&Path>) -> anyhow::Result<()> {
    let weights = match weights_path {
        Some(path) => load_weights(path)?,
        None => WeightsConfig::default(),
    };
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let file = parse_rank_file(&content)?;

    tracing::info!(
        competitors = file.competitors.len(),
        "ranking subject from file"
    );
    let outcome = Ranker::new(weights).rank(&file.subject, &file.competitors);
    print!("{}", render_outcome(&outcome, file.previous_rank));
    Ok(())
}
