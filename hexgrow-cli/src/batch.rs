//! Batch command - run many seeds in parallel and aggregate outcomes
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_batch(), report_results()
//! - Level 3: compute_batch_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use hexgrow_core::{EntityId, GameConfig, GameStatus};

use crate::session::{build_config, play_session, SessionArgs, SessionReport};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Number of sessions to run
    #[arg(long, default_value = "32")]
    pub sessions: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregated batch results
#[derive(Clone, Debug, PartialEq)]
struct BatchResults {
    sessions: usize,
    victories: usize,
    defeats: usize,
    unfinished: usize,
    avg_ticks: f32,
    avg_denied: f32,
    /// Defeats per winning bot, by bot id
    bot_wins: Vec<(EntityId, usize)>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run batch command
///
/// 1. Build the shared config
/// 2. Play every seed in parallel
/// 3. Report aggregate results
pub fn run(args: BatchArgs, seed: Option<u64>) -> Result<()> {
    let base_seed = seed.unwrap_or(0);
    let config = build_config(&args.session, Some(base_seed))?;

    tracing::info!(
        "Starting batch: {} sessions from seed {} ({} bots)",
        args.sessions,
        base_seed,
        config.bot_count
    );

    let reports = play_batch(&config, base_seed, &args)?;
    let results = compute_batch_statistics(&reports);

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play one session per seed on the rayon pool
fn play_batch(config: &GameConfig, base_seed: u64, args: &BatchArgs) -> Result<Vec<SessionReport>> {
    let progress = ProgressBar::new(args.sessions as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} sessions ({eta})")
            .context("Invalid progress template")?,
    );

    let reports: Result<Vec<SessionReport>> = (0..args.sessions as u64)
        .into_par_iter()
        .map(|i| {
            let session_config = config.clone().with_seed(base_seed.wrapping_add(i));
            let report = play_session(
                session_config,
                args.session.max_ticks,
                args.session.autopilot,
                false,
            );
            progress.inc(1);
            report
        })
        .collect();

    progress.finish_and_clear();
    reports
}

fn report_results(results: &BatchResults, args: &BatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn compute_batch_statistics(reports: &[SessionReport]) -> BatchResults {
    let count = |status: GameStatus| reports.iter().filter(|r| r.status == status).count();

    let mut bot_wins: Vec<(EntityId, usize)> = Vec::new();
    for report in reports.iter().filter(|r| r.status == GameStatus::Defeat) {
        if let Some(winner) = report.winner() {
            match bot_wins.iter_mut().find(|(id, _)| *id == winner) {
                Some((_, wins)) => *wins += 1,
                None => bot_wins.push((winner, 1)),
            }
        }
    }
    bot_wins.sort();

    let n = reports.len().max(1) as f32;
    BatchResults {
        sessions: reports.len(),
        victories: count(GameStatus::Victory),
        defeats: count(GameStatus::Defeat),
        unfinished: count(GameStatus::Playing),
        avg_ticks: reports.iter().map(|r| r.ticks as f32).sum::<f32>() / n,
        avg_denied: reports.iter().map(|r| r.denied as f32).sum::<f32>() / n,
        bot_wins,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &BatchResults) {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        sessions: usize,
        victories: usize,
        defeats: usize,
        unfinished: usize,
        victory_rate: f32,
        avg_ticks: f32,
        avg_denied: f32,
        bot_wins: Vec<(String, usize)>,
    }

    let output = JsonOutput {
        sessions: results.sessions,
        victories: results.victories,
        defeats: results.defeats,
        unfinished: results.unfinished,
        victory_rate: percent(results.victories, results.sessions) / 100.0,
        avg_ticks: results.avg_ticks,
        avg_denied: results.avg_denied,
        bot_wins: results
            .bot_wins
            .iter()
            .map(|(id, wins)| (id.to_string(), *wins))
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &BatchResults) {
    let total = results.sessions;

    println!("\n=== Batch Results ===");
    println!("Sessions:   {}", total);
    println!(
        "Victories:  {} ({:.1}%)",
        results.victories,
        percent(results.victories, total)
    );
    println!(
        "Defeats:    {} ({:.1}%)",
        results.defeats,
        percent(results.defeats, total)
    );
    println!(
        "Unfinished: {} ({:.1}%)",
        results.unfinished,
        percent(results.unfinished, total)
    );
    println!("Avg ticks:  {:.1}", results.avg_ticks);
    println!("Avg denied: {:.1}", results.avg_denied);
    for (id, wins) in &results.bot_wins {
        println!("  {} won {}", id, wins);
    }
}
