//! Simulate command - run one seeded session to completion
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_session(), report_results()
//! - Level 3: event dump
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;

use crate::session::{build_config, play_session, status_label, SessionArgs, SessionReport};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Include every emitted event in the report
    #[arg(long)]
    pub events: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args.session, seed)?;

    tracing::info!(
        "Starting session: {} bots, radius {}, {:?}",
        config.bot_count,
        config.world_radius,
        config.difficulty
    );

    let report = play_session(config, args.session.max_ticks, args.session.autopilot, args.events)?;

    report_results(&report, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_results(report: &SessionReport, args: &SimulateArgs) {
    if args.json {
        print_json_results(report);
    } else {
        print_text_results(report);
        if args.events {
            print_events(report);
        }
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_events(report: &SessionReport) {
    println!("\n=== Events ===");
    for event in &report.events {
        let who = event
            .entity_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<8} {}",
            format!("{:?}", event.kind),
            who,
            event.message.as_deref().unwrap_or("")
        );
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as JSON
fn print_json_results(report: &SessionReport) {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        seed: Option<u64>,
        outcome: &'static str,
        ticks: u64,
        denied_actions: usize,
        leaderboard: Option<&'a hexgrow_core::LeaderboardEntry>,
        standings: &'a [hexgrow_core::Standing],
        #[serde(skip_serializing_if = "Option::is_none")]
        events: Option<&'a [hexgrow_core::GameEvent]>,
    }

    let output = JsonOutput {
        seed: report.seed,
        outcome: status_label(report.status),
        ticks: report.ticks,
        denied_actions: report.denied,
        leaderboard: report.leaderboard.as_ref(),
        standings: &report.standings,
        events: (!report.events.is_empty()).then_some(report.events.as_slice()),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(report: &SessionReport) {
    println!("\n=== Session Results ===");
    if let Some(seed) = report.seed {
        println!("Seed:     {}", seed);
    }
    println!("Outcome:  {}", status_label(report.status));
    println!("Ticks:    {}", report.ticks);
    if let Some(winner) = report.winner() {
        println!("Winner:   {}", winner);
    }
    println!("Denied:   {}", report.denied);

    println!("\n{:<8} {:>8} {:>6} {:>7}  {}", "entity", "earned", "rank", "tiles", "position");
    for s in &report.standings {
        println!(
            "{:<8} {:>8} {:>6} {:>7}  {}",
            s.id.to_string(),
            s.coins_earned,
            s.rank,
            s.tiles_owned,
            s.position
        );
    }
}
