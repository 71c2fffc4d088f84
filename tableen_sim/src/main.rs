//! Self-play driver for the Tableen match engine.
//!
//! Spawns a number of matches on one MatchManager, seats two scripted bots in
//! each and plays every match to the end concurrently, checking that no card
//! is ever lost on the way.

mod bot;
mod config;

use anyhow::{Error, bail};
use log::{info, warn};
use pico_args::Arguments;
use serde::Serialize;
use tableen::{
    MatchId, MatchManager, MatchPhase, MatchState, Seat, SessionError,
    game::{PerSeat, seed::derive_player_seed},
    session::{MatchConfig, MatchNotification},
};
use tokio::sync::mpsc;

use bot::ScriptedBot;
use config::SimConfig;

const HELP: &str = "\
Play Tableen matches between scripted bots

USAGE:
  tableen_sim [OPTIONS]

OPTIONS:
  --matches    N           Number of concurrent matches  [default: env TABLEEN_MATCHES or 4]
  --seed       N           Base seed, match i uses seed + i  [default: env TABLEEN_SEED or random]

FLAGS:
  --json                   Print the match reports as JSON
  -h, --help               Print help information

ENVIRONMENT:
  TABLEEN_MATCHES          Number of concurrent matches
  TABLEEN_SEED             Base seed
  TABLEEN_DECK             Deck variant, 52 or 40
  TABLEEN_HAND_SIZE        Cards dealt per seat per refill
  TABLEEN_SCORE_CAP        Points that end the match
  TABLEEN_UNCLAIMED        Remainder policy, leave or non-starter
  TABLEEN_MAX_ACTIONS      Actions after which a match is terminated
";

/// Notification buffer per seat
const NOTIFICATION_CAPACITY: usize = 1024;

struct Args {
    matches: Option<usize>,
    seed: Option<u64>,
    json: bool,
}

/// How one simulated match went
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchReport {
    match_id: MatchId,
    seed: u64,
    phase: MatchPhase,
    rounds: u32,
    points: PerSeat<u32>,
    actions: usize,
    rejected: usize,
    notifications: usize,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        matches: pargs.opt_value_from_str("--matches")?,
        seed: pargs.opt_value_from_str("--seed")?,
        json: pargs.contains("--json"),
    };

    env_logger::builder().format_target(false).init();

    let config = SimConfig::from_env(args.matches, args.seed)?;
    config.validate()?;
    let base_seed = config.seed.unwrap_or_else(rand::random);

    info!(
        "Playing {} match(es) on a {} deck, base seed {}",
        config.matches, config.settings.deck, base_seed
    );

    let manager = MatchManager::new();
    let mut tasks = Vec::with_capacity(config.matches);
    for i in 0..config.matches {
        let manager = manager.clone();
        let config = config.clone();
        let seed = base_seed.wrapping_add(i as u64);
        tasks.push(tokio::spawn(async move {
            play_match(&manager, &config, i, seed).await
        }));
    }

    let mut reports = Vec::with_capacity(tasks.len());
    for task in tasks {
        reports.push(task.await??);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!(
                "match {:>3}  seed {:>20}  rounds {:>2}  A {:>2} : {:>2} B  actions {:>4}  rejected {:>4}  {}",
                report.match_id,
                report.seed,
                report.rounds,
                report.points.a,
                report.points.b,
                report.actions,
                report.rejected,
                describe(&report.phase),
            );
        }
    }

    info!("{} match(es) still registered", manager.active_match_count().await);
    Ok(())
}

/// Play one match between two bots and report on it
async fn play_match(
    manager: &MatchManager,
    config: &SimConfig,
    index: usize,
    seed: u64,
) -> Result<MatchReport, Error> {
    let match_config = MatchConfig {
        name: format!("Sim {}", index + 1),
        settings: config.settings.clone(),
        seed: Some(seed),
        ..MatchConfig::default()
    };
    let (match_id, initial) = manager.create_match(match_config).await?;

    let mut inboxes = Vec::new();
    for _ in Seat::BOTH {
        let assignment = manager.join_match(match_id).await?;
        let (tx, rx) = mpsc::channel(NOTIFICATION_CAPACITY);
        manager.subscribe(match_id, assignment.seat, tx).await?;
        inboxes.push(rx);
    }
    let mut bots = PerSeat::new(
        ScriptedBot::new(Seat::A, derive_player_seed(seed, Seat::A)),
        ScriptedBot::new(Seat::B, derive_player_seed(seed, Seat::B)),
    );

    let deck_size = config.settings.deck.size();
    let mut current = initial.current_turn();
    let mut actions = 0;
    let mut rejected = 0;

    loop {
        if actions >= config.max_actions {
            warn!("Match {} hit {} actions, terminating", match_id, actions);
            let state = manager.match_state(match_id).await?;
            manager
                .terminate_match(match_id, "action limit reached")
                .await?;
            return Ok(report(match_id, seed, &state, actions, rejected, &mut inboxes));
        }

        let bot = &mut bots[current];
        let view = manager.public_view(match_id, bot.seat).await?;
        let mut accepted = None;
        for action in bot.candidates(&view) {
            match manager.submit_action(match_id, bot.seat, action).await {
                Ok(outcome) => {
                    accepted = Some(outcome);
                    break;
                }
                Err(SessionError::Rejected(_)) => rejected += 1,
                Err(e) => return Err(e.into()),
            }
        }
        let Some(outcome) = accepted else {
            bail!("match {match_id}: seat {current} had no legal action");
        };
        actions += 1;

        let state = manager.match_state(match_id).await?;
        let held = state.round().card_count();
        if held != deck_size {
            bail!("match {match_id}: {held} cards in play after action {actions}, expected {deck_size}");
        }

        if !outcome.view.phase.is_in_progress() {
            manager.terminate_match(match_id, "finished").await?;
            return Ok(report(match_id, seed, &state, actions, rejected, &mut inboxes));
        }
        current = outcome.view.current_turn;
    }
}

fn report(
    match_id: MatchId,
    seed: u64,
    state: &MatchState,
    actions: usize,
    rejected: usize,
    inboxes: &mut [mpsc::Receiver<MatchNotification>],
) -> MatchReport {
    let mut notifications = 0;
    for inbox in inboxes.iter_mut() {
        while inbox.try_recv().is_ok() {
            notifications += 1;
        }
    }

    MatchReport {
        match_id,
        seed,
        phase: state.phase().clone(),
        rounds: state.round_number(),
        points: state.points(),
        actions,
        rejected,
        notifications,
    }
}

fn describe(phase: &MatchPhase) -> String {
    match phase {
        MatchPhase::InProgress => "in progress".to_string(),
        MatchPhase::Finished(outcome) => outcome.to_string(),
        MatchPhase::Terminated { reason } => format!("terminated: {reason}"),
    }
}
