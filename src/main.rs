//! Age of Lanes headless driver
//!
//! Runs a complete bot-vs-bot match at a fixed frame step and logs its
//! progress. Stands in for a render loop: the player side is driven by a
//! second bot calling the same engine API a UI would.

use std::path::PathBuf;

use clap::Parser;

use age_of_lanes::consts::FRAME_DT;
use age_of_lanes::sim::{queue, Bot, Engine, GameState, GameStatus, Side};
use age_of_lanes::{Difficulty, Settings};

/// Game time between progress lines
const REPORT_INTERVAL_MS: f64 = 30_000.0;

#[derive(Debug, Parser)]
#[command(name = "age-of-lanes", about = "Run a headless bot-vs-bot lane battle")]
struct Args {
    /// Settings JSON file (falls back to defaults if unreadable)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Opponent tier: normal or hard
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,
    /// Seed for the bots' random sources
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this much game time
    #[arg(long, default_value_t = 30.0)]
    max_minutes: f64,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{}' (normal, hard)", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    log::info!(
        "Age of Lanes (headless) starting: {} difficulty, seed {:#x}",
        settings.difficulty.as_str(),
        settings.seed
    );

    // Player side mirrors the opponent's tier, on its own random stream
    let mut player = Bot::seeded(Side::Player, settings.seed.wrapping_add(1))
        .with_difficulty(settings.difficulty);
    let mut engine = Engine::new(settings);

    let mut next_report = 0.0;
    engine.subscribe(move |state| {
        if state.elapsed_ms >= next_report {
            next_report = state.elapsed_ms + REPORT_INTERVAL_MS;
            log_progress(state);
        }
    });

    engine.start();
    let limit_ms = args.max_minutes.max(0.0) * 60_000.0;
    let mut now_ms = 0.0;
    while engine.state().status == GameStatus::Playing && engine.state().elapsed_ms < limit_ms {
        now_ms += FRAME_DT as f64 * 1000.0;
        player.update(&mut engine, now_ms);
        engine.tick(FRAME_DT, now_ms);
    }

    let state = engine.state();
    log_progress(state);
    match state.winner {
        Some(side) => log::info!("{} wins after {:.1}s", side.as_str(), state.elapsed_ms / 1000.0),
        None => log::info!("No winner after {:.1} minutes", args.max_minutes),
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    }
    Ok(())
}

fn log_progress(state: &GameState) {
    let side_line = |side: Side| {
        let s = state.side(side);
        let building = match queue::head_progress(&s.queue) {
            Some(progress) => format!("{} ({:.0}%)", s.queue.len(), progress * 100.0),
            None => "0".to_string(),
        };
        format!(
            "{} hp {:.0} gold {:.0} xp {:.0} age {} units {} queue {} towers {}",
            side.as_str(),
            s.health,
            s.gold,
            s.xp,
            s.age,
            state.live_units(side).count(),
            building,
            s.towers.iter().filter(|t| !t.is_empty()).count()
        )
    };
    log::info!(
        "[{:>5.0}s] {} | {}",
        state.elapsed_ms / 1000.0,
        side_line(Side::Player),
        side_line(Side::Ai)
    );
}
