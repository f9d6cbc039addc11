use std::env;
use std::io::{self, BufRead, Write};

use log::{error, info, warn};
use shuffle_vote::{
    FileStore, Item, SessionConfig, SessionState, TallyReport, VoteOutcome, VotingSession,
};

const DEFAULT_SNAPSHOT_PATH: &str = "shuffle_vote.json";

// Seed catalog used when no snapshot exists yet.
fn default_items() -> Vec<Item> {
    [
        ("bag", "img/bag.jpg"),
        ("banana", "img/banana.jpg"),
        ("bathroom", "img/bathroom.jpg"),
        ("boots", "img/boots.jpg"),
        ("breakfast", "img/breakfast.jpg"),
        ("bubblegum", "img/bubblegum.jpg"),
        ("chair", "img/chair.jpg"),
        ("cthulhu", "img/cthulhu.jpg"),
        ("dog-duck", "img/dog-duck.jpg"),
        ("dragon", "img/dragon.jpg"),
        ("pen", "img/pen.jpg"),
        ("pet-sweep", "img/pet-sweep.jpg"),
        ("scissors", "img/scissors.jpg"),
        ("shark", "img/shark.jpg"),
        ("sweep", "img/sweep.png"),
        ("tauntaun", "img/tauntaun.jpg"),
        ("unicorn", "img/unicorn.jpg"),
        ("usb", "img/usb.gif"),
        ("water-can", "img/water-can.jpg"),
        ("wine-glass", "img/wine-glass.jpg"),
    ]
    .into_iter()
    .map(|(name, src)| Item::new(name, src))
    .collect()
}

fn config_from_env() -> SessionConfig {
    let mut config = SessionConfig::default();
    if let Ok(raw) = env::var("CONCURRENT_IMAGE_SETTING") {
        match raw.parse() {
            Ok(n) => config.concurrent_images = n,
            Err(_) => warn!("ignoring invalid CONCURRENT_IMAGE_SETTING: {raw}"),
        }
    }
    if let Ok(raw) = env::var("MAX_VOTES_ALLOWED") {
        match raw.parse() {
            Ok(n) => config.max_votes_allowed = n,
            Err(_) => warn!("ignoring invalid MAX_VOTES_ALLOWED: {raw}"),
        }
    }
    config
}

fn print_report(report: &TallyReport) {
    println!("\nFinal tally:");
    for line in &report.lines {
        println!("  {line}");
    }
    if let Some(winner) = &report.winner {
        println!("\nWinner: {winner}");
    }
    // The chart dataset, exactly as a charting frontend would consume it.
    match serde_json::to_string_pretty(&report.chart) {
        Ok(json) => println!("\nChart dataset:\n{json}"),
        Err(e) => error!("failed to serialize chart dataset: {e}"),
    }
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = config_from_env();
    let snapshot_path =
        env::var("SNAPSHOT_PATH").unwrap_or_else(|_| DEFAULT_SNAPSHOT_PATH.to_string());
    let store = FileStore::new(&snapshot_path);

    // Restore a prior session if one was persisted, otherwise start fresh.
    let session = match store.load() {
        Ok(Some(snapshot)) => VotingSession::from_snapshot(config, snapshot),
        Ok(None) => VotingSession::new(config, default_items()),
        Err(e) => {
            error!("failed to load snapshot from {snapshot_path}: {e}");
            return;
        }
    };
    let mut session = match session {
        Ok(session) => session,
        Err(e) => {
            error!("invalid session configuration: {e}");
            return;
        }
    };

    if session.state() == SessionState::Exhausted {
        info!("restored session is already exhausted");
        print_report(&session.report());
        return;
    }

    let stdin = io::stdin();
    while session.state() == SessionState::Active {
        println!(
            "\n{} vote(s) remaining. Pick your favorite:",
            session.votes_remaining()
        );
        let shown: Vec<(String, String)> = session
            .displayed_items()
            .iter()
            .map(|item| (item.id.clone(), item.name.clone()))
            .collect();
        for (index, (_, name)) in shown.iter().enumerate() {
            println!("  {}) {name}", index + 1);
        }
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                info!("input closed, stopping early");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("failed to read input: {e}");
                break;
            }
        }

        // Anything that doesn't resolve to a displayed item is ignored.
        let choice = match line.trim().parse::<usize>() {
            Ok(n) if (1..=shown.len()).contains(&n) => n - 1,
            _ => {
                println!("Pick a number between 1 and {}.", shown.len());
                continue;
            }
        };

        match session.record_vote(&shown[choice].0) {
            VoteOutcome::Recorded(_) => {
                if let Err(e) = store.save(&session.snapshot()) {
                    error!("failed to persist snapshot: {e}");
                }
            }
            VoteOutcome::Exhausted(report) => {
                if let Err(e) = store.save(&session.snapshot()) {
                    error!("failed to persist snapshot: {e}");
                }
                print_report(&report);
            }
            VoteOutcome::Ignored => {}
        }
    }
}
