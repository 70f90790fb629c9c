//! Terminal front end
//!
//! Play White against an LLM (or random moves offline) and keep
//! statistics between runs.

mod cli;
mod config;
mod render;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use chess_core::Board;
use coordinator::{EventReceiver, GameEvent, GameSession, Side};
use match_store::report::{leaderboard_lines, stats_report};
use match_store::{JsonFileStore, MemoryStore, StatsGateway};
use move_proposer::{ChatCompletionProposer, MoveProposer, RandomProposer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{print_commands, print_usage, Args, Command};
use crate::config::AppConfig;
use crate::render::{board_diagram, history_lines, side_label};

const LEADERBOARD_SIZE: usize = 3;

struct Names {
    player: String,
    ai: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    dotenvy::dotenv().ok();

    let args = Args::parse(std::env::args().skip(1)).map_err(anyhow::Error::msg)?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let mut config = AppConfig::resolve(args.config.as_deref()).context("loading configuration")?;
    if let Some(name) = args.name {
        config.session.player_name = name;
    }

    let proposer = build_proposer(&config, args.offline);
    if proposer.name() == "Random" {
        config.session.ai_name = "Random".to_string();
    }
    let gateway: Arc<dyn StatsGateway> = if args.no_persist {
        Arc::new(MemoryStore::new())
    } else {
        info!(path = %config.store.path.display(), "statistics file");
        Arc::new(JsonFileStore::from_config(&config.store))
    };

    let names = Names {
        player: config.session.player_name.clone(),
        ai: config.session.ai_name.clone(),
    };

    print_start_screen(gateway.as_ref(), &names.ai).await;
    print_commands();
    println!();

    let mut session = GameSession::new(config.session.clone(), proposer, gateway);
    let mut events = session.subscribe();
    println!("{}", board_diagram(session.board()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}> ", prompt(&session, &names));
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };

        match Command::parse(&line) {
            Command::Move { from, to } => {
                let turn = session.play_human_turn(&from, &to);
                tokio::pin!(turn);
                // show events while the AI is still thinking
                let result = loop {
                    tokio::select! {
                        result = &mut turn => break result,
                        Some(event) = events.recv() => show_event(event, &names),
                    }
                };
                drain_events(&mut events, &names);
                if let Err(e) = result {
                    info!(error = %e, "turn not completed");
                }
            }
            Command::Board => println!("{}", board_diagram(session.board())),
            Command::History => {
                if session.history().is_empty() {
                    println!("No moves yet.");
                }
                for line in history_lines(session.history()) {
                    println!("{line}");
                }
            }
            Command::Stats => {
                session.settle().await;
                print_start_screen(session.gateway().as_ref(), &names.ai).await;
            }
            Command::New => {
                session.restart();
                drain_events(&mut events, &names);
            }
            Command::Help => print_commands(),
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(text) => println!("Unknown command '{text}'. Type 'help' for the list."),
        }
    }

    session.settle().await;
    Ok(())
}

fn build_proposer(config: &AppConfig, offline: bool) -> Arc<dyn MoveProposer> {
    if offline {
        return Arc::new(RandomProposer::new());
    }
    match ChatCompletionProposer::from_config(config.proposer.clone()) {
        Ok(proposer) => Arc::new(proposer),
        Err(e) => {
            warn!(error = %e, "falling back to random moves");
            println!("No API key found ({e}); playing against random moves.");
            Arc::new(RandomProposer::new())
        }
    }
}

async fn print_start_screen(gateway: &dyn StatsGateway, ai_name: &str) {
    match gateway.snapshot().await {
        Ok(snapshot) => {
            print!("{}", stats_report(&snapshot.stats, ai_name));
            println!("Total moves played: {}", snapshot.total_moves);
            println!();
            println!("=== Leaderboard ===");
            let lines = leaderboard_lines(&snapshot.leaderboard, ai_name, LEADERBOARD_SIZE);
            if lines.is_empty() {
                println!("No games won yet.");
            }
            for line in lines {
                println!("{line}");
            }
            println!();
        }
        Err(e) => {
            warn!(error = %e, "could not read statistics");
            println!("Statistics unavailable.");
        }
    }
}

fn prompt(session: &GameSession, names: &Names) -> String {
    if !session.outcome().is_live() {
        "game over, 'new' to play again".to_string()
    } else if session.needs_restart() {
        format!("{} is stuck, 'new' to restart", names.ai)
    } else if session.to_move() == Side::Ai {
        format!("waiting for {}, 'new' to restart", names.ai)
    } else {
        names.player.clone()
    }
}

fn drain_events(events: &mut EventReceiver, names: &Names) {
    while let Ok(event) = events.try_recv() {
        show_event(event, names);
    }
}

fn show_event(event: GameEvent, names: &Names) {
    match event {
        GameEvent::PositionChanged { position, last, .. } => {
            match last {
                Some(entry) => println!(
                    "{} played {}",
                    side_label(entry.side, &names.player, &names.ai),
                    entry.played
                ),
                None => println!("New game."),
            }
            match Board::load(position.as_str()) {
                Ok(board) => println!("{}", board_diagram(&board)),
                Err(e) => warn!(error = %e, "cannot draw position"),
            }
        }
        GameEvent::AiThinking(true) => println!("{} is thinking...", names.ai),
        GameEvent::AiThinking(false) => {}
        GameEvent::GameOver { message, .. } => {
            println!("*** {message} ***");
        }
        GameEvent::Alert(message) => println!("{message}"),
    }
}
