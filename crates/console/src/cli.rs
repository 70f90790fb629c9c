//! Command-line arguments and interactive commands.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub name: Option<String>,
    /// Play the random proposer even when an API key is set
    pub offline: bool,
    /// Keep statistics in memory only
    pub no_persist: bool,
    pub help: bool,
}

impl Args {
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().ok_or("--config needs a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--name" | "-n" => {
                    parsed.name = Some(args.next().ok_or("--name needs a value")?);
                }
                "--offline" => parsed.offline = true,
                "--no-persist" => parsed.no_persist = true,
                "--help" | "-h" => parsed.help = true,
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(parsed)
    }
}

pub fn print_usage() {
    println!("Play chess against an LLM");
    println!();
    println!("Usage:");
    println!("  llm-chess [--config FILE] [--name PLAYER] [--offline] [--no-persist]");
    println!();
    println!("Options:");
    println!("  --config, -c   TOML config (default: ./llm-chess.toml if present)");
    println!("  --name, -n     Your name on the leaderboard");
    println!("  --offline      Play against random moves, no API calls");
    println!("  --no-persist   Do not write statistics to disk");
    println!();
    println!("The API key is read from DEEPSEEK_API_KEY (a .env file works too).");
}

pub fn print_commands() {
    println!("Commands:");
    println!("  e2e4 | e2 e4 | e2-e4   move a piece (pawns promote to queen)");
    println!("  board                  show the board");
    println!("  history                list the moves so far");
    println!("  stats                  statistics and leaderboard");
    println!("  new                    start a new game");
    println!("  help                   this list");
    println!("  quit                   leave");
}

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move { from: String, to: String },
    Board,
    History,
    Stats,
    New,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim().to_ascii_lowercase();
        match line.as_str() {
            "" => return Command::Empty,
            "board" | "b" => return Command::Board,
            "history" | "h" => return Command::History,
            "stats" | "s" => return Command::Stats,
            "new" | "restart" => return Command::New,
            "help" | "?" => return Command::Help,
            "quit" | "exit" | "q" => return Command::Quit,
            _ => {}
        }

        let compact: String = line
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if compact.len() == 4 && compact.is_ascii() {
            let (from, to) = compact.split_at(2);
            return Command::Move {
                from: from.to_string(),
                to: to.to_string(),
            };
        }
        Command::Unknown(line)
    }
}
