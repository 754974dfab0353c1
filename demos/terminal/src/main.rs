use tepok::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One line of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Tap(Player),
    Pause,
    Resume,
    Play,
    Menu,
    Tutorial,
    Dump,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let cmd = match line.trim() {
            "1" => Self::Tap(Player::One),
            "2" => Self::Tap(Player::Two),
            "p" => Self::Pause,
            "r" => Self::Resume,
            "x" => Self::Play,
            "m" => Self::Menu,
            "t" => Self::Tutorial,
            "s" => Self::Dump,
            "h" | "?" => Self::Help,
            "q" => Self::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}

const HELP: &str = "\
1 / 2   slap for player 1 / player 2
p / r   pause / resume
x       play (restarts the round)
m       back to menu
t       how to play
s       dump the current snapshot as JSON
q       quit";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One status line per snapshot.
fn render(snap: &RoundSnapshot) -> String {
    match snap.screen {
        Screen::Menu => "[menu] x to play, t for tutorial, q to quit".to_string(),
        Screen::Tutorial => "[tutorial] m to go back".to_string(),
        Screen::Playing => {
            let mut line = format!(
                "P1 {:>2} | P2 {:>2} | ",
                snap.score_p1, snap.score_p2
            );
            if snap.countdown_active {
                line.push_str(&snap.countdown_label());
            } else {
                line.push_str(&format!(
                    "call {:<5} card {}",
                    snap.prompt_word(),
                    snap.card_asset()
                ));
            }
            for player in Player::BOTH {
                if snap.is_frozen(player) {
                    line.push_str(&format!(
                        " | {player} frozen {:.1}s",
                        snap.freeze_remaining(player)
                    ));
                }
            }
            if let Some(outcome) = &snap.feedback {
                line.push_str(&format!(" | {}", outcome.feedback().replace('\n', ", ")));
            }
            if snap.user_paused {
                line.push_str(" | PAUSED (r to resume, x to restart, m for menu)");
            }
            if let Some(text) = snap.winner_text() {
                line.push_str(&format!(" | {text}! (x to play again)"));
            }
            line
        }
    }
}

/// Prints a line whenever the visible state changes.
///
/// Freeze decay bumps the revision every tick; only whole tenths of a
/// second are redrawn.
async fn watch_snapshots(handle: EngineHandle) {
    let mut rx = handle.subscribe();
    let mut last = String::new();
    while rx.changed().await.is_ok() {
        let line = render(&rx.borrow_and_update());
        if line != last {
            println!("{line}");
            last = line;
        }
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// Reads `TEPOK_WINNING_SCORE` if set.
fn config_from_env() -> Result<RoundConfig, TepokError> {
    match std::env::var("TEPOK_WINNING_SCORE") {
        Ok(raw) => {
            let score: u32 = raw.trim().parse().map_err(|_| {
                TepokError::Config(format!("TEPOK_WINNING_SCORE must be a number, got {raw:?}"))
            })?;
            Ok(RoundConfig::with_winning_score(score))
        }
        Err(_) => Ok(RoundConfig::default()),
    }
}

fn print_tutorial(config: &RoundConfig) {
    for page in tutorial_pages(config.winning_score, config.freeze_secs()) {
        println!("== {} ==\n{}\n", page.title, page.body);
    }
}

#[tokio::main]
async fn main() -> Result<(), TepokError> {
    tepok::telemetry::init_tracing("info");

    let config = config_from_env()?.validated();
    info!(winning_score = config.winning_score, "starting tepok terminal");

    let engine = RoundEngine::new(config.clone(), TracingAnnouncer);
    let handle = spawn_engine(engine);
    tokio::spawn(watch_snapshots(handle.clone()));

    println!("{HELP}");
    println!("{}", render(&handle.snapshot().await?));

    let codec = JsonCodec;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(cmd) = Command::parse(&line) else {
            if !line.trim().is_empty() {
                warn!(input = line.trim(), "unknown command, h for help");
            }
            continue;
        };
        match cmd {
            Command::Tap(player) => {
                handle.tap(player).await?;
            }
            Command::Pause => {
                handle.pause().await?;
            }
            Command::Resume => {
                handle.resume().await?;
            }
            Command::Play => {
                handle.navigate(Screen::Playing).await?;
            }
            Command::Menu => {
                handle.navigate(Screen::Menu).await?;
            }
            Command::Tutorial => {
                if handle.navigate(Screen::Tutorial).await? {
                    print_tutorial(&config);
                }
            }
            Command::Dump => {
                let bytes = codec.encode(&handle.snapshot().await?)?;
                println!("{}", String::from_utf8_lossy(&bytes));
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    handle.shutdown().await?;
    info!("bye");
    Ok(())
}
