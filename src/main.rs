mod commands;
mod format;
mod settings;

use crate::commands::Invocation;
use crate::settings::AppSettings;
use nba_api::NbaApi;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(invocation) = handle_cli_args() else {
        return Ok(());
    };

    better_panic::install();

    let settings = AppSettings::load();
    init_logging(&settings);

    let api = NbaApi::from_env()?;
    for line in commands::run(&api, &invocation).await? {
        println!("{line}");
    }

    Ok(())
}

/// `None` when the invocation was fully handled here (help, version).
fn handle_cli_args() -> Option<Invocation> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("-h" | "--help") => {
            println!("{}", usage_text());
            None
        }
        Some("-V" | "--version") => {
            println!("nbastats {}", env!("CARGO_PKG_VERSION"));
            None
        }
        Some(_) => match Invocation::parse(args) {
            Ok(invocation) => Some(invocation),
            Err(message) => {
                eprintln!("{message}\n\n{}", usage_text());
                std::process::exit(2);
            }
        },
    }
}

fn usage_text() -> &'static str {
    "nbastats - NBA statistics from data.nba.net

Usage:
  nbastats [--json] leaders <TTT>         season leaders of a team
  nbastats [--json] record <TTT>          season record of a team
  nbastats [--json] gameleaders <TTT>     leaders of the team's live game
  nbastats [--json] nugget <TTT>          highlight of the team's live game
  nbastats [--json] games                 today's scoreboard
  nbastats [--json] standings [<name>]    east, west or a division (default both conferences)
  nbastats [--json] playoffs <1-4>        matchups of a playoff round
  nbastats --help
  nbastats --version

Environment:
  NBASTATS_SERVER          API origin (default https://data.nba.net)
  NBASTATS_BOOTSTRAP_PATH  Path of the daily endpoint list (default /15m/prod/v1/today.json)
  NBASTATS_USER_AGENT      User-Agent sent with every request
  NBASTATS_TIMEOUT_SECS    Request timeout in seconds
  NBASTATS_LOG             Log filter, falls back to RUST_LOG (default warn)"
}

/// Library events go through `log`; the fmt subscriber picks them up.
fn init_logging(settings: &AppSettings) {
    let filter = EnvFilter::try_new(settings.log_filter())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
