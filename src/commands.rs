use crate::format;
use anyhow::Context;
use log::debug;
use nba_api::{Conference, NbaApi, Tricode};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Leaders(String),
    Record(String),
    GameLeaders(String),
    Nugget(String),
    Games,
    /// Both conferences, one conference, or one division.
    Standings(Option<String>),
    Playoffs(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    /// Print the domain record as JSON instead of a text line.
    pub json: bool,
}

impl Invocation {
    /// Parse everything after the program name. `--json` may appear anywhere.
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut json = false;
        let mut words = Vec::new();
        for arg in args.into_iter().map(Into::into) {
            if arg == "--json" {
                json = true;
            } else if arg.starts_with('-') {
                return Err(format!("Unknown argument: {arg}"));
            } else {
                words.push(arg);
            }
        }

        let mut words = words.into_iter();
        let Some(name) = words.next() else {
            return Err("Missing command".to_string());
        };
        let command = match name.as_str() {
            "leaders" => Command::Leaders(team_arg(&mut words, &name)?),
            "record" => Command::Record(team_arg(&mut words, &name)?),
            "gameleaders" => Command::GameLeaders(team_arg(&mut words, &name)?),
            "nugget" => Command::Nugget(team_arg(&mut words, &name)?),
            "games" => Command::Games,
            "standings" => Command::Standings(words.next()),
            "playoffs" => {
                let round = words.next().ok_or("`playoffs` needs a round number (1-4)")?;
                let round = round
                    .parse()
                    .map_err(|_| format!("Round must be a number, got {round:?}"))?;
                Command::Playoffs(round)
            }
            other => return Err(format!("Unknown command: {other}")),
        };

        if let Some(extra) = words.next() {
            return Err(format!("Unexpected argument: {extra}"));
        }
        Ok(Self { command, json })
    }
}

fn team_arg(words: &mut impl Iterator<Item = String>, command: &str) -> Result<String, String> {
    words.next().ok_or_else(|| format!("`{command}` needs a team tricode"))
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<Vec<String>> {
    Ok(vec![serde_json::to_string_pretty(value)?])
}

/// Run one command and return the lines to print.
pub async fn run(api: &NbaApi, invocation: &Invocation) -> anyhow::Result<Vec<String>> {
    let json = invocation.json;
    debug!("running {:?}", invocation.command);

    match &invocation.command {
        Command::Leaders(team) => {
            let team: Tricode = team.parse()?;
            let leaders = api.team_leaders(team.as_str()).await?;
            if json {
                return to_json(&leaders);
            }
            Ok(vec![format::team_leaders(team, &leaders)])
        }
        Command::Record(team) => {
            let team: Tricode = team.parse()?;
            let record = api.team_record(team.as_str()).await?;
            if json {
                return to_json(&record);
            }
            Ok(vec![format::team_record(team, &record)])
        }
        Command::GameLeaders(team) => {
            let leaders = api.game_leaders(team).await?;
            if json {
                return to_json(&leaders);
            }
            Ok(vec![format::game_leaders(&leaders)])
        }
        Command::Nugget(team) => {
            let team: Tricode = team.parse()?;
            let highlight = api.game_highlight(team.as_str()).await?;
            if json {
                return to_json(&highlight);
            }
            let text = if highlight.is_empty() { "no highlight yet" } else { highlight.as_str() };
            Ok(vec![format!("{team} ~ {text}")])
        }
        Command::Games => {
            let games = api.todays_games().await?;
            if json {
                return to_json(&games);
            }
            if games.is_empty() {
                return Ok(vec!["No games today".to_string()]);
            }
            Ok(games.iter().map(format::game).collect())
        }
        Command::Standings(filter) => standings(api, filter.as_deref(), json).await,
        Command::Playoffs(round) => {
            let brackets = api
                .playoff_matchups(*round)
                .await
                .with_context(|| format!("loading playoff round {round}"))?;
            if json {
                return to_json(&brackets);
            }
            Ok(format::playoff_round(*round, &brackets))
        }
    }
}

/// No filter or a conference name reads the conference table; anything else
/// must name a division.
async fn standings(api: &NbaApi, filter: Option<&str>, json: bool) -> anyhow::Result<Vec<String>> {
    let is_conference = filter.is_none_or(|f| f.parse::<Conference>().is_ok());
    if is_conference {
        let standings = api.conference_standings(filter).await?;
        if json {
            return to_json(&standings);
        }
        return Ok(standings
            .iter()
            .map(|s| format::standings(s.conference.as_str(), &s.teams))
            .collect());
    }

    let standings = api.division_standings(filter).await?;
    if json {
        return to_json(&standings);
    }
    Ok(standings
        .iter()
        .map(|s| format::standings(s.division.as_str(), &s.teams))
        .collect())
}
