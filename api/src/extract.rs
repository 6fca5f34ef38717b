//! Wire documents -> domain records.
//!
//! Everything here is pure: the caller fetches and decodes, then hands the
//! documents in together with whatever directory is needed to resolve ids.

use crate::ids::{PersonDirectory, TeamDirectory};
use crate::nba::{
    BoxScoreResponse, BoxScoreTeamStats, ConferenceStandingTeam, DivisionStandingTeam,
    GroupedStandings, PlayoffSeries, PlayoffsBracketResponse, ScoreboardGame, ScoreboardResponse,
    SeriesRow, TeamLeaders, UngroupedStandings,
};
use crate::{
    ApiError, ApiResult, Conference, ConferenceBracket, ConferenceStandings, DivisionStandings,
    GameLeaders, GameStatCategory, GameStatus, GameSummary, LeaderStatistic, PersonName,
    PlayerStatistic, PlayoffMatchup, Record, StandingEntry, StatCategory, Streak, TeamGameLeaders,
    TeamId, TeamRecord, Tricode,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Label the bracket uses for the series between the two conference winners.
pub const FINALS_LABEL: &str = "Finals";

// ---------------------------------------------------------------------------
// Team record
// ---------------------------------------------------------------------------

pub fn team_record(standings: &UngroupedStandings, team_id: TeamId) -> ApiResult<TeamRecord> {
    let entry = standings
        .teams
        .iter()
        .find(|t| t.team_id == team_id)
        .ok_or_else(|| ApiError::unknown("team", team_id))?;

    Ok(TeamRecord {
        total: Record { wins: entry.win, losses: entry.loss },
        home: Record { wins: entry.home_win, losses: entry.home_loss },
        away: Record { wins: entry.away_win, losses: entry.away_loss },
        last_ten: Record { wins: entry.last_ten_win, losses: entry.last_ten_loss },
        conference_rank: entry.conf_rank,
        division_rank: entry.div_rank,
        games_behind: entry.games_behind,
        win_percentage: entry.win_pct,
        streak: Streak { games: entry.streak.unsigned_abs(), is_winning: entry.is_win_streak },
    })
}

// ---------------------------------------------------------------------------
// Season leaders
// ---------------------------------------------------------------------------

/// The top-ranked player of every category, in `StatCategory::ALL` order.
pub fn team_leaders(
    leaders: &TeamLeaders,
    people: &PersonDirectory,
) -> ApiResult<Vec<PlayerStatistic>> {
    StatCategory::ALL
        .into_iter()
        .map(|category| {
            let first = leaders.category(category).first().ok_or_else(|| {
                ApiError::malformed("team leaders", format!("no {} leader", category.key()))
            })?;
            Ok(PlayerStatistic {
                category,
                player: people.name(first.person_id)?.clone(),
                value: first.value,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

pub fn games(scoreboard: &ScoreboardResponse) -> ApiResult<Vec<GameSummary>> {
    scoreboard.games.iter().map(game_summary).collect()
}

fn game_summary(game: &ScoreboardGame) -> ApiResult<GameSummary> {
    let date = NaiveDate::parse_from_str(&game.start_date_eastern, "%Y%m%d").map_err(|e| {
        ApiError::malformed(
            "scoreboard",
            format!("game {} start date {:?}: {e}", game.game_id, game.start_date_eastern),
        )
    })?;

    Ok(GameSummary {
        id: game.game_id.clone(),
        home_team_id: game.h_team.team_id,
        home_team: game.h_team.tri_code.clone(),
        away_team_id: game.v_team.team_id,
        away_team: game.v_team.tri_code.clone(),
        date,
        period: game.period.current,
        status: game_status(game.status_num, game.period.current),
        highlight: game.nugget.as_ref().map(|n| n.text.trim().to_owned()).unwrap_or_default(),
    })
}

fn game_status(status_num: u8, period: u8) -> GameStatus {
    match status_num {
        3 => GameStatus::Final,
        2 => GameStatus::InProgress,
        _ if period > 0 => GameStatus::InProgress,
        _ => GameStatus::Scheduled,
    }
}

/// First game on the board that has tipped off and involves `team_id`.
///
/// Only the selected game is converted, so a bad entry elsewhere on the
/// board does not hide the team's game.
pub fn find_game_in_progress(
    scoreboard: &ScoreboardResponse,
    team_id: TeamId,
) -> ApiResult<Option<GameSummary>> {
    scoreboard
        .games
        .iter()
        .find(|g| {
            g.period.current != 0 && (g.h_team.team_id == team_id || g.v_team.team_id == team_id)
        })
        .map(game_summary)
        .transpose()
}

// ---------------------------------------------------------------------------
// Box score
// ---------------------------------------------------------------------------

pub fn game_leaders(
    box_score: &BoxScoreResponse,
    people: &PersonDirectory,
    is_final: bool,
) -> ApiResult<GameLeaders> {
    let game = &box_score.basic_game_data;
    let stats = box_score.stats.as_ref().ok_or_else(|| {
        ApiError::malformed("box score", format!("game {} has no stats yet", game.game_id))
    })?;

    Ok(GameLeaders {
        home: team_game_leaders(&game.h_team.tri_code, &stats.h_team, people)?,
        away: team_game_leaders(&game.v_team.tri_code, &stats.v_team, people)?,
        is_final,
    })
}

fn team_game_leaders(
    tri_code: &str,
    stats: &BoxScoreTeamStats,
    people: &PersonDirectory,
) -> ApiResult<TeamGameLeaders> {
    let team = tri_code
        .parse::<Tricode>()
        .map_err(|_| ApiError::malformed("box score", format!("unknown team {tri_code:?}")))?;

    let leaders = GameStatCategory::ALL
        .into_iter()
        .map(|category| {
            let group = stats.leaders.category(category);
            let players = group
                .players
                .iter()
                .map(|p| people.name(p.person_id).cloned())
                .collect::<ApiResult<Vec<PersonName>>>()?;
            let value = match group.value {
                Some(value) => value,
                None if players.is_empty() => 0,
                None => {
                    return Err(ApiError::malformed(
                        "box score",
                        format!("{team} {} leaders without a value", category.key()),
                    ));
                }
            };
            Ok(LeaderStatistic { category, players, value })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(TeamGameLeaders { team, leaders })
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// Upstream keys are lower case today; don't depend on it.
fn keyed<'a, T>(map: &'a HashMap<String, T>, name: &str) -> Option<&'a T> {
    map.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value)
}

fn standing_entry(
    source: &str,
    teams: &TeamDirectory,
    team_id: TeamId,
    games_behind: f64,
    rank: u32,
) -> ApiResult<StandingEntry> {
    if !games_behind.is_finite() || games_behind < 0.0 {
        return Err(ApiError::malformed(
            source,
            format!("team {team_id} is {games_behind} games behind"),
        ));
    }
    if rank == 0 {
        return Err(ApiError::malformed(source, format!("team {team_id} is ranked 0")));
    }
    Ok(StandingEntry { team: teams.tricode(team_id)?, games_behind, rank })
}

/// East then west, each in the order the feed lists them.
pub fn conference_standings(
    doc: &GroupedStandings<Vec<ConferenceStandingTeam>>,
    teams: &TeamDirectory,
) -> ApiResult<Vec<ConferenceStandings>> {
    Conference::ALL
        .into_iter()
        .map(|conference| {
            let rows = keyed(&doc.conference, conference.as_str()).ok_or_else(|| {
                ApiError::malformed("conference standings", format!("no {conference} conference"))
            })?;
            let entries = rows
                .iter()
                .map(|row| {
                    standing_entry(
                        "conference standings",
                        teams,
                        row.team_id,
                        row.games_behind,
                        row.conf_rank,
                    )
                })
                .collect::<ApiResult<Vec<_>>>()?;
            Ok(ConferenceStandings { conference, teams: entries })
        })
        .collect()
}

/// All six divisions, grouped by conference in `Conference::ALL` order.
pub fn division_standings(
    doc: &GroupedStandings<HashMap<String, Vec<DivisionStandingTeam>>>,
    teams: &TeamDirectory,
) -> ApiResult<Vec<DivisionStandings>> {
    let mut standings = Vec::with_capacity(6);
    for conference in Conference::ALL {
        let divisions = keyed(&doc.conference, conference.as_str()).ok_or_else(|| {
            ApiError::malformed("division standings", format!("no {conference} conference"))
        })?;
        for division in conference.divisions() {
            let rows = keyed(divisions, division.as_str()).ok_or_else(|| {
                ApiError::malformed("division standings", format!("no {division} division"))
            })?;
            let entries = rows
                .iter()
                .map(|row| {
                    standing_entry(
                        "division standings",
                        teams,
                        row.team_id,
                        row.div_games_behind,
                        row.div_rank,
                    )
                })
                .collect::<ApiResult<Vec<_>>>()?;
            standings.push(DivisionStandings { conference, division, teams: entries });
        }
    }
    Ok(standings)
}

// ---------------------------------------------------------------------------
// Playoffs
// ---------------------------------------------------------------------------

/// Decided series of `round`, grouped by the bracket's conference label in
/// first-seen order.
pub fn playoff_round(
    bracket: &PlayoffsBracketResponse,
    teams: &TeamDirectory,
    round: u8,
) -> ApiResult<Vec<ConferenceBracket>> {
    let mut grouped: Vec<ConferenceBracket> = Vec::new();
    for series in bracket.series.iter().filter(|s| s.round_num == round && is_decided(s)) {
        let matchup = matchup(series, teams)?;
        let label = match series.conf_name.trim() {
            "" => FINALS_LABEL,
            name => name,
        };
        match grouped.iter_mut().find(|b| b.conference == label) {
            Some(existing) => existing.matchups.push(matchup),
            None => grouped.push(ConferenceBracket {
                conference: label.to_owned(),
                matchups: vec![matchup],
            }),
        }
    }
    Ok(grouped)
}

fn is_decided(series: &PlayoffSeries) -> bool {
    series.is_schedule_available
        && series.top_row.team_id.is_some()
        && series.bottom_row.team_id.is_some()
}

fn matchup(series: &PlayoffSeries, teams: &TeamDirectory) -> ApiResult<PlayoffMatchup> {
    let slot = |row: &SeriesRow| -> ApiResult<(u8, Tricode, u8)> {
        let team_id = row.team_id.map(TeamId).ok_or_else(|| {
            ApiError::malformed("playoffs bracket", format!("series {} slot is empty", series.series_id))
        })?;
        Ok((row.seed_num.unwrap_or_default(), teams.tricode(team_id)?, row.wins.unwrap_or_default()))
    };
    let (top_seed, top_team, top_wins) = slot(&series.top_row)?;
    let (bottom_seed, bottom_team, bottom_wins) = slot(&series.bottom_row)?;

    let is_completed = series.is_series_completed;
    let top_is_winner = is_completed && series.top_row.is_series_winner;
    let bottom_is_winner = is_completed && series.bottom_row.is_series_winner;
    if top_is_winner && bottom_is_winner {
        return Err(ApiError::malformed(
            "playoffs bracket",
            format!("series {} has two winners", series.series_id),
        ));
    }

    Ok(PlayoffMatchup {
        top_seed,
        top_team,
        top_wins,
        bottom_seed,
        bottom_team,
        bottom_wins,
        is_completed,
        top_is_winner,
        bottom_is_winner,
        is_game_seven: top_wins == 3 && bottom_wins == 3,
    })
}
