use nba_api::{
    ConferenceBracket, GameLeaders, GameStatus, GameSummary, PlayerStatistic, PlayoffMatchup,
    Record, StandingEntry, Streak, TeamGameLeaders, TeamRecord, Tricode,
};

/// 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, 101st, 111th...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub fn wins_losses(record: Record) -> String {
    format!("{}-{}", record.wins, record.losses)
}

/// `W3` / `L2`, empty when there is no streak.
pub fn streak(streak: Streak) -> String {
    match (streak.games, streak.is_winning) {
        (0, _) => String::new(),
        (n, true) => format!("W{n}"),
        (n, false) => format!("L{n}"),
    }
}

pub fn games_behind(gb: f64) -> String {
    if gb.abs() > 0.0 { format!("{gb}") } else { "--".to_string() }
}

/// Fractions as one-decimal percentages: 0.4532 -> `45.3%`.
pub fn percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

pub fn player_statistic(stat: &PlayerStatistic) -> String {
    let value = if stat.category.is_percentage() {
        percentage(stat.value)
    } else {
        format!("{}", stat.value)
    };
    format!("{} {value} {}", stat.player.short_name(), stat.category.label())
}

pub fn team_leaders(team: Tricode, leaders: &[PlayerStatistic]) -> String {
    let stats: Vec<String> = leaders.iter().map(player_statistic).collect();
    format!("{team} Leaders ~ {}", stats.join(" | "))
}

pub fn team_record(team: Tricode, record: &TeamRecord) -> String {
    format!(
        "{team} ~ {} ({:.3}) | {} GB | {} Conf. | {} Div. | {} Home | {} Away | {} Last 10 | {} Streak",
        wins_losses(record.total),
        record.win_percentage,
        games_behind(record.games_behind),
        ordinal(record.conference_rank),
        ordinal(record.division_rank),
        wins_losses(record.home),
        wins_losses(record.away),
        wins_losses(record.last_ten),
        streak(record.streak),
    )
}

fn side_leaders(side: &TeamGameLeaders) -> String {
    let stats: Vec<String> = side
        .leaders
        .iter()
        .map(|leader| {
            let players: Vec<String> = leader.players.iter().map(|p| p.short_name()).collect();
            format!("{} {} {}", players.join(", "), leader.value, leader.category.short_label())
        })
        .collect();
    format!("{}: {}", side.team, stats.join(" | "))
}

pub fn game_leaders(leaders: &GameLeaders) -> String {
    let final_flag = if leaders.is_final { "(Final) " } else { "" };
    format!(
        "{} @ {} Leaders {final_flag}~ {} | {}",
        leaders.away.team,
        leaders.home.team,
        side_leaders(&leaders.away),
        side_leaders(&leaders.home)
    )
}

pub fn game(game: &GameSummary) -> String {
    let state = match game.status {
        GameStatus::Scheduled => "scheduled".to_string(),
        GameStatus::InProgress => format!("period {}", game.period),
        GameStatus::Final => "final".to_string(),
    };
    let mut line = format!("{} @ {} ({state})", game.away_team, game.home_team);
    if !game.highlight.is_empty() {
        line.push_str(" ~ ");
        line.push_str(&game.highlight);
    }
    line
}

/// `1.CLE (--), 2.BOS (4)`
pub fn standings(label: &str, entries: &[StandingEntry]) -> String {
    let teams: Vec<String> = entries
        .iter()
        .map(|e| format!("{}.{} ({})", e.rank, e.team, games_behind(e.games_behind)))
        .collect();
    format!("{}: {}", label.to_uppercase(), teams.join(", "))
}

fn matchup(m: &PlayoffMatchup) -> String {
    let mark = |winner: bool| if winner { "*" } else { "" };
    let mut line = format!(
        "({}) {}{} {}-{} {}{} ({})",
        m.top_seed,
        m.top_team,
        mark(m.top_is_winner),
        m.top_wins,
        m.bottom_wins,
        m.bottom_team,
        mark(m.bottom_is_winner),
        m.bottom_seed,
    );
    if m.is_game_seven && !m.is_completed {
        line.push_str(" [game 7]");
    }
    line
}

pub fn playoff_round(round: u8, brackets: &[ConferenceBracket]) -> Vec<String> {
    if brackets.is_empty() {
        return vec![format!("No round {round} matchups yet")];
    }
    brackets
        .iter()
        .map(|bracket| {
            let matchups: Vec<String> = bracket.matchups.iter().map(matchup).collect();
            format!("{}: {}", bracket.conference, matchups.join(" | "))
        })
        .collect()
}
