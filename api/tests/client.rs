//! End-to-end engine behaviour against a local mock of data.nba.net.

use mockito::{Matcher, Mock, Server, ServerGuard};
use nba_api::{
    ApiConfig, ApiError, Conference, Division, GameStatCategory, NbaApi, Record, TransportError,
};
use serde_json::{Value, json};
use std::time::Duration;

const USER_AGENT: &str = "nbastats-tests";
const BOOTSTRAP: &str = "/prod/v1/today.json";
const TEAMS: &str = "/data/15m/prod/v1/2016/teams.json";
const PLAYERS: &str = "/data/15m/prod/v1/2016/players.json";
const SCOREBOARD: &str = "/data/10s/prod/v1/20170115/scoreboard.json";
const STANDINGS: &str = "/data/15m/prod/v1/current/standings_all.json";
const DIVISION_STANDINGS: &str = "/data/15m/prod/v1/current/standings_division.json";
const BOX_SCORE: &str = "/data/15m/prod/v1/20170115/0021600600_boxscore.json";
const BRACKET: &str = "/data/15m/prod/v1/2016/playoffsBracket.json";

const GSW: &str = "1610612744";
const LAL: &str = "1610612747";
const BOS: &str = "1610612738";
const CLE: &str = "1610612739";

fn api(server: &ServerGuard) -> NbaApi {
    NbaApi::with_config(ApiConfig {
        server: server.url(),
        bootstrap_path: BOOTSTRAP.into(),
        user_agent: USER_AGENT.into(),
        timeout: Some(Duration::from_secs(5)),
    })
}

fn bootstrap() -> String {
    json!({
        "_internal": {"pubDateTime": "2017-01-15 09:00:00.000 EST"},
        "seasonScheduleYear": 2016,
        "links": {
            "anchorDate": "20170115",
            "todayScoreboard": "/data/10s/prod/v1/20170115/scoreboard.json",
            "teams": "/data/10s/prod/v1/{{seasonScheduleYear}}/teams.json",
            "leagueRosterPlayers": "/data/10s/prod/v1/{{seasonScheduleYear}}/players.json",
            "leagueUngroupedStandings": "/data/10s/prod/v1/current/standings_all.json",
            "leagueConfStandings": "/data/10s/prod/v1/current/standings_conference.json",
            "leagueDivStandings": "/data/10s/prod/v1/current/standings_division.json",
            "teamLeaders": "/data/10s/prod/v1/{{seasonScheduleYear}}/teams/{{teamUrlCode}}/leaders.json",
            "boxscore": "/data/10s/prod/v1/{{gameDate}}/{{gameId}}_boxscore.json",
            "playoffsBracket": "/data/10s/prod/v1/{{seasonScheduleYear}}/playoffsBracket.json",
        }
    })
    .to_string()
}

fn league(standard: Value) -> String {
    json!({"league": {"standard": standard}}).to_string()
}

fn teams() -> String {
    league(json!([
        {"teamId": GSW, "tricode": "GSW", "isNBAFranchise": true},
        {"teamId": LAL, "tricode": "LAL", "isNBAFranchise": true},
        {"teamId": BOS, "tricode": "BOS", "isNBAFranchise": true},
        {"teamId": CLE, "tricode": "CLE", "isNBAFranchise": true},
        {"teamId": "1610616834", "tricode": "WST", "isNBAFranchise": false},
    ]))
}

fn players() -> String {
    league(json!([
        {"personId": "201939", "firstName": "Stephen", "lastName": "Curry"},
        {"personId": "201142", "firstName": "Kevin", "lastName": "Durant"},
        {"personId": "2544", "firstName": "LeBron", "lastName": "James"},
        {"personId": "202691", "firstName": "Klay", "lastName": "Thompson"},
    ]))
}

fn scoreboard(gsw_period: u8) -> String {
    let gsw_status = if gsw_period == 0 { 1 } else { 2 };
    json!({"games": [
        {
            "gameId": "0021600600",
            "startDateEastern": "20170115",
            "statusNum": gsw_status,
            "period": {"current": gsw_period},
            "hTeam": {"teamId": GSW, "triCode": "GSW"},
            "vTeam": {"teamId": CLE, "triCode": "CLE"},
            "nugget": {"text": "Curry hits 8 threes"},
        },
        {
            "gameId": "0021600601",
            "startDateEastern": "20170115",
            "statusNum": 1,
            "period": {"current": 0},
            "hTeam": {"teamId": BOS, "triCode": "BOS"},
            "vTeam": {"teamId": LAL, "triCode": "LAL"},
            "nugget": {"text": ""},
        },
    ]})
    .to_string()
}

async fn mock_body(server: &mut ServerGuard, path: &str, body: String) -> Mock {
    server
        .mock("GET", path)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_bootstrap(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", BOOTSTRAP)
        .match_header("user-agent", USER_AGENT)
        .with_header("content-type", "application/json")
        .with_body(bootstrap())
        .expect_at_least(1)
        .create_async()
        .await
}

#[tokio::test]
async fn team_record_goes_through_bootstrap_discovery() {
    let mut server = Server::new_async().await;
    let boot = mock_bootstrap(&mut server).await;
    let team_list = mock_body(&mut server, TEAMS, teams()).await;
    let standings = mock_body(
        &mut server,
        STANDINGS,
        league(json!({"teams": [{
            "teamId": LAL, "win": "16", "loss": "28",
            "homeWin": "10", "homeLoss": "12", "awayWin": "6", "awayLoss": "16",
            "lastTenWin": "3", "lastTenLoss": "7", "confRank": "14", "divRank": "4",
            "streak": "2", "isWinStreak": false, "gamesBehind": "18.5", "winPct": "0.364"
        }]})),
    )
    .await;

    let api = api(&server);
    let record = api.team_record("lal").await.expect("record");

    assert_eq!(record.total, Record { wins: 16, losses: 28 });
    assert_eq!(record.away, Record { wins: 6, losses: 16 });
    assert_eq!(record.conference_rank, 14);
    assert_eq!(record.games_behind, 18.5);
    assert_eq!(record.streak.games, 2);
    assert!(!record.streak.is_winning);
    assert_eq!(api.anchor_date().await.expect("anchor date"), "20170115");

    boot.assert_async().await;
    team_list.assert_async().await;
    standings.assert_async().await;
}

#[tokio::test]
async fn not_modified_reuses_the_team_directory() {
    let mut server = Server::new_async().await;
    mock_bootstrap(&mut server).await;
    let first = server
        .mock("GET", TEAMS)
        .match_header("if-none-match", Matcher::Missing)
        .with_header("etag", "\"teams-v1\"")
        .with_body(teams())
        .expect(1)
        .create_async()
        .await;
    let revalidated = server
        .mock("GET", TEAMS)
        .match_header("if-none-match", "\"teams-v1\"")
        .with_status(304)
        .expect(2)
        .create_async()
        .await;

    let api = api(&server);
    for _ in 0..3 {
        assert_eq!(api.team_id("GSW").await.expect("team id").0, 1610612744);
    }

    first.assert_async().await;
    revalidated.assert_async().await;
    assert_eq!(api.team_cache().rebuild_count(), 1);
    // The bootstrap carries no validators, but it comes back byte-identical.
    assert_eq!(api.bootstrap_cache().rebuild_count(), 1);
}

#[tokio::test]
async fn max_age_skips_the_network() {
    let mut server = Server::new_async().await;
    let boot = server
        .mock("GET", BOOTSTRAP)
        .with_header("cache-control", "public, max-age=600")
        .with_body(bootstrap())
        .expect(1)
        .create_async()
        .await;
    let team_list = server
        .mock("GET", TEAMS)
        .with_header("cache-control", "max-age=600")
        .with_body(teams())
        .expect(1)
        .create_async()
        .await;

    let api = api(&server);
    let id = api.team_id("CLE").await.expect("team id");
    for _ in 0..3 {
        assert_eq!(api.tricode(id).await.expect("tricode").as_str(), "CLE");
    }

    boot.assert_async().await;
    team_list.assert_async().await;
    assert_eq!(api.team_cache().rebuild_count(), 1);
}

#[tokio::test]
async fn changed_team_list_rebuilds_the_directory() {
    let mut server = Server::new_async().await;
    mock_bootstrap(&mut server).await;
    let old = mock_body(&mut server, TEAMS, teams()).await;

    let api = api(&server);
    assert!(api.team_id("BOS").await.is_ok());
    old.remove_async().await;

    mock_body(
        &mut server,
        TEAMS,
        league(json!([{"teamId": GSW, "tricode": "GSW", "isNBAFranchise": true}])),
    )
    .await;
    assert!(matches!(
        api.team_id("BOS").await,
        Err(ApiError::UnknownIdentifier { kind: "team", .. })
    ));
    assert_eq!(api.team_cache().rebuild_count(), 2);
}

#[tokio::test]
async fn game_leaders_need_a_started_game() {
    let mut server = Server::new_async().await;
    mock_bootstrap(&mut server).await;
    mock_body(&mut server, TEAMS, teams()).await;
    mock_body(&mut server, SCOREBOARD, scoreboard(0)).await;

    let api = api(&server);
    assert!(!api.is_team_playing("GSW").await.expect("playing"));
    match api.game_leaders("GSW").await {
        Err(ApiError::TeamNotPlaying(team)) => assert_eq!(team, "GSW"),
        other => panic!("expected TeamNotPlaying, got {other:?}"),
    }
    assert!(matches!(api.game_highlight("LAL").await, Err(ApiError::TeamNotPlaying(_))));
}

#[tokio::test]
async fn game_leaders_of_a_live_game() {
    let mut server = Server::new_async().await;
    mock_bootstrap(&mut server).await;
    mock_body(&mut server, TEAMS, teams()).await;
    mock_body(&mut server, PLAYERS, players()).await;
    mock_body(&mut server, SCOREBOARD, scoreboard(3)).await;
    let box_score = mock_body(
        &mut server,
        BOX_SCORE,
        json!({
            "basicGameData": {
                "gameId": "0021600600",
                "hTeam": {"teamId": GSW, "triCode": "GSW"},
                "vTeam": {"teamId": CLE, "triCode": "CLE"},
            },
            "stats": {
                "hTeam": {"leaders": {
                    "points": {"value": "30", "players": [{"personId": "201939"}, {"personId": "202691"}]},
                    "rebounds": {"value": "10", "players": [{"personId": "201142"}]},
                    "assists": {"value": "11", "players": [{"personId": "201939"}]},
                }},
                "vTeam": {"leaders": {
                    "points": {"value": "20", "players": [{"personId": "2544"}]},
                    "rebounds": {"value": "8", "players": [{"personId": "2544"}]},
                    "assists": {"value": "6", "players": [{"personId": "2544"}]},
                }},
            }
        })
        .to_string(),
    )
    .await;

    let api = api(&server);
    assert!(api.is_team_playing("cle").await.expect("playing"));
    assert_eq!(api.game_highlight("GSW").await.expect("highlight"), "Curry hits 8 threes");

    let leaders = api.game_leaders("CLE").await.expect("leaders");
    box_score.assert_async().await;
    assert!(!leaders.is_final);
    assert_eq!(leaders.home.team.as_str(), "GSW");

    let points = &leaders.home.leaders[0];
    assert_eq!(points.category, GameStatCategory::Points);
    assert_eq!(points.value, 30);
    let names: Vec<_> = points.players.iter().map(|p| p.display_name()).collect();
    assert_eq!(names, ["Stephen Curry", "Klay Thompson"]);
    assert_eq!(leaders.away.leaders[2].players[0].short_name(), "L. James");
}

#[tokio::test]
async fn season_leaders_resolve_player_names() {
    let mut server = Server::new_async().await;
    mock_bootstrap(&mut server).await;
    mock_body(&mut server, TEAMS, teams()).await;
    mock_body(&mut server, PLAYERS, players()).await;

    let mut leaders = serde_json::Map::new();
    for key in ["ppg", "trpg", "apg", "fgp", "ftp", "tpp", "bpg", "spg", "tpg", "pfpg"] {
        leaders.insert(
            key.into(),
            json!([{"personId": "201939", "value": "1.5"}, {"personId": "201142", "value": "1.0"}]),
        );
    }
    mock_body(
        &mut server,
        "/data/15m/prod/v1/2016/teams/1610612744/leaders.json",
        league(Value::Object(leaders)),
    )
    .await;

    let api = api(&server);
    let stats = api.team_leaders("GSW").await.expect("leaders");
    assert_eq!(stats.len(), 10);
    assert!(stats.iter().all(|s| s.player.display_name() == "Stephen Curry"));
    assert_eq!(
        stats.iter().map(|s| s.category).collect::<Vec<_>>(),
        api.stat_categories()
    );
    assert_eq!(api.person_cache().rebuild_count(), 1);
}

#[tokio::test]
async fn division_standings_can_be_filtered() {
    let mut server = Server::new_async().await;
    mock_bootstrap(&mut server).await;
    mock_body(&mut server, TEAMS, teams()).await;
    let row = |id: &str, rank: &str, behind: &str| {
        json!({"teamId": id, "divRank": rank, "divGamesBehind": behind})
    };
    mock_body(
        &mut server,
        DIVISION_STANDINGS,
        league(json!({"conference": {
            "east": {"atlantic": [row(BOS, "1", "0")], "central": [row(CLE, "1", "0")], "southeast": []},
            "west": {"northwest": [], "pacific": [row(GSW, "1", "0"), row(LAL, "4", "21")], "southwest": []},
        }})),
    )
    .await;

    let api = api(&server);
    let all = api.division_standings(None).await.expect("standings");
    assert_eq!(all.len(), 6);

    let pacific = api.division_standings(Some("Pacific")).await.expect("pacific");
    assert_eq!(pacific.len(), 1);
    assert_eq!(pacific[0].division, Division::Pacific);
    assert_eq!(pacific[0].conference, Conference::West);
    assert_eq!(pacific[0].teams[1].team.as_str(), "LAL");
    assert_eq!(pacific[0].teams[1].games_behind, 21.0);
}

#[tokio::test]
async fn playoff_round_lists_decided_series() {
    let mut server = Server::new_async().await;
    mock_bootstrap(&mut server).await;
    mock_body(&mut server, TEAMS, teams()).await;
    mock_body(
        &mut server,
        BRACKET,
        json!({"series": [
            {
                "roundNum": "4", "confName": "", "seriesId": "401",
                "isScheduleAvailable": true, "isSeriesCompleted": true,
                "topRow": {"teamId": GSW, "seedNum": "1", "wins": "4", "isSeriesWinner": true},
                "bottomRow": {"teamId": CLE, "seedNum": "1", "wins": "1", "isSeriesWinner": false},
            },
        ]})
        .to_string(),
    )
    .await;

    let api = api(&server);
    let finals = api.playoff_matchups(4).await.expect("finals");
    assert_eq!(finals.len(), 1);
    assert_eq!(finals[0].matchups[0].winner().map(|t| t.as_str()), Some("GSW"));
    assert!(api.playoff_matchups(1).await.expect("first round").is_empty());
}

#[tokio::test]
async fn bad_parameters_fail_before_any_request() {
    let mut server = Server::new_async().await;
    let boot = server.mock("GET", BOOTSTRAP).expect(0).create_async().await;

    let api = api(&server);
    assert!(matches!(api.team_record("XYZ").await, Err(ApiError::InvalidParameter(_))));
    assert!(matches!(api.team_leaders("").await, Err(ApiError::InvalidParameter(_))));
    assert!(matches!(api.game_leaders("LA").await, Err(ApiError::InvalidParameter(_))));
    assert!(matches!(
        api.conference_standings(Some("north")).await,
        Err(ApiError::InvalidParameter(_))
    ));
    assert!(matches!(
        api.division_standings(Some("midwest")).await,
        Err(ApiError::InvalidParameter(_))
    ));
    for round in [0, 5] {
        assert!(matches!(
            api.playoff_matchups(round).await,
            Err(ApiError::InvalidParameter(_))
        ));
    }

    boot.assert_async().await;
}

#[tokio::test]
async fn server_errors_are_transport_errors() {
    let mut server = Server::new_async().await;
    server.mock("GET", BOOTSTRAP).with_status(500).create_async().await;

    let api = api(&server);
    assert!(matches!(api.todays_games().await, Err(ApiError::Transport(..))));
}

#[tokio::test]
async fn unfollowed_redirects_are_transport_errors() {
    let mut server = Server::new_async().await;
    server.mock("GET", BOOTSTRAP).with_status(300).create_async().await;

    let api = api(&server);
    match api.todays_games().await {
        Err(ApiError::Transport(TransportError::Status(status), url)) => {
            assert_eq!(status.as_u16(), 300);
            assert!(url.ends_with(BOOTSTRAP), "{url}");
        }
        other => panic!("expected a status transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_bodies_are_malformed() {
    let mut server = Server::new_async().await;
    mock_bootstrap(&mut server).await;
    mock_body(&mut server, SCOREBOARD, "<html>maintenance</html>".into()).await;

    let api = api(&server);
    assert!(matches!(api.todays_games().await, Err(ApiError::MalformedResponse { .. })));
}
