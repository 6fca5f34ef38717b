use crate::endpoints::{EndpointResolver, Endpoints};
use crate::http::HttpCache;
use crate::ids::{PersonDirectory, SnapshotCache, TeamDirectory};
use crate::nba::{
    BoxScoreResponse, ConferenceStandingsResponse, DivisionStandingsResponse, PlayersResponse,
    PlayoffsBracketResponse, ScoreboardResponse, TeamLeadersResponse, TeamsResponse,
    UngroupedStandingsResponse,
};
use crate::{
    ApiConfig, ApiError, ApiResult, Conference, ConferenceBracket, ConferenceStandings, Division,
    DivisionStandings, GameLeaders, GameSummary, PersonId, PersonName, PlayerStatistic,
    StatCategory, TeamId, TeamRecord, Tricode, extract,
};
use log::debug;
use std::sync::Arc;

/// Rounds in a playoff bracket: first round, semifinals, conference finals, finals.
pub const PLAYOFF_ROUNDS: std::ops::RangeInclusive<u8> = 1..=4;

/// data.nba.net client.
///
/// Clones share the HTTP cache and the derived id directories, so one
/// instance can be handed to as many tasks as needed.
#[derive(Debug, Clone)]
pub struct NbaApi {
    http: HttpCache,
    resolver: EndpointResolver,
    teams: Arc<SnapshotCache<TeamDirectory>>,
    people: Arc<SnapshotCache<PersonDirectory>>,
}

impl Default for NbaApi {
    fn default() -> Self {
        Self::with_config(ApiConfig::default())
    }
}

impl NbaApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ApiConfig) -> Self {
        let config = Arc::new(config);
        let http = HttpCache::new(&config);
        Self {
            resolver: EndpointResolver::new(config, http.clone()),
            http,
            teams: Arc::default(),
            people: Arc::default(),
        }
    }

    /// Defaults overridden by the `NBASTATS_*` environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Ok(Self::with_config(ApiConfig::from_env()?))
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    pub fn teams(&self) -> Vec<Tricode> {
        Tricode::all().collect()
    }

    pub fn stat_categories(&self) -> &'static [StatCategory] {
        &StatCategory::ALL
    }

    pub fn conferences(&self) -> &'static [Conference] {
        &Conference::ALL
    }

    /// Every division, or those of one conference.
    pub fn divisions(&self, conference: Option<&str>) -> ApiResult<Vec<Division>> {
        match conference {
            None => Ok(Division::ALL.to_vec()),
            Some(name) => Ok(name.parse::<Conference>()?.divisions().to_vec()),
        }
    }

    // -----------------------------------------------------------------------
    // Identifiers
    // -----------------------------------------------------------------------

    pub async fn team_id(&self, tricode: &str) -> ApiResult<TeamId> {
        let tricode: Tricode = tricode.parse()?;
        let endpoints = self.resolver.endpoints().await?;
        self.team_directory(&endpoints).await?.team_id(tricode)
    }

    pub async fn tricode(&self, team_id: TeamId) -> ApiResult<Tricode> {
        let endpoints = self.resolver.endpoints().await?;
        self.team_directory(&endpoints).await?.tricode(team_id)
    }

    pub async fn player_name(&self, person_id: PersonId) -> ApiResult<PersonName> {
        let endpoints = self.resolver.endpoints().await?;
        self.person_directory(&endpoints).await?.name(person_id).cloned()
    }

    /// The scoreboard day the bootstrap document is anchored to, `YYYYMMDD`.
    pub async fn anchor_date(&self) -> ApiResult<String> {
        let endpoints = self.resolver.endpoints().await?;
        endpoints
            .anchor_date()
            .map(str::to_owned)
            .ok_or_else(|| ApiError::malformed("bootstrap document", "no anchorDate"))
    }

    async fn team_directory(&self, endpoints: &Endpoints) -> ApiResult<Arc<TeamDirectory>> {
        let fetched = self.http.get(&endpoints.teams()?).await?;
        self.teams.refresh(&fetched, |f| {
            TeamDirectory::from_teams(&f.decode::<TeamsResponse>()?.into_standard())
        })
    }

    async fn person_directory(&self, endpoints: &Endpoints) -> ApiResult<Arc<PersonDirectory>> {
        let fetched = self.http.get(&endpoints.roster_players()?).await?;
        self.people.refresh(&fetched, |f| {
            Ok(PersonDirectory::from_players(&f.decode::<PlayersResponse>()?.into_standard()))
        })
    }

    // -----------------------------------------------------------------------
    // Season
    // -----------------------------------------------------------------------

    pub async fn team_record(&self, tricode: &str) -> ApiResult<TeamRecord> {
        let tricode: Tricode = tricode.parse()?;
        debug!("loading record for {tricode}");
        let endpoints = self.resolver.endpoints().await?;
        let team_id = self.team_directory(&endpoints).await?.team_id(tricode)?;

        let standings = self
            .http
            .get_json::<UngroupedStandingsResponse>(&endpoints.ungrouped_standings()?)
            .await?
            .into_standard();
        extract::team_record(&standings, team_id)
    }

    /// One leader per category, in `StatCategory::ALL` order.
    pub async fn team_leaders(&self, tricode: &str) -> ApiResult<Vec<PlayerStatistic>> {
        let tricode: Tricode = tricode.parse()?;
        debug!("loading season leaders for {tricode}");
        let endpoints = self.resolver.endpoints().await?;
        let team_id = self.team_directory(&endpoints).await?.team_id(tricode)?;

        let leaders = self
            .http
            .get_json::<TeamLeadersResponse>(&endpoints.team_leaders(team_id)?)
            .await?
            .into_standard();
        let people = self.person_directory(&endpoints).await?;
        extract::team_leaders(&leaders, &people)
    }

    /// East then west. `conference` narrows the result to one of them.
    pub async fn conference_standings(
        &self,
        conference: Option<&str>,
    ) -> ApiResult<Vec<ConferenceStandings>> {
        let wanted = conference.map(str::parse::<Conference>).transpose()?;
        debug!("loading conference standings");
        let endpoints = self.resolver.endpoints().await?;
        let teams = self.team_directory(&endpoints).await?;

        let doc = self
            .http
            .get_json::<ConferenceStandingsResponse>(&endpoints.conference_standings()?)
            .await?
            .into_standard();
        let mut standings = extract::conference_standings(&doc, &teams)?;
        if let Some(wanted) = wanted {
            standings.retain(|s| s.conference == wanted);
        }
        Ok(standings)
    }

    /// All six divisions, or just the one named by `division`.
    pub async fn division_standings(
        &self,
        division: Option<&str>,
    ) -> ApiResult<Vec<DivisionStandings>> {
        let wanted = division.map(str::parse::<Division>).transpose()?;
        debug!("loading division standings");
        let endpoints = self.resolver.endpoints().await?;
        let teams = self.team_directory(&endpoints).await?;

        let doc = self
            .http
            .get_json::<DivisionStandingsResponse>(&endpoints.division_standings()?)
            .await?
            .into_standard();
        let mut standings = extract::division_standings(&doc, &teams)?;
        if let Some(wanted) = wanted {
            standings.retain(|s| s.division == wanted);
        }
        Ok(standings)
    }

    /// Decided series of one round, grouped by conference.
    pub async fn playoff_matchups(&self, round: u8) -> ApiResult<Vec<ConferenceBracket>> {
        if !PLAYOFF_ROUNDS.contains(&round) {
            return Err(ApiError::InvalidParameter(format!(
                "playoff round must be between {} and {}, got {round}",
                PLAYOFF_ROUNDS.start(),
                PLAYOFF_ROUNDS.end()
            )));
        }
        debug!("loading playoff round {round}");
        let endpoints = self.resolver.endpoints().await?;
        let teams = self.team_directory(&endpoints).await?;

        let bracket = self
            .http
            .get_json::<PlayoffsBracketResponse>(&endpoints.playoffs_bracket()?)
            .await?;
        extract::playoff_round(&bracket, &teams, round)
    }

    // -----------------------------------------------------------------------
    // Today
    // -----------------------------------------------------------------------

    pub async fn todays_games(&self) -> ApiResult<Vec<GameSummary>> {
        let endpoints = self.resolver.endpoints().await?;
        extract::games(&self.scoreboard(&endpoints).await?)
    }

    pub async fn is_team_playing(&self, tricode: &str) -> ApiResult<bool> {
        let tricode: Tricode = tricode.parse()?;
        let endpoints = self.resolver.endpoints().await?;
        match self.game_in_progress(&endpoints, tricode).await {
            Ok(_) => Ok(true),
            Err(ApiError::TeamNotPlaying(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Points, rebounds and assists leaders of both sides of the team's
    /// current game.
    pub async fn game_leaders(&self, tricode: &str) -> ApiResult<GameLeaders> {
        let tricode: Tricode = tricode.parse()?;
        let endpoints = self.resolver.endpoints().await?;
        let game = self.game_in_progress(&endpoints, tricode).await?;
        debug!("loading box score for {tricode} (game {})", game.id);

        let game_date = game.date.format("%Y%m%d").to_string();
        let box_score = self
            .http
            .get_json::<BoxScoreResponse>(&endpoints.box_score(&game_date, &game.id)?)
            .await?;
        let people = self.person_directory(&endpoints).await?;
        extract::game_leaders(&box_score, &people, game.is_final())
    }

    /// The scoreboard's highlight blurb for the team's current game.
    pub async fn game_highlight(&self, tricode: &str) -> ApiResult<String> {
        let tricode: Tricode = tricode.parse()?;
        let endpoints = self.resolver.endpoints().await?;
        Ok(self.game_in_progress(&endpoints, tricode).await?.highlight)
    }

    async fn scoreboard(&self, endpoints: &Endpoints) -> ApiResult<ScoreboardResponse> {
        self.http.get_json::<ScoreboardResponse>(&endpoints.scoreboard()?).await
    }

    async fn game_in_progress(
        &self,
        endpoints: &Endpoints,
        tricode: Tricode,
    ) -> ApiResult<GameSummary> {
        let team_id = self.team_directory(endpoints).await?.team_id(tricode)?;
        let board = self.scoreboard(endpoints).await?;
        extract::find_game_in_progress(&board, team_id)?
            .ok_or_else(|| ApiError::TeamNotPlaying(tricode.to_string()))
    }

    // -----------------------------------------------------------------------
    // Caches
    // -----------------------------------------------------------------------

    pub fn team_cache(&self) -> &SnapshotCache<TeamDirectory> {
        &self.teams
    }

    pub fn person_cache(&self) -> &SnapshotCache<PersonDirectory> {
        &self.people
    }

    pub fn bootstrap_cache(&self) -> &SnapshotCache<crate::nba::Bootstrap> {
        self.resolver.bootstrap_cache()
    }

    /// Drop every cached response and derived directory.
    pub fn clear_caches(&self) {
        self.http.clear();
        self.resolver.bootstrap_cache().invalidate();
        self.teams.invalidate();
        self.people.invalidate();
    }
}
