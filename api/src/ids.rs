//! Identifier caches.
//!
//! Other documents reference teams and players by numeric id only. Resolving
//! those ids needs the full team list and the league roster, which are large
//! and rarely change, so the derived maps are kept as shared snapshots and
//! rebuilt only when the HTTP layer reports a body it has not seen before.

use crate::http::Fetched;
use crate::nba::{RosterPlayer, TeamEntry};
use crate::{ApiError, ApiResult, PersonId, PersonName, TeamId, Tricode};
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A value derived from a fetched document, replaced wholesale on rebuild.
///
/// Readers get an `Arc` to a complete snapshot: either the previous one or
/// the new one, never a half-built map. Concurrent callers may rebuild
/// redundantly and install out of order, so each snapshot remembers the body
/// it was built from and is only reused for that exact body.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    current: RwLock<Option<Snapshot<T>>>,
    rebuilds: AtomicUsize,
}

#[derive(Debug)]
struct Snapshot<T> {
    /// `None` for values installed directly through `rebuild`.
    source: Option<Arc<[u8]>>,
    value: Arc<T>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self { source: self.source.clone(), value: self.value.clone() }
    }
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self { current: RwLock::new(None), rebuilds: AtomicUsize::new(0) }
    }
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.snapshot().map(|s| s.value)
    }

    pub fn invalidate(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Install `value` as the current snapshot.
    pub fn rebuild(&self, value: T) -> Arc<T> {
        self.install(None, value)
    }

    /// How many snapshots have been installed so far.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Reuse the current snapshot if `fetched` came from the HTTP cache and
    /// carries the body that snapshot was built from, otherwise derive a new
    /// one from the body and install it.
    pub fn refresh(
        &self,
        fetched: &Fetched,
        build: impl FnOnce(&Fetched) -> ApiResult<T>,
    ) -> ApiResult<Arc<T>> {
        if fetched.from_cache
            && let Some(current) = self.snapshot()
            && current.source.as_ref().is_some_and(|source| *source == fetched.body)
        {
            return Ok(current.value);
        }
        debug!("rebuilding snapshot from {}", fetched.url);
        let value = build(fetched)?;
        Ok(self.install(Some(fetched.body.clone()), value))
    }

    fn snapshot(&self) -> Option<Snapshot<T>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn install(&self, source: Option<Arc<[u8]>>, value: T) -> Arc<T> {
        let value = Arc::new(value);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Snapshot { source, value: value.clone() });
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        value
    }
}

/// Bidirectional tricode <-> team id map for the league's franchises.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamDirectory {
    by_tricode: HashMap<Tricode, TeamId>,
    by_id: HashMap<TeamId, Tricode>,
}

impl TeamDirectory {
    /// Build from the team list, skipping all-star rosters and any tricode
    /// outside the current 30 franchises.
    pub fn from_teams(teams: &[TeamEntry]) -> ApiResult<Self> {
        let mut directory = Self::default();
        for team in teams.iter().filter(|t| t.is_nba_franchise) {
            let Ok(tricode) = team.tricode.parse::<Tricode>() else {
                debug!("skipping franchise {} ({})", team.tricode, team.team_id);
                continue;
            };
            directory.insert(tricode, team.team_id)?;
        }
        Ok(directory)
    }

    fn insert(&mut self, tricode: Tricode, team_id: TeamId) -> ApiResult<()> {
        if self.by_tricode.contains_key(&tricode) || self.by_id.contains_key(&team_id) {
            return Err(ApiError::malformed(
                "team list",
                format!("{tricode} / {team_id} listed more than once"),
            ));
        }
        self.by_tricode.insert(tricode, team_id);
        self.by_id.insert(team_id, tricode);
        Ok(())
    }

    pub fn team_id(&self, tricode: Tricode) -> ApiResult<TeamId> {
        self.by_tricode
            .get(&tricode)
            .copied()
            .ok_or_else(|| ApiError::unknown("team", tricode))
    }

    pub fn tricode(&self, team_id: TeamId) -> ApiResult<Tricode> {
        self.by_id
            .get(&team_id)
            .copied()
            .ok_or_else(|| ApiError::unknown("team", team_id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// person id -> name, one entry per rostered player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDirectory {
    names: HashMap<PersonId, PersonName>,
}

impl PersonDirectory {
    pub fn from_players(players: &[RosterPlayer]) -> Self {
        let names = players
            .iter()
            .map(|p| (p.person_id, PersonName::new(p.first_name.trim(), p.last_name.trim())))
            .collect();
        Self { names }
    }

    pub fn name(&self, person_id: PersonId) -> ApiResult<&PersonName> {
        self.names
            .get(&person_id)
            .ok_or_else(|| ApiError::unknown("person", person_id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team_list() -> Vec<TeamEntry> {
        serde_json::from_value(json!([
            {"teamId": "1610612744", "tricode": "GSW", "isNBAFranchise": true},
            {"teamId": "1610612747", "tricode": "LAL", "isNBAFranchise": true},
            {"teamId": "1610616833", "tricode": "EST", "isNBAFranchise": false},
            {"teamId": "1610612752", "tricode": "NYK", "isNBAFranchise": true},
        ]))
        .unwrap()
    }

    fn fetched(body: &str, from_cache: bool) -> Fetched {
        Fetched { url: "http://test/teams.json".into(), body: Arc::from(body.as_bytes()), from_cache }
    }

    #[test]
    fn team_directory_round_trips() {
        let directory = TeamDirectory::from_teams(&team_list()).unwrap();
        assert_eq!(directory.len(), 3);
        for code in ["GSW", "LAL", "NYK"] {
            let tricode: Tricode = code.parse().unwrap();
            let id = directory.team_id(tricode).unwrap();
            assert_eq!(directory.tricode(id).unwrap(), tricode);
        }
    }

    #[test]
    fn every_franchise_round_trips() {
        let entries: Vec<_> = Tricode::all()
            .enumerate()
            .map(|(i, code)| {
                let id = (1610612737 + i as u64).to_string();
                json!({"teamId": id, "tricode": code.as_str(), "isNBAFranchise": true})
            })
            .collect();
        let teams: Vec<TeamEntry> = serde_json::from_value(json!(entries)).unwrap();
        let directory = TeamDirectory::from_teams(&teams).unwrap();

        assert_eq!(directory.len(), 30);
        for tricode in Tricode::all() {
            let id = directory.team_id(tricode).unwrap();
            assert_eq!(directory.tricode(id).unwrap(), tricode);
        }
    }

    #[test]
    fn non_franchise_entries_are_skipped() {
        let directory = TeamDirectory::from_teams(&team_list()).unwrap();
        assert!(matches!(
            directory.tricode(TeamId(1610616833)),
            Err(ApiError::UnknownIdentifier { kind: "team", .. })
        ));
        assert!(directory.team_id("BOS".parse().unwrap()).is_err());
    }

    #[test]
    fn duplicate_ids_break_the_bijection() {
        let teams: Vec<TeamEntry> = serde_json::from_value(json!([
            {"teamId": "1", "tricode": "GSW", "isNBAFranchise": true},
            {"teamId": "1", "tricode": "LAL", "isNBAFranchise": true},
        ]))
        .unwrap();
        assert!(matches!(
            TeamDirectory::from_teams(&teams),
            Err(ApiError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn rebuilding_from_the_same_document_is_idempotent() {
        let a = TeamDirectory::from_teams(&team_list()).unwrap();
        let b = TeamDirectory::from_teams(&team_list()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn person_directory_resolves_names() {
        let players: Vec<RosterPlayer> = serde_json::from_value(json!([
            {"personId": "201939", "firstName": "Stephen", "lastName": "Curry"},
            {"personId": "200780", "firstName": "Nene", "lastName": ""},
        ]))
        .unwrap();
        let people = PersonDirectory::from_players(&players);
        assert_eq!(people.len(), 2);
        assert_eq!(people.name(PersonId(201939)).unwrap().display_name(), "Stephen Curry");
        assert_eq!(people.name(PersonId(200780)).unwrap().display_name(), "Nene");
        assert!(matches!(
            people.name(PersonId(1)),
            Err(ApiError::UnknownIdentifier { kind: "person", .. })
        ));
    }

    #[test]
    fn cache_hits_do_not_rebuild() {
        let cache: SnapshotCache<usize> = SnapshotCache::new();

        // First sight of a body that the HTTP layer already had: nothing to
        // reuse yet, so it still builds.
        let first = cache.refresh(&fetched("{}", true), |_| Ok(1)).unwrap();
        assert_eq!(*first, 1);
        assert_eq!(cache.rebuild_count(), 1);

        for _ in 0..3 {
            let again = cache.refresh(&fetched("{}", true), |_| Ok(2)).unwrap();
            assert_eq!(*again, 1);
        }
        assert_eq!(cache.rebuild_count(), 1);

        let fresh = cache.refresh(&fetched("{\"v\":2}", false), |_| Ok(3)).unwrap();
        assert_eq!(*fresh, 3);
        assert_eq!(cache.rebuild_count(), 2);
    }

    #[test]
    fn out_of_order_installs_do_not_stick() {
        let cache: SnapshotCache<&str> = SnapshotCache::new();

        // Two racing refreshes: the one holding the newer body finishes
        // first, the stale one installs last.
        cache.refresh(&fetched("v2", false), |_| Ok("built-from-v2")).unwrap();
        cache.refresh(&fetched("v1", false), |_| Ok("built-from-v1")).unwrap();
        assert_eq!(cache.get().as_deref(), Some(&"built-from-v1"));

        // The HTTP layer holds v2 and keeps reporting it as unchanged.
        for _ in 0..3 {
            let value = cache.refresh(&fetched("v2", true), |_| Ok("built-from-v2")).unwrap();
            assert_eq!(*value, "built-from-v2");
        }
        assert_eq!(cache.rebuild_count(), 3);
    }

    #[test]
    fn switching_urls_back_and_forth_rebuilds() {
        let cache: SnapshotCache<&str> = SnapshotCache::new();
        cache.refresh(&fetched("a", false), |_| Ok("a")).unwrap();
        cache.refresh(&fetched("b", false), |_| Ok("b")).unwrap();
        let value = cache.refresh(&fetched("a", true), |_| Ok("a")).unwrap();
        assert_eq!(*value, "a");
    }

    #[test]
    fn direct_installs_are_not_reused_for_fetched_bodies() {
        let cache: SnapshotCache<usize> = SnapshotCache::new();
        cache.rebuild(1);
        let value = cache.refresh(&fetched("{}", true), |_| Ok(2)).unwrap();
        assert_eq!(*value, 2);
    }

    #[test]
    fn failed_builds_keep_the_previous_snapshot() {
        let cache: SnapshotCache<usize> = SnapshotCache::new();
        cache.rebuild(7);
        let result = cache.refresh(&fetched("nope", false), |f| {
            Err(ApiError::malformed(f.url.as_str(), "bad"))
        });
        assert!(result.is_err());
        assert_eq!(cache.get().as_deref(), Some(&7));
    }

    #[test]
    fn invalidate_forces_a_rebuild() {
        let cache: SnapshotCache<usize> = SnapshotCache::new();
        cache.rebuild(1);
        cache.invalidate();
        assert!(cache.get().is_none());
        let value = cache.refresh(&fetched("{}", true), |_| Ok(5)).unwrap();
        assert_eq!(*value, 5);
        assert_eq!(cache.rebuild_count(), 2);
    }
}
