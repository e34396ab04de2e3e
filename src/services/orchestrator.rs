use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::bracket::{self, AdvancementOutcome, Bracket, MatchSlot, SlotId};
use crate::config::AppConfig;
use crate::domain::{
    PlacementCategory, Player, PlayerId, RankTier, Tournament, TournamentId, TournamentStatus,
};
use crate::errors::EngineError;
use crate::rating::{
    apply_match_result, apply_tournament_placement, EloEvent, RankChange, RatingSource, SpaEvent,
};

/// Events surfaced to downstream systems (notifications, dashboards).
/// Delivery is out of scope here; the sink decides what to do with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    SlotReady {
        tournament_id: TournamentId,
        slot: SlotId,
    },
    PlayerEliminated {
        tournament_id: TournamentId,
        player: PlayerId,
    },
    RankChanged(RankChange),
    TournamentCompleted {
        tournament_id: TournamentId,
        champion: PlayerId,
    },
}

/// Read access to the confirmed roster of a tournament.
pub trait RosterSource {
    fn confirmed_participants(
        &self,
        tournament_id: TournamentId,
    ) -> impl Future<Output = Result<Vec<Player>>> + Send;
}

/// Transactional write access for everything one operation mutates.
pub trait ResultSink {
    fn persist(
        &self,
        transaction: &TournamentTransaction,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Fire-and-forget domain event emission.
pub trait EventSink {
    fn emit(&self, event: DomainEvent);
}

/// Everything a single orchestrator operation wants persisted atomically:
/// either all of it lands or none of it does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TournamentTransaction {
    pub tournament_id: TournamentId,
    pub status: Option<TournamentStatus>,
    /// Set when the bracket is created at registration close.
    pub field_size: Option<usize>,
    /// (player, seed) pairs, only on bracket creation.
    pub participants: Vec<(PlayerId, usize)>,
    /// Created or mutated slots, full rows.
    pub slots: Vec<MatchSlot>,
    /// Players whose rating/rank/spa changed.
    pub players: Vec<Player>,
    pub elo_events: Vec<EloEvent>,
    pub spa_events: Vec<SpaEvent>,
}

/// One participant line in the standings read model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub rating: i32,
    pub rank: RankTier,
    pub spa_points: i32,
    pub eliminated: bool,
    pub placement: Option<usize>,
    pub category: Option<PlacementCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsView {
    pub tournament_id: TournamentId,
    pub status: TournamentStatus,
    pub entries: Vec<StandingEntry>,
}

struct TournamentState {
    tournament: Tournament,
    players: HashMap<PlayerId, Player>,
    bracket: Option<Bracket>,
}

/// Ties the bracket engine, handicap calculator and rating engine together
/// behind three narrow collaborator interfaces. Knows nothing about UI,
/// storage technology or notification transport.
///
/// Submissions for the same tournament are serialized through one mutex per
/// tournament: advancement effects on shared downstream slots do not
/// commute, so two semifinal results must not race to seat the grand final.
pub struct Orchestrator<S, E> {
    store: S,
    events: E,
    config: AppConfig,
    tournaments: RwLock<HashMap<TournamentId, Arc<Mutex<TournamentState>>>>,
}

impl<S, E> Orchestrator<S, E>
where
    S: RosterSource + ResultSink,
    E: EventSink,
{
    pub fn new(store: S, events: E, config: AppConfig) -> Self {
        Self {
            store,
            events,
            config,
            tournaments: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Register a tournament with the orchestrator. Used both for newly
    /// created tournaments and for rehydrating persisted ones.
    pub async fn install(
        &self,
        tournament: Tournament,
        players: Vec<Player>,
        bracket: Option<Bracket>,
    ) {
        let state = TournamentState {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
            bracket,
            tournament,
        };
        let id = state.tournament.id;
        self.tournaments
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(state)));
    }

    pub async fn known_tournaments(&self) -> Vec<TournamentId> {
        self.tournaments.read().await.keys().copied().collect()
    }

    async fn state_of(&self, id: TournamentId) -> Result<Arc<Mutex<TournamentState>>> {
        self.tournaments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!(EngineError::UnknownTournament(id)))
    }

    /// Close registration: read the final roster, build the bracket exactly
    /// once, and move the tournament to ongoing. A roster already frozen as
    /// registration-closed (e.g. by admin tooling between restarts) can also
    /// be started from here.
    pub async fn close_registration(&self, id: TournamentId) -> Result<()> {
        let state = self.state_of(id).await?;
        let mut state = state.lock().await;

        if !matches!(
            state.tournament.status,
            TournamentStatus::RegistrationOpen | TournamentStatus::RegistrationClosed
        ) {
            return Err(anyhow!(EngineError::InvalidStateTransition(format!(
                "tournament {} is not awaiting a bracket",
                id
            ))));
        }

        let roster = self
            .store
            .confirmed_participants(id)
            .await
            .context("failed to read the confirmed roster")?;

        let participant_ids: Vec<PlayerId> = roster.iter().map(|p| p.id).collect();
        let bracket = bracket::build_double_elimination(&participant_ids)?;

        let transaction = TournamentTransaction {
            tournament_id: id,
            status: Some(TournamentStatus::Ongoing),
            field_size: Some(bracket.field_size),
            participants: participant_ids
                .iter()
                .enumerate()
                .map(|(seed, &p)| (p, seed + 1))
                .collect(),
            slots: bracket.slots.clone(),
            ..Default::default()
        };
        self.store
            .persist(&transaction)
            .await
            .context("failed to persist the new bracket")?;

        state.players = roster.into_iter().map(|p| (p.id, p)).collect();
        state.tournament.status = TournamentStatus::Ongoing;

        for slot in bracket.pending_slots() {
            self.events.emit(DomainEvent::SlotReady { tournament_id: id, slot: slot.id });
        }
        info!(
            "tournament {}: bracket built for {} entrants ({} slots)",
            id,
            participant_ids.len(),
            bracket.slots.len()
        );
        state.bracket = Some(bracket);

        Ok(())
    }

    /// Record one match result: advance the bracket, update ratings, and
    /// hand everything to the sink as a single transaction. If the sink
    /// refuses, in-memory state is restored from the pre-submission
    /// snapshot; partial advancement is never observable.
    pub async fn submit_result(
        &self,
        id: TournamentId,
        slot: SlotId,
        score_a: i32,
        score_b: i32,
    ) -> Result<AdvancementOutcome> {
        let state = self.state_of(id).await?;
        let mut state = state.lock().await;
        let state = &mut *state;

        let bracket = state
            .bracket
            .as_mut()
            .ok_or_else(|| anyhow!(EngineError::InvalidStateTransition(format!(
                "tournament {} has no bracket yet",
                id
            ))))?;

        let snapshot_bracket = bracket.clone();
        let snapshot_players = state.players.clone();
        let snapshot_status = state.tournament.status;

        let outcome = bracket::submit_result(bracket, slot, score_a, score_b)?;

        let mut transaction = TournamentTransaction {
            tournament_id: id,
            ..Default::default()
        };
        let mut emitted = Vec::new();

        self.apply_match_rating(state, id, &outcome, &mut transaction, &mut emitted)?;

        if outcome.tournament_complete {
            self.apply_placements(state, id, &mut transaction)?;
            state.tournament.status = TournamentStatus::Completed;
            transaction.status = Some(TournamentStatus::Completed);
        }

        let bracket = state.bracket.as_ref().expect("bracket present");
        transaction.slots = changed_slots(&snapshot_bracket, bracket);

        if let Err(err) = self.store.persist(&transaction).await {
            state.bracket = Some(snapshot_bracket);
            state.players = snapshot_players;
            state.tournament.status = snapshot_status;
            return Err(err.context("result submission rolled back"));
        }

        for slot in &outcome.newly_ready {
            self.events.emit(DomainEvent::SlotReady { tournament_id: id, slot: *slot });
        }
        if outcome.loser_eliminated {
            self.events.emit(DomainEvent::PlayerEliminated {
                tournament_id: id,
                player: outcome.loser,
            });
        }
        for event in emitted {
            self.events.emit(event);
        }
        if let Some(champion) = outcome.champion {
            self.events.emit(DomainEvent::TournamentCompleted { tournament_id: id, champion });
        }

        Ok(outcome)
    }

    fn apply_match_rating(
        &self,
        state: &mut TournamentState,
        id: TournamentId,
        outcome: &AdvancementOutcome,
        transaction: &mut TournamentTransaction,
        emitted: &mut Vec<DomainEvent>,
    ) -> Result<()> {
        let mut winner = state
            .players
            .get(&outcome.winner)
            .cloned()
            .ok_or_else(|| anyhow!("winner missing from the roster"))?;
        let mut loser = state
            .players
            .get(&outcome.loser)
            .cloned()
            .ok_or_else(|| anyhow!("loser missing from the roster"))?;

        let rating_outcome = apply_match_result(
            &mut winner,
            &mut loser,
            RatingSource::Match { tournament_id: Some(id), slot: Some(outcome.slot) },
            &self.config.elo,
            &self.config.ranks,
        );

        transaction.players.push(winner.clone());
        transaction.players.push(loser.clone());
        state.players.insert(winner.id, winner);
        state.players.insert(loser.id, loser);
        transaction.elo_events.extend(rating_outcome.events);
        for change in rating_outcome.rank_changes {
            emitted.push(DomainEvent::RankChanged(change));
        }
        Ok(())
    }

    fn apply_placements(
        &self,
        state: &mut TournamentState,
        id: TournamentId,
        transaction: &mut TournamentTransaction,
    ) -> Result<()> {
        let bracket = state.bracket.as_ref().expect("bracket present");
        let placements = bracket::final_standings(bracket);

        for placement in placements {
            let player = state
                .players
                .get_mut(&placement.player)
                .ok_or_else(|| anyhow!("placed player missing from the roster"))?;
            let event =
                apply_tournament_placement(player, id, placement.category, &self.config.rewards);
            transaction.spa_events.push(event);
            transaction.players.push(player.clone());
        }
        Ok(())
    }

    /// Current standings: final placements once complete, otherwise the
    /// still-alive roster ordered by rating with eliminations marked.
    pub async fn standings(&self, id: TournamentId) -> Result<StandingsView> {
        let state = self.state_of(id).await?;
        let state = state.lock().await;

        let mut entries = Vec::new();
        match &state.bracket {
            Some(bracket) if bracket.complete => {
                for placement in bracket::final_standings(bracket) {
                    let player = state
                        .players
                        .get(&placement.player)
                        .ok_or_else(|| anyhow!("placed player missing from the roster"))?;
                    entries.push(entry_for(player, Some(placement.placement), Some(placement.category), true));
                }
                if let Some(first) = entries.first_mut() {
                    first.eliminated = false;
                }
            }
            Some(bracket) => {
                let eliminated: Vec<PlayerId> =
                    bracket.eliminations.iter().map(|e| e.player).collect();
                let mut players: Vec<&Player> = state.players.values().collect();
                players.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)));
                for player in players {
                    entries.push(entry_for(player, None, None, eliminated.contains(&player.id)));
                }
            }
            None => {
                let mut players: Vec<&Player> = state.players.values().collect();
                players.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)));
                for player in players {
                    entries.push(entry_for(player, None, None, false));
                }
            }
        }

        Ok(StandingsView {
            tournament_id: id,
            status: state.tournament.status,
            entries,
        })
    }

    /// Slots currently awaiting a result.
    pub async fn pending_slots(&self, id: TournamentId) -> Result<Vec<MatchSlot>> {
        let state = self.state_of(id).await?;
        let state = state.lock().await;
        Ok(state
            .bracket
            .as_ref()
            .map(|b| b.pending_slots().into_iter().cloned().collect())
            .unwrap_or_default())
    }

    /// The full bracket graph for rendering.
    pub async fn bracket_graph(&self, id: TournamentId) -> Result<Bracket> {
        let state = self.state_of(id).await?;
        let state = state.lock().await;
        state
            .bracket
            .clone()
            .ok_or_else(|| anyhow!(EngineError::InvalidStateTransition(format!(
                "tournament {} has no bracket yet",
                id
            ))))
    }

    pub async fn tournament(&self, id: TournamentId) -> Result<Tournament> {
        let state = self.state_of(id).await?;
        let state = state.lock().await;
        Ok(state.tournament.clone())
    }
}

fn entry_for(
    player: &Player,
    placement: Option<usize>,
    category: Option<PlacementCategory>,
    eliminated: bool,
) -> StandingEntry {
    StandingEntry {
        player_id: player.id,
        name: player.name.clone(),
        rating: player.rating,
        rank: player.rank,
        spa_points: player.spa_points,
        eliminated,
        placement,
        category,
    }
}

/// Slots whose row differs from the pre-operation snapshot.
fn changed_slots(before: &Bracket, after: &Bracket) -> Vec<MatchSlot> {
    after
        .slots
        .iter()
        .zip(&before.slots)
        .filter(|(now, was)| {
            now.status != was.status || now.occupants != was.occupants || now.result != was.result
        })
        .map(|(now, _)| now.clone())
        .collect()
}

/// Event sink that just logs; real deployments forward to the notification
/// pipeline instead.
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&self, event: DomainEvent) {
        info!("domain event: {:?}", event);
    }
}
