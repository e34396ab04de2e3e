use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;
use crate::errors::EngineError;

use super::topology::{
    Bracket, Elimination, MatchScore, Occupant, Seat, SlotId, SlotStatus,
};

/// What a single result submission did to the bracket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancementOutcome {
    pub slot: SlotId,
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub winner_advanced_to: Option<SlotId>,
    pub loser_dropped_to: Option<SlotId>,
    pub loser_eliminated: bool,
    /// Slots that became ready for submission as a consequence.
    pub newly_ready: Vec<SlotId>,
    pub reset_activated: bool,
    pub tournament_complete: bool,
    pub champion: Option<PlayerId>,
}

/// Record a decided match and propagate winner and loser along the prebuilt
/// edges, resolving any walkovers this uncovers.
///
/// Everything is validated before the first mutation: a rejected submission
/// leaves the bracket exactly as it was. Resubmitting to a completed slot is
/// an `InvalidStateTransition`, which is what prevents double-counted rating
/// events downstream.
pub fn submit_result(
    bracket: &mut Bracket,
    slot_id: SlotId,
    score_a: i32,
    score_b: i32,
) -> Result<AdvancementOutcome, EngineError> {
    if bracket.complete {
        return Err(EngineError::InvalidStateTransition(
            "tournament already completed".to_string(),
        ));
    }

    let slot = bracket.slot(slot_id)?;
    match slot.status {
        SlotStatus::Ready => {}
        SlotStatus::Completed => {
            return Err(EngineError::InvalidStateTransition(format!(
                "slot {} already has a recorded result",
                slot_id
            )));
        }
        SlotStatus::Pending => {
            return Err(EngineError::InvalidStateTransition(format!(
                "slot {} is not ready: both occupants must be assigned",
                slot_id
            )));
        }
        SlotStatus::Voided => {
            return Err(EngineError::InvalidStateTransition(format!(
                "slot {} was voided",
                slot_id
            )));
        }
    }

    if score_a < 0 || score_b < 0 {
        return Err(EngineError::InvalidResult(
            "scores must be non-negative".to_string(),
        ));
    }
    if score_a == score_b {
        return Err(EngineError::InvalidResult(
            "tied scores are not a valid result".to_string(),
        ));
    }

    let winner_seat = if score_a > score_b { Seat::A } else { Seat::B };
    let winner_occupant = slot.occupants[winner_seat.index()];
    let loser_occupant = slot.occupants[1 - winner_seat.index()];
    let (Some(winner), Some(loser)) = (winner_occupant.player(), loser_occupant.player()) else {
        // A ready slot always holds two real players; byes resolve as
        // walkovers before a slot ever becomes ready.
        return Err(EngineError::InvalidStateTransition(format!(
            "slot {} does not hold two players",
            slot_id
        )));
    };

    let winner_to = slot.winner_to;
    let loser_to = slot.loser_to;

    let mut newly_ready = Vec::new();
    complete_slot(
        bracket,
        slot_id,
        winner_occupant,
        Some(MatchScore { score_a, score_b }),
        &mut newly_ready,
    );

    // Walkovers may have completed a slot right after it became ready.
    newly_ready.retain(|&id| bracket.slots[id].status == SlotStatus::Ready);

    let is_final_segment = slot_id == bracket.grand_final || slot_id == bracket.reset;
    let loser_eliminated = bracket
        .eliminations
        .iter()
        .any(|e| e.player == loser && e.slot == slot_id);

    Ok(AdvancementOutcome {
        slot: slot_id,
        winner,
        loser,
        winner_advanced_to: if is_final_segment { None } else { winner_to.map(|e| e.slot) },
        loser_dropped_to: if loser_eliminated || is_final_segment {
            None
        } else {
            loser_to.map(|e| e.slot)
        },
        loser_eliminated,
        newly_ready,
        reset_activated: slot_id == bracket.grand_final
            && bracket.slots[bracket.reset].status == SlotStatus::Ready,
        tournament_complete: bracket.complete,
        champion: bracket.champion,
    })
}

/// Mark a slot decided and push its occupants onward. Shared by result
/// submission and build-time walkover resolution.
fn complete_slot(
    bracket: &mut Bracket,
    slot_id: SlotId,
    winner: Occupant,
    result: Option<MatchScore>,
    newly_ready: &mut Vec<SlotId>,
) {
    let (loser, winner_to, loser_to) = {
        let slot = &mut bracket.slots[slot_id];
        slot.winner = winner;
        slot.result = result;
        slot.status = SlotStatus::Completed;
        (slot.loser(), slot.winner_to, slot.loser_to)
    };

    if slot_id == bracket.grand_final {
        let occupants = bracket.slots[slot_id].occupants;
        if winner == occupants[Seat::B.index()] {
            // The losers-bracket finalist evened the score: bracket reset,
            // same two players go again.
            assign_occupant(bracket, bracket.reset, Seat::A, occupants[0], newly_ready);
            assign_occupant(bracket, bracket.reset, Seat::B, occupants[1], newly_ready);
        } else {
            finish(bracket, winner, loser, slot_id);
            bracket.slots[bracket.reset].status = SlotStatus::Voided;
        }
        return;
    }

    if slot_id == bracket.reset {
        finish(bracket, winner, loser, slot_id);
        return;
    }

    if let Some(edge) = winner_to {
        assign_occupant(bracket, edge.slot, edge.seat, winner, newly_ready);
    }

    match loser_to {
        Some(edge) => assign_occupant(bracket, edge.slot, edge.seat, loser, newly_ready),
        None => {
            if let Some(player) = loser.player() {
                bracket.eliminations.push(Elimination { player, slot: slot_id });
            }
        }
    }
}

fn finish(bracket: &mut Bracket, winner: Occupant, loser: Occupant, slot_id: SlotId) {
    if let Some(player) = loser.player() {
        bracket.eliminations.push(Elimination { player, slot: slot_id });
    }
    bracket.champion = winner.player();
    bracket.complete = true;
}

/// Place an occupant into a seat. When this fills the slot it either becomes
/// ready or, if a bye is involved, resolves immediately as a walkover.
pub(super) fn assign_occupant(
    bracket: &mut Bracket,
    slot_id: SlotId,
    seat: Seat,
    occupant: Occupant,
    newly_ready: &mut Vec<SlotId>,
) {
    let both_assigned = {
        let slot = &mut bracket.slots[slot_id];
        slot.occupants[seat.index()] = occupant;
        slot.occupants.iter().all(|o| o.is_assigned())
    };

    if !both_assigned || bracket.slots[slot_id].status != SlotStatus::Pending {
        return;
    }

    let occupants = bracket.slots[slot_id].occupants;
    let byes = occupants.iter().filter(|o| matches!(o, Occupant::Bye)).count();
    match byes {
        0 => {
            bracket.slots[slot_id].status = SlotStatus::Ready;
            newly_ready.push(slot_id);
        }
        1 => {
            let advancing = occupants
                .into_iter()
                .find(|o| matches!(o, Occupant::Player(_)))
                .unwrap_or(Occupant::Bye);
            complete_slot(bracket, slot_id, advancing, None, newly_ready);
        }
        _ => {
            // Two byes cancel out and the bye keeps travelling.
            complete_slot(bracket, slot_id, Occupant::Bye, None, newly_ready);
        }
    }
}
