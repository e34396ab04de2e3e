use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;
use crate::errors::EngineError;

pub type SlotId = usize;

pub const MIN_FIELD: usize = 4;
pub const MAX_FIELD: usize = 64;

/// Which part of the bracket a round belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Winners,
    Losers,
    GrandFinal,
}

/// Branch of a losers cycle. Branch A pairs losers-bracket survivors,
/// Branch B merges them with the losers dropping from the winners bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    A,
    B,
}

/// Explicit round coordinates.
///
/// The source system packed losers cycles into round numbers like 101 and
/// 201; here the segment, cycle and round are separate fields. Winners
/// rounds use cycle 0; the grand final is round 1 and the reset round 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundId {
    pub segment: Segment,
    pub cycle: u32,
    pub round: u32,
}

impl RoundId {
    pub fn winners(round: u32) -> Self {
        Self { segment: Segment::Winners, cycle: 0, round }
    }

    pub fn losers(cycle: u32, round: u32) -> Self {
        Self { segment: Segment::Losers, cycle, round }
    }

    pub fn grand_final(round: u32) -> Self {
        Self { segment: Segment::GrandFinal, cycle: 0, round }
    }

    pub fn branch(&self) -> Option<Branch> {
        match (self.segment, self.round) {
            (Segment::Losers, 1) => Some(Branch::A),
            (Segment::Losers, 2) => Some(Branch::B),
            _ => None,
        }
    }

    /// Ordering key for elimination depth; higher means later in the
    /// tournament.
    pub fn depth(&self) -> u32 {
        match self.segment {
            Segment::Winners => self.round,
            Segment::Losers => self.cycle * 10 + self.round,
            Segment::GrandFinal => 1000 + self.round,
        }
    }
}

/// A seat holder in a match slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    Unassigned,
    Bye,
    Player(PlayerId),
}

impl Occupant {
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Occupant::Player(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        !matches!(self, Occupant::Unassigned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    pub fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }
}

/// Immutable advancement edge computed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub slot: SlotId,
    pub seat: Seat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Pending,
    Ready,
    Completed,
    /// Only the reset slot can be voided, when the first grand final already
    /// decides the tournament.
    Voided,
}

/// Recorded scores of a played match. Walkovers complete a slot without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score_a: i32,
    pub score_b: i32,
}

/// One scheduled match position in the bracket graph.
///
/// Slots are created with the bracket and never added or removed afterward;
/// only occupants, result and status mutate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSlot {
    pub id: SlotId,
    pub round: RoundId,
    pub index_in_round: usize,
    pub occupants: [Occupant; 2],
    pub winner_to: Option<Edge>,
    pub loser_to: Option<Edge>,
    pub result: Option<MatchScore>,
    pub winner: Occupant,
    pub status: SlotStatus,
}

impl MatchSlot {
    fn new(id: SlotId, round: RoundId, index_in_round: usize) -> Self {
        Self {
            id,
            round,
            index_in_round,
            occupants: [Occupant::Unassigned, Occupant::Unassigned],
            winner_to: None,
            loser_to: None,
            result: None,
            winner: Occupant::Unassigned,
            status: SlotStatus::Pending,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == SlotStatus::Ready
    }

    /// The occupant that lost, once the slot is completed.
    pub fn loser(&self) -> Occupant {
        if self.winner == self.occupants[0] {
            self.occupants[1]
        } else {
            self.occupants[0]
        }
    }
}

/// A player knocked out for good, with the slot they went out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    pub player: PlayerId,
    pub slot: SlotId,
}

/// Full double-elimination structure for one tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bracket {
    /// Field size after padding to a power of two.
    pub field_size: usize,
    /// Seed-ordered entrants (no byes).
    pub participants: Vec<PlayerId>,
    pub slots: Vec<MatchSlot>,
    pub grand_final: SlotId,
    pub reset: SlotId,
    pub eliminations: Vec<Elimination>,
    pub champion: Option<PlayerId>,
    pub complete: bool,
}

impl Bracket {
    pub fn slot(&self, id: SlotId) -> Result<&MatchSlot, EngineError> {
        self.slots.get(id).ok_or(EngineError::SlotNotFound(id))
    }

    pub fn pending_slots(&self) -> Vec<&MatchSlot> {
        self.slots.iter().filter(|s| s.is_ready()).collect()
    }

    pub fn winners_rounds(&self) -> u32 {
        self.field_size.ilog2()
    }
}

/// Standard bracket seeding order (1-based seeds), e.g. [1,8,4,5,2,7,3,6]
/// for a field of 8. Consecutive pairs form the round-1 slots, which places
/// byes against the top seeds first.
pub fn seeding_order(field_size: usize) -> Vec<usize> {
    let mut order = vec![1usize];
    let mut size = 1;
    while size < field_size {
        size *= 2;
        let mut next = Vec::with_capacity(size);
        for &seed in &order {
            next.push(seed);
            next.push(size + 1 - seed);
        }
        order = next;
    }
    order
}

/// Build the fixed double-elimination graph for the given entrants.
///
/// Supported field sizes are 4..=64 entrants; non-powers of two are padded
/// with byes, resolved as walkovers at build time. All advancement edges are
/// computed here and never change afterward.
pub fn build_double_elimination(participants: &[PlayerId]) -> Result<Bracket, EngineError> {
    let entrants = participants.len();
    if !(MIN_FIELD..=MAX_FIELD).contains(&entrants) {
        return Err(EngineError::UnsupportedSize(entrants));
    }

    let field_size = entrants.next_power_of_two();
    let rounds = field_size.ilog2();

    let mut slots = Vec::new();

    // Winners rounds 1..=R; round r has field/2^r slots.
    let mut winners_rounds: Vec<Vec<SlotId>> = Vec::new();
    for r in 1..=rounds {
        let count = field_size >> r;
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let id = slots.len();
            slots.push(MatchSlot::new(id, RoundId::winners(r), i));
            ids.push(id);
        }
        winners_rounds.push(ids);
    }

    // Losers cycles 1..=R-1, each a Branch A (minor) and Branch B (major)
    // round of field/2^(k+1) slots.
    let mut minor_rounds: Vec<Vec<SlotId>> = Vec::new();
    let mut major_rounds: Vec<Vec<SlotId>> = Vec::new();
    for k in 1..rounds {
        let count = field_size >> (k + 1);
        let mut minor = Vec::with_capacity(count);
        for i in 0..count {
            let id = slots.len();
            slots.push(MatchSlot::new(id, RoundId::losers(k, 1), i));
            minor.push(id);
        }
        let mut major = Vec::with_capacity(count);
        for i in 0..count {
            let id = slots.len();
            slots.push(MatchSlot::new(id, RoundId::losers(k, 2), i));
            major.push(id);
        }
        minor_rounds.push(minor);
        major_rounds.push(major);
    }

    let grand_final = slots.len();
    slots.push(MatchSlot::new(grand_final, RoundId::grand_final(1), 0));
    let reset = slots.len();
    slots.push(MatchSlot::new(reset, RoundId::grand_final(2), 0));

    wire_winners_edges(&mut slots, &winners_rounds, &minor_rounds, &major_rounds, grand_final);
    wire_losers_edges(&mut slots, &minor_rounds, &major_rounds, grand_final);

    let mut bracket = Bracket {
        field_size,
        participants: participants.to_vec(),
        slots,
        grand_final,
        reset,
        eliminations: Vec::new(),
        champion: None,
        complete: false,
    };

    seed_first_round(&mut bracket, participants, &winners_rounds[0]);

    Ok(bracket)
}

fn wire_winners_edges(
    slots: &mut [MatchSlot],
    winners: &[Vec<SlotId>],
    minors: &[Vec<SlotId>],
    majors: &[Vec<SlotId>],
    grand_final: SlotId,
) {
    let rounds = winners.len();
    for (r_idx, round_ids) in winners.iter().enumerate() {
        for (i, &id) in round_ids.iter().enumerate() {
            // Winner edge: next winners round, or the grand final.
            slots[id].winner_to = if r_idx + 1 < rounds {
                Some(Edge { slot: winners[r_idx + 1][i / 2], seat: seat_for(i) })
            } else {
                Some(Edge { slot: grand_final, seat: Seat::A })
            };

            // Loser edge: round 1 losers pair up in the first minor round;
            // later rounds drop into the merge (Branch B) round of the
            // previous cycle, reversed on alternating cycles to delay
            // rematches.
            slots[id].loser_to = if r_idx == 0 {
                Some(Edge { slot: minors[0][i / 2], seat: seat_for(i) })
            } else {
                let cycle = r_idx - 1;
                let targets = &majors[cycle];
                let j = if cycle % 2 == 0 { targets.len() - 1 - i } else { i };
                Some(Edge { slot: targets[j], seat: Seat::B })
            };
        }
    }
}

fn wire_losers_edges(
    slots: &mut [MatchSlot],
    minors: &[Vec<SlotId>],
    majors: &[Vec<SlotId>],
    grand_final: SlotId,
) {
    let cycles = minors.len();
    for k in 0..cycles {
        for (i, &id) in minors[k].iter().enumerate() {
            slots[id].winner_to = Some(Edge { slot: majors[k][i], seat: Seat::A });
            slots[id].loser_to = None;
        }
        for (i, &id) in majors[k].iter().enumerate() {
            slots[id].winner_to = if k + 1 < cycles {
                Some(Edge { slot: minors[k + 1][i / 2], seat: seat_for(i) })
            } else {
                Some(Edge { slot: grand_final, seat: Seat::B })
            };
            slots[id].loser_to = None;
        }
    }
}

fn seat_for(index: usize) -> Seat {
    if index % 2 == 0 { Seat::A } else { Seat::B }
}

fn seed_first_round(bracket: &mut Bracket, participants: &[PlayerId], round_one: &[SlotId]) {
    let order = seeding_order(bracket.field_size);
    for (pos, &seed) in order.iter().enumerate() {
        let slot_id = round_one[pos / 2];
        let seat = seat_for(pos);
        let occupant = participants
            .get(seed - 1)
            .map(|&p| Occupant::Player(p))
            .unwrap_or(Occupant::Bye);
        super::advancement::assign_occupant(bracket, slot_id, seat, occupant, &mut Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<PlayerId> {
        (1..=n as i64).collect()
    }

    #[test]
    fn test_unsupported_sizes() {
        assert_eq!(
            build_double_elimination(&players(3)).unwrap_err(),
            EngineError::UnsupportedSize(3)
        );
        assert_eq!(
            build_double_elimination(&players(65)).unwrap_err(),
            EngineError::UnsupportedSize(65)
        );
    }

    #[test]
    fn test_seeding_order_of_eight() {
        assert_eq!(seeding_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn test_slot_counts_for_eight() {
        let bracket = build_double_elimination(&players(8)).unwrap();
        // 7 winners + 6 losers + grand final + reset.
        assert_eq!(bracket.slots.len(), 15);
        assert_eq!(bracket.winners_rounds(), 3);

        let winners_r1: Vec<_> = bracket
            .slots
            .iter()
            .filter(|s| s.round == RoundId::winners(1))
            .collect();
        assert_eq!(winners_r1.len(), 4);
        // Full field, no byes: all of round 1 is ready.
        assert!(winners_r1.iter().all(|s| s.is_ready()));
    }

    #[test]
    fn test_every_participant_seeded_exactly_once() {
        let bracket = build_double_elimination(&players(8)).unwrap();
        let mut seen = Vec::new();
        for slot in &bracket.slots {
            if slot.round != RoundId::winners(1) {
                continue;
            }
            for occupant in slot.occupants {
                if let Occupant::Player(id) = occupant {
                    seen.push(id);
                }
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, players(8));
    }

    #[test]
    fn test_top_seed_meets_bottom_seed() {
        let bracket = build_double_elimination(&players(8)).unwrap();
        let first = bracket
            .slots
            .iter()
            .find(|s| s.round == RoundId::winners(1) && s.index_in_round == 0)
            .unwrap();
        assert_eq!(first.occupants[0], Occupant::Player(1));
        assert_eq!(first.occupants[1], Occupant::Player(8));
    }

    #[test]
    fn test_edges_are_total() {
        let bracket = build_double_elimination(&players(16)).unwrap();
        for slot in &bracket.slots {
            match slot.round.segment {
                Segment::Winners => {
                    assert!(slot.winner_to.is_some());
                    assert!(slot.loser_to.is_some());
                }
                Segment::Losers => {
                    assert!(slot.winner_to.is_some());
                    // A loss in the losers bracket is elimination.
                    assert!(slot.loser_to.is_none());
                }
                Segment::GrandFinal => {
                    assert!(slot.winner_to.is_none());
                }
            }
        }
    }

    #[test]
    fn test_losers_rounds_carry_branch_tags() {
        let bracket = build_double_elimination(&players(8)).unwrap();
        let minor = bracket
            .slots
            .iter()
            .find(|s| s.round == RoundId::losers(1, 1))
            .unwrap();
        let major = bracket
            .slots
            .iter()
            .find(|s| s.round == RoundId::losers(1, 2))
            .unwrap();
        assert_eq!(minor.round.branch(), Some(Branch::A));
        assert_eq!(major.round.branch(), Some(Branch::B));
    }

    #[test]
    fn test_byes_advance_top_seeds() {
        // Six entrants in a field of eight: seeds 1 and 2 face byes and
        // advance straight to winners round 2.
        let bracket = build_double_elimination(&players(6)).unwrap();
        let round_two: Vec<_> = bracket
            .slots
            .iter()
            .filter(|s| s.round == RoundId::winners(2))
            .collect();
        let advanced: Vec<_> = round_two
            .iter()
            .flat_map(|s| s.occupants)
            .filter_map(|o| o.player())
            .collect();
        assert!(advanced.contains(&1));
        assert!(advanced.contains(&2));
        // Walkovers record no eliminations.
        assert!(bracket.eliminations.is_empty());
    }

    #[test]
    fn test_bye_walkover_has_no_score() {
        let bracket = build_double_elimination(&players(6)).unwrap();
        let walkover = bracket
            .slots
            .iter()
            .find(|s| s.status == SlotStatus::Completed)
            .unwrap();
        assert!(walkover.result.is_none());
        assert!(walkover.winner.player().is_some());
    }
}
