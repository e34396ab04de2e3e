use serde::{Deserialize, Serialize};

use crate::domain::{PlacementCategory, PlayerId};

use super::topology::Bracket;

/// Final standing of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalPlacement {
    pub player: PlayerId,
    /// 1-based; players knocked out in the same round share a placement.
    pub placement: usize,
    pub category: PlacementCategory,
}

/// Derive final placements from the elimination order of a completed
/// bracket: the champion first, then eliminated players by the depth of the
/// slot they went out in, deepest first. Players going out in the same round
/// share a placement (5th-6th and so on).
pub fn final_standings(bracket: &Bracket) -> Vec<FinalPlacement> {
    debug_assert!(bracket.complete);

    let mut standings = Vec::with_capacity(bracket.participants.len());
    let mut placed = 0;

    if let Some(champion) = bracket.champion {
        placed += 1;
        standings.push(FinalPlacement {
            player: champion,
            placement: 1,
            category: PlacementCategory::Champion,
        });
    }

    // Deepest eliminations first; equal depth shares a placement.
    let mut eliminated: Vec<(u32, PlayerId)> = bracket
        .eliminations
        .iter()
        .map(|e| (bracket.slots[e.slot].round.depth(), e.player))
        .collect();
    eliminated.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut index = 0;
    while index < eliminated.len() {
        let depth = eliminated[index].0;
        let group_start = index;
        let placement = placed + 1;
        while index < eliminated.len() && eliminated[index].0 == depth {
            standings.push(FinalPlacement {
                player: eliminated[index].1,
                placement,
                category: PlacementCategory::from_placement(placement),
            });
            index += 1;
        }
        placed += index - group_start;
    }

    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::advancement::submit_result;
    use crate::bracket::topology::{build_double_elimination, Occupant, SlotStatus};

    fn play_out_favoring_low_ids(bracket: &mut Bracket) {
        while !bracket.complete {
            let ready: Vec<usize> = bracket.pending_slots().iter().map(|s| s.id).collect();
            for slot_id in ready {
                if bracket.slots[slot_id].status != SlotStatus::Ready {
                    continue;
                }
                let slot = &bracket.slots[slot_id];
                let (a, b) = match (slot.occupants[0], slot.occupants[1]) {
                    (Occupant::Player(x), Occupant::Player(y)) if x < y => (2, 0),
                    _ => (0, 2),
                };
                submit_result(bracket, slot_id, a, b).unwrap();
            }
        }
    }

    #[test]
    fn test_standings_for_eight() {
        let mut bracket = build_double_elimination(&(1..=8).collect::<Vec<_>>()).unwrap();
        play_out_favoring_low_ids(&mut bracket);

        let standings = final_standings(&bracket);
        assert_eq!(standings.len(), 8);

        // Lower ids always win, so placements track ids exactly.
        assert_eq!(standings[0].player, 1);
        assert_eq!(standings[0].category, PlacementCategory::Champion);
        assert_eq!(standings[1].player, 2);
        assert_eq!(standings[1].category, PlacementCategory::RunnerUp);
        assert_eq!(standings[2].player, 3);
        assert_eq!(standings[2].category, PlacementCategory::Third);
        assert_eq!(standings[3].player, 4);
        assert_eq!(standings[3].category, PlacementCategory::Fourth);

        // 5th-6th and 7th-8th share placements, all inside the top 8 band.
        let tail: Vec<_> = standings[4..].iter().collect();
        assert_eq!(tail[0].placement, tail[1].placement);
        assert_eq!(tail[2].placement, tail[3].placement);
        assert!(tail.iter().all(|p| p.category == PlacementCategory::Top8));
    }

    #[test]
    fn test_every_participant_is_placed_exactly_once() {
        let mut bracket = build_double_elimination(&(1..=16).collect::<Vec<_>>()).unwrap();
        play_out_favoring_low_ids(&mut bracket);

        let standings = final_standings(&bracket);
        let mut players: Vec<_> = standings.iter().map(|p| p.player).collect();
        players.sort_unstable();
        assert_eq!(players, (1..=16).collect::<Vec<_>>());

        let top16 = standings
            .iter()
            .filter(|p| p.category == PlacementCategory::Top16)
            .count();
        assert_eq!(top16, 8);
    }

    #[test]
    fn test_standings_with_byes() {
        let mut bracket = build_double_elimination(&(1..=6).collect::<Vec<_>>()).unwrap();
        play_out_favoring_low_ids(&mut bracket);

        let standings = final_standings(&bracket);
        assert_eq!(standings.len(), 6);
        assert_eq!(standings[0].player, 1);
        // Byes never appear in the standings.
        assert!(standings.iter().all(|p| (1..=6).contains(&p.player)));
    }
}
