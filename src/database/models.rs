use crate::bracket::{MatchScore, Occupant, RoundId, Segment, SlotStatus};

/// Flat row form of one bracket slot, as stored in match_slots.
#[derive(Debug, Clone)]
pub struct SlotRow {
    pub slot_id: usize,
    pub round: RoundId,
    pub index_in_round: usize,
    pub occupants: [Occupant; 2],
    pub result: Option<MatchScore>,
    pub winner: Occupant,
    pub status: SlotStatus,
}

/// Occupants are stored as TEXT: "-" for an unassigned seat, "bye", or the
/// player id in decimal.
pub fn encode_occupant(occupant: Occupant) -> String {
    match occupant {
        Occupant::Unassigned => "-".to_string(),
        Occupant::Bye => "bye".to_string(),
        Occupant::Player(id) => id.to_string(),
    }
}

pub fn decode_occupant(text: &str) -> Occupant {
    match text {
        "-" => Occupant::Unassigned,
        "bye" => Occupant::Bye,
        other => other
            .parse::<i64>()
            .map(Occupant::Player)
            .unwrap_or(Occupant::Unassigned),
    }
}

pub fn encode_segment(segment: Segment) -> &'static str {
    match segment {
        Segment::Winners => "winners",
        Segment::Losers => "losers",
        Segment::GrandFinal => "grand_final",
    }
}

pub fn decode_segment(text: &str) -> Segment {
    match text {
        "losers" => Segment::Losers,
        "grand_final" => Segment::GrandFinal,
        _ => Segment::Winners,
    }
}

pub fn encode_status(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Pending => "pending",
        SlotStatus::Ready => "ready",
        SlotStatus::Completed => "completed",
        SlotStatus::Voided => "voided",
    }
}

pub fn decode_status(text: &str) -> SlotStatus {
    match text {
        "ready" => SlotStatus::Ready,
        "completed" => SlotStatus::Completed,
        "voided" => SlotStatus::Voided,
        _ => SlotStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupant_encoding_round_trips() {
        for occupant in [Occupant::Unassigned, Occupant::Bye, Occupant::Player(42)] {
            assert_eq!(decode_occupant(&encode_occupant(occupant)), occupant);
        }
    }

    #[test]
    fn test_garbage_occupant_decodes_as_unassigned() {
        assert_eq!(decode_occupant("not-a-player"), Occupant::Unassigned);
    }
}
