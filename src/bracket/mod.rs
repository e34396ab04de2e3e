pub mod advancement;
pub mod standings;
pub mod topology;

pub use advancement::{submit_result, AdvancementOutcome};
pub use standings::{final_standings, FinalPlacement};
pub use topology::{
    build_double_elimination, seeding_order, Bracket, Branch, Edge, Elimination, MatchScore,
    MatchSlot, Occupant, RoundId, Seat, Segment, SlotId, SlotStatus, MAX_FIELD, MIN_FIELD,
};
