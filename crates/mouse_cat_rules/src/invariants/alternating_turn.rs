//! Alternating turn invariant: cat, mouse, cat, mouse, ...

use super::super::{MoveLog, Role};
use super::Invariant;

/// Invariant: the move log alternates sides, starting with the cats, and
/// its timestamps never go backwards.
pub struct AlternatingTurnInvariant;

impl Invariant<MoveLog> for AlternatingTurnInvariant {
    fn holds(log: &MoveLog) -> bool {
        let moves = log.moves();

        if let Some(first) = moves.first()
            && first.role() != Role::Cat
        {
            return false;
        }

        moves.windows(2).all(|pair| {
            pair[0].role() != pair[1].role() && pair[0].played_at() <= pair[1].played_at()
        })
    }

    fn description() -> &'static str {
        "Sides alternate (cat, mouse, cat, ...) in timestamp order"
    }
}
