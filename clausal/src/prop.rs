//! Unit propagation.
use partial_ref::{partial, PartialRef};

use crate::context::{parts::*, Context};

pub mod assignment;
pub mod graph;
pub mod long;
pub mod watch;

pub use assignment::{backtrack, enqueue_assignment, restart, Assignment, Trail};
pub use graph::{Conflict, ImplGraph, Reason};
pub use watch::Watchlists;

/// Reason why propagation stopped before reaching a fixpoint.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Halt {
    Conflict(Conflict),
    Interrupted,
}

impl From<Conflict> for Halt {
    fn from(conflict: Conflict) -> Halt {
        Halt::Conflict(conflict)
    }
}

/// Propagate enqueued assignments.
///
/// Returns when all enqueued assignments are propagated, including newly propagated assignments,
/// or when there is a conflict. The interrupt flag is checked before each dequeued literal.
///
/// On conflict the first propagation that would assign the opposite value to an already assigned
/// literal is returned.
pub fn propagate(
    mut ctx: partial!(
        Context,
        mut ActivityP,
        mut AssignmentP,
        mut ClauseDbP,
        mut ImplGraphP,
        mut StatsP,
        mut TrailP,
        mut WatchlistsP,
        InterruptP,
    ),
) -> Result<(), Halt> {
    while let Some(lit) = ctx.part(TrailP).queue_head() {
        if ctx.part(InterruptP).is_interrupted() {
            return Err(Halt::Interrupted);
        }
        ctx.part_mut(TrailP).pop_queue();
        ctx.part_mut(StatsP).propagations += 1;
        long::propagate_long(ctx.borrow(), lit)?;
    }
    Ok(())
}
