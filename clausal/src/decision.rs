//! Decision heuristics.

use partial_ref::{partial, PartialRef};

use crate::context::{parts::*, Context};
use crate::prop::{enqueue_assignment, Reason};

pub mod heap;

pub use heap::CandidateHeap;

/// Make a decision and enqueue it.
///
/// Branches on the unassigned variable with the highest activity, using the value it had when it
/// was last assigned. Returns `false` if no decision was made because all variables are assigned.
pub fn make_decision(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut CandidateHeapP,
        mut ImplGraphP,
        mut StatsP,
        mut TrailP,
    ),
) -> bool {
    let (heap, mut ctx) = ctx.split_part_mut(CandidateHeapP);

    if let Some(decision_var) = heap.find(|&var| ctx.part(AssignmentP).var_value(var).is_none()) {
        let decision = decision_var.lit(ctx.part(AssignmentP).last_var_value(decision_var));

        ctx.part_mut(TrailP).new_decision_level(true);

        enqueue_assignment(ctx.borrow(), decision, Reason::Unit);

        ctx.part_mut(StatsP).decisions += 1;

        true
    } else {
        false
    }
}
