//! Learned clause database reduction.
use std::cmp::Reverse;
use std::mem::take;

use ordered_float::OrderedFloat;
use partial_ref::{partial, PartialRef};
use vec_mut_scan::VecMutScan;

use crate::context::{parts::*, Context};
use crate::prop::Reason;

use super::{db::collect_garbage, ClauseRef};

/// Whether a clause is the reason of a current assignment.
///
/// Locked clauses may not be deleted.
pub fn is_locked(
    ctx: partial!(Context, AssignmentP, ClauseDbP, ImplGraphP),
    cref: ClauseRef,
) -> bool {
    let lit = ctx.part(ClauseDbP).lits(cref)[0];
    ctx.part(AssignmentP).lit_is_true(lit)
        && *ctx.part(ImplGraphP).reason(lit.var()) == Reason::Long(cref)
}

/// Delete inactive and high glue learned clauses.
///
/// Tracked clauses with a glue above the configured maximum are deleted, as well as the least
/// active ones until the configured ratio is reached. Locked clauses are kept. Returns the number
/// of deleted clauses.
pub fn reduce_learned(
    mut ctx: partial!(
        Context,
        mut ClauseDbP,
        mut WatchlistsP,
        AssignmentP,
        ImplGraphP,
        SolverConfigP,
    ),
) -> usize {
    let (config, mut ctx) = ctx.split_part(SolverConfigP);

    let mut tracked = take(ctx.part_mut(ClauseDbP).tracked_mut());

    tracked.sort_unstable_by_key(|&cref| {
        Reverse(OrderedFloat(ctx.part(ClauseDbP).header(cref).activity))
    });

    let to_delete = (tracked.len() as f64 * config.reduce_ratio) as usize;
    let keep_active = tracked.len() - to_delete;

    let mut deleted = 0;
    let mut position = 0;

    let mut scan = VecMutScan::new(&mut tracked);

    while let Some(cref) = scan.next() {
        let inactive = position >= keep_active;
        position += 1;

        let high_glue = ctx.part(ClauseDbP).header(*cref).lbd > config.max_learned_lbd;

        if (inactive || high_glue) && !is_locked(ctx.borrow(), *cref) {
            ctx.part_mut(ClauseDbP).delete_clause(cref.remove());
            deleted += 1;
        }
    }

    drop(scan);

    *ctx.part_mut(ClauseDbP).tracked_mut() = tracked;

    collect_garbage(ctx.borrow());

    deleted
}
