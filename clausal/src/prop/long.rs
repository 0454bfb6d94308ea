//! Propagation of constraints.
use std::mem::take;

use partial_ref::{partial, PartialRef};

use clausal_formula::Lit;

use crate::activity::bump_clause;
use crate::context::{parts::*, Context};

use super::enqueue_assignment;
use super::{Conflict, Reason};

/// Propagate all literals implied by constraints watched by the given literal.
///
/// `lit` was just assigned true, so `!lit` is the falsified watched literal. On conflict return
/// the clause whose literals are all false.
///
/// See [`prop::watch`](crate::prop::watch) for the invariants that this has to uphold.
#[inline(never)]
pub fn propagate_long(
    mut ctx: partial!(
        Context,
        mut ActivityP,
        mut AssignmentP,
        mut ClauseDbP,
        mut ImplGraphP,
        mut TrailP,
        mut WatchlistsP,
    ),
    lit: Lit,
) -> Result<(), Conflict> {
    // Temporarily move watches out of the watchlists struct, so we are free to add watches to other
    // lists during propagation.
    let mut watches = take(ctx.part_mut(WatchlistsP).watched_by_mut(lit));

    let false_lit = !lit;
    let mut result = Ok(());
    let mut index = 0;

    while index < watches.len() {
        let cref = watches[index];

        {
            let (db, mut ctx) = ctx.split_part_mut(ClauseDbP);
            let lits = db.clause_mut(cref).lits_mut();

            // Keep the falsified literal in position 1, so that a propagated literal ends up in
            // position 0.
            if lits[0] == false_lit {
                lits.swap(0, 1);
            }
            debug_assert_eq!(lits[1], false_lit);

            let first = lits[0];

            if ctx.part(AssignmentP).lit_is_true(first) {
                index += 1;
                continue;
            }

            // Look for a replacement among the unwatched literals. A true literal satisfies the
            // clause so the scan can stop there, otherwise the first unassigned literal is used.
            let assignment = ctx.part(AssignmentP);
            let mut replacement = None;
            for (pos, &rest_lit) in lits.iter().enumerate().skip(2) {
                match assignment.lit_value(rest_lit) {
                    Some(true) => {
                        replacement = Some(pos);
                        break;
                    }
                    None if replacement.is_none() => replacement = Some(pos),
                    _ => (),
                }
            }

            if let Some(pos) = replacement {
                lits.swap(1, pos);
                let new_watched = lits[1];
                ctx.part_mut(WatchlistsP).add_watch(!new_watched, cref);
                // The last watch moves into this slot, so the index stays to examine it next.
                watches.swap_remove(index);
                continue;
            }

            index += 1;

            if ctx.part(AssignmentP).lit_is_false(first) {
                result = Err(Conflict(cref));
                break;
            }

            enqueue_assignment(ctx.borrow(), first, Reason::Long(cref));
        }

        bump_clause(ctx.borrow(), cref, 0.5);
    }

    // This keeps all unprocessed watches in the current watchlist, together with any watches
    // that were added to it in the meantime.
    let watchlist = ctx.part_mut(WatchlistsP).watched_by_mut(lit);
    watches.append(watchlist);
    *watchlist = watches;

    result
}
