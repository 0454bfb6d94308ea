//! Loading a problem into the solver.
use vec_mut_scan::VecMutScan;

use partial_ref::{partial, PartialRef};

use clausal_formula::{Lit, Problem};

use crate::clause::{db, ClauseHeader};
use crate::context::{parts::*, Context};
use crate::prop::{enqueue_assignment, Reason};
use crate::state::SatState;

/// Adds all clauses of a problem.
///
/// Has to be called before any decision is made. Stops early when a clause makes the problem
/// unsatisfiable.
pub fn load_problem(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut ClauseDbP,
        mut ImplGraphP,
        mut SolverStateP,
        mut TmpDataP,
        mut TrailP,
        mut WatchlistsP,
    ),
    problem: &Problem,
) {
    for clause in problem.iter() {
        if ctx.part(SolverStateP).sat_state == SatState::Unsat {
            break;
        }
        load_clause(ctx.borrow(), clause);
    }
}

/// Adds a clause to the current problem.
///
/// Removes duplicated literals, ignores tautological clauses (eg. x v -x v y), handles empty
/// clauses and dispatches among unit and longer clauses. Literals already false at level 0 are
/// dropped and clauses already true are ignored.
pub fn load_clause(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut ClauseDbP,
        mut ImplGraphP,
        mut SolverStateP,
        mut TmpDataP,
        mut TrailP,
        mut WatchlistsP,
    ),
    lits: &[Lit],
) {
    debug_assert_eq!(ctx.part(TrailP).current_level(), 0);

    if ctx.part(SolverStateP).sat_state == SatState::Unsat {
        return;
    }

    let (tmp_data, mut ctx) = ctx.split_part_mut(TmpDataP);

    let lits_buf = &mut tmp_data.lits;
    lits_buf.clear();
    lits_buf.extend_from_slice(lits);

    lits_buf.sort_unstable();
    lits_buf.dedup();

    // Detect tautological clauses. Sorting places both senses of a variable next to each other.
    let mut last = None;

    for &lit in lits_buf.iter() {
        if last == Some(!lit) {
            return;
        }
        last = Some(lit);
    }

    let mut lits_scan = VecMutScan::new(lits_buf);

    while let Some(lit) = lits_scan.next() {
        match ctx.part(AssignmentP).lit_value(*lit) {
            Some(true) => return,
            Some(false) => {
                lit.remove();
            }
            None => (),
        }
    }

    drop(lits_scan);

    match lits_buf[..] {
        [] => ctx.part_mut(SolverStateP).sat_state = SatState::Unsat,
        [lit] => enqueue_assignment(ctx.borrow(), lit, Reason::Unit),
        _ => {
            db::add_clause(ctx.borrow(), ClauseHeader::irred(), lits_buf);
        }
    }
}
