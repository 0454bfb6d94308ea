//! Conflict driven clause learning.

use partial_ref::{partial, PartialRef};

use crate::activity::{bump_clause, bump_var, decay_clause_activities, decay_var_activities};
use crate::analyze_conflict::analyze_conflict;
use crate::clause::{db, ClauseHeader};
use crate::context::{parts::*, Context};
use crate::decision::make_decision;
use crate::prop::{backtrack, enqueue_assignment, propagate, Conflict, Halt, Reason};
use crate::state::SatState;

/// Find a conflict, learn a clause and backtrack.
///
/// Returns the glue level of the learned clause, if one was learned.
pub fn conflict_step(
    mut ctx: partial!(
        Context,
        mut ActivityP,
        mut AnalyzeConflictP,
        mut AssignmentP,
        mut CandidateHeapP,
        mut ClauseDbP,
        mut ImplGraphP,
        mut SolverStateP,
        mut StatsP,
        mut TmpDataP,
        mut TrailP,
        mut WatchlistsP,
        InterruptP,
        SolverConfigP,
    ),
) -> Option<usize> {
    let conflict = match find_conflict(ctx.borrow()) {
        Ok(()) => {
            ctx.part_mut(SolverStateP).sat_state = SatState::Sat;
            return None;
        }
        Err(Halt::Interrupted) => {
            ctx.part_mut(SolverStateP).sat_state = SatState::Interrupted;
            return None;
        }
        Err(Halt::Conflict(conflict)) => conflict,
    };

    ctx.part_mut(StatsP).conflicts += 1;

    if ctx.part(TrailP).current_level() == 0 {
        ctx.part_mut(SolverStateP).sat_state = SatState::Unsat;
        return None;
    }

    if ctx.part(SolverConfigP).only_poor_mans_vsids {
        flip_last_branch(ctx.borrow(), conflict);
        return None;
    }

    let backtrack_to = analyze_conflict(ctx.borrow(), conflict);

    let (analyze, mut ctx) = ctx.split_part(AnalyzeConflictP);

    for &var in analyze.seen_vars() {
        bump_var(ctx.borrow(), var);
    }

    for &cref in analyze.involved() {
        bump_clause(ctx.borrow(), cref, 1.0);
    }

    decay_var_activities(ctx.borrow());
    decay_clause_activities(ctx.borrow());

    backtrack(ctx.borrow(), backtrack_to);

    let clause = analyze.clause();
    let lbd = analyze.lbd();

    let reason = match clause.len() {
        0 => {
            ctx.part_mut(SolverStateP).sat_state = SatState::Unsat;
            return None;
        }
        1 => Reason::Unit,
        _ => {
            let config = ctx.part(SolverConfigP);
            let header = ClauseHeader::learned(
                lbd,
                ctx.part(ActivityP).clause_bump(),
                lbd > config.reduce_keep_lbd,
            );
            let cref = db::add_clause(ctx.borrow(), header, clause);
            Reason::Long(cref)
        }
    };

    ctx.part_mut(StatsP).learned_clauses += 1;

    enqueue_assignment(ctx.borrow(), clause[0], reason);

    Some(lbd)
}

/// Backtrack chronologically without learning.
///
/// Bumps the variables of the conflicting clause, then undoes the most recent decision that was
/// not flipped yet and enqueues its negation. If every decision was flipped already the problem is
/// unsatisfiable.
fn flip_last_branch(
    mut ctx: partial!(
        Context,
        mut ActivityP,
        mut AssignmentP,
        mut CandidateHeapP,
        mut ImplGraphP,
        mut SolverStateP,
        mut StatsP,
        mut TrailP,
        ClauseDbP,
    ),
    conflict: Conflict,
) {
    let (db, mut ctx) = ctx.split_part(ClauseDbP);

    for &lit in conflict.lits(db) {
        bump_var(ctx.borrow(), lit.var());
    }
    decay_var_activities(ctx.borrow());

    let first_branch = ctx
        .part(TrailP)
        .boundaries()
        .iter()
        .rposition(|b| b.first_branch);

    let level = match first_branch {
        Some(index) => index + 1,
        None => {
            ctx.part_mut(SolverStateP).sat_state = SatState::Unsat;
            return;
        }
    };

    let decision = ctx.part(TrailP).decision(level);

    backtrack(ctx.borrow(), level - 1);

    ctx.part_mut(TrailP).new_decision_level(false);
    enqueue_assignment(ctx.borrow(), !decision, Reason::Unit);
    ctx.part_mut(StatsP).decisions += 1;
}

/// Find a conflict.
///
/// Returns `Err` if a conflict was found or the search was interrupted and `Ok` if a satisfying
/// assignment was found instead.
pub fn find_conflict(
    mut ctx: partial!(
        Context,
        mut ActivityP,
        mut AssignmentP,
        mut CandidateHeapP,
        mut ClauseDbP,
        mut ImplGraphP,
        mut StatsP,
        mut TrailP,
        mut WatchlistsP,
        InterruptP,
    ),
) -> Result<(), Halt> {
    loop {
        propagate(ctx.borrow())?;

        if !make_decision(ctx.borrow()) {
            return Ok(());
        }
    }
}
