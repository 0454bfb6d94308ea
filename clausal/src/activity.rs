//! Variable and clause activities.
//!
//! Activities implement the VSIDS (Variable State Independent Decaying Sum) scheme: some event
//! bumps the activity of a variable or clause by an increment and after each conflict all
//! activities decay by a constant factor. As an optimization instead of decaying all activities,
//! the increment is divided by the decay factor. When this would cause a value to overflow all
//! activities and the increment are scaled down. Apart from a scaling factor that is the same for
//! all involved values, this is equivalent to the naive implementation. As only the order of
//! activities matters, the scaling factor can be ignored.

use partial_ref::{partial, PartialRef};

use clausal_formula::Var;

use crate::clause::ClauseRef;
use crate::config::SolverConfig;
use crate::context::{parts::*, Context};

/// Rescale activities if any value exceeds this value.
const RESCALE_LIMIT: f64 = 1e100;

/// Global increments and decay factors for activities.
///
/// Variable activities are stored in the [`CandidateHeap`](crate::decision::CandidateHeap), clause
/// activities in the clause headers.
pub struct ActivityManager {
    var_bump: f64,
    var_inv_decay: f64,
    clause_bump: f64,
    clause_inv_decay: f64,
}

impl Default for ActivityManager {
    fn default() -> ActivityManager {
        let config = SolverConfig::default();
        ActivityManager {
            var_bump: 1.0,
            var_inv_decay: 1.0 / config.vsids_decay,
            clause_bump: 1.0,
            clause_inv_decay: 1.0 / config.clause_activity_decay,
        }
    }
}

impl ActivityManager {
    /// Change the variable decay factor.
    pub fn set_var_decay(&mut self, decay: f64) {
        debug_assert!(decay < 1.0);
        debug_assert!(decay > 1.0 / 16.0);
        self.var_inv_decay = 1.0 / decay;
    }

    /// Change the clause decay factor.
    pub fn set_clause_decay(&mut self, decay: f64) {
        debug_assert!(decay < 1.0);
        debug_assert!(decay > 1.0 / 16.0);
        self.clause_inv_decay = 1.0 / decay;
    }

    /// The current clause increment, also the initial activity of a learned clause.
    pub fn clause_bump(&self) -> f64 {
        self.clause_bump
    }
}

/// Increase a variable's activity.
pub fn bump_var(mut ctx: partial!(Context, mut ActivityP, mut CandidateHeapP), var: Var) {
    let bump = ctx.part(ActivityP).var_bump;
    if ctx.part_mut(CandidateHeapP).bump(var, bump) > RESCALE_LIMIT {
        rescale_var_activities(ctx.borrow());
    }
}

/// Decay all variable activities.
pub fn decay_var_activities(mut ctx: partial!(Context, mut ActivityP, mut CandidateHeapP)) {
    let activity = ctx.part_mut(ActivityP);
    activity.var_bump *= activity.var_inv_decay;
    if activity.var_bump > RESCALE_LIMIT {
        rescale_var_activities(ctx.borrow());
    }
}

fn rescale_var_activities(mut ctx: partial!(Context, mut ActivityP, mut CandidateHeapP)) {
    let factor = 1.0 / RESCALE_LIMIT;
    ctx.part_mut(CandidateHeapP).rescale(factor);
    ctx.part_mut(ActivityP).var_bump *= factor;
}

/// Increase a clause's activity by `scale` times the current increment.
///
/// Only tracked clauses carry an activity, other clauses are ignored.
pub fn bump_clause(
    mut ctx: partial!(Context, mut ActivityP, mut ClauseDbP),
    cref: ClauseRef,
    scale: f64,
) {
    let bump = ctx.part(ActivityP).clause_bump * scale;
    let header = ctx.part_mut(ClauseDbP).header_mut(cref);
    if !header.tracked {
        return;
    }
    header.activity += bump;
    if header.activity > RESCALE_LIMIT {
        rescale_clause_activities(ctx.borrow());
    }
}

/// Decay all clause activities.
pub fn decay_clause_activities(mut ctx: partial!(Context, mut ActivityP, mut ClauseDbP)) {
    let activity = ctx.part_mut(ActivityP);
    activity.clause_bump *= activity.clause_inv_decay;
    if activity.clause_bump > RESCALE_LIMIT {
        rescale_clause_activities(ctx.borrow());
    }
}

fn rescale_clause_activities(mut ctx: partial!(Context, mut ActivityP, mut ClauseDbP)) {
    let factor = 1.0 / RESCALE_LIMIT;
    let db = ctx.part_mut(ClauseDbP);
    for index in 0..db.tracked().len() {
        let cref = db.tracked()[index];
        db.header_mut(cref).activity *= factor;
    }
    ctx.part_mut(ActivityP).clause_bump *= factor;
}

#[cfg(test)]
mod tests {
    use super::*;

    use partial_ref::IntoPartialRefMut;

    use crate::clause::{db::add_clause, ClauseHeader};
    use crate::context::set_var_count;

    #[test]
    fn rescale_on_decay() {
        let mut ctx = Context::default();
        let mut ctx = ctx.into_partial_ref_mut();

        set_var_count(ctx.borrow(), 4);
        ctx.part_mut(ActivityP).set_var_decay(1.0 / 8.0);

        for index in 0..4 {
            for _ in 0..index {
                bump_var(ctx.borrow(), Var::from_index(index));
            }
        }

        // 8^111 > 1e100 triggers at least one rescale.
        for _ in 0..111 {
            decay_var_activities(ctx.borrow());
        }
        assert!(ctx.part(ActivityP).var_bump <= RESCALE_LIMIT);

        bump_var(ctx.borrow(), var!(1));

        let heap = ctx.part(CandidateHeapP);
        assert!(heap.activity(var!(1)) > heap.activity(var!(4)));
        assert_eq!(heap.activity(var!(3)), heap.activity(var!(2)) * 2.0);
        assert!(heap.activity(var!(4)) > heap.activity(var!(3)));
    }

    #[test]
    fn clause_bumps_only_tracked() {
        let mut ctx = Context::default();
        let mut ctx = ctx.into_partial_ref_mut();

        set_var_count(ctx.borrow(), 3);

        let irred = add_clause(ctx.borrow(), ClauseHeader::irred(), &lits![1, 2, 3]);
        let tracked = add_clause(
            ctx.borrow(),
            ClauseHeader::learned(3, 1.0, true),
            &lits![-1, 2, 3],
        );

        bump_clause(ctx.borrow(), irred, 1.0);
        bump_clause(ctx.borrow(), tracked, 0.5);

        assert_eq!(ctx.part(ClauseDbP).header(irred).activity, 0.0);
        assert_eq!(ctx.part(ClauseDbP).header(tracked).activity, 1.5);

        ctx.part_mut(ActivityP).set_clause_decay(0.5);
        decay_clause_activities(ctx.borrow());
        assert_eq!(ctx.part(ActivityP).clause_bump(), 2.0);
    }

    #[test]
    fn clause_rescale() {
        let mut ctx = Context::default();
        let mut ctx = ctx.into_partial_ref_mut();

        set_var_count(ctx.borrow(), 3);

        let a = add_clause(
            ctx.borrow(),
            ClauseHeader::learned(3, 1.0, true),
            &lits![1, 2, 3],
        );
        let b = add_clause(
            ctx.borrow(),
            ClauseHeader::learned(3, 2.0, true),
            &lits![-1, 2, 3],
        );

        bump_clause(ctx.borrow(), b, 2e100);

        let db = ctx.part(ClauseDbP);
        assert!(db.header(b).activity <= RESCALE_LIMIT);
        assert!(db.header(b).activity > db.header(a).activity);
        assert!(ctx.part(ActivityP).clause_bump() < 1.0);
    }
}
