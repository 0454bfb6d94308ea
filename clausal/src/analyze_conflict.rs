//! Learns a new clause by analyzing a conflict.
use std::mem::swap;

use partial_ref::{partial, PartialRef};

use clausal_formula::{Lit, Var};

use crate::clause::ClauseRef;
use crate::context::{parts::*, Context};
use crate::glue::compute_glue;
use crate::minimize::Minimizer;
use crate::prop::{Conflict, Reason};

/// Temporaries for conflict analysis
#[derive(Default)]
pub struct AnalyzeConflict {
    /// This is the learned clause after analysis finishes.
    clause: Vec<Lit>,
    /// Glue level of the learned clause.
    lbd: usize,
    /// Number of literals in the current clause at the current level.
    current_level_count: usize,
    /// Variables in the current clause.
    var_flags: Vec<bool>,
    /// Entries to clean in `var_flags`.
    to_clean: Vec<Var>,
    /// All variables encountered during analysis.
    seen_vars: Vec<Var>,
    /// Clauses that contributed literals to the learned clause.
    involved: Vec<ClauseRef>,
    minimizer: Minimizer,
}

impl AnalyzeConflict {
    /// Update structures for a new variable count.
    pub fn set_var_count(&mut self, count: usize) {
        self.var_flags.resize(count, false);
        self.minimizer.set_var_count(count);
    }

    /// The learned clause.
    ///
    /// The asserting literal is in position 0, a literal of the backtracking level in position 1.
    pub fn clause(&self) -> &[Lit] {
        &self.clause
    }

    /// Glue level of the learned clause.
    pub fn lbd(&self) -> usize {
        self.lbd
    }

    /// Variables whose activity should be bumped.
    pub fn seen_vars(&self) -> &[Var] {
        &self.seen_vars
    }

    /// Clauses whose activity should be bumped.
    pub fn involved(&self) -> &[ClauseRef] {
        &self.involved
    }
}

/// Learns a new clause by analyzing a conflict.
///
/// Returns the lowest decision level that makes the learned clause asserting.
pub fn analyze_conflict(
    mut ctx: partial!(
        Context,
        mut AnalyzeConflictP,
        mut TmpDataP,
        ClauseDbP,
        ImplGraphP,
        SolverConfigP,
        TrailP,
    ),
    conflict: Conflict,
) -> usize {
    {
        let analyze = ctx.part_mut(AnalyzeConflictP);

        analyze.clause.clear();
        analyze.lbd = 0;
        analyze.current_level_count = 0;
        analyze.seen_vars.clear();
        analyze.involved.clear();
    }

    // Reasons and the trail are only read, so they can be held while the analysis state changes.
    let (db, mut ctx) = ctx.split_part(ClauseDbP);
    let (trail, mut ctx) = ctx.split_part(TrailP);

    if trail.current_level() == 0 {
        // Conflict with no decisions, generate empty clause
        return 0;
    }

    // We start with all the literals of the conflicted clause
    ctx.part_mut(AnalyzeConflictP).involved.push(conflict.0);
    for &lit in conflict.lits(db) {
        add_literal(ctx.borrow(), lit);
    }

    // To get rid of all but one literal of the current level, we resolve the clause with the reason
    // for those literals. The correct order for this is reverse chronological.

    for &lit in trail.trail().iter().rev() {
        let analyze = ctx.part_mut(AnalyzeConflictP);
        let lit_present = &mut analyze.var_flags[lit.index()];
        // Is the lit present in the current clause?
        if *lit_present {
            *lit_present = false;
            analyze.current_level_count -= 1;
            if analyze.current_level_count == 0 {
                // lit is the last literal of the current level present in the current clause,
                // therefore the resulting clause will assert !lit so we put in position 0
                analyze.clause.push(!lit);
                let end = analyze.clause.len() - 1;
                analyze.clause.swap(0, end);

                break;
            } else {
                // We removed the literal and now add its reason.
                let reason = *ctx.part(ImplGraphP).reason(lit.var());

                let mut contributed = false;
                for &lit in reason.lits(db) {
                    contributed |= add_literal(ctx.borrow(), lit);
                }

                if let (true, Reason::Long(cref)) = (contributed, reason) {
                    ctx.part_mut(AnalyzeConflictP).involved.push(cref);
                }
            }
        }
    }

    let (analyze, mut ctx) = ctx.split_part_mut(AnalyzeConflictP);

    analyze.minimizer.minimize(
        &mut analyze.clause,
        &analyze.var_flags,
        ctx.part(ImplGraphP),
        db,
        ctx.part(SolverConfigP).max_minimization_depth,
    );

    for var in analyze.to_clean.drain(..) {
        analyze.var_flags[var.index()] = false;
    }

    // We find the highest level literal besides the asserted literal and move it into position 1.
    // This is important to ensure the watchlist constraints are not violated on backtracking.
    let mut backtrack_to = 0;

    if analyze.clause.len() > 1 {
        let (prefix, rest) = analyze.clause.split_at_mut(2);
        let lit_1 = &mut prefix[1];
        backtrack_to = ctx.part(ImplGraphP).level(lit_1.var());
        for lit in rest.iter_mut() {
            let lit_level = ctx.part(ImplGraphP).level(lit.var());
            if lit_level > backtrack_to {
                backtrack_to = lit_level;
                swap(lit_1, lit);
            }
        }
    }

    analyze.lbd = compute_glue(ctx.borrow(), &analyze.clause);

    backtrack_to
}

/// Add a literal to the current clause.
///
/// Returns whether the literal was new.
fn add_literal(
    mut ctx: partial!(Context, mut AnalyzeConflictP, ImplGraphP, TrailP),
    lit: Lit,
) -> bool {
    let (analyze, ctx) = ctx.split_part_mut(AnalyzeConflictP);
    let lit_level = ctx.part(ImplGraphP).level(lit.var());
    // No need to add literals that are set by unit clauses or already present
    if lit_level > 0 && !analyze.var_flags[lit.index()] {
        analyze.var_flags[lit.index()] = true;
        analyze.seen_vars.push(lit.var());
        if lit_level == ctx.part(TrailP).current_level() {
            analyze.current_level_count += 1;
        } else {
            analyze.clause.push(lit);
            analyze.to_clean.push(lit.var());
        }
        true
    } else {
        false
    }
}
