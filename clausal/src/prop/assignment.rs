//! Partial assignment and backtracking.
use partial_ref::{partial, PartialRef};

use clausal_formula::{lit::LitIdx, Lit, Var};

use crate::context::{parts::*, Context};

use super::Reason;

/// Current partial assignment.
#[derive(Default)]
pub struct Assignment {
    assignment: Vec<Option<bool>>,
    /// Value each variable had when it was last assigned, used as decision phase.
    last_value: Vec<bool>,
}

impl Assignment {
    /// Update structures for a new variable count.
    pub fn set_var_count(&mut self, count: usize) {
        self.assignment.resize(count, None);
        self.last_value.resize(count, false);
    }

    /// Current partial assignment as slice.
    pub fn assignment(&self) -> &[Option<bool>] {
        &self.assignment
    }

    pub fn var_value(&self, var: Var) -> Option<bool> {
        self.assignment[var.index()]
    }

    /// Value the variable had when it was last assigned, `false` if it never was.
    pub fn last_var_value(&self, var: Var) -> bool {
        self.last_value[var.index()]
    }

    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.assignment[lit.index()].map(|b| b == lit.sense())
    }

    pub fn lit_is_true(&self, lit: Lit) -> bool {
        self.assignment[lit.index()] == Some(lit.sense())
    }

    pub fn lit_is_false(&self, lit: Lit) -> bool {
        self.assignment[lit.index()] == Some(!lit.sense())
    }

    pub fn lit_is_unassigned(&self, lit: Lit) -> bool {
        self.assignment[lit.index()].is_none()
    }

    /// Make a literal true, remembering the phase.
    pub fn assign_lit(&mut self, lit: Lit) {
        self.assignment[lit.index()] = Some(lit.sense());
        self.last_value[lit.index()] = lit.sense();
    }

    pub fn unassign_var(&mut self, var: Var) {
        self.assignment[var.index()] = None;
    }
}

/// Start of a decision level on the trail.
#[derive(Copy, Clone, Debug)]
pub struct DecisionBoundary {
    /// Trail length when the level was started.
    pub trail_len: LitIdx,
    /// Whether the decision of this level is tried for the first time.
    ///
    /// Only used when backtracking chronologically, where a level whose decision was flipped
    /// already has no alternative left.
    pub first_branch: bool,
}

/// Decision and propagation history.
#[derive(Default)]
pub struct Trail {
    /// Stack of all propagated and all enqueued assignments
    trail: Vec<Lit>,
    /// Next assignment in trail to propagate
    queue_head_pos: usize,
    /// Decision levels as trail indices.
    decisions: Vec<DecisionBoundary>,
}

impl Trail {
    /// Return the next assigned literal to propagate.
    pub fn queue_head(&self) -> Option<Lit> {
        self.trail.get(self.queue_head_pos).cloned()
    }

    pub fn pop_queue(&mut self) {
        self.queue_head_pos += 1;
        debug_assert!(self.queue_head_pos <= self.trail.len());
    }

    /// Assigned literals in assignment order.
    pub fn trail(&self) -> &[Lit] {
        &self.trail
    }

    /// Start a new decision level.
    ///
    /// Does not enqueue the decision itself.
    pub fn new_decision_level(&mut self, first_branch: bool) {
        self.decisions.push(DecisionBoundary {
            trail_len: self.trail.len() as LitIdx,
            first_branch,
        })
    }

    /// Current decision level.
    pub fn current_level(&self) -> usize {
        self.decisions.len()
    }

    /// Boundaries of all decision levels, starting with level 1.
    pub fn boundaries(&self) -> &[DecisionBoundary] {
        &self.decisions
    }

    /// The decision made at the given level (1-based).
    pub fn decision(&self, level: usize) -> Lit {
        self.trail[self.decisions[level - 1].trail_len as usize]
    }
}

/// Enqueues the assignment of true to a literal.
///
/// This updates the assignment and trail, but does not perform any propagation. The literal has to
/// be unassigned when calling this.
pub fn enqueue_assignment(
    mut ctx: partial!(Context, mut AssignmentP, mut ImplGraphP, mut TrailP),
    lit: Lit,
    reason: Reason,
) {
    let assignment = ctx.part_mut(AssignmentP);
    debug_assert!(assignment.lit_value(lit) == None);

    assignment.assign_lit(lit);

    let (trail, mut ctx) = ctx.split_part_mut(TrailP);

    trail.trail.push(lit);

    let node = &mut ctx.part_mut(ImplGraphP).nodes[lit.index()];
    node.reason = reason;
    node.level = trail.decisions.len() as LitIdx;
}

/// Undo all assignments in decision levels deeper than the given level.
///
/// Unassigned variables become available for decisions again.
pub fn backtrack(
    mut ctx: partial!(Context, mut AssignmentP, mut CandidateHeapP, mut TrailP),
    level: usize,
) {
    let (assignment, mut ctx) = ctx.split_part_mut(AssignmentP);
    let (trail, mut ctx) = ctx.split_part_mut(TrailP);
    let heap = ctx.part_mut(CandidateHeapP);

    if level >= trail.decisions.len() {
        return;
    }

    let new_trail_len = trail.decisions[level].trail_len as usize;

    trail.queue_head_pos = new_trail_len;
    trail.decisions.truncate(level);

    for &lit in trail.trail[new_trail_len..].iter() {
        assignment.unassign_var(lit.var());
        heap.make_available(lit.var());
    }
    trail.trail.truncate(new_trail_len);
}

/// Undo all decisions, keeping only assignments implied by unit clauses.
pub fn restart(ctx: partial!(Context, mut AssignmentP, mut CandidateHeapP, mut TrailP)) {
    backtrack(ctx, 0);
}
