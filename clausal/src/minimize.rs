//! Removal of implied literals from learned clauses.
//!
//! A literal of a learned clause is redundant when it was propagated by a clause whose other
//! literals are all false at level 0, contained in the learned clause or themselves redundant.
//! Removing redundant literals keeps the clause implied by the problem.

use clausal_formula::{Lit, Var};

use crate::clause::ClauseDb;
use crate::prop::ImplGraph;

/// Memoized redundancy of a variable.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Redundancy {
    Unknown,
    Redundant,
    Kept,
}

impl Default for Redundancy {
    fn default() -> Redundancy {
        Redundancy::Unknown
    }
}

/// Temporary data for clause minimization.
#[derive(Default)]
pub struct Minimizer {
    redundancy: Vec<Redundancy>,
    /// Entries to clean in `redundancy`.
    to_clean: Vec<Var>,
}

impl Minimizer {
    /// Update structures for a new variable count.
    pub fn set_var_count(&mut self, count: usize) {
        self.redundancy.resize(count, Redundancy::Unknown);
    }

    /// Remove redundant literals from `clause`, leaving the literal in position 0 in place.
    ///
    /// `in_clause` has to be set for the variable of every literal of the clause except position
    /// 0. Recursion stops after `max_depth` levels, keeping the literal where it stopped.
    pub fn minimize(
        &mut self,
        clause: &mut Vec<Lit>,
        in_clause: &[bool],
        impl_graph: &ImplGraph,
        db: &ClauseDb,
        max_depth: usize,
    ) {
        let mut pos = 1;
        while pos < clause.len() {
            if self.is_redundant(clause[pos], in_clause, impl_graph, db, 0, max_depth) {
                clause.swap_remove(pos);
            } else {
                pos += 1;
            }
        }

        for var in self.to_clean.drain(..) {
            self.redundancy[var.index()] = Redundancy::Unknown;
        }
    }

    fn is_redundant(
        &mut self,
        lit: Lit,
        in_clause: &[bool],
        impl_graph: &ImplGraph,
        db: &ClauseDb,
        depth: usize,
        max_depth: usize,
    ) -> bool {
        let reason = impl_graph.reason(lit.var());
        if reason.is_unit() {
            return false;
        }

        for &reason_lit in reason.lits(db) {
            let var = reason_lit.var();
            if impl_graph.level(var) == 0 || in_clause[var.index()] {
                continue;
            }
            let redundant = match self.redundancy[var.index()] {
                Redundancy::Redundant => true,
                Redundancy::Kept => false,
                Redundancy::Unknown if depth >= max_depth => false,
                Redundancy::Unknown => {
                    let redundant = self.is_redundant(
                        reason_lit,
                        in_clause,
                        impl_graph,
                        db,
                        depth + 1,
                        max_depth,
                    );
                    self.redundancy[var.index()] = if redundant {
                        Redundancy::Redundant
                    } else {
                        Redundancy::Kept
                    };
                    self.to_clean.push(var);
                    redundant
                }
            };
            if !redundant {
                return false;
            }
        }

        true
    }
}
