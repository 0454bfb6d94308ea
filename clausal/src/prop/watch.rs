//! Watchlists to detect clauses that became unit.
//!
//! Each constraint has always two watches pointing to it. The watches are kept in the watchlists
//! of two different literals of the clause. Whenever the watches are moved to different literals
//! the literals of the clause are permuted so the watched literals are in position 0 and 1.
//!
//! When a clause is not unit under the current assignment, the watched literals point at two
//! non-false literals. When a clause is unit and thus propagating, the true literal is watched and
//! in position 0, the other watched literal is the one with the largest decision level and kept in
//! position 1. When a clause becomes satisfied before becoming unit the watches can be kept as they
//! were.
//!
//! There is no need to update watchlists on backtracking, as unassigning variables cannot
//! invalidate this invariant.
//!
//! Watchlists are indexed by the negation of the watched literal, i.e. by the literal whose
//! assignment falsifies the watched literal.

use crate::clause::ClauseRef;
use clausal_formula::Lit;

/// Watchlists to detect clauses that became unit.
#[derive(Default)]
pub struct Watchlists {
    watches: Vec<Vec<ClauseRef>>,
}

impl Watchlists {
    /// Update structures for a new variable count.
    pub fn set_var_count(&mut self, count: usize) {
        self.watches.resize(count * 2, vec![]);
    }

    /// Start watching a clause.
    ///
    /// `lits` have to be the first two literals of the given clause.
    pub fn watch_clause(&mut self, cref: ClauseRef, lits: [Lit; 2]) {
        for &lit in lits.iter() {
            self.add_watch(!lit, cref);
        }
    }

    /// Clauses watching the negation of `lit`.
    pub fn watched_by_mut(&mut self, lit: Lit) -> &mut Vec<ClauseRef> {
        &mut self.watches[lit.code()]
    }

    /// Make a literal watch a clause.
    pub fn add_watch(&mut self, lit: Lit, cref: ClauseRef) {
        self.watches[lit.code()].push(cref)
    }

    /// Keep only the watches for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(ClauseRef) -> bool) {
        for watchlist in self.watches.iter_mut() {
            watchlist.retain(|&cref| keep(cref));
        }
    }
}
