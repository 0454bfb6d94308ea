//! Search statistics.

/// Counters collected during a single solve.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct SolverStats {
    /// Branching decisions, including flipped branches.
    pub decisions: u64,
    /// Literals dequeued by unit propagation.
    pub propagations: u64,
    pub conflicts: u64,
    pub learned_clauses: u64,
    pub restarts: u64,
    /// Learned clause database reductions.
    pub reductions: u64,
    /// Learned clauses removed by reductions.
    pub deleted_clauses: u64,
}
