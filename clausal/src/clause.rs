//! Clause storage.
use clausal_formula::{lit::LitIdx, Lit};

pub mod db;
pub mod reduce;

pub use db::ClauseDb;

/// Compact reference to a constraint stored in the [`ClauseDb`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ClauseRef {
    index: LitIdx,
}

impl ClauseRef {
    fn from_index(index: usize) -> ClauseRef {
        ClauseRef {
            index: index as LitIdx,
        }
    }

    fn index(self) -> usize {
        self.index as usize
    }
}

/// Metadata for a constraint.
#[derive(Clone, Default, Debug)]
pub struct ClauseHeader {
    /// Activity used to rank learned clauses for deletion.
    pub activity: f64,
    /// Literal block distance when the clause was learned.
    pub lbd: usize,
    /// Learned during search, as opposed to part of the problem.
    pub learned: bool,
    /// Learned clause that may be deleted by a reduction.
    pub tracked: bool,
    pub deleted: bool,
}

impl ClauseHeader {
    /// Header for a clause of the problem.
    pub fn irred() -> ClauseHeader {
        ClauseHeader::default()
    }

    /// Header for a clause learned during conflict analysis.
    pub fn learned(lbd: usize, activity: f64, tracked: bool) -> ClauseHeader {
        ClauseHeader {
            activity,
            lbd,
            learned: true,
            tracked,
            deleted: false,
        }
    }
}

/// A stored clause.
///
/// Every constraint has at least two literals. The literals in positions 0 and 1 are the watched
/// ones. When the constraint is the reason of a propagation, the propagated literal is kept in
/// position 0.
#[derive(Debug)]
pub struct Constraint {
    header: ClauseHeader,
    lits: Vec<Lit>,
}

impl Constraint {
    pub fn header(&self) -> &ClauseHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut ClauseHeader {
        &mut self.header
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn lits_mut(&mut self) -> &mut [Lit] {
        &mut self.lits
    }
}
