//! Database for constraints.
use partial_ref::{partial, PartialRef};

use clausal_formula::Lit;

use crate::context::{parts::*, Context};

use super::{ClauseHeader, ClauseRef, Constraint};

/// Arena of all constraints, addressed by [`ClauseRef`].
///
/// Deleted constraints keep their slot until the watchlists are swept, after which the slot is
/// recycled for new constraints.
#[derive(Default)]
pub struct ClauseDb {
    clauses: Vec<Constraint>,
    /// Slots that can be reused.
    free: Vec<ClauseRef>,
    /// Deleted clauses that may still be referenced by watchlists.
    garbage: Vec<ClauseRef>,
    /// Learned clauses eligible for deletion, may contain deleted clauses.
    tracked: Vec<ClauseRef>,
    irred_count: usize,
    learned_count: usize,
}

impl ClauseDb {
    pub fn clause(&self, cref: ClauseRef) -> &Constraint {
        &self.clauses[cref.index()]
    }

    pub fn clause_mut(&mut self, cref: ClauseRef) -> &mut Constraint {
        &mut self.clauses[cref.index()]
    }

    pub fn lits(&self, cref: ClauseRef) -> &[Lit] {
        &self.clauses[cref.index()].lits
    }

    pub fn header(&self, cref: ClauseRef) -> &ClauseHeader {
        &self.clauses[cref.index()].header
    }

    pub fn header_mut(&mut self, cref: ClauseRef) -> &mut ClauseHeader {
        &mut self.clauses[cref.index()].header
    }

    /// Number of stored clauses of the problem.
    pub fn irred_count(&self) -> usize {
        self.irred_count
    }

    /// Number of stored learned clauses.
    pub fn learned_count(&self) -> usize {
        self.learned_count
    }

    /// Learned clauses that are candidates for deletion.
    ///
    /// May contain deleted clauses.
    pub fn tracked(&self) -> &[ClauseRef] {
        &self.tracked
    }

    /// Mutable access to the tracked clause list, used for reordering and pruning.
    pub fn tracked_mut(&mut self) -> &mut Vec<ClauseRef> {
        &mut self.tracked
    }

    /// Iterate over all non-deleted clauses.
    pub fn iter(&self) -> impl Iterator<Item = ClauseRef> + '_ {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| !clause.header.deleted)
            .map(|(index, _)| ClauseRef::from_index(index))
    }

    /// Mark a clause as deleted.
    ///
    /// The clause stays in the watchlists until [`collect_garbage`] is called.
    pub fn delete_clause(&mut self, cref: ClauseRef) {
        let clause = &mut self.clauses[cref.index()];
        debug_assert!(
            !clause.header.deleted,
            "delete_clause for already deleted clause"
        );
        clause.header.deleted = true;
        clause.lits.clear();
        if clause.header.learned {
            self.learned_count -= 1;
        } else {
            self.irred_count -= 1;
        }
        self.garbage.push(cref);
    }
}

/// Store a new clause and watch its first two literals.
///
/// The clause must have at least two distinct literals.
pub fn add_clause(
    mut ctx: partial!(Context, mut ClauseDbP, mut WatchlistsP),
    header: ClauseHeader,
    lits: &[Lit],
) -> ClauseRef {
    debug_assert!(lits.len() >= 2);

    let db = ctx.part_mut(ClauseDbP);

    if header.learned {
        db.learned_count += 1;
    } else {
        db.irred_count += 1;
    }

    let tracked = header.tracked;

    let constraint = Constraint {
        header,
        lits: lits.to_vec(),
    };

    let cref = match db.free.pop() {
        Some(cref) => {
            db.clauses[cref.index()] = constraint;
            cref
        }
        None => {
            let cref = ClauseRef::from_index(db.clauses.len());
            db.clauses.push(constraint);
            cref
        }
    };

    if tracked {
        db.tracked.push(cref);
    }

    ctx.part_mut(WatchlistsP)
        .watch_clause(cref, [lits[0], lits[1]]);

    cref
}

/// Remove deleted clauses from the watchlists and make their slots reusable.
pub fn collect_garbage(mut ctx: partial!(Context, mut ClauseDbP, mut WatchlistsP)) {
    let (db, mut ctx) = ctx.split_part_mut(ClauseDbP);

    if db.garbage.is_empty() {
        return;
    }

    let clauses = &db.clauses;
    ctx.part_mut(WatchlistsP)
        .retain(|cref| !clauses[cref.index()].header.deleted);

    db.tracked
        .retain(|cref| !clauses[cref.index()].header.deleted);

    db.free.append(&mut db.garbage);
}

#[cfg(test)]
mod tests {
    use super::*;

    use partial_ref::IntoPartialRefMut;

    use crate::context::set_var_count;

    #[test]
    fn slots_are_recycled_after_collection() {
        let mut ctx = Context::default();
        let mut ctx = ctx.into_partial_ref_mut();

        set_var_count(ctx.borrow(), 4);

        let a = add_clause(ctx.borrow(), ClauseHeader::irred(), &lits![1, 2, 3]);
        let b = add_clause(
            ctx.borrow(),
            ClauseHeader::learned(3, 1.0, true),
            &lits![-1, 2, -4],
        );

        assert_eq!(ctx.part(ClauseDbP).irred_count(), 1);
        assert_eq!(ctx.part(ClauseDbP).learned_count(), 1);
        assert_eq!(ctx.part(ClauseDbP).tracked(), &[b]);

        ctx.part_mut(ClauseDbP).delete_clause(b);
        assert_eq!(ctx.part(ClauseDbP).learned_count(), 0);
        assert_eq!(ctx.part(ClauseDbP).iter().collect::<Vec<_>>(), vec![a]);

        // Not reusable before the watchlists are swept.
        let c = add_clause(ctx.borrow(), ClauseHeader::irred(), &lits![3, 4]);
        assert_ne!(c, b);

        collect_garbage(ctx.borrow());

        assert!(ctx.part(ClauseDbP).tracked().is_empty());
        assert!(!ctx
            .part_mut(WatchlistsP)
            .watched_by_mut(lit!(1))
            .contains(&b));

        let d = add_clause(ctx.borrow(), ClauseHeader::irred(), &lits![1, 4]);
        assert_eq!(d, b);
        assert_eq!(ctx.part(ClauseDbP).lits(d), &lits![1, 4]);
        assert_eq!(ctx.part(ClauseDbP).irred_count(), 3);
    }
}
