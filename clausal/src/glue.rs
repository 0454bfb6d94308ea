//! Compute glue levels of clauses.
//!
//! The glue level of a clause is the number of distinct decision levels of the clause's variables.
//! This is also called the literal block distance (LBD). Learned clauses with a small glue level
//! connect few decision levels and tend to be useful for a long time.

use partial_ref::{partial, PartialRef};

use clausal_formula::Lit;

use crate::context::{parts::*, Context};

/// Compute the glue level of a clause.
///
/// All literals have to be assigned.
pub fn compute_glue(mut ctx: partial!(Context, mut TmpDataP, ImplGraphP), lits: &[Lit]) -> usize {
    let (tmp_data, ctx) = ctx.split_part_mut(TmpDataP);
    let impl_graph = ctx.part(ImplGraphP);
    let flags = &mut tmp_data.flags;

    let mut glue = 0;

    for &lit in lits {
        let flag = &mut flags[impl_graph.level(lit.var())];
        if !*flag {
            *flag = true;
            glue += 1
        }
    }

    for &lit in lits {
        flags[impl_graph.level(lit.var())] = false;
    }

    glue
}
