//! Problems in conjunctive normal form.
use std::cmp::max;
use std::fmt;
use std::iter::Extend;
use std::ops::Range;

use crate::lit::{Lit, Var};

/// A boolean formula in conjunctive normal form together with its variable count.
///
/// Behaves like a `Vec<Vec<Lit>>` but keeps all literals in a single buffer.
#[derive(Default, Clone, Eq)]
pub struct Problem {
    var_count: usize,
    literals: Vec<Lit>,
    clause_ranges: Vec<Range<usize>>,
}

impl Problem {
    /// A problem without clauses over `var_count` variables.
    pub fn new(var_count: usize) -> Problem {
        Problem {
            var_count,
            ..Problem::default()
        }
    }

    /// Number of variables.
    ///
    /// Variables that appear in no clause are still counted, so any variable index present is
    /// below this.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Increase the variable count. Smaller values are ignored.
    pub fn set_var_count(&mut self, count: usize) {
        self.var_count = max(self.var_count, count)
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clause_ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clause_ranges.is_empty()
    }

    /// Appends a clause, growing the variable count as needed.
    ///
    /// `literals` can be an `IntoIterator<Item = Lit>` or `IntoIterator<Item = &Lit>`.
    pub fn add_clause<L>(&mut self, literals: impl IntoIterator<Item = L>)
    where
        Vec<Lit>: Extend<L>,
    {
        let begin = self.literals.len();
        self.literals.extend(literals);
        let end = self.literals.len();

        for &lit in self.literals[begin..end].iter() {
            self.var_count = max(lit.index() + 1, self.var_count);
        }

        self.clause_ranges.push(begin..end);
    }

    /// Iterator over all clauses.
    pub fn iter(&self) -> impl Iterator<Item = &[Lit]> {
        let literals = &self.literals;
        self.clause_ranges
            .iter()
            .map(move |range| &literals[range.clone()])
    }

    /// Whether the given literals make every clause true.
    ///
    /// This only looks at the problem itself, so it can be used to check a model independently
    /// from the solver that produced it. A variable with both literals in `model` counts as
    /// either value.
    pub fn is_satisfied_by(&self, model: &[Lit]) -> bool {
        let mut is_true = vec![false; self.var_count * 2];
        for &lit in model {
            if lit.code() < is_true.len() {
                is_true[lit.code()] = true;
            }
        }
        self.iter()
            .all(|clause| clause.iter().any(|&lit| is_true[lit.code()]))
    }

    /// Finds a model by enumerating all assignments.
    ///
    /// This takes time exponential in the number of variables and is only meant as a reference
    /// for very small problems.
    pub fn find_model_exhaustive(&self) -> Option<Vec<Lit>> {
        assert!(self.var_count < 32, "too many variables for enumeration");
        let mut model = Vec::with_capacity(self.var_count);
        for bits in 0..(1u64 << self.var_count) {
            model.clear();
            model.extend(
                (0..self.var_count).map(|index| Var::from_index(index).lit(bits & (1 << index) != 0)),
            );
            if self.is_satisfied_by(&model) {
                return Some(model);
            }
        }
        None
    }
}

/// Convert any iterable of [`Lit`] iterables into a problem.
impl<F, I, L> From<F> for Problem
where
    F: IntoIterator<Item = I>,
    I: IntoIterator<Item = L>,
    Vec<Lit>: Extend<L>,
{
    fn from(clauses: F) -> Problem {
        let mut problem = Problem::new(0);
        for clause in clauses {
            problem.add_clause(clause);
        }
        problem
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.var_count(), f)?;
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for Problem {
    fn eq(&self, other: &Problem) -> bool {
        self.var_count() == other.var_count()
            && self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

#[cfg(any(test, feature = "proptest-strategies"))]
#[doc(hidden)]
pub mod strategy {
    use super::*;

    use proptest::{collection::SizeRange, prelude::*, *};

    use crate::lit::strategy::lit;

    /// Random problems without any structure.
    ///
    /// With few variables and short clauses this produces a good mix of satisfiable and
    /// unsatisfiable instances.
    pub fn problem(
        vars: impl Strategy<Value = usize>,
        clauses: impl Into<SizeRange>,
        clause_len: impl Into<SizeRange>,
    ) -> impl Strategy<Value = Problem> {
        let clauses = clauses.into();
        let clause_len = clause_len.into();

        vars.prop_flat_map(move |vars| {
            collection::vec(
                collection::vec(lit(0..vars), clause_len.clone()),
                clauses.clone(),
            )
            .prop_map(move |clauses| {
                let mut problem = Problem::from(clauses);
                problem.set_var_count(vars);
                problem
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{strategy::*, *};

    use proptest::*;

    #[test]
    fn clauses_and_var_count() {
        let input = clauses![
            1, 2, 3;
            -1, -2;
            7, 2;
            ;
            4, 5;
        ];

        let problem = Problem::from(input.iter().cloned());

        for (clause, &ref_clause) in problem.iter().zip(input.iter()) {
            assert_eq!(clause, ref_clause);
        }

        assert_eq!(problem.len(), 5);
        assert_eq!(problem.var_count(), 7);
    }

    #[test]
    fn explicit_var_count_is_kept() {
        let mut problem = Problem::new(10);
        problem.add_clause(&lits![1, -2]);
        assert_eq!(problem.var_count(), 10);
        problem.set_var_count(3);
        assert_eq!(problem.var_count(), 10);
    }

    #[test]
    fn model_checking() {
        let problem = problem![
            1, 2;
            -1, 3;
        ];

        assert!(problem.is_satisfied_by(&lits![1, -2, 3]));
        assert!(problem.is_satisfied_by(&lits![-1, 2, -3]));
        assert!(!problem.is_satisfied_by(&lits![1, 2, -3]));
        assert!(!problem.is_satisfied_by(&[]));
    }

    #[test]
    fn exhaustive_search() {
        let sat = problem![
            1, 2;
            -1, 2;
            1, -2;
        ];
        assert_eq!(sat.find_model_exhaustive(), Some(lits![1, 2].to_vec()));

        let unsat = problem![
            1, 2;
            -1, 2;
            1, -2;
            -1, -2;
        ];
        assert_eq!(unsat.find_model_exhaustive(), None);

        assert_eq!(problem![1; ;].find_model_exhaustive(), None);
        assert_eq!(Problem::new(0).find_model_exhaustive(), Some(vec![]));
    }

    proptest! {
        #[test]
        fn exhaustive_models_are_models(input in problem(1..8usize, 0..20, 1..4)) {
            if let Some(model) = input.find_model_exhaustive() {
                prop_assert_eq!(model.len(), input.var_count());
                prop_assert!(input.is_satisfied_by(&model));
            }
        }
    }
}
