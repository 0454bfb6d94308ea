//! Clausal is a [CDCL][cdcl] based SAT solver. Given a [`Problem`] in [conjunctive normal
//! form][cnf], it either finds a variable assignment that makes every clause true or proves that no
//! such assignment exists.
//!
//! Each call to [`Solver::solve`](solver::Solver::solve) is a self-contained computation: all
//! search state is built from the problem, used and dropped again.
//!
//! [cdcl]: https://en.wikipedia.org/wiki/Conflict-Driven_Clause_Learning
//! [cnf]: https://en.wikipedia.org/wiki/Conjunctive_normal_form

#[cfg(test)]
#[macro_use]
extern crate clausal_formula;

pub mod config;
pub mod interrupt;
pub mod solver;
pub mod stats;

mod activity;
mod analyze_conflict;
mod cdcl;
mod clause;
mod context;
mod decision;
mod glue;
mod load;
mod minimize;
mod prop;
mod schedule;
mod state;
mod tmp;

pub use clausal_formula::{Lit, Problem, Var};

pub use config::{ConfigError, SolverConfig, SolverConfigUpdate};
pub use interrupt::Interrupt;
pub use solver::{solve, Solver, SolverError};
pub use stats::SolverStats;
