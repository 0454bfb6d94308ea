//! Boolean satisfiability solver.
use partial_ref::{IntoPartialRefMut, PartialRef};

use log::info;
use thiserror::Error;

use clausal_formula::{Lit, Problem, Var};

use crate::config::{ConfigError, SolverConfig, SolverConfigUpdate};
use crate::context::{apply_config, parts::*, set_var_count, Context};
use crate::interrupt::Interrupt;
use crate::load::load_problem;
use crate::schedule::schedule_step;
use crate::state::SatState;
use crate::stats::SolverStats;

/// Reasons for a solve to end without a verdict.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("the search was interrupted")]
    Interrupted,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Decide the satisfiability of a problem.
///
/// Returns a model, with one literal per variable in variable order, if the problem is
/// satisfiable and `None` if it isn't.
pub fn solve(
    problem: &Problem,
    config: &SolverConfig,
    interrupt: &Interrupt,
) -> Result<Option<Vec<Lit>>, SolverError> {
    search(problem, config, interrupt, &mut SolverStats::default())
}

fn search(
    problem: &Problem,
    config: &SolverConfig,
    interrupt: &Interrupt,
    stats: &mut SolverStats,
) -> Result<Option<Vec<Lit>>, SolverError> {
    config.validate()?;

    *stats = SolverStats::default();

    if problem.iter().any(|clause| clause.is_empty()) {
        return Ok(None);
    }

    let var_count = problem.var_count();

    if var_count == 0 {
        return Ok(Some(vec![]));
    }

    if problem.is_empty() {
        return Ok(Some(
            (0..var_count)
                .map(|index| Var::from_index(index).positive())
                .collect(),
        ));
    }

    info!(
        "Solving problem with {} variables and {} clauses",
        var_count,
        problem.len()
    );

    let mut ctx = Box::new(Context::default());
    ctx.solver_config = config.clone();
    ctx.interrupt = interrupt.clone();

    let mut ctx = ctx.into_partial_ref_mut();

    set_var_count(ctx.borrow(), var_count);
    load_problem(ctx.borrow(), problem);
    apply_config(ctx.borrow());

    while schedule_step(ctx.borrow()) {}

    *stats = ctx.part(StatsP).clone();

    info!(
        "{:?} after {} conflicts, {} decisions, {} propagations, {} restarts, {} reductions",
        ctx.part(SolverStateP).sat_state,
        stats.conflicts,
        stats.decisions,
        stats.propagations,
        stats.restarts,
        stats.reductions,
    );

    match ctx.part(SolverStateP).sat_state {
        SatState::Sat => Ok(Some(
            ctx.part(AssignmentP)
                .assignment()
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    debug_assert!(value.is_some());
                    Var::from_index(index).lit(value.unwrap_or(false))
                })
                .collect(),
        )),
        SatState::Unsat => Ok(None),
        SatState::Interrupted | SatState::Unknown => Err(SolverError::Interrupted),
    }
}

/// A boolean satisfiability solver.
///
/// Holds the configuration, an interrupt handle and the statistics of the last solve. No search
/// state is kept between calls to [`solve`](Solver::solve).
#[derive(Default)]
pub struct Solver {
    config: SolverConfig,
    interrupt: Interrupt,
    last_stats: SolverStats,
}

impl Solver {
    /// Create a new solver with the default configuration.
    pub fn new() -> Solver {
        Solver::default()
    }

    /// Change the solver configuration.
    ///
    /// The update is validated as a whole, when it is rejected the previous configuration is kept.
    pub fn config(&mut self, update: &SolverConfigUpdate) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        update.apply(&mut config);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Handle to stop a running solve from another thread.
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Decide the satisfiability of a problem.
    ///
    /// See [`solve`](crate::solver::solve). After an interrupted solve the interrupt flag is
    /// cleared again.
    pub fn solve(&mut self, problem: &Problem) -> Result<Option<Vec<Lit>>, SolverError> {
        let result = search(problem, &self.config, &self.interrupt, &mut self.last_stats);
        if result == Err(SolverError::Interrupted) {
            self.interrupt.reset();
        }
        result
    }

    /// Statistics of the last solve.
    pub fn last_stats(&self) -> &SolverStats {
        &self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use clausal_formula::test::{pigeon_hole_problem, sat_problem, sgen_unsat_problem};

    #[test]
    fn trivial_problems() {
        let mut solver = Solver::new();

        assert_eq!(solver.solve(&Problem::new(0)), Ok(Some(vec![])));
        assert_eq!(
            solver.solve(&Problem::new(3)),
            Ok(Some(lits![1, 2, 3].to_vec()))
        );
        assert_eq!(solver.solve(&problem![1, 2; ; 3;]), Ok(None));
        assert_eq!(solver.last_stats(), &SolverStats::default());
    }

    #[test]
    fn rejected_config_is_not_applied() {
        let mut solver = Solver::new();

        let mut update = SolverConfigUpdate::new();
        update.vsids_decay = Some(2.0);
        update.restart_luby = Some(false);

        assert!(solver.config(&update).is_err());
        assert!(solver.config.restart_luby);

        update.vsids_decay = Some(0.9);
        assert_eq!(solver.config(&update), Ok(()));
        assert!(!solver.config.restart_luby);
        assert_eq!(solver.config.vsids_decay, 0.9);
    }

    #[test]
    fn invalid_config_for_free_solve() {
        let config = SolverConfig {
            reduce_ratio: 1.5,
            ..SolverConfig::default()
        };
        assert!(matches!(
            solve(&problem![1;], &config, &Interrupt::new()),
            Err(SolverError::Config(_))
        ));
    }

    #[test]
    fn interrupt_before_solve() {
        let mut solver = Solver::new();
        solver.interrupt().interrupt();

        let problem = problem![
            1, 2;
            -1, 2;
        ];

        assert_eq!(solver.solve(&problem), Err(SolverError::Interrupted));
        // The flag is cleared after reporting the interruption.
        assert_eq!(solver.solve(&problem).map(|m| m.is_some()), Ok(true));
    }

    #[test]
    fn collects_stats() {
        let mut solver = Solver::new();
        let problem = problem![
            1, 2;
            1, -2;
            -1, 3, 4;
            -1, -3, 4;
            -1, 3, -4;
            -1, -3, -4;
        ];

        assert_eq!(solver.solve(&problem), Ok(None));
        let stats = solver.last_stats();
        assert!(stats.conflicts >= 1);
        assert!(stats.decisions >= 1);
        assert!(stats.propagations >= 1);
    }

    proptest! {
        #[test]
        fn sgen_unsat(problem in sgen_unsat_problem(1..7usize)) {
            let mut solver = Solver::new();
            prop_assert_eq!(solver.solve(&problem), Ok(None));
        }

        #[test]
        fn pigeon_hole_unsat(problem in pigeon_hole_problem(1..5usize)) {
            let mut solver = Solver::new();
            prop_assert_eq!(solver.solve(&problem), Ok(None));
        }

        #[test]
        fn sat(problem in sat_problem(4..20usize, 10..100usize, 0.05..0.2, 0.9..1.0)) {
            let mut solver = Solver::new();

            let model = solver.solve(&problem).unwrap().unwrap();

            prop_assert_eq!(model.len(), problem.var_count());
            for (index, lit) in model.iter().enumerate() {
                prop_assert_eq!(lit.index(), index);
            }
            prop_assert!(problem.is_satisfied_by(&model));
        }
    }
}
