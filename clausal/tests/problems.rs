use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;

use clausal::{solve, Interrupt, Lit, Problem, Solver, SolverConfig, SolverConfigUpdate, SolverError};
use clausal_formula::problem::strategy::problem as random_problem;
use clausal_formula::test::{pigeon_hole_problem, sat_problem, sgen_unsat_problem};
use clausal_formula::{lits, problem};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn solver_with(config: &str) -> Solver {
    let update: SolverConfigUpdate = toml::from_str(config).expect("invalid test config");
    let mut solver = Solver::new();
    solver.config(&update).expect("rejected test config");
    solver
}

fn check_model(problem: &Problem, model: &[Lit]) {
    assert_eq!(model.len(), problem.var_count());
    for (index, lit) in model.iter().enumerate() {
        assert_eq!(lit.index(), index);
    }
    assert!(problem.is_satisfied_by(model));
}

/// A pigeon hole problem with `holes + 1` pigeons, taken from the shared generator.
fn pigeon_hole(holes: usize) -> Problem {
    let mut runner = TestRunner::deterministic();
    pigeon_hole_problem(Just(holes))
        .new_tree(&mut runner)
        .expect("generating pigeon hole problem")
        .current()
}

#[test]
fn empty_clause_is_unsat() {
    init_logging();
    let mut problem = problem![
        1, 2;
        1;
        ;
        2;
    ];
    problem.set_var_count(2);

    let mut solver = Solver::new();
    assert_eq!(solver.solve(&problem), Ok(None));
    assert_eq!(solver.last_stats().decisions, 0);
}

#[test]
fn no_variables() {
    assert_eq!(
        solve(&Problem::new(0), &SolverConfig::default(), &Interrupt::new()),
        Ok(Some(vec![]))
    );
}

#[test]
fn mixed_senses() {
    init_logging();
    let problem = problem![
        1, 2, 3;
        -1, -2, -3;
    ];

    let model = Solver::new().solve(&problem).unwrap().unwrap();
    check_model(&problem, &model);
    assert!(model.iter().any(|lit| lit.is_negative()));
    assert!(model.iter().any(|lit| !lit.is_negative()));
}

#[test]
fn first_var_forced() {
    let problem = problem![
        1, 2;
        1, -2;
    ];

    let model = Solver::new().solve(&problem).unwrap().unwrap();
    check_model(&problem, &model);
    assert_eq!(model[0], clausal_formula::lit!(1));
}

#[test]
fn unsat_without_decisions() {
    let problem = problem![
        1;
        -1;
    ];

    let mut solver = Solver::new();
    assert_eq!(solver.solve(&problem), Ok(None));
    assert_eq!(solver.last_stats().decisions, 0);
    assert_eq!(solver.last_stats().conflicts, 0);
}

#[test]
fn unconstrained_vars_are_true() {
    let problem = Problem::new(4);
    assert_eq!(
        Solver::new().solve(&problem),
        Ok(Some(lits![1, 2, 3, 4].to_vec()))
    );
}

#[test]
fn pigeon_holes_in_all_modes() {
    init_logging();
    for config in &[
        "",
        "only_poor_mans_vsids = true",
        "restart_luby = false\nrestart_interval = 20",
        "restart_lbd_threshold = 1.1\nreduce_lbd_threshold = 1.2\nreduce_min_learned = 10",
        "restart_propagation_rate_threshold = 0.9\nreduce_propagation_rate_threshold = 0.8",
    ] {
        let mut solver = solver_with(config);
        for holes in 1..6 {
            assert_eq!(solver.solve(&pigeon_hole(holes)), Ok(None), "{}", config);
        }
    }
}

#[test]
fn repeated_solves_are_deterministic() {
    let problem = pigeon_hole(5);
    let mut solver = solver_with("reduce_min_learned = 10\nreduce_original_clause_factor = 0.1");

    assert_eq!(solver.solve(&problem), Ok(None));
    let first = solver.last_stats().clone();
    assert!(first.conflicts > 0);

    assert_eq!(solver.solve(&problem), Ok(None));
    assert_eq!(solver.last_stats(), &first);
}

#[test]
fn interrupt_before_search() {
    let interrupt = Interrupt::new();
    interrupt.interrupt();

    assert_eq!(
        solve(&pigeon_hole(3), &SolverConfig::default(), &interrupt),
        Err(SolverError::Interrupted)
    );

    // Trivial problems are answered without searching.
    assert_eq!(
        solve(&Problem::new(2), &SolverConfig::default(), &interrupt),
        Ok(Some(lits![1, 2].to_vec()))
    );
}

#[test]
fn interrupt_from_other_thread() {
    init_logging();
    let mut solver = Solver::new();
    let interrupt = solver.interrupt();

    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        interrupt.interrupt();
    });

    let result = solver.solve(&pigeon_hole(11));
    handle.join().unwrap();

    match result {
        Err(SolverError::Interrupted) => assert!(!solver.interrupt().is_interrupted()),
        result => assert_eq!(result, Ok(None)),
    }
}

#[test]
fn invalid_config_is_rejected() {
    let mut solver = Solver::new();
    let update: SolverConfigUpdate = toml::from_str("reduce_ratio = 2.0").unwrap();

    assert!(solver.config(&update).is_err());
    assert_eq!(solver.solve(&problem![1;]), Ok(Some(lits![1].to_vec())));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn agrees_with_enumeration(problem in random_problem(1..12usize, 0..50, 1..4)) {
        let expected = problem.find_model_exhaustive().is_some();

        for config in &["", "only_poor_mans_vsids = true", "restart_interval = 2\nmax_minimization_depth = 0"] {
            let result = solver_with(config).solve(&problem).unwrap();
            prop_assert_eq!(result.is_some(), expected);
            if let Some(model) = result {
                check_model(&problem, &model);
            }
        }
    }

    #[test]
    fn sgen_unsat_with_reductions(problem in sgen_unsat_problem(1..8usize)) {
        let mut solver = solver_with("reduce_min_learned = 5\nreduce_original_clause_factor = 0.05");
        prop_assert_eq!(solver.solve(&problem), Ok(None));
    }

    #[test]
    fn sat_models_are_valid(problem in sat_problem(10..50usize, 20..150usize, 0.05..0.2, 0.9..1.0)) {
        let model = Solver::new().solve(&problem).unwrap().unwrap();
        check_model(&problem, &model);
    }
}
