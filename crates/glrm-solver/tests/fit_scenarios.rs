//! End-to-end scenarios for the alternating proximal-gradient driver.

use approx::assert_relative_eq;
use glrm_core::prelude::*;
use glrm_solver::{fit, ProxGradParams, TerminationReason};
use pretty_assertions::assert_eq;

fn quadratic_model(a: DMatrix<f64>, k: usize) -> Glrm<f64> {
    let (m, n) = (a.nrows(), a.ncols());
    Glrm::new(
        a,
        vec![Loss::Quadratic; n],
        vec![Regularizer::Zero; m],
        vec![Regularizer::Zero; n],
        k,
    )
    .unwrap()
}

#[test]
fn rank_one_least_squares_recovers_the_data() {
    // Single quadratic column, full observation, rank 1: the optimum
    // reproduces the data vector exactly. Fixed initialization keeps the
    // sign/scale degeneracy out of the way.
    let a = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
    let mut model = quadratic_model(a.clone(), 1);
    model.x = DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]);
    model.y = DMatrix::from_element(1, 1, 1.0);

    let params = ProxGradParams::new()
        .with_max_iter(1000)
        .with_abs_tol(1e-12)
        .with_rel_tol(1e-14);
    let result = fit(&mut model, &params).unwrap();

    let product = model.y.transpose() * &model.x; // 1 x 3
    for i in 0..3 {
        assert_relative_eq!(product[(0, i)], a[(i, 0)], epsilon = 1e-2);
    }
    assert!(result.objective < 1e-3);
}

#[test]
fn objective_is_non_increasing() {
    let a = DMatrix::from_row_slice(
        4,
        3,
        &[
            1.0, -2.0, 0.5, //
            3.0, 0.0, -1.0, //
            -0.5, 2.5, 2.0, //
            1.5, 1.0, -3.0,
        ],
    );
    let mut model = Glrm::new(
        a,
        vec![Loss::Quadratic; 3],
        vec![Regularizer::Zero; 4],
        vec![Regularizer::Quadratic { scale: 0.1 }; 3],
        2,
    )
    .unwrap();
    model.x = DMatrix::from_row_slice(2, 4, &[0.5, -0.5, 1.0, 0.2, 0.3, 0.8, -0.2, 0.6]);
    model.y = DMatrix::from_row_slice(2, 3, &[1.0, 0.1, -0.4, -0.3, 0.7, 0.9]);

    let params = ProxGradParams::new().with_max_iter(30);
    let result = fit(&mut model, &params).unwrap();

    let objectives = result.history.objectives();
    assert!(objectives.len() >= 2);
    for pair in objectives.windows(2) {
        assert!(
            pair[1] <= pair[0] + 1e-9,
            "objective increased from {} to {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn convergence_reads_the_recorded_history() {
    // The stopping rule only fires after iteration 10 and compares the
    // last two recorded objectives, so a converged fit always carries at
    // least 12 history entries and its final objective is the last one.
    let a = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
    let mut model = quadratic_model(a, 1);
    model.x = DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]);
    model.y = DMatrix::from_element(1, 1, 1.0);

    let result = fit(&mut model, &ProxGradParams::new().with_max_iter(500)).unwrap();

    assert!(result.converged);
    assert_eq!(result.termination_reason, TerminationReason::Converged);
    assert!(result.iterations >= 11);
    assert_eq!(result.history.len(), result.iterations + 1);
    assert_relative_eq!(
        result.objective,
        *result.history.objectives().last().unwrap()
    );
}

#[test]
fn zero_iterations_leave_the_factors_untouched() {
    let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let mut model = quadratic_model(a, 2);
    model.x = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
    model.y = DMatrix::from_row_slice(2, 2, &[0.5, -0.5, 0.25, 0.75]);
    let x_before = model.x.clone();
    let y_before = model.y.clone();

    let result = fit(&mut model, &ProxGradParams::new().with_max_iter(0)).unwrap();

    assert_eq!(model.x, x_before);
    assert_eq!(model.y, y_before);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.history.len(), 1);
    assert_relative_eq!(result.objective, result.history.objectives()[0]);
}

#[test]
fn one_iteration_records_exactly_two_history_entries() {
    let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
    let mut model = quadratic_model(a, 1);
    model.x = DMatrix::from_row_slice(1, 2, &[0.4, -0.6]);
    model.y = DMatrix::from_row_slice(1, 2, &[0.2, 0.8]);

    let result = fit(&mut model, &ProxGradParams::new().with_max_iter(1)).unwrap();

    assert_eq!(result.iterations, 1);
    assert_eq!(result.history.len(), 2);
    assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
    assert!(!result.converged);
}

#[test]
fn unobserved_column_is_updated_by_shrinkage_only() {
    // Column 1 has no observations: its Y block never sees a data
    // gradient, so the quadratic regularizer's prox shrinks it toward
    // zero while column 0 fits its data.
    let a: DMatrix<f64> = DMatrix::from_row_slice(3, 2, &[1.0, 9.9, 2.0, 9.9, 3.0, 9.9]);
    let mut model = Glrm::from_pairs(
        a,
        vec![Loss::Quadratic; 2],
        vec![Regularizer::Zero; 3],
        vec![Regularizer::Zero, Regularizer::Quadratic { scale: 0.5 }],
        1,
        &[(0, 0), (1, 0), (2, 0)],
    )
    .unwrap();
    model.x = DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]);
    model.y = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);

    fit(&mut model, &ProxGradParams::new().with_max_iter(20)).unwrap();

    let shrunk = model.y[(0, 1)].abs();
    assert!(shrunk < 0.5, "expected pure shrinkage, got {shrunk}");
    assert!(model.y[(0, 1)] >= 0.0, "shrinkage must not overshoot zero");
}

#[test]
fn mis_shaped_y_is_reinitialized() {
    let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let mut model = quadratic_model(a, 2);
    model.y = DMatrix::zeros(2, 5);

    fit(&mut model, &ProxGradParams::new().with_max_iter(2)).unwrap();

    assert_eq!(model.y.shape(), (2, 2));
}

#[test]
fn zero_y_is_reinitialized() {
    let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let mut model = quadratic_model(a, 2);
    model.y = DMatrix::zeros(2, 2);

    fit(&mut model, &ProxGradParams::new().with_max_iter(2)).unwrap();

    assert!(model.y.iter().any(|v| *v != 0.0));
}

#[test]
fn mixed_losses_fit_runs_and_decreases() {
    // One quadratic column and one 3-class categorical column: Y spans
    // 1 + 3 = 4 embedding columns.
    let a = DMatrix::from_row_slice(4, 2, &[0.5, 0.0, 1.5, 1.0, -0.5, 2.0, 1.0, 1.0]);
    let mut model = Glrm::new(
        a,
        vec![Loss::Quadratic, Loss::Categorical { classes: 3 }],
        vec![Regularizer::Quadratic { scale: 0.01 }; 4],
        vec![Regularizer::Quadratic { scale: 0.01 }; 2],
        2,
    )
    .unwrap();
    assert_eq!(model.y.ncols(), 4);

    let result = fit(&mut model, &ProxGradParams::new().with_max_iter(40)).unwrap();

    assert_eq!(model.y.shape(), (2, 4));
    let objectives = result.history.objectives();
    assert!(objectives[objectives.len() - 1] <= objectives[0] + 1e-6);
}

#[test]
fn inner_iterations_run_all_phases() {
    let a = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
    let mut model = quadratic_model(a, 1);
    model.x = DMatrix::from_row_slice(1, 3, &[0.5, 0.5, 0.5]);
    model.y = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);

    let params = ProxGradParams::new().with_max_iter(15).with_inner_iter(3);
    let result = fit(&mut model, &params).unwrap();

    // Still one history entry per outer iteration, regardless of inner
    // passes.
    assert_eq!(result.history.len(), result.iterations + 1);
    let objectives = result.history.objectives();
    assert!(objectives[objectives.len() - 1] <= objectives[0]);
}

#[test]
fn invalid_params_are_rejected_before_touching_the_model() {
    let a = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
    let mut model = quadratic_model(a, 1);
    let x_before = model.x.clone();

    let params = ProxGradParams::new().with_min_stepsize(10.0);
    assert!(fit(&mut model, &params).is_err());
    assert_eq!(model.x, x_before);
}
