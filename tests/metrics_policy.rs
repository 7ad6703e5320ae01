use confusion_estimator::estimate::{metrics, metrics_from_counts, Candidate, MetricFn, MetricPair};

#[test]
fn empty_diseased_group_scores_zero_sensitivity() {
    let m = metrics_from_counts(&Candidate::new(0, 5, 0, 0));
    assert_eq!(m.sensitivity, 0.0);
    assert_eq!(m.specificity, 1.0);
    assert_eq!(m.ppv, 0.0);
    assert_eq!(m.npv, 1.0);
    assert_eq!(m.positive_lr, f64::INFINITY);
    assert_eq!(m.negative_lr, 1.0);
}

#[test]
fn perfect_test_has_infinite_positive_lr() {
    let m = metrics_from_counts(&Candidate::new(7, 3, 0, 0));
    assert_eq!(m.sensitivity, 1.0);
    assert_eq!(m.specificity, 1.0);
    assert_eq!(m.positive_lr, f64::INFINITY);
    assert_eq!(m.negative_lr, 0.0);
}

#[test]
fn zero_specificity_has_infinite_negative_lr() {
    let c = Candidate::new(5, 0, 3, 0);
    assert_eq!(metrics::specificity(&c), 0.0);
    assert_eq!(metrics::negative_lr(&c), f64::INFINITY);
    assert_eq!(metrics::positive_lr(&c), 1.0);
}

#[test]
fn empty_matrix_resolves_every_rate_to_zero() {
    let m = metrics_from_counts(&Candidate::new(0, 0, 0, 0));
    assert_eq!(m.sensitivity, 0.0);
    assert_eq!(m.specificity, 0.0);
    assert_eq!(m.ppv, 0.0);
    assert_eq!(m.npv, 0.0);
    assert_eq!(m.positive_lr, 0.0);
    assert_eq!(m.negative_lr, f64::INFINITY);
    assert!(!m.negative_lr.is_nan());
}

#[test]
fn rates_match_hand_computed_values() {
    let m = metrics_from_counts(&Candidate::new(80, 90, 10, 20));
    assert!((m.sensitivity - 0.8).abs() < 1e-12);
    assert!((m.specificity - 0.9).abs() < 1e-12);
    assert!((m.ppv - 80.0 / 90.0).abs() < 1e-12);
    assert!((m.npv - 90.0 / 110.0).abs() < 1e-12);
    assert!((m.positive_lr - 8.0).abs() < 1e-9);
    assert!((m.negative_lr - 0.2 / 0.9).abs() < 1e-9);
}

#[test]
fn metric_pairs_share_the_point_formulas() {
    let c = Candidate::new(12, 30, 8, 4);
    let m = metrics_from_counts(&c);
    assert_eq!(
        MetricPair::SensitivitySpecificity.evaluate(&c),
        (m.sensitivity, m.specificity)
    );
    assert_eq!(MetricPair::PpvNpv.evaluate(&c), (m.ppv, m.npv));
    assert_eq!(
        MetricPair::LikelihoodRatios.evaluate(&c),
        (m.positive_lr, m.negative_lr)
    );
}

#[test]
fn ordered_metrics_keep_display_order() {
    let m = metrics_from_counts(&Candidate::new(10, 10, 5, 5));
    let labels: Vec<&str> = m.ordered().keys().copied().collect();
    assert_eq!(labels, ["Sensitivity", "Specificity", "PPV", "NPV", "+LR", "-LR"]);
}

#[test]
fn candidate_totals() {
    let c = Candidate::new(3, 4, 5, 6);
    assert_eq!(c.total(), 18);
    assert_eq!(c.diseased(), 9);
}

#[test]
fn totals_and_rates_widen_before_adding() {
    let c = Candidate::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX);
    assert_eq!(c.total(), 4 * u64::from(u32::MAX));
    assert_eq!(c.diseased(), 2 * u64::from(u32::MAX));
    assert_eq!(metrics::sensitivity(&c), 0.5);
    assert_eq!(metrics::specificity(&c), 0.5);
    assert_eq!(metrics::ppv(&c), 0.5);
}

#[test]
fn candidates_serialise_with_cell_labels() {
    let json = serde_json::to_value(Candidate::new(1, 2, 3, 4)).unwrap();
    assert_eq!(json, serde_json::json!({"TP": 1, "TN": 2, "FP": 3, "FN": 4}));
}
