use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use scenario_forecast::adjustment::adjust_point_with_decay;
use scenario_forecast::{
    adjust_point, propagation_weight, AdjustmentWarning, ForecastError, DECAY_RATE,
};

#[test]
fn test_doubling_first_point_propagates_with_decay() {
    let outcome = adjust_point(&[10.0; 5], 0, 20.0).unwrap();

    assert_eq!(outcome.values[0], 20.0);
    assert_abs_diff_eq!(outcome.values[1], 17.408, epsilon = 1e-3);
    assert_abs_diff_eq!(outcome.values[4], 13.012, epsilon = 1e-3);
    assert!(outcome.warning.is_none());

    // Influence fades strictly with distance
    for pair in outcome.values[1..].windows(2) {
        assert!(pair[1] < pair[0]);
    }
}

#[test]
fn test_weights_match_closed_form() {
    assert_abs_diff_eq!(1.0 + propagation_weight(1, DECAY_RATE), 1.741, epsilon = 1e-3);
    assert_abs_diff_eq!(1.0 + propagation_weight(4, DECAY_RATE), 1.301, epsilon = 1e-3);
}

#[test]
fn test_lowering_a_point_pulls_later_points_down() {
    let outcome = adjust_point(&[100.0, 100.0, 100.0], 0, 50.0).unwrap();

    assert_eq!(outcome.values[0], 50.0);
    assert!(outcome.values[1] < 100.0 && outcome.values[1] > 50.0);
    assert!(outcome.values[2] > outcome.values[1]);
}

#[test]
fn test_input_is_not_mutated() {
    let original = vec![5.0, 6.0, 7.0, 8.0];
    let outcome = adjust_point(&original, 1, 12.0).unwrap();

    assert_eq!(original, vec![5.0, 6.0, 7.0, 8.0]);
    assert_eq!(outcome.event.original_value, 6.0);
    assert_eq!(outcome.event.new_value, 12.0);
    assert_eq!(outcome.event.point_index, 1);
}

#[test]
fn test_sequential_adjustments_compose() {
    let first = adjust_point(&[10.0; 4], 0, 20.0).unwrap();
    let second = adjust_point(&first.values, 0, 20.0).unwrap();

    // Re-applying the same target is a no-op ratio of 1
    assert_eq!(second.values, first.values);

    let third = adjust_point(&first.values, 1, 30.0).unwrap();
    assert_eq!(third.values[0], 20.0);
    assert_eq!(third.values[1], 30.0);
    assert!(third.values[2] > first.values[2]);
}

#[test]
fn test_zero_original_is_not_propagated() {
    let outcome = adjust_point(&[0.0, 4.0, 4.0], 0, 10.0).unwrap();

    assert_eq!(outcome.values, vec![10.0, 4.0, 4.0]);
    assert_eq!(outcome.warning, Some(AdjustmentWarning::NonPropagatable));
}

#[test]
fn test_out_of_range_requests() {
    assert!(matches!(
        adjust_point(&[1.0, 2.0], 2, 5.0),
        Err(ForecastError::IndexOutOfRange(_))
    ));
    assert!(matches!(
        adjust_point(&[], 0, 5.0),
        Err(ForecastError::IndexOutOfRange(_))
    ));
    assert!(matches!(
        adjust_point(&[1.0, 2.0], 0, -1.0),
        Err(ForecastError::IndexOutOfRange(_))
    ));
    assert!(matches!(
        adjust_point(&[1.0, 2.0], 0, f64::NAN),
        Err(ForecastError::IndexOutOfRange(_))
    ));
}

#[test]
fn test_custom_decay_rate() {
    let slow = adjust_point_with_decay(&[10.0; 3], 0, 20.0, 0.1).unwrap();
    let fast = adjust_point_with_decay(&[10.0; 3], 0, 20.0, 1.0).unwrap();

    assert!(slow.values[2] > fast.values[2]);
}
