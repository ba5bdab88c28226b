use eegproc::{epoch_subset, Error};
use ndarray::{s, Array3};

fn ramp(n_samp: usize, n_trial: usize) -> Array3<f64> {
    Array3::from_shape_fn((n_samp, 1, n_trial), |(i, _, t)| i as f64 + 100.0 * t as f64)
}

#[test]
fn no_shift_round_trips_the_data() {
    // offsets all equal to the derived lock index: output is the input
    // truncated to the window, which here is the full recording.
    let data = ramp(30, 4);
    let r = epoch_subset(&data, &[6.0; 4], None).unwrap();
    assert_eq!(r.lock_index, 6);
    assert!(r.bad_trials.is_empty());
    assert_eq!(r.data, data);
}

#[test]
fn jittered_trials_align_on_lock_sample() {
    let data = ramp(50, 3);
    let offsets = [10.0, 15.0, 22.0];
    let r = epoch_subset(&data, &offsets, None).unwrap();
    // window = 50 - 22 + 10 = 38
    assert_eq!(r.data.dim(), (38, 1, 3));
    // at the lock sample every trial shows its own time-zero value
    for (t, &off) in offsets.iter().enumerate() {
        let expected = off + 100.0 * t as f64;
        assert_eq!(r.data[(r.lock_index as usize, 0, t)], expected);
    }
}

#[test]
fn nan_offset_trial_is_zeroed_and_reported() {
    let data = ramp(30, 5);
    let offsets = [4.0, f64::NAN, 6.0, f64::NAN, 5.0];
    let r = epoch_subset(&data, &offsets, None).unwrap();
    assert_eq!(r.bad_trials, vec![1, 3]);
    for &t in &r.bad_trials {
        assert!(r.data.slice(s![.., .., t]).iter().all(|&v| v == 0.0));
    }
    // good trials keep real data
    assert!(r.data.slice(s![.., .., 0]).iter().any(|&v| v != 0.0));
}

#[test]
fn all_nan_offsets_fail_with_invalid_parameter() {
    let data = ramp(30, 2);
    let err = epoch_subset(&data, &[f64::NAN, f64::NAN], None).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)), "got {err:?}");
}

#[test]
fn out_of_range_explicit_lock_fails_with_bounds_error() {
    let data = ramp(30, 2);
    let err = epoch_subset(&data, &[5.0, 10.0], Some(20)).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)), "got {err:?}");
}

#[test]
fn infinite_offsets_count_as_bad_trials() {
    let data = ramp(30, 3);
    let r = epoch_subset(&data, &[5.0, f64::INFINITY, 8.0], None).unwrap();
    assert_eq!(r.bad_trials, vec![1]);
}
