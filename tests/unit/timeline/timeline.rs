use super::*;

#[test]
fn step_is_floor_of_frame_times_speed() {
    assert_eq!(step_for_frame(FrameIndex(0), 0.5, 750), 0);
    assert_eq!(step_for_frame(FrameIndex(1), 0.5, 750), 0);
    assert_eq!(step_for_frame(FrameIndex(2), 0.5, 750), 1);
    assert_eq!(step_for_frame(FrameIndex(7), 0.5, 750), 3);
    assert_eq!(step_for_frame(FrameIndex(10), 1.5, 750), 15);
}

#[test]
fn step_clamps_to_last_sample() {
    assert_eq!(step_for_frame(FrameIndex(1000), 1.0, 90), 89);
    assert_eq!(step_for_frame(FrameIndex(5), 1.0, 0), 0);
}

#[test]
fn total_steps_is_len_over_speed() {
    assert_eq!(total_steps(750, 0.5), 1500);
    assert_eq!(total_steps(90, 1.0), 90);
    assert_eq!(total_steps(90, 4.0), 22);
    assert_eq!(total_steps(0, 1.0), 0);
}

#[test]
fn every_animated_frame_maps_inside_series() {
    let plan = TimelinePlan::new(750, 0.5, 300, Fps::new(60, 1).unwrap()).unwrap();
    let last = plan.step(FrameIndex(plan.total_steps - 1));
    assert_eq!(last, 749);
    for f in 0..plan.total_steps {
        assert!(plan.step(FrameIndex(f)) < 750);
    }
}

#[test]
fn plan_counts_hold_frames() {
    let plan = TimelinePlan::new(90, 1.0, 300, Fps::new(60, 1).unwrap()).unwrap();
    assert_eq!(plan.total_steps, 90);
    assert_eq!(plan.total_frames(), 390);
    assert!((plan.duration_secs() - 6.5).abs() < 1e-12);
}

#[test]
fn plan_rejects_empty_series() {
    assert!(TimelinePlan::new(0, 1.0, 0, Fps::new(60, 1).unwrap()).is_err());
}
