use super::*;

fn grid() -> BeatGrid {
    BeatGrid::new(vec![0.0, 0.5, 1.0, 1.5, 2.0]).unwrap()
}

#[test]
fn rejects_decreasing_and_non_finite_timestamps() {
    assert!(BeatGrid::new(vec![0.0, 1.0, 0.5]).is_err());
    assert!(BeatGrid::new(vec![0.0, f64::NAN]).is_err());
    assert!(BeatGrid::new(vec![0.0, f64::INFINITY]).is_err());
    assert!(BeatGrid::new(vec![]).unwrap().is_empty());
}

#[test]
fn clamped_lookup_saturates_at_last_beat() {
    let g = grid();
    assert_eq!(g.time_of(2), Some(1.0));
    assert_eq!(g.time_of(9), None);
    assert_eq!(g.clamped_time_of(9), Some(2.0));
    assert_eq!(g.clamped_time_of(u64::MAX), Some(2.0));
    assert_eq!(BeatGrid::empty().clamped_time_of(0), None);
}

#[test]
fn sentinel_is_one_second_past_last_beat() {
    assert_eq!(grid().sentinel_end(), Some(3.0));
    assert_eq!(BeatGrid::empty().sentinel_end(), None);
}

#[test]
fn beat_at_floors_to_previous_beat() {
    let g = grid();
    assert_eq!(g.beat_at(-0.1), None);
    assert_eq!(g.beat_at(0.0), Some(0));
    assert_eq!(g.beat_at(0.74), Some(1));
    assert_eq!(g.beat_at(10.0), Some(4));
}

#[test]
fn nearest_beat_picks_closest_timestamp() {
    let g = grid();
    assert_eq!(g.nearest_beat(-3.0), Some(0));
    assert_eq!(g.nearest_beat(0.3), Some(1));
    assert_eq!(g.nearest_beat(0.2), Some(0));
    assert_eq!(g.nearest_beat(0.25), Some(0));
    assert_eq!(g.nearest_beat(7.0), Some(4));
    assert_eq!(BeatGrid::empty().nearest_beat(1.0), None);
}
