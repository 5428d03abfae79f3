use super::*;

fn id(s: &str) -> PerformerId {
    PerformerId::new(s)
}

fn line(points: &[(f64, f64)]) -> Vec<Point> {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn store() -> FormationStore {
    let mut s = FormationStore::new();
    s.add_performer(Performer::new("a", Point::new(0.0, 0.0))).unwrap();
    s.add_performer(Performer::new("b", Point::new(50.0, 50.0))).unwrap();
    for _ in 0..3 {
        s.append_group(4, 0).unwrap();
    }
    s.set_path(0, &id("a"), line(&[(10.0, 10.0), (20.0, 10.0)]), PathKind::Straight)
        .unwrap();
    s.set_path(
        2,
        &id("a"),
        line(&[(100.0, 100.0), (90.0, 115.0), (100.0, 130.0)]),
        PathKind::Curve,
    )
    .unwrap();
    s
}

#[test]
fn endpoints_chain_across_formations() {
    let s = store();
    let a = id("a");
    assert_eq!(s.actual_start(&a, 0), Some(Point::new(0.0, 0.0)));
    assert_eq!(s.actual_end(&a, 0), Some(Point::new(10.0, 0.0)));
    assert_eq!(s.actual_start(&a, 1), Some(Point::new(10.0, 0.0)));
    assert_eq!(s.actual_end(&a, 1), Some(Point::new(10.0, 0.0)));
    assert_eq!(s.actual_start(&a, 2), Some(Point::new(10.0, 0.0)));
    assert_eq!(s.actual_end(&a, 2), Some(Point::new(10.0, 30.0)));
}

#[test]
fn index_past_the_end_holds_final_position() {
    let s = store();
    let e = s.endpoints(&id("a"), 99).unwrap();
    assert_eq!(e.start, Point::new(10.0, 30.0));
    assert_eq!(e.end, Point::new(10.0, 30.0));
}

#[test]
fn performers_without_paths_never_move() {
    let s = store();
    let b = id("b");
    for i in 0..3 {
        assert_eq!(s.actual_start(&b, i), Some(Point::new(50.0, 50.0)));
        assert_eq!(s.actual_end(&b, i), Some(Point::new(50.0, 50.0)));
    }
    assert_eq!(s.actual_start(&id("ghost"), 0), None);
}

#[test]
fn edits_invalidate_the_cached_chain() {
    let mut s = store();
    let a = id("a");
    assert_eq!(s.actual_end(&a, 2), Some(Point::new(10.0, 30.0)));

    s.set_path(1, &a, line(&[(0.0, 0.0), (5.0, 5.0)]), PathKind::Straight)
        .unwrap();
    assert_eq!(s.actual_start(&a, 2), Some(Point::new(15.0, 5.0)));
    assert_eq!(s.actual_end(&a, 2), Some(Point::new(15.0, 35.0)));

    s.set_initial_position(&a, Point::new(-15.0, -5.0)).unwrap();
    assert_eq!(s.actual_end(&a, 2), Some(Point::new(0.0, 30.0)));

    s.clear_path(0, &a).unwrap();
    assert_eq!(s.actual_end(&a, 0), Some(Point::new(-15.0, -5.0)));
}

#[test]
fn removing_a_group_drops_its_formation() {
    let mut s = store();
    let (group, formation) = s.remove_group(0).unwrap();
    assert_eq!(group.start_beat, 0);
    assert!(formation.keyframe(&id("a")).is_some());
    assert_eq!(s.groups().len(), s.formations().len());
    assert_eq!(s.actual_end(&id("a"), 1), Some(Point::new(0.0, 30.0)));
}

#[test]
fn inserted_groups_stay_sorted_and_paired() {
    let mut s = FormationStore::new();
    s.add_performer(Performer::new("a", Point::ZERO)).unwrap();
    assert_eq!(s.insert_group(BeatGroup::new(8, 4)).unwrap(), 0);
    s.set_path(0, &id("a"), line(&[(0.0, 0.0), (1.0, 0.0)]), PathKind::Straight)
        .unwrap();
    assert_eq!(s.insert_group(BeatGroup::new(0, 4)).unwrap(), 0);

    assert_eq!(s.groups()[1].start_beat, 8);
    assert!(s.formation(1).unwrap().keyframe(&id("a")).is_some());
    assert!(s.formation(0).unwrap().keyframes.is_empty());
    assert!(s.insert_group(BeatGroup::new(2, 4)).is_err());
    assert_eq!(s.groups().len(), 2);
}

#[test]
fn update_group_must_fit_between_neighbours() {
    let mut s = store();
    assert!(s.update_group(1, BeatGroup::new(4, 5)).is_err());
    assert!(s.update_group(1, BeatGroup::new(4, 4).with_transition(5, 2)).is_ok());
    assert_eq!(s.groups()[1].transition_start_beat, Some(5));
    assert!(s.update_group(7, BeatGroup::new(40, 4)).is_err());
}

#[test]
fn append_group_continues_after_last() {
    let mut s = FormationStore::new();
    assert_eq!(s.append_group(8, 2).unwrap(), 0);
    assert_eq!(s.append_group(4, 0).unwrap(), 1);
    assert_eq!(s.groups()[1].start_beat, 10);
}

#[test]
fn removing_a_performer_drops_their_keyframes() {
    let mut s = store();
    let removed = s.remove_performer(&id("a")).unwrap();
    assert_eq!(removed.id, id("a"));
    assert!(s.formations().iter().all(|f| f.keyframe(&id("a")).is_none()));
    assert!(s.remove_performer(&id("a")).is_err());
    assert_eq!(s.actual_start(&id("b"), 2), Some(Point::new(50.0, 50.0)));
}

#[test]
fn edits_reject_unknown_targets() {
    let mut s = store();
    assert!(s.set_transition(0, &id("ghost"), Some(Ease::Bounce)).is_err());
    assert!(s.set_transition(9, &id("a"), Some(Ease::Bounce)).is_err());
    assert!(s.set_formation_ease(9, None).is_err());
    assert!(s.add_performer(Performer::new("a", Point::ZERO)).is_err());
    assert!(
        s.add_performer(Performer::new("c", Point::new(f64::NAN, 0.0)))
            .is_err()
    );
}

#[test]
fn transition_edits_are_stored_on_the_keyframe() {
    let mut s = store();
    s.set_transition(1, &id("b"), Some(Ease::Early)).unwrap();
    s.set_formation_ease(1, Some(Ease::Delayed)).unwrap();
    let f = s.formation(1).unwrap();
    assert_eq!(f.ease_for(&id("b"), Ease::Linear), Ease::Early);
    assert_eq!(f.ease_for(&id("a"), Ease::Linear), Ease::Delayed);
}

#[test]
fn from_parts_validates_shape() {
    let performers = vec![Performer::new("a", Point::ZERO)];
    let groups = vec![BeatGroup::new(0, 4)];

    assert!(
        FormationStore::from_parts(performers.clone(), groups.clone(), vec![]).is_err()
    );

    let dup = vec![
        Performer::new("a", Point::ZERO),
        Performer::new("a", Point::ZERO),
    ];
    assert!(FormationStore::from_parts(dup, vec![], vec![]).is_err());

    let mut stray = Formation::default();
    stray
        .keyframes
        .insert(id("ghost"), PerformerKeyframe::default());
    assert!(
        FormationStore::from_parts(performers.clone(), groups.clone(), vec![stray]).is_err()
    );

    let unsorted = vec![BeatGroup::new(4, 4), BeatGroup::new(0, 4)];
    assert!(
        FormationStore::from_parts(
            performers.clone(),
            unsorted,
            vec![Formation::default(), Formation::default()]
        )
        .is_err()
    );

    let ok = FormationStore::from_parts(performers, groups, vec![Formation::default()]).unwrap();
    assert_eq!(ok.actual_start(&id("a"), 0), Some(Point::ZERO));
}

#[test]
fn clones_start_with_a_cold_cache() {
    let s = store();
    let _ = s.actual_end(&id("a"), 2);
    let c = s.clone();
    assert_eq!(c.actual_end(&id("a"), 2), Some(Point::new(10.0, 30.0)));
}
