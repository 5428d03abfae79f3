use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease}");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in [Ease::Linear, Ease::InQuad, Ease::OutQuad, Ease::InOutQuad] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn delayed_and_early_shape() {
    assert_eq!(Ease::Delayed.apply(0.3), 0.0);
    assert_eq!(Ease::Delayed.apply(0.59), 0.0);
    assert!((Ease::Delayed.apply(0.8) - 0.5).abs() < 1e-12);

    assert!((Ease::Early.apply(0.2) - 0.5).abs() < 1e-12);
    assert_eq!(Ease::Early.apply(0.4), 1.0);
    assert_eq!(Ease::Early.apply(0.9), 1.0);
}

#[test]
fn bounce_overshoots_without_clamping() {
    let p = Ease::Bounce.apply(0.75);
    assert!(p > 1.0);
    assert!((p - 1.022).abs() < 1e-3);
    assert!((Ease::Bounce.apply(0.5) - 0.7).abs() < 1e-12);
    assert_eq!(Ease::Bounce.apply(0.9), 1.0);
}

#[test]
fn input_is_clamped_to_unit_range() {
    assert_eq!(Ease::Linear.apply(-1.0), 0.0);
    assert_eq!(Ease::Linear.apply(2.0), 1.0);
    assert_eq!(Ease::InQuad.apply(f64::NAN), 0.0);
}

#[test]
fn names_parse_and_serialize_symmetrically() {
    for ease in Ease::ALL {
        assert_eq!(ease.name().parse::<Ease>().unwrap(), ease);
        let json = serde_json::to_string(&ease).unwrap();
        assert_eq!(json, format!("\"{}\"", ease.name()));
    }
    assert!("wobble".parse::<Ease>().is_err());
}
