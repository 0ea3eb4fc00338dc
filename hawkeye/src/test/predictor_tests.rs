use crate::predictor::Predictor;

#[test]
fn unseen_pcs_are_friendly_and_not_stored() {
    let predictor = Predictor::new(7, 16);
    assert_eq!(predictor.midpoint(), 4);
    assert!(predictor.predict(0x1234));
    assert_eq!(predictor.counter(0x1234), 4);
    assert!(predictor.is_empty());
}

#[test]
fn training_creates_entries_at_the_midpoint() {
    let mut predictor = Predictor::new(7, 16);
    predictor.train(1);
    predictor.detrain(2);
    assert_eq!(predictor.counter(1), 5);
    assert_eq!(predictor.counter(2), 3);
    assert_eq!(predictor.len(), 2);
}

#[test]
fn train_then_detrain_returns_to_the_midpoint() {
    let mut predictor = Predictor::new(7, 16);
    for _ in 0..3 {
        predictor.train(0x40);
    }
    assert_eq!(predictor.counter(0x40), 7);
    for _ in 0..3 {
        predictor.detrain(0x40);
    }
    assert_eq!(predictor.counter(0x40), predictor.midpoint());
}

#[test]
fn counters_saturate() {
    let mut predictor = Predictor::new(7, 16);
    for _ in 0..20 {
        predictor.train(0x40);
    }
    assert_eq!(predictor.counter(0x40), 7);
    for _ in 0..20 {
        predictor.detrain(0x40);
    }
    assert_eq!(predictor.counter(0x40), 0);
    predictor.detrain(0x40);
    assert_eq!(predictor.counter(0x40), 0);
}

#[test]
fn prediction_flips_at_the_midpoint() {
    let mut predictor = Predictor::new(7, 16);
    predictor.detrain(0x40);
    assert!(!predictor.predict(0x40));
    predictor.train(0x40);
    assert!(predictor.predict(0x40));
}

#[test]
fn midpoint_for_extreme_widths() {
    assert_eq!(Predictor::new(1, 0).midpoint(), 1);
    assert_eq!(Predictor::new(u8::MAX, 0).midpoint(), 128);
    let mut predictor = Predictor::new(u8::MAX, 0);
    predictor.train(9);
    assert_eq!(predictor.counter(9), 129);
}
