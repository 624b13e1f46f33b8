use padstate::deadzone::{
    apply_stick_dead_zone, apply_trigger_dead_zone, normalize_axis, DeadZoneMode, Stick,
};
use padstate::edge::{has_just_been_pressed, has_just_been_released};
use padstate::StateBuffer;
use proptest::prelude::*;
use std::time::Duration;

fn bit(state: &u32, b: u8) -> bool {
    state & (1 << b) != 0
}

proptest! {
    #[test]
    fn rotate_keeps_exactly_last_two(s0: u32, s1: u32, s2: u32, t1 in 0u64..1000, dt in 0u64..1000) {
        let mut buf = StateBuffer::new(s0);
        prop_assert_eq!(*buf.current(), s0);
        prop_assert_eq!(*buf.previous(), s0);
        prop_assert_eq!(buf.current_time(), Duration::ZERO);

        buf.rotate(s1, Duration::from_millis(t1));
        buf.rotate(s2, Duration::from_millis(t1 + dt));
        prop_assert_eq!(*buf.previous(), s1);
        prop_assert_eq!(*buf.current(), s2);
        prop_assert!(buf.previous_time() <= buf.current_time());
    }

    #[test]
    fn edges_match_definition_and_never_both(prev: u32, cur: u32, b in 0u8..32) {
        let mut buf = StateBuffer::new(prev);
        buf.rotate(cur, Duration::from_millis(1));
        let pressed = has_just_been_pressed(&buf, b, bit);
        let released = has_just_been_released(&buf, b, bit);
        prop_assert_eq!(pressed, bit(&cur, b) && !bit(&prev, b));
        prop_assert_eq!(released, !bit(&cur, b) && bit(&prev, b));
        prop_assert!(!(pressed && released));
    }

    #[test]
    fn normalized_axis_stays_in_range(raw: i16) {
        let v = normalize_axis(raw);
        prop_assert!((-1.0..=1.0).contains(&v));
        prop_assert_eq!(v > 0.0, raw > 0);
    }

    #[test]
    fn trigger_at_or_below_threshold_is_zero(threshold in 0u8..255, raw: u8) {
        let out = apply_trigger_dead_zone(raw, threshold).unwrap();
        if raw <= threshold {
            prop_assert_eq!(out, 0);
        } else {
            prop_assert!(out > 0);
        }
    }

    #[test]
    fn linear_is_monotonic_per_axis(a: i16, b: i16, dz in 0i16..32000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let out_lo = apply_stick_dead_zone(Stick::new(lo, 0), dz, DeadZoneMode::Linear).unwrap();
        let out_hi = apply_stick_dead_zone(Stick::new(hi, 0), dz, DeadZoneMode::Linear).unwrap();
        prop_assert!(out_lo.x <= out_hi.x);
        prop_assert_eq!(out_lo.y, 0);
    }

    #[test]
    fn circular_zeroes_inside_and_keeps_quadrant_outside(x: i16, y: i16, dz in 0i16..32000) {
        let out = apply_stick_dead_zone(Stick::new(x, y), dz, DeadZoneMode::Circular).unwrap();
        let magnitude = ((x as f64).powi(2) + (y as f64).powi(2)).sqrt();
        if magnitude <= dz as f64 {
            prop_assert_eq!(out, Stick::CENTER);
        } else {
            prop_assert!(out.x == 0 || out.x.signum() == x.signum());
            prop_assert!(out.y == 0 || out.y.signum() == y.signum());
        }
    }
}
