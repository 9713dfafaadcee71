//! Easing curves: remap normalized time so motion starts and ends slowly.

/// Easing curves for cinematic camera moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EasingFunction {
    /// Constant speed, no acceleration.
    Linear,
    /// Slow start, fast end.
    EaseIn,
    /// Fast start, slow end.
    EaseOut,
    /// Cubic slow start, fast middle, slow end.
    #[default]
    CubicInOut,
    /// Quartic slow start, fast middle, slow end. Steeper than cubic.
    QuarticInOut,
}

impl EasingFunction {
    /// Map a linear progress value (0.0..=1.0) to an eased value.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn => t * t,
            EasingFunction::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::QuarticInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 5] = [
        EasingFunction::Linear,
        EasingFunction::EaseIn,
        EasingFunction::EaseOut,
        EasingFunction::CubicInOut,
        EasingFunction::QuarticInOut,
    ];

    #[test]
    fn test_all_start_at_zero_end_at_one() {
        for easing in &ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at t=0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at t=1");
        }
    }

    #[test]
    fn test_in_out_curves_pass_through_midpoint() {
        assert!((EasingFunction::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((EasingFunction::QuarticInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_quartic_starts_slower_than_cubic() {
        let cubic = EasingFunction::CubicInOut.apply(0.2);
        let quartic = EasingFunction::QuarticInOut.apply(0.2);
        assert!(quartic < cubic);
        assert!((cubic - 0.032).abs() < 1e-6);
        assert!((quartic - 0.0128).abs() < 1e-6);
    }

    #[test]
    fn test_curves_are_monotonic() {
        for easing in &ALL {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(EasingFunction::CubicInOut.apply(-3.0), 0.0);
        assert_eq!(EasingFunction::CubicInOut.apply(7.0), 1.0);
    }
}
