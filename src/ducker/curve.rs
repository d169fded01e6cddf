/// Envelope curve selection. The attack side shapes the duck-down ramp,
/// the release side shapes the recovery ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    Expo,
    SCurve,
    Pump,
}

impl Curve {
    /// Map a curve index (as stored in serialized state) back to a curve.
    /// Out-of-range indices fall back to Linear.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Curve::Expo,
            2 => Curve::SCurve,
            3 => Curve::Pump,
            _ => Curve::Linear,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Curve::Linear => 0,
            Curve::Expo => 1,
            Curve::SCurve => 2,
            Curve::Pump => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Curve::Linear => "Linear",
            Curve::Expo => "Expo",
            Curve::SCurve => "S-Curve",
            Curve::Pump => "Pump",
        }
    }

    /// Parse a curve from its display name. Anything else is read as a
    /// 0.0-1.0 fraction and mapped onto the curve list.
    pub fn parse(value: &str) -> Self {
        match value {
            "Linear" => Curve::Linear,
            "Expo" => Curve::Expo,
            "S-Curve" => Curve::SCurve,
            "Pump" => Curve::Pump,
            _ => {
                let index = (value.parse::<f32>().unwrap_or(0.0) * 3.0 + 0.5) as i32;
                Curve::from_index(index.clamp(0, 3) as u8)
            }
        }
    }

    /// Shape a 0-1 phase progress value.
    /// For attack, `t` runs 0 to 1 as the gain ducks down;
    /// for release, `t` runs 0 to 1 as the gain recovers.
    pub fn shape(self, t: f32, is_release: bool) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::Expo => t * t,
            Curve::SCurve => t * t * (3.0 - 2.0 * t),
            Curve::Pump => {
                if is_release {
                    // Cubic ease-out: fast initial recovery, then settling
                    let inv = 1.0 - t;
                    1.0 - inv * inv * inv
                } else {
                    t
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Curve; 4] = [Curve::Linear, Curve::Expo, Curve::SCurve, Curve::Pump];

    #[test]
    fn test_endpoints() {
        for curve in ALL {
            for is_release in [false, true] {
                assert_eq!(
                    curve.shape(0.0, is_release),
                    0.0,
                    "{:?} should start at 0",
                    curve
                );
                assert_eq!(
                    curve.shape(1.0, is_release),
                    1.0,
                    "{:?} should end at 1",
                    curve
                );
            }
        }
    }

    #[test]
    fn test_input_is_clamped() {
        for curve in ALL {
            assert_eq!(curve.shape(-0.5, false), 0.0);
            assert_eq!(curve.shape(1.5, false), 1.0);
            assert_eq!(curve.shape(1.5, true), 1.0);
        }
    }

    #[test]
    fn test_expo_lags_linear() {
        // Slow start, accelerating - below the diagonal everywhere inside (0, 1)
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!(Curve::Expo.shape(t, false) < t);
            assert!(Curve::Expo.shape(t, true) < t);
        }
    }

    #[test]
    fn test_scurve_midpoint() {
        let mid = Curve::SCurve.shape(0.5, false);
        assert!((mid - 0.5).abs() < 1e-6);
        // Symmetric ease: s(t) + s(1-t) == 1
        let sum = Curve::SCurve.shape(0.25, false) + Curve::SCurve.shape(0.75, false);
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pump_is_direction_dependent() {
        // Linear duck-down, fast recovery
        assert_eq!(Curve::Pump.shape(0.3, false), 0.3);
        assert!(Curve::Pump.shape(0.3, true) > 0.3);
    }

    #[test]
    fn test_parse_names_and_fractions() {
        assert_eq!(Curve::parse("Linear"), Curve::Linear);
        assert_eq!(Curve::parse("S-Curve"), Curve::SCurve);
        assert_eq!(Curve::parse("Pump"), Curve::Pump);
        // Numeric fallback maps a 0-1 fraction onto the curve list
        assert_eq!(Curve::parse("0.0"), Curve::Linear);
        assert_eq!(Curve::parse("0.5"), Curve::SCurve);
        assert_eq!(Curve::parse("1.0"), Curve::Pump);
        assert_eq!(Curve::parse("garbage"), Curve::Linear);
    }

    #[test]
    fn test_index_round_trip() {
        for curve in ALL {
            assert_eq!(Curve::from_index(curve.index()), curve);
        }
        assert_eq!(Curve::from_index(9), Curve::Linear);
    }
}
