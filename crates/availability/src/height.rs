//! Log wind profile height adjustment.

/// Multiplier lifting a speed from `reference_height` to
/// `target_height` over terrain with roughness length `z0`:
/// `ln(target / z0) / ln(reference / z0)`.
///
/// Degenerate inputs (reference equal to z0, non-positive arguments)
/// produce a non-finite quotient; those collapse to `1.0`, leaving the
/// speed unadjusted rather than poisoning the counters.
pub fn height_coefficient(target_height: f64, reference_height: f64, z0: f64) -> f64 {
    let coefficient = (target_height / z0).ln() / (reference_height / z0).ln();
    if coefficient.is_finite() {
        coefficient
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typical_profile() {
        let c = height_coefficient(109.0, 10.0, 0.03);
        let expected = (109.0_f64 / 0.03).ln() / (10.0_f64 / 0.03).ln();
        assert!((c - expected).abs() < 1e-12);
        assert!(c > 1.0);
    }

    #[test]
    fn test_equal_heights_is_identity() {
        assert!((height_coefficient(10.0, 10.0, 0.03) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs_collapse_to_one() {
        // reference == z0 makes the denominator ln(1) = 0.
        assert_eq!(height_coefficient(109.0, 0.03, 0.03), 1.0);
        assert_eq!(height_coefficient(109.0, 10.0, -1.0), 1.0);
        assert_eq!(height_coefficient(109.0, 10.0, f64::NAN), 1.0);
    }

    #[test]
    fn test_smooth_terrain_adjusts_less() {
        let rough = height_coefficient(109.0, 10.0, 0.5);
        let smooth = height_coefficient(109.0, 10.0, 0.0002);
        assert!(rough > smooth);
    }
}
