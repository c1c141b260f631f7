//! Scalar wind speed from U/V component fields.

use crate::error::{GridStoreError, Result};
use wind_common::FILL_VALUE;

/// Compute elementwise wind speed `sqrt(u² + v²)`.
///
/// Any cell where either component carries the `missing_sentinel` is
/// forced to [`FILL_VALUE`] in the output; the sentinel never
/// participates in the square root.
pub fn compute_speed(u: &[f32], v: &[f32], missing_sentinel: f32) -> Result<Vec<f32>> {
    if u.len() != v.len() {
        return Err(GridStoreError::ComponentLengthMismatch {
            u_len: u.len(),
            v_len: v.len(),
        });
    }

    Ok(u.iter()
        .zip(v.iter())
        .map(|(&uc, &vc)| {
            if uc == missing_sentinel || vc == missing_sentinel {
                FILL_VALUE
            } else {
                (uc * uc + vc * vc).sqrt()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wind_common::DEFAULT_MISSING_SENTINEL;

    #[test]
    fn test_three_four_five() {
        let speed = compute_speed(&[3.0], &[4.0], DEFAULT_MISSING_SENTINEL).unwrap();
        assert!((speed[0] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_sentinel_in_either_component_yields_fill() {
        let sentinel = DEFAULT_MISSING_SENTINEL;
        let speed = compute_speed(&[sentinel, 1.0, sentinel], &[4.0, sentinel, sentinel], sentinel)
            .unwrap();
        assert_eq!(speed, vec![FILL_VALUE, FILL_VALUE, FILL_VALUE]);
    }

    #[test]
    fn test_zero_wind() {
        let speed = compute_speed(&[0.0], &[0.0], DEFAULT_MISSING_SENTINEL).unwrap();
        assert_eq!(speed[0], 0.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = compute_speed(&[1.0, 2.0], &[1.0], DEFAULT_MISSING_SENTINEL).unwrap_err();
        assert!(matches!(
            err,
            GridStoreError::ComponentLengthMismatch { u_len: 2, v_len: 1 }
        ));
    }

    #[test]
    fn test_negative_components() {
        let speed = compute_speed(&[-3.0], &[-4.0], DEFAULT_MISSING_SENTINEL).unwrap();
        assert!((speed[0] - 5.0).abs() < 1e-6);
    }
}
