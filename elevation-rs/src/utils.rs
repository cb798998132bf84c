use crate::errors::FilterError;

/// `atan2(y, x)` in degrees.
pub(crate) fn atan2_deg(y: f32, x: f32) -> f32 {
    y.atan2(x).to_degrees()
}

pub(crate) fn check_alpha(alpha: f32) -> Result<f32, FilterError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(FilterError::InvalidAlpha(alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atan2_deg_quadrants() {
        assert!((atan2_deg(1.0, 1.0) - 45.0).abs() < 1e-5);
        assert!((atan2_deg(-1.0, 1.0) + 45.0).abs() < 1e-5);
        assert!((atan2_deg(1.0, 0.0) - 90.0).abs() < 1e-5);
        assert_eq!(atan2_deg(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_check_alpha_bounds() {
        assert_eq!(check_alpha(0.5), Ok(0.5));
        assert_eq!(check_alpha(0.0), Err(FilterError::InvalidAlpha(0.0)));
        assert_eq!(check_alpha(1.0), Err(FilterError::InvalidAlpha(1.0)));
        assert!(check_alpha(f32::NAN).is_err());
    }
}
