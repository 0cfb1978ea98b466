use crate::types::DmdError;

/// Select a truncation rank from a singular-value spectrum.
///
/// Each singular value contributes `100 · sᵢ / Σs` percent of the total
/// energy. The spectrum is scanned in its given (descending) order and the
/// smallest zero-based index whose cumulative energy reaches `threshold`
/// is returned.
///
/// Convention: the returned index is interpreted by the engine as the
/// *count* of retained singular values. A threshold already satisfied by
/// the first singular value alone therefore yields 0, which the engine
/// rejects as [`DmdError::DegenerateRank`]; callers wanting the dominant
/// mode alone should raise the threshold past its relative energy.
///
/// The spectrum is assumed non-negative with a positive sum; identically
/// zero spectra are rejected upstream. If accumulated energy never reaches
/// the threshold (floating-point shortfall at `threshold = 100`), the full
/// spectrum length is returned.
///
/// # Errors
/// [`DmdError::InvalidThreshold`] if `threshold` is outside (0, 100].
pub fn select_rank(s: &[f64], threshold: f64) -> Result<usize, DmdError> {
    if threshold <= 0.0 {
        return Err(DmdError::InvalidThreshold(format!(
            "threshold must be positive, got {threshold}"
        )));
    }
    if threshold > 100.0 {
        return Err(DmdError::InvalidThreshold(format!(
            "threshold must be less than or equal to 100, got {threshold}"
        )));
    }

    let total: f64 = s.iter().sum();
    let mut cumulative = 0.0;
    for (i, &sv) in s.iter().enumerate() {
        cumulative += 100.0 * sv / total;
        if cumulative >= threshold {
            return Ok(i);
        }
    }

    Ok(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_rank_reference_spectrum() {
        let s = [5.0, 3.0, 2.0, 1.0];
        assert_eq!(select_rank(&s, 99.0).unwrap(), 3);
        assert_eq!(select_rank(&s, 80.0).unwrap(), 2);
        assert_eq!(select_rank(&s, 60.0).unwrap(), 1);
    }

    #[test]
    fn test_select_rank_first_value_satisfies() {
        // 5/11 ≈ 45.5% of the energy sits in the leading value.
        let s = [5.0, 3.0, 2.0, 1.0];
        assert_eq!(select_rank(&s, 40.0).unwrap(), 0);
    }

    #[test]
    fn test_select_rank_threshold_not_positive() {
        let s = [5.0, 3.0, 2.0, 1.0];
        let err = select_rank(&s, -3.0).unwrap_err();
        match err {
            DmdError::InvalidThreshold(msg) => assert!(msg.contains("positive")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            select_rank(&s, 0.0),
            Err(DmdError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_select_rank_threshold_above_100() {
        let s = [5.0, 3.0, 2.0, 1.0];
        let err = select_rank(&s, 200.0).unwrap_err();
        match err {
            DmdError::InvalidThreshold(msg) => assert!(msg.contains("100")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_select_rank_monotone_in_threshold() {
        let s = [10.0, 4.0, 2.0, 1.0, 0.5, 0.25];
        let mut previous = 0;
        for thr in [10.0, 30.0, 55.0, 70.0, 85.0, 95.0, 99.0, 100.0] {
            let idx = select_rank(&s, thr).unwrap();
            assert!(
                idx >= previous,
                "index decreased from {previous} to {idx} at threshold {thr}"
            );
            previous = idx;
        }
    }

    #[test]
    fn test_select_rank_single_value() {
        let s = [7.5];
        assert_eq!(select_rank(&s, 50.0).unwrap(), 0);
        assert_eq!(select_rank(&s, 100.0).unwrap(), 0);
    }
}
