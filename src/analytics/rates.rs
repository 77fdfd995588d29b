//! Whole-number percentages shown on coverage and compliance views

/// `round(part / whole * 100)` clamped to `[0, 100]`; zero when `whole` is zero.
/// Halves round up.
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    // floor(part * 100 / whole + 1/2) without floating point
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// Whole percentage from a backend-reported value, halves away from zero,
/// clamped to `[0, 100]`. Non-finite input reads as zero.
pub fn round_pct(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

/// Share of assigned shops visited in the window
pub fn coverage_pct(shops_visited: u32, total_assigned: u32) -> u32 {
    percent(shops_visited, total_assigned)
}

/// Share of visits that raised a geofence exception
pub fn exception_rate(exception_count: u32, total_visits: u32) -> u32 {
    percent(exception_count, total_visits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_rate_example() {
        assert_eq!(exception_rate(3, 12), 25);
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(coverage_pct(0, 0), 0);
        assert_eq!(coverage_pct(5, 0), 0);
        assert_eq!(exception_rate(0, 0), 0);
    }

    #[test]
    fn test_rounding_halves_up() {
        assert_eq!(percent(1, 8), 13); // 12.5
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 200), 1); // 0.5
        assert_eq!(percent(1, 201), 0);
    }

    #[test]
    fn test_reported_fractional_rates() {
        assert_eq!(round_pct(12.5), 13);
        assert_eq!(round_pct(12.4), 12);
        assert_eq!(round_pct(-3.0), 0);
        assert_eq!(round_pct(140.2), 100);
        assert_eq!(round_pct(f64::NAN), 0);
    }

    #[test]
    fn test_coverage_stays_in_range() {
        for total in 0..40u32 {
            for visited in 0..60u32 {
                let pct = coverage_pct(visited, total);
                assert!(pct <= 100, "{}/{} gave {}", visited, total, pct);
            }
        }
        assert_eq!(coverage_pct(12, 10), 100);
        assert_eq!(coverage_pct(u32::MAX, u32::MAX), 100);
    }
}
