//! Trail length as a function of the reveal threshold.
//!
//! Short thresholds reveal densely, so more images fit on screen at once;
//! long thresholds keep only a short tail.

/// Maximum number of revealed images kept for `threshold` (px).
pub fn max_revealed(threshold: u32) -> usize {
    match threshold {
        0..=20 => 15,
        21..=40 => 10,
        41..=80 => 6,
        81..=140 => 4,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_boundaries() {
        assert_eq!(max_revealed(1), 15);
        assert_eq!(max_revealed(20), 15);
        assert_eq!(max_revealed(21), 10);
        assert_eq!(max_revealed(40), 10);
        assert_eq!(max_revealed(41), 6);
        assert_eq!(max_revealed(80), 6);
        assert_eq!(max_revealed(81), 4);
        assert_eq!(max_revealed(140), 4);
        assert_eq!(max_revealed(141), 3);
        assert_eq!(max_revealed(200), 3);
        assert_eq!(max_revealed(u32::MAX), 3);
    }
}
