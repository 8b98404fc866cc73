//! Linear value-to-pixel mapping
//!
//! Scales are rebuilt on every dataset change: domains come from a field
//! extent over the current record set, ranges from the plot geometry. No
//! state survives a load, which keeps the mapping a plain value type.

use serde::{Deserialize, Serialize};

/// Monotonic linear mapping from a data domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    /// Data-space endpoints (min, max)
    pub domain: (f32, f32),
    /// Pixel-space endpoints; may be inverted (e.g. y grows downward)
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Map a data value to its pixel position.
    ///
    /// A degenerate domain (min == max) maps every value to the range start,
    /// matching d3 v3, so single-point datasets still render.
    pub fn scale(&self, value: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Min/max of a field accessor over a record slice (`d3.extent` equivalent).
/// `None` on an empty slice.
pub fn extent<T, F>(items: &[T], accessor: F) -> Option<(f32, f32)>
where
    F: Fn(&T) -> f32,
{
    let mut iter = items.iter().map(accessor);
    let first = iter.next()?;
    let mut min = first;
    let mut max = first;
    for v in iter {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    Some((min, max))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_interpolates_linearly() {
        let x = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(x.scale(0.0), 0.0);
        assert_eq!(x.scale(5.0), 50.0);
        assert_eq!(x.scale(10.0), 100.0);
    }

    #[test]
    fn test_scale_supports_inverted_range() {
        // y axes put the max at the top of the canvas
        let y = LinearScale::new((0.0, 1.0), (185.0, 15.0));
        assert_eq!(y.scale(0.0), 185.0);
        assert_eq!(y.scale(1.0), 15.0);
        assert_eq!(y.scale(0.5), 100.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_range_start() {
        let x = LinearScale::new((4.0, 4.0), (15.0, 285.0));
        assert_eq!(x.scale(4.0), 15.0);
        assert_eq!(x.scale(100.0), 15.0);
    }

    #[test]
    fn test_values_outside_domain_extrapolate() {
        let x = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(x.scale(12.0), 120.0);
        assert_eq!(x.scale(-1.0), -10.0);
    }

    #[test]
    fn test_extent_finds_min_and_max() {
        let values = [3.0f32, -1.0, 7.5, 2.0];
        assert_eq!(extent(&values, |v| *v), Some((-1.0, 7.5)));
    }

    #[test]
    fn test_extent_of_empty_is_none() {
        let values: [f32; 0] = [];
        assert_eq!(extent(&values, |v| *v), None);
    }

    #[test]
    fn test_extent_of_single_value_is_degenerate() {
        let values = [4.0f32];
        assert_eq!(extent(&values, |v| *v), Some((4.0, 4.0)));
    }
}
