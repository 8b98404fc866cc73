//! Time-axis synchronization
//!
//! The time axis shares the canvas with the scatter and re-derives on every
//! dataset change. Its domain is the corpus bookend years unioned with the
//! publication years of the currently visible similar documents, and its
//! tick values are exactly that set, never algorithmic, because year ticks
//! must align with plotted year points.

use std::collections::BTreeSet;

use crate::dataset::{DocId, Year};
use crate::plot::config::PlotConfig;
use crate::scale::{explicit_ticks, LinearScale, Tick, TickFormat};

/// Scale and tick set for the time axis of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub scale: LinearScale,
    pub ticks: Vec<Tick>,
}

/// Union the bookends with the visible years: sorted ascending, deduplicated
pub fn tick_years(bookends: Option<(Year, Year)>, visible: &[(DocId, Year)]) -> Vec<Year> {
    let mut years: BTreeSet<Year> = BTreeSet::new();
    if let Some((y0, y1)) = bookends {
        years.insert(y0);
        years.insert(y1);
    }
    for (_, year) in visible {
        years.insert(*year);
    }
    years.into_iter().collect()
}

/// Build the time axis for the current frame; `None` when no year is known
pub fn build_time_axis(
    bookends: Option<(Year, Year)>,
    visible: &[(DocId, Year)],
    config: &PlotConfig,
) -> Option<TimeAxis> {
    let years = tick_years(bookends, visible);
    let first = *years.first()?;
    let last = *years.last()?;

    let scale = LinearScale::new((first as f32, last as f32), config.x_range());
    let values: Vec<f32> = years.iter().map(|&y| y as f32).collect();
    let ticks = explicit_ticks(&scale, &values, TickFormat::Year);

    Some(TimeAxis { scale, ticks })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_years_unions_sorts_and_dedups() {
        let visible = vec![(2, 1710), (3, 1725), (4, 1700)];
        let years = tick_years(Some((1700, 1731)), &visible);
        assert_eq!(years, vec![1700, 1710, 1725, 1731]);
    }

    #[test]
    fn test_tick_years_without_bookends() {
        let visible = vec![(2, 1710), (3, 1705)];
        assert_eq!(tick_years(None, &visible), vec![1705, 1710]);
    }

    #[test]
    fn test_axis_ticks_are_exactly_the_year_set() {
        let config = PlotConfig::default();
        let axis = build_time_axis(Some((1700, 1731)), &[(2, 1710)], &config).unwrap();

        let values: Vec<f32> = axis.ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![1700.0, 1710.0, 1731.0]);
        assert_eq!(axis.ticks[0].label, Some("1700".to_string()));
    }

    #[test]
    fn test_axis_domain_spans_bookends() {
        let config = PlotConfig::default();
        let axis = build_time_axis(Some((1700, 1731)), &[(2, 1710)], &config).unwrap();

        assert_eq!(axis.scale.domain, (1700.0, 1731.0));
        assert_eq!(axis.scale.range, config.x_range());
    }

    #[test]
    fn test_no_years_no_axis() {
        let config = PlotConfig::default();
        assert!(build_time_axis(None, &[], &config).is_none());
    }

    #[test]
    fn test_single_year_degenerates_to_range_start() {
        let config = PlotConfig::default();
        let axis = build_time_axis(None, &[(2, 1710)], &config).unwrap();

        assert_eq!(axis.ticks.len(), 1);
        assert_eq!(axis.ticks[0].position, config.x_range().0);
    }
}
