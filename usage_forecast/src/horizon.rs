//! Evaluation years spanning the history and the forecast

use crate::error::{ForecastError, Result};
use crate::series::YearlySeries;

/// Evenly spaced evaluation years from the first observation to
/// `last observation + size`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Horizon {
    years: Vec<i32>,
    reference_len: usize,
    last_observed: i32,
}

impl Horizon {
    /// Build the horizon for a series and a forecast size in years
    ///
    /// Produces `series.len() + size` strictly increasing years, the
    /// integer truncation of an even spacing between the end points.
    /// Fails when the last year would not fit in an `i32`.
    pub fn build(series: &YearlySeries, size: usize) -> Result<Self> {
        let out_of_range = || {
            ForecastError::InvalidParameter(format!(
                "size {} extends the horizon of a series ending in {} past year {}",
                size,
                series.last_year(),
                i32::MAX
            ))
        };
        let stop = i32::try_from(size)
            .ok()
            .and_then(|size| series.last_year().checked_add(size))
            .ok_or_else(out_of_range)?;
        let count = series.len().checked_add(size).ok_or_else(out_of_range)?;

        let years = if count == 1 {
            vec![series.first_year()]
        } else {
            let first = i128::from(series.first_year());
            let span = i128::from(stop) - first;
            let steps = (count - 1) as i128;
            // Every value lies in [first, stop], so the narrowing is exact
            (0..count as i128)
                .map(|i| (first + (i * span).div_euclid(steps)) as i32)
                .collect()
        };

        Ok(Self {
            years,
            reference_len: series.len(),
            last_observed: series.last_year(),
        })
    }

    /// All evaluation years
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Years used to score the fit against the observations
    pub fn reference(&self) -> &[i32] {
        &self.years[..self.reference_len]
    }

    /// Positions and years strictly after the last observation
    ///
    /// A constructed year equal to the last observed year is never part of
    /// the forecast.
    pub fn forecast(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        let last_observed = self.last_observed;
        self.years
            .iter()
            .copied()
            .enumerate()
            .skip(self.reference_len)
            .filter(move |(_, year)| *year > last_observed)
    }

    pub fn last_observed(&self) -> i32 {
        self.last_observed
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn series(years: &[i32]) -> YearlySeries {
        YearlySeries::new(years.iter().map(|&y| (y, 1.0)).collect()).unwrap()
    }

    #[test]
    fn test_contiguous_history() {
        let horizon = Horizon::build(&series(&[2020, 2021, 2022]), 2).unwrap();

        assert_eq!(horizon.years(), &[2020, 2021, 2022, 2023, 2024]);
        assert_eq!(horizon.reference(), &[2020, 2021, 2022]);
        let forecast: Vec<i32> = horizon.forecast().map(|(_, year)| year).collect();
        assert_eq!(forecast, vec![2023, 2024]);
    }

    #[rstest]
    #[case(&[2020], 0)]
    #[case(&[2020], 5)]
    #[case(&[2001, 2002, 2003, 2004], 30)]
    #[case(&[2010, 2015, 2020], 2)]
    #[case(&[1990, 1991, 2020], 1)]
    fn test_cardinality_and_order(#[case] years: &[i32], #[case] size: usize) {
        let history = series(years);
        let horizon = Horizon::build(&history, size).unwrap();

        assert_eq!(horizon.len(), years.len() + size);
        assert_eq!(horizon.years()[0], years[0]);
        assert_eq!(*horizon.years().last().unwrap(), history.last_year() + size as i32);
        assert!(horizon.years().windows(2).all(|w| w[0] < w[1]));
        assert!(horizon.forecast().all(|(_, year)| year > history.last_year()));
    }

    #[test]
    fn test_gapped_history_drops_boundary_years() {
        // linspace(2010, 2022, 5) -> 2010, 2013, 2016, 2019, 2022
        let horizon = Horizon::build(&series(&[2010, 2015, 2020]), 2).unwrap();

        assert_eq!(horizon.years(), &[2010, 2013, 2016, 2019, 2022]);
        let forecast: Vec<(usize, i32)> = horizon.forecast().collect();
        assert_eq!(forecast, vec![(4, 2022)]);
        assert_eq!(horizon.last_observed(), 2020);
    }

    #[rstest]
    #[case(&[2020], usize::MAX)]
    #[case(&[2020], i32::MAX as usize)]
    #[case(&[i32::MAX - 2, i32::MAX - 1], 5)]
    fn test_out_of_range_size_is_rejected(#[case] years: &[i32], #[case] size: usize) {
        assert!(matches!(
            Horizon::build(&series(years), size),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_horizon_may_end_at_last_representable_year() {
        let horizon = Horizon::build(&series(&[i32::MAX - 3]), 3).unwrap();
        assert_eq!(horizon.years().last(), Some(&i32::MAX));
    }
}
