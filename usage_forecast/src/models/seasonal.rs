//! Additive trend + seasonality model for long horizons
//!
//! The trend is piecewise linear with changepoints spread over the first
//! `changepoint_range` of the history; their slope changes are shrunk towards
//! zero with a ridge penalty controlled by `changepoint_prior_scale`. Yearly,
//! weekly and daily Fourier terms can be switched on individually. Every
//! yearly total is treated as one observation dated January 1st.
//!
//! Time is scaled so the history spans `[0, 1]` and amounts are scaled by
//! their largest magnitude before fitting.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, Prediction, TrainedForecastModel};
use crate::params::SeasonalOptions;
use crate::series::YearlySeries;
use chrono::{Datelike, NaiveDate};
use statrs::distribution::{ContinuousCDF, Normal};
use trend_math::least_squares::{design_matrix, solve_ridge};
use trend_math::FourierSeries;

/// Upper bound on automatically placed changepoints
const MAX_CHANGEPOINTS: usize = 25;
/// Reference noise level (scaled units) relating prior scales to ridge penalties
const NOISE_SCALE: f64 = 0.05;
const TREND_PRIOR_SCALE: f64 = 5.0;
const SEASONALITY_PRIOR_SCALE: f64 = 10.0;

const YEARLY: (&str, f64, usize) = ("yearly", 365.25, 10);
const WEEKLY: (&str, f64, usize) = ("weekly", 7.0, 3);
const DAILY: (&str, f64, usize) = ("daily", 1.0, 4);

/// Additive trend+seasonality strategy
#[derive(Debug, Clone)]
pub struct AdditiveSeasonal {
    name: String,
    options: SeasonalOptions,
    /// Standard normal quantile for the configured interval width
    z_score: f64,
}

#[derive(Debug, Clone)]
struct Seasonality {
    name: &'static str,
    basis: FourierSeries,
}

/// Trained additive model
#[derive(Debug, Clone)]
pub struct TrainedAdditiveSeasonal {
    name: String,
    start_day: f64,
    span_days: f64,
    y_scale: f64,
    changepoints: Vec<f64>,
    seasonalities: Vec<Seasonality>,
    /// `[k, m, δ₁ … δₙ, seasonal betas …]` in scaled units
    coefficients: Vec<f64>,
    /// Residual standard deviation in original units
    sigma: f64,
    /// Mean absolute slope change per changepoint, scaled units
    mean_abs_delta: f64,
    z_score: f64,
}

impl AdditiveSeasonal {
    /// Create a new additive model from validated options
    pub fn new(options: SeasonalOptions) -> Result<Self> {
        options.validate()?;

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::NumericalError(e.to_string()))?;
        let z_score = normal.inverse_cdf(0.5 + options.interval_width / 2.0);

        Ok(Self {
            name: format!(
                "Additive Seasonal (interval_width={}, changepoint_prior_scale={})",
                options.interval_width, options.changepoint_prior_scale
            ),
            options,
            z_score,
        })
    }

    fn seasonalities(&self) -> Result<Vec<Seasonality>> {
        let enabled = [
            (self.options.yearly_seasonality, YEARLY),
            (self.options.weekly_seasonality, WEEKLY),
            (self.options.daily_seasonality, DAILY),
        ];

        enabled
            .into_iter()
            .filter(|(on, _)| *on)
            .map(|(_, (name, period, order))| -> Result<Seasonality> {
                Ok(Seasonality {
                    name,
                    basis: FourierSeries::new(period, order)?,
                })
            })
            .collect()
    }

    /// Changepoint positions (scaled time) over the first `changepoint_range` of the history
    fn changepoints(&self, t: &[f64]) -> Vec<f64> {
        let history = (t.len() as f64 * self.options.changepoint_range).floor() as usize;
        let count = MAX_CHANGEPOINTS.min(history.saturating_sub(1));
        if count == 0 {
            return Vec::new();
        }

        (1..=count)
            .map(|j| {
                let index = (j as f64 * (history - 1) as f64 / count as f64).round() as usize;
                t[index]
            })
            .collect()
    }
}

/// Day number of January 1st of `year`
fn day_number(year: i32) -> Result<f64> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|date| f64::from(date.num_days_from_ce()))
        .ok_or_else(|| ForecastError::DomainError(format!("year {} is out of range", year)))
}

fn feature_row(t: f64, day: f64, changepoints: &[f64], seasonalities: &[Seasonality]) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + changepoints.len());
    row.push(t);
    row.push(1.0);
    row.extend(changepoints.iter().map(|s| (t - s).max(0.0)));
    for seasonality in seasonalities {
        row.extend(seasonality.basis.features(day));
    }
    row
}

impl ForecastModel for AdditiveSeasonal {
    type Trained = TrainedAdditiveSeasonal;

    fn train(&self, series: &YearlySeries) -> Result<Self::Trained> {
        if series.len() < self.min_points() {
            return Err(ForecastError::DataError(format!(
                "{} needs at least {} yearly points, got {}",
                self.name,
                self.min_points(),
                series.len()
            )));
        }

        let days = series
            .years()
            .into_iter()
            .map(day_number)
            .collect::<Result<Vec<f64>>>()?;
        let start_day = days[0];
        let span_days = days[days.len() - 1] - start_day;
        let t: Vec<f64> = days.iter().map(|d| (d - start_day) / span_days).collect();

        let totals = series.totals();
        let largest = totals.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let y_scale = if largest > 0.0 { largest } else { 1.0 };
        let y: Vec<f64> = totals.iter().map(|v| v / y_scale).collect();

        let changepoints = self.changepoints(&t);
        let seasonalities = self.seasonalities()?;

        let rows: Vec<Vec<f64>> = t
            .iter()
            .zip(&days)
            .map(|(&ti, &day)| feature_row(ti, day, &changepoints, &seasonalities))
            .collect();
        let design = design_matrix(&rows)?;

        let trend_penalty = (NOISE_SCALE / TREND_PRIOR_SCALE).powi(2);
        let delta_penalty = (NOISE_SCALE / self.options.changepoint_prior_scale).powi(2);
        let seasonal_penalty = (NOISE_SCALE / SEASONALITY_PRIOR_SCALE).powi(2);
        let mut penalties = vec![trend_penalty, trend_penalty];
        penalties.extend(std::iter::repeat(delta_penalty).take(changepoints.len()));
        penalties.resize(design.ncols(), seasonal_penalty);

        let coefficients = solve_ridge(&design, &y, &penalties)?;

        let squared_residuals: f64 = rows
            .iter()
            .zip(&y)
            .map(|(row, yi)| {
                let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
                (yi - fitted).powi(2)
            })
            .sum();
        let sigma = (squared_residuals / y.len() as f64).sqrt() * y_scale;

        let deltas = &coefficients[2..2 + changepoints.len()];
        let mean_abs_delta = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64
        };

        Ok(TrainedAdditiveSeasonal {
            name: self.name.clone(),
            start_day,
            span_days,
            y_scale,
            changepoints,
            seasonalities,
            coefficients,
            sigma,
            mean_abs_delta,
            z_score: self.z_score,
        })
    }

    fn min_points(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedAdditiveSeasonal {
    /// Variance (original units) added by possible future trend changes at scaled time `t`
    ///
    /// Future changepoints arrive at the historical rate with Laplace
    /// distributed slope changes; their effect grows with the cube of the
    /// distance past the history.
    fn trend_variance(&self, t: f64) -> f64 {
        let ahead = (t - 1.0).max(0.0);
        let rate = self.changepoints.len() as f64;
        let laplace_variance = 2.0 * self.mean_abs_delta.powi(2);
        rate * laplace_variance * ahead.powi(3) / 3.0 * self.y_scale.powi(2)
    }

    /// Residual standard deviation of the fit, in original units
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl TrainedForecastModel for TrainedAdditiveSeasonal {
    fn evaluate(&self, year: i32) -> Result<Prediction> {
        let day = day_number(year)?;
        let t = (day - self.start_day) / self.span_days;
        let row = feature_row(t, day, &self.changepoints, &self.seasonalities);
        let value: f64 = row
            .iter()
            .zip(&self.coefficients)
            .map(|(x, b)| x * b)
            .sum::<f64>()
            * self.y_scale;

        let spread = (self.sigma.powi(2) + self.trend_variance(t)).sqrt();
        Ok(Prediction::with_interval(value, self.z_score * spread))
    }

    fn descriptor(&self) -> String {
        let seasonality = if self.seasonalities.is_empty() {
            "none".to_string()
        } else {
            self.seasonalities
                .iter()
                .map(|s| format!("{} (order {})", s.name, s.basis.order()))
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "piecewise linear trend k={:.6}, m={:.6} with {} changepoints; \
             seasonality: {}; amounts scaled by {}",
            self.coefficients[0],
            self.coefficients[1],
            self.changepoints.len(),
            seasonality,
            self.y_scale
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}
