//! The forecasting pipeline shared by every algorithm
//!
//! Records are grouped and summed per year, each group's series is fitted by
//! the pipeline's model, evaluated over its [`Horizon`], scored on the
//! reference segment, and the per-group results are merged into one
//! [`OutputDocument`].

use crate::algorithms::Algorithm;
use crate::data::UsageRecord;
use crate::error::{ForecastError, Result};
use crate::horizon::Horizon;
use crate::metrics::fit_score;
use crate::models::{
    AdditiveSeasonal, ForecastModel, ForecastResult, LogarithmicTrend, PolynomialTrend,
    TrainedForecastModel,
};
use crate::output::{ForecastPoint, GroupResult, HistoricalPoint, OutputDocument};
use crate::params::ForecastParameters;
use crate::series::{aggregate_by_year, GroupBy, YearlySeries};
use tracing::{debug, info};

/// A fitting strategy together with the run-wide settings
#[derive(Debug, Clone)]
pub struct ForecastPipeline<M: ForecastModel> {
    model: M,
    group_by: GroupBy,
    size: usize,
}

impl<M: ForecastModel> ForecastPipeline<M> {
    pub fn new(model: M, group_by: GroupBy, size: usize) -> Self {
        Self {
            model,
            group_by,
            size,
        }
    }

    /// Forecast every group found in `records`
    pub fn run(&self, records: &[UsageRecord]) -> Result<OutputDocument> {
        let groups = aggregate_by_year(records, self.group_by)?;
        info!(
            model = self.model.name(),
            records = records.len(),
            groups = groups.len(),
            group_by = self.group_by.as_str(),
            "running forecast"
        );

        let results = self.forecast_groups(&groups)?;
        Ok(OutputDocument::assemble(results))
    }

    /// Forecast each series in label order; the first failure aborts the run
    pub fn forecast_groups<'a, I>(&self, groups: I) -> Result<Vec<GroupResult>>
    where
        I: IntoIterator<Item = (&'a String, &'a YearlySeries)>,
    {
        groups
            .into_iter()
            .map(|(label, series)| {
                self.forecast_group(label, series)
                    .map_err(|err| err.in_group(label))
            })
            .collect()
    }

    /// Fit, project and score one group
    pub fn forecast_group(&self, label: &str, series: &YearlySeries) -> Result<GroupResult> {
        let required = self.model.min_points();
        if series.len() < required {
            return Err(ForecastError::InsufficientData {
                group: label.to_string(),
                required,
                actual: series.len(),
            });
        }

        let trained = self.model.train(series)?;
        let horizon = Horizon::build(series, self.size)?;
        let predictions = trained.predict(horizon.years())?;

        let reference = ForecastResult::new(
            horizon.reference().to_vec(),
            predictions.predictions()[..series.len()].to_vec(),
        )?;
        let fit_score = fit_score(series, &reference)?;

        let forecast_points: Vec<ForecastPoint> = horizon
            .forecast()
            .map(|(index, year)| {
                let prediction = predictions.predictions()[index];
                ForecastPoint {
                    year,
                    amount: prediction.value,
                    lower: prediction.lower,
                    upper: prediction.upper,
                }
            })
            .collect();

        debug!(
            group = label,
            points = series.len(),
            forecasts = forecast_points.len(),
            fit_score = ?fit_score,
            "forecasted group"
        );

        Ok(GroupResult {
            label: label.to_string(),
            historical_points: series
                .points()
                .iter()
                .map(|&(year, amount)| HistoricalPoint { year, amount })
                .collect(),
            forecast_points,
            fit_score,
            last_historical_year: series.last_year(),
            curve_descriptor: trained.descriptor(),
        })
    }
}

/// Run `algorithm` over `records` with already-resolved parameters
pub fn run_algorithm(
    algorithm: Algorithm,
    parameters: &ForecastParameters,
    records: &[UsageRecord],
) -> Result<OutputDocument> {
    parameters.validate()?;
    debug!(algorithm = algorithm.identifier(), ?parameters, "resolved parameters");

    let group_by = parameters.group_by;
    let size = parameters.size;

    match algorithm {
        Algorithm::Linear | Algorithm::Cubic => {
            let model = PolynomialTrend::new(parameters.degree)?;
            ForecastPipeline::new(model, group_by, size).run(records)
        }
        Algorithm::Logarithmic => {
            ForecastPipeline::new(LogarithmicTrend::new(), group_by, size).run(records)
        }
        Algorithm::Prophet => {
            let model = AdditiveSeasonal::new(parameters.seasonal)?;
            ForecastPipeline::new(model, group_by, size).run(records)
        }
    }
}
