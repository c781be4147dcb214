use chrono::NaiveDate;
use usage_forecast::metrics::evaluate_fit;
use usage_forecast::models::{
    ForecastModel, LogarithmicTrend, PolynomialTrend, TrainedForecastModel,
};
use usage_forecast::{aggregate_by_year, run_algorithm, Algorithm, GroupBy, UsageRecord};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Usage Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    println!("Creating sample data...");
    let records = create_sample_records()?;
    let groups = aggregate_by_year(&records, GroupBy::Municipal)?;
    println!(
        "Sample data created: {} records in {} municipalities\n",
        records.len(),
        groups.len()
    );

    // Compare the deterministic strategies on each group
    println!("Fitting trends...");
    let linear = PolynomialTrend::new(1)?;
    let cubic = PolynomialTrend::new(3)?;
    let logarithmic = LogarithmicTrend::new();

    for (label, series) in &groups {
        println!("\nMunicipality {} ({} years):", label, series.len());

        let trained = linear.train(series)?;
        let fit = evaluate_fit(&trained, series)?;
        println!("  {}: {}", linear.name(), trained.descriptor());
        println!("    R² = {:.4}, RMSE = {:.2}", fit.r_squared.unwrap_or(f64::NAN), fit.rmse);

        let trained = cubic.train(series)?;
        let fit = evaluate_fit(&trained, series)?;
        println!("  {}: R² = {:.4}", cubic.name(), fit.r_squared.unwrap_or(f64::NAN));

        let trained = logarithmic.train(series)?;
        let next_year = series.last_year() + 1;
        println!(
            "  {}: {:.2} expected in {}",
            logarithmic.name(),
            trained.evaluate(next_year)?.value,
            next_year
        );
    }

    // Full pipeline with intervals
    println!("\nRunning the additive seasonal pipeline...");
    let mut parameters = Algorithm::Prophet.default_parameters();
    parameters.size = 5;
    let document = run_algorithm(Algorithm::Prophet, &parameters, &records)?;

    for point in document.data.iter().filter(|point| point.uncertainty.is_some()) {
        if let Some([lower, upper]) = point.uncertainty {
            println!(
                "  {} {}: {:.1} ({:.1} - {:.1})",
                point.label, point.x, point.y, lower, upper
            );
        }
    }

    println!("\nForecasting complete!");
    Ok(())
}

/// Monthly readings for two municipalities over twelve years
fn create_sample_records() -> Result<Vec<UsageRecord>, Box<dyn std::error::Error>> {
    let mut records = Vec::new();

    for year in 2010..2022 {
        for month in 1..=12 {
            let date = NaiveDate::from_ymd_opt(year, month, 15)
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .ok_or("invalid sample date")?;
            let offset = f64::from(year - 2010);
            let winter = if month <= 2 || month == 12 { 15.0 } else { 0.0 };

            records.push(UsageRecord::new(
                "100",
                "household",
                date,
                80.0 + 2.5 * offset + winter,
            ));
            records.push(UsageRecord::new(
                "0301",
                "industry",
                date,
                150.0 + 40.0 * (offset + 1.0).ln(),
            ));
        }
    }

    Ok(records)
}
