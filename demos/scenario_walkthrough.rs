// Walks through forecasting, scenarios and manual adjustment on a synthetic history.
//
// Run with `RUST_LOG=debug cargo run --example scenario_walkthrough` for engine logs.
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tour_forecast::forecast::sample_history;
use tour_forecast::{ForecastEngine, ModelKind, ScenarioParameters};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "scenario_forecast=info".into()),
        )
        .init();

    println!("Tour revenue forecasting walkthrough\n");

    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let history = sample_history(&mut StdRng::seed_from_u64(2023), start, 24)?;
    let mut engine = ForecastEngine::with_seed(2023);

    println!("=== Models ===");
    for kind in ModelKind::ALL {
        let forecast = engine.generate_forecast(&history, kind, 12)?;
        println!(
            "{:<15} final {:>10.0}  confidence {:.2}  growth {:+.1}%",
            kind.to_string(),
            forecast.final_value().unwrap_or(0.0),
            forecast.confidence,
            forecast.metrics.growth_rate
        );
    }

    println!("\n=== Scenarios ===");
    engine.update_all_scenarios(&history)?;
    for summary in engine.scenario_comparison() {
        println!(
            "{:<22} growth {:+6.0}%  final {:>10.0}  confidence {:.2}",
            summary.name, summary.growth_percent, summary.final_value, summary.confidence
        );
    }

    println!("\n=== Manual adjustment ===");
    let manual = engine.apply_manual_adjustment(ScenarioParameters::new(1.2, 0.8, 0.5)?)?;
    engine.update_scenario(&manual.id, &history)?;
    let current = engine.current_forecast(&history)?;
    println!("{}", current.metrics);

    let target = current.values[2] * 1.25;
    let (adjusted, warning) = engine.adjust_forecast(&current, &history, 2, target)?;
    if let Some(warning) = warning {
        println!("warning: {:?}", warning);
    }
    for (period, (before, after)) in current.values.iter().zip(&adjusted.values).enumerate() {
        println!("period {:>2}: {:>10.0} -> {:>10.0}", period + 1, before, after);
    }

    let band = adjusted.confidence_band(&history);
    println!("\nconfidence band half width: {:.0}", band.half_width);

    Ok(())
}
