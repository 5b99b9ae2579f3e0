//! Print the latest PSI readings and two-hour forecast.
//!
//! Run with `RUST_LOG=datagovsg=debug cargo run --example realtime_readings`
//! to see cache and pagination events.
use datagovsg::{ClientConfig, DataGovSg, QueryArgs, Value};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = ClientConfig::from_env()?;
    info!("Using v2 API at {}", config.v2_api_url);
    let api = DataGovSg::new(config)?;
    let environment = api.environment();

    let psi = environment.psi(&QueryArgs::new())?;
    if let Some(item) = psi["items"].as_array().and_then(|items| items.last()) {
        println!("PSI at {}", describe(&item["updatedTimestamp"]));
        if let Some(readings) = item["readings"]["psi_twenty_four_hourly"].as_object() {
            for (region, value) in readings {
                println!("  {:<8} {}", region, describe(value));
            }
        }
    }

    let forecast = environment.two_hour_forecast(&QueryArgs::new())?;
    if let Some(item) = forecast["items"].as_array().and_then(|items| items.last()) {
        println!("Two-hour forecast, valid {}", describe(&item["valid_period"]["text"]));
        for area in item["forecasts"].as_array().into_iter().flatten().take(10) {
            println!(
                "  {:<24} {}",
                describe(&area["area"]),
                describe(&area["forecast"])
            );
        }
    }

    Ok(())
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M %Z").to_string(),
        Value::Date(d) => d.to_string(),
        Value::Null => "-".to_string(),
        other => format!("{other:?}"),
    }
}
