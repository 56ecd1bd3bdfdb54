use anyhow::Result;

use skycast_core::{App, Config};
use skycast_store::TemperatureUnit;
use skycast_weather::format::{format_location_name, format_temperature, wind_direction};
use skycast_weather::WeatherData;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skycast_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", e.user_message());
            eprintln!("Set api_key in the config file or SKYCAST_API_KEY in the environment.");
            std::process::exit(1);
        }
    };
    app.initialize();

    tracing::info!("SkyCast application started");

    match app.fetch_default_weather().await {
        Ok(data) => {
            let unit = app.store().preferences().temperature_unit;
            print_report(&data, unit);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn print_report(data: &WeatherData, unit: TemperatureUnit) {
    let location = &data.location;
    println!(
        "{}",
        format_location_name(
            &location.name,
            location.state.as_deref(),
            Some(&location.country),
        )
    );

    let current = &data.current;
    println!(
        "  {}  (feels like {}), {}",
        format_temperature(current.temp, unit),
        format_temperature(current.feels_like, unit),
        current.condition.description,
    );
    println!(
        "  humidity {}%, wind {:.1} m/s {}, pressure {} hPa",
        current.humidity,
        current.wind_speed,
        wind_direction(current.wind_direction),
        current.pressure,
    );

    println!();
    for day in &data.daily {
        println!(
            "  {}  {} / {}  {}",
            day.date,
            format_temperature(day.temp_min, unit),
            format_temperature(day.temp_max, unit),
            day.summary,
        );
    }
}
