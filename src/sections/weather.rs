use std::io;

use super::Section;
use crate::config::TemperatureUnit;
use crate::fetch::weather::{Forecast, describe_wmo};
use crate::print::Printer;

pub struct WeatherSection {
    forecast: Result<Forecast, String>,
    unit: TemperatureUnit,
}

impl WeatherSection {
    pub fn new(forecast: Result<Forecast, String>, unit: TemperatureUnit) -> Self {
        Self { forecast, unit }
    }
}

impl Section for WeatherSection {
    fn print(&self, p: &mut dyn Printer) -> io::Result<()> {
        let forecast = match &self.forecast {
            Ok(f) => f,
            Err(e) => return p.text(&format!("Weather unavailable: {}", e)),
        };

        let Some(description) = describe_wmo(forecast.weather_code) else {
            return p.text(&format!("Unknown WMO code: {}", forecast.weather_code));
        };
        let symbol = self.unit.symbol();
        p.text(&format!(
            "{:.1}{}/{:.1}{} {}",
            forecast.temp_max, symbol, forecast.temp_min, symbol, description
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::testing::LinePrinter;

    fn render(section: WeatherSection) -> Vec<String> {
        let mut p = LinePrinter::default();
        section.print(&mut p).unwrap();
        p.lines
    }

    #[test]
    fn prints_forecast() {
        let forecast = Forecast {
            temp_max: 61.3,
            temp_min: 48.0,
            weather_code: 3,
        };
        assert_eq!(
            render(WeatherSection::new(Ok(forecast), TemperatureUnit::Fahrenheit)),
            ["61.3°F/48.0°F Overcast"]
        );
    }

    #[test]
    fn unknown_code_and_failure() {
        let forecast = Forecast {
            temp_max: 10.0,
            temp_min: 2.0,
            weather_code: 42,
        };
        assert_eq!(
            render(WeatherSection::new(Ok(forecast), TemperatureUnit::Celsius)),
            ["Unknown WMO code: 42"]
        );
        assert_eq!(
            render(WeatherSection::new(Err("timed out".into()), TemperatureUnit::Celsius)),
            ["Weather unavailable: timed out"]
        );
    }
}
