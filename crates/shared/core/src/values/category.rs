use std::fmt;

/// Weather category reported alongside the current conditions
///
/// Labels are matched case-insensitively; anything unrecognised is kept
/// verbatim in [`WeatherCategory::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
    LightRain,
    HeavyRain,
    Cloudy,
    Sunny,
    Overcast,
    Drizzle,
    Other(String),
}

impl WeatherCategory {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "light_rain" => WeatherCategory::LightRain,
            "heavy_rain" => WeatherCategory::HeavyRain,
            "cloudy" => WeatherCategory::Cloudy,
            "sunny" => WeatherCategory::Sunny,
            "overcast" => WeatherCategory::Overcast,
            "drizzle" => WeatherCategory::Drizzle,
            _ => WeatherCategory::Other(label.to_string()),
        }
    }

    /// Canonical remote label
    pub fn label(&self) -> &str {
        match self {
            WeatherCategory::LightRain => "light_rain",
            WeatherCategory::HeavyRain => "heavy_rain",
            WeatherCategory::Cloudy => "cloudy",
            WeatherCategory::Sunny => "sunny",
            WeatherCategory::Overcast => "overcast",
            WeatherCategory::Drizzle => "drizzle",
            WeatherCategory::Other(label) => label,
        }
    }

    /// Human readable title: `light_rain` becomes `Light Rain`
    pub fn display_name(&self) -> String {
        display_name(self.label())
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Split on `_`, upper-case the first letter of each word, join with spaces
pub fn display_name(label: &str) -> String {
    label
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
