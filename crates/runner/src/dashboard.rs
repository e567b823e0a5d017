//! Presentation model
//!
//! Pure functions and small state holders behind the dashboard screen:
//! icon selection, the paged view over the most recent forecast samples and
//! a plain-text rendering of the whole view.

use skywatch_core::{CurrentConditions, ForecastCollection, WeatherCategory, WeatherSample};

/// Icon shown next to the current conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Rainy,
    HeavyRain,
    Cloudy,
    Sunny,
    Overcast,
    Drizzle,
}

impl Icon {
    /// Drawable resource name
    pub fn resource_name(&self) -> &'static str {
        match self {
            Icon::Rainy => "ic_rainy",
            Icon::HeavyRain => "ic_heavyrain",
            Icon::Cloudy => "ic_cloudly",
            Icon::Sunny => "ic_sunny",
            Icon::Overcast => "ic_overcast",
            Icon::Drizzle => "drizzle",
        }
    }
}

/// Icon for a category label; unrecognised labels get the sunny icon
pub fn icon_for(category: &str) -> Icon {
    match WeatherCategory::from_label(category) {
        WeatherCategory::LightRain => Icon::Rainy,
        WeatherCategory::HeavyRain => Icon::HeavyRain,
        WeatherCategory::Cloudy => Icon::Cloudy,
        WeatherCategory::Sunny => Icon::Sunny,
        WeatherCategory::Overcast => Icon::Overcast,
        WeatherCategory::Drizzle => Icon::Drizzle,
        WeatherCategory::Other(_) => Icon::Sunny,
    }
}

/// The last `limit` samples, most recent first
pub fn forecast_pages(collection: &ForecastCollection, limit: usize) -> Vec<WeatherSample> {
    collection.latest(limit).into_iter().cloned().collect()
}

/// Index into the forecast pages, kept within `[0, page_count - 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForecastPager {
    page: usize,
    page_count: usize,
}

impl ForecastPager {
    pub fn new(page_count: usize) -> Self {
        Self {
            page: 0,
            page_count,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn next(&mut self) -> usize {
        self.page = (self.page + 1).min(self.last_page());
        self.page
    }

    pub fn previous(&mut self) -> usize {
        self.page = self.page.saturating_sub(1);
        self.page
    }

    /// Adopt a new page count, pulling the index back in range
    pub fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
        self.page = self.page.min(self.last_page());
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        self.page == self.last_page()
    }

    fn last_page(&self) -> usize {
        self.page_count.saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

pub fn temperature_label(temperature: f64) -> String {
    format!("{:.1}°C", temperature)
}

pub fn date_label(timestamp: &str) -> String {
    format!("Date: {}", timestamp)
}

fn detail_rows(sample: &WeatherSample, with_temperature: bool) -> Vec<DetailRow> {
    let mut rows = vec![
        DetailRow {
            label: "Humidity",
            value: format!("{}%", sample.humidity),
        },
        DetailRow {
            label: "Light",
            value: if sample.light { "Yes" } else { "No" }.to_string(),
        },
        DetailRow {
            label: "Rainfall",
            value: sample.rainfall.to_string(),
        },
    ];
    if with_temperature {
        rows.push(DetailRow {
            label: "Temperature",
            value: temperature_label(sample.temperature),
        });
    }
    rows
}

/// Everything the dashboard screen shows
#[derive(Debug, Clone)]
pub struct DashboardView {
    power_on: bool,
    current: CurrentConditions,
    pages: Vec<WeatherSample>,
    pager: ForecastPager,
    page_limit: usize,
}

impl DashboardView {
    pub fn new(page_limit: usize) -> Self {
        Self {
            power_on: false,
            current: CurrentConditions::default(),
            pages: Vec::new(),
            pager: ForecastPager::default(),
            page_limit,
        }
    }

    pub fn set_power(&mut self, on: bool) {
        self.power_on = on;
    }

    pub fn power_on(&self) -> bool {
        self.power_on
    }

    pub fn set_current(&mut self, current: CurrentConditions) {
        self.current = current;
    }

    pub fn set_forecast(&mut self, collection: &ForecastCollection) {
        self.pages = forecast_pages(collection, self.page_limit);
        self.pager.set_page_count(self.pages.len());
    }

    pub fn pages(&self) -> &[WeatherSample] {
        &self.pages
    }

    pub fn pager(&self) -> &ForecastPager {
        &self.pager
    }

    pub fn next_page(&mut self) -> usize {
        self.pager.next()
    }

    pub fn previous_page(&mut self) -> usize {
        self.pager.previous()
    }

    pub fn icon(&self) -> Icon {
        icon_for(&self.current.weather_category)
    }

    /// Text rendering, one line per visual row
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Power: {}", if self.power_on { "ON" } else { "OFF" }),
            format!(
                "{}  {} [{}]",
                temperature_label(self.current.temperature),
                WeatherCategory::from_label(&self.current.weather_category).display_name(),
                self.icon().resource_name()
            ),
            date_label(&self.current.timestamp),
        ];
        lines.extend(
            detail_rows(&self.current.sample(), false)
                .into_iter()
                .map(|row| format!("  {}: {}", row.label, row.value)),
        );

        match self.pages.get(self.pager.page()) {
            Some(sample) => {
                lines.push(format!(
                    "Forecast {}/{}  {}",
                    self.pager.page() + 1,
                    self.pages.len(),
                    date_label(&sample.timestamp)
                ));
                lines.extend(
                    detail_rows(sample, true)
                        .into_iter()
                        .map(|row| format!("  {}: {}", row.label, row.value)),
                );
            }
            None => lines.push("Forecast: no data".to_string()),
        }
        lines
    }
}
