mod category;
pub(crate) mod lenient;

pub use category::{WeatherCategory, display_name};

/// Number of forecast entries a dashboard shows
pub const FORECAST_PAGE_LIMIT: usize = 5;
