mod actuator;
mod current_conditions;
mod forecast;
mod weather_sample;

pub use actuator::ActuatorState;
pub use current_conditions::CurrentConditions;
pub use forecast::ForecastCollection;
pub use weather_sample::WeatherSample;
