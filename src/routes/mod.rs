pub mod burn_windows;
pub mod forecasts;
pub mod health;
