pub mod fire_science;
pub mod forecast;
pub mod nws;
pub mod timeseries;
pub mod windows;
