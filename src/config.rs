/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// User-Agent sent to api.weather.gov (the NWS API requires one).
    pub nws_user_agent: String,
    pub port: u16,
    /// Forecast horizon in hours.
    pub forecast_hours: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            nws_user_agent: std::env::var("NWS_USER_AGENT").unwrap_or_else(|_| {
                "BurnWx/0.1 github.com/burnwx/burnwx-api".to_string()
            }),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            forecast_hours: std::env::var("FORECAST_HOURS")
                .unwrap_or_else(|_| "72".to_string())
                .parse()
                .expect("FORECAST_HOURS must be a valid integer"),
        }
    }
}
