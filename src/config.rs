use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub ipdata_api_key: String,
    pub ipdata_base_url: String,
    pub weatherapi_api_key: String,
    pub weatherapi_base_url: String,
    pub weatherapi_forecast_path: String,
    pub allowed_origin: String,
    pub cache_ttl_secs: u64,
    pub cache_max_capacity: u64,
    pub upstream_timeout_secs: u64,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            ipdata_api_key: env::var("IPDATA_API_KEY")
                .map_err(|_| anyhow::anyhow!("IPDATA_API_KEY not set"))?,
            ipdata_base_url: env::var("IPDATA_BASE_URL")
                .unwrap_or_else(|_| "https://api.ipdata.co".to_string()),
            weatherapi_api_key: env::var("WEATHERAPI_API_KEY")
                .map_err(|_| anyhow::anyhow!("WEATHERAPI_API_KEY not set"))?,
            weatherapi_base_url: env::var("WEATHERAPI_BASE_URL")
                .unwrap_or_else(|_| "https://api.weatherapi.com".to_string()),
            weatherapi_forecast_path: env::var("WEATHERAPI_FORECAST_PATH")
                .unwrap_or_else(|_| "/v1/forecast.json".to_string()),
            allowed_origin: env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            cache_ttl_secs: parse_var("CACHE_TTL_SECS", 300)?,
            cache_max_capacity: parse_var("CACHE_MAX_CAPACITY", 1000)?,
            upstream_timeout_secs: parse_var("UPSTREAM_TIMEOUT_SECS", 30)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}

fn parse_var(name: &str, default: u64) -> anyhow::Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not a valid integer: {}", name, raw)),
        Err(_) => Ok(default),
    }
}
