pub mod geo;
pub mod weather;

const USER_AGENT: &str = "WeatherEdgeServer/1.0";
