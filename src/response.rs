use axum::{
    body::{Body, Bytes},
    http::{header, response::Builder, HeaderValue, StatusCode},
    response::Response,
};
use serde_json::{json, Value};

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
const ALLOW_METHODS: &str = "GET, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Builds every outgoing response so the CORS and content-type headers stay
/// uniform across success, error and fallback paths.
#[derive(Clone)]
pub struct ResponseBuilder {
    allowed_origin: HeaderValue,
    cache_control: HeaderValue,
}

impl ResponseBuilder {
    pub fn new(allowed_origin: &str, cache_ttl_secs: u64) -> anyhow::Result<Self> {
        let allowed_origin = HeaderValue::from_str(allowed_origin).map_err(|_| {
            anyhow::anyhow!("ALLOWED_ORIGIN is not a valid header value: {}", allowed_origin)
        })?;
        let cache_control = HeaderValue::from_str(&format!("public, max-age={}", cache_ttl_secs))
            .map_err(|_| anyhow::anyhow!("CACHE_TTL_SECS does not form a valid header value"))?;

        Ok(Self {
            allowed_origin,
            cache_control,
        })
    }

    pub fn json(&self, status: StatusCode, body: &Value) -> Response {
        self.json_bytes(status, Bytes::from(body.to_string()))
    }

    pub fn json_bytes(&self, status: StatusCode, body: Bytes) -> Response {
        self.base(status)
            .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(Body::from(body))
            .expect("response from valid parts")
    }

    /// JSON response that downstream caches may hold onto, used by the
    /// forecast route on both the miss and replay paths.
    pub fn cacheable_json_bytes(&self, status: StatusCode, body: Bytes) -> Response {
        self.base(status)
            .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(header::CACHE_CONTROL, self.cache_control.clone())
            .body(Body::from(body))
            .expect("response from valid parts")
    }

    pub fn error(&self, status: StatusCode, message: &str) -> Response {
        self.json(status, &json!({ "error": message }))
    }

    pub fn not_found(&self) -> Response {
        self.error(StatusCode::NOT_FOUND, "Not found")
    }

    /// CORS preflight answer: 204, no body, no content-type.
    pub fn preflight(&self) -> Response {
        self.base(StatusCode::NO_CONTENT)
            .header(header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE)
            .body(Body::empty())
            .expect("response from valid parts")
    }

    fn base(&self, status: StatusCode) -> Builder {
        Response::builder()
            .status(status)
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allowed_origin.clone())
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS)
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS)
    }
}
