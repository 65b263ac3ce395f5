use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub code: String,
    pub short_url: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub code: String,
    pub url: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
