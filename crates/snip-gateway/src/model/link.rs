use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snip_core::LinkRecord;

#[derive(Deserialize)]
pub struct ShortenForm {
    pub url: String,
}

#[derive(Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A link as listed on a page.
#[derive(Serialize)]
pub struct LinkView {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: Timestamp,
}

impl LinkView {
    pub fn from_record(record: LinkRecord, base_url: &str) -> Self {
        Self {
            short_url: record.code.to_url(base_url),
            short_code: record.code.to_string(),
            original_url: record.original_url,
            created_at: record.created_at,
        }
    }
}
