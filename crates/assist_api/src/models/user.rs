//! Identity payload returned by `GET /api/myself`.

use serde::{Deserialize, Serialize};

use super::lenient::deserialize_plain_string;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
/// Represents the authenticated tracker account as reported by the backend.
pub struct Myself {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub display_name: String,
}
