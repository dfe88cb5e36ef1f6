use serde::Serialize;

pub const CLIENT_DATA_TYPE_GET: &str = "webauthn.get";

/// CollectedClientData for a `get` ceremony. Field order is the serialized
/// order; relying parties hash these exact bytes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedClientData<'a> {
    #[serde(rename = "type")]
    pub kind:         &'static str,
    pub challenge:    &'a str,
    pub origin:       &'a str,
    pub cross_origin: bool,
}

impl<'a> CollectedClientData<'a> {
    pub fn get(challenge: &'a str, origin: &'a str) -> Self {
        Self {
            kind: CLIENT_DATA_TYPE_GET,
            challenge,
            origin,
            cross_origin: false,
        }
    }

    /// Compact JSON, no whitespace.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
