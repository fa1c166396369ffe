use serde::{Deserialize, Serialize};

use crate::Error;

/// `{ "success": bool, "data" | "sessions": T, "error": ... }`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, alias = "sessions")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, Error> {
        if !self.success {
            return Err(Error::Api(
                self.error.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        self.data
            .ok_or_else(|| Error::Api("missing response data".into()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Health {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListSessionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<wb_dialogue::SessionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewRequest<'a> {
    pub voice_id: &'a str,
    /// Omitted so the server's own sample sentence is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
}
