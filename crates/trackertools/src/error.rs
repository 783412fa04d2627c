#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("YouTrack API error [{status}]: {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode YouTrack response: {0}")]
    Decode(String),
}
