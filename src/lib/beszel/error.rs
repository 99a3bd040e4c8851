use reqwest::StatusCode;

/// Failure to obtain a bearer token from the Beszel hub.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Login request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Login rejected with status {0}")]
    Status(StatusCode),

    #[error("Login response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Login response does not contain a token")]
    MissingToken,
}

/// Failure to read the systems listing from the Beszel hub.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Records request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Records request rejected with status {0}")]
    Status(StatusCode),

    #[error("Records response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
