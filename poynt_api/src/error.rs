use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoyntApiError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not load private key: {0}")]
    KeyLoad(String),
    #[error("Could not sign assertion: {0}")]
    Signing(String),
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),
    #[error("Could not reach the server: {0}")]
    Transport(String),
    #[error("Could not deserialize JSON: {0}")]
    Payload(String),
    #[error("The query returned an empty result. {0}")]
    EmptyResponse(String),
    #[error("Query failed. Error {status}. {message}")]
    Query { status: u16, message: String },
}
