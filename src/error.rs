use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
