use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("config: {0}")]
    Config(String),
    #[error("asset: {0}")]
    Asset(String),
    #[error("input: {0}")]
    Input(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
