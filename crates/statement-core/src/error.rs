use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unknown line item: {0}")]
    UnknownLineItem(String),

    #[error("Non-finite amount for line item {key}: {value}")]
    NonFiniteAmount { key: String, value: f64 },

    #[error("Unknown ratio key: {0}")]
    UnknownRatio(String),

    #[error("Invalid benchmark: {0}")]
    InvalidBenchmark(String),

    #[error("Invalid scoring rule: {0}")]
    InvalidScoringRule(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
