use thiserror::Error;

/// Unified error type for the entire portfolio-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / File ──────────────────────────────────────────────
    #[error("Unsupported ledger version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No quote provider available for market: {0}")]
    NoProvider(String),

    #[error("Quote not available for {symbol} ({market})")]
    QuoteUnavailable {
        symbol: String,
        market: String,
    },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs to prevent
        // API key leakage. reqwest errors often contain full URLs with secrets.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
