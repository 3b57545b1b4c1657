use thiserror::Error;

/// Call-level failure reported by a generation backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{provider}: credentials are missing")]
    MissingCredentials { provider: String },

    #[error("{provider}: backend unreachable: {message}")]
    Unreachable { provider: String, message: String },

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider}: malformed response: {message}")]
    Malformed { provider: String, message: String },

    #[error("{provider}: client setup failed: {message}")]
    Client { provider: String, message: String },
}

impl ProviderError {
    pub fn provider(&self) -> &str {
        match self {
            Self::MissingCredentials { provider }
            | Self::Unreachable { provider, .. }
            | Self::Status { provider, .. }
            | Self::Malformed { provider, .. }
            | Self::Client { provider, .. } => provider,
        }
    }
}

/// A model response that does not match the design descriptor shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is empty")]
    Empty,

    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("required field `{0}` is missing or empty")]
    MissingField(&'static str),

    #[error("layoutType `{0}` is not one of card, flat, multi-card")]
    InvalidLayout(String),

    #[error("highlightColor `{0}` is not a hex color")]
    InvalidHighlight(String),
}

/// No usable design could be produced. Fatal to a generation run.
#[derive(Debug, Error)]
pub enum DesignGenerationError {
    #[error("design generation failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("design response rejected: {0}")]
    Parse(#[from] ParseError),

    #[error("no design variation succeeded out of {attempted}")]
    NoVariations { attempted: usize },
}

/// One chunk could not be enhanced; the original chunk text is used instead.
#[derive(Debug, Error)]
pub enum ChunkEnhancementError {
    #[error("chunk {index}: {source}")]
    Provider {
        index: usize,
        #[source]
        source: ProviderError,
    },

    #[error("chunk {index}: model returned no text")]
    Empty { index: usize },
}

/// One card failed to export. Other cards are unaffected.
#[derive(Debug, Clone, Error)]
pub enum CardExportError {
    #[error("card {index}: stream could not be opened: {source}")]
    Open {
        index: usize,
        #[source]
        source: ProviderError,
    },

    #[error("card {index}: stream failed after {received} bytes: {source}")]
    Stream {
        index: usize,
        received: usize,
        #[source]
        source: ProviderError,
    },

    #[error("card {index}: model returned no markup")]
    Empty { index: usize },
}

impl CardExportError {
    pub fn index(&self) -> usize {
        match self {
            Self::Open { index, .. } | Self::Stream { index, .. } | Self::Empty { index } => *index,
        }
    }
}

/// The wrapper template could not be generated; the fallback template is used.
#[derive(Debug, Error)]
pub enum WrapperGenerationError {
    #[error("wrapper request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("wrapper response was empty")]
    Empty,

    #[error("wrapper lost its content placeholder during post-processing")]
    PlaceholderLost,
}

/// Run-level error surfaced to callers of the pipeline.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(transparent)]
    Design(#[from] DesignGenerationError),

    #[error("run cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
