use reqwest::StatusCode;
use std::fmt;

/// Identifying key/value pairs attached to a wrapped error
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields(Vec<(&'static str, String)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.push((key, value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Error types for licensing operations
#[derive(thiserror::Error, Debug)]
pub enum LicensingError {
    #[error("decode public key failed: {source}")]
    PublicKeyDecode {
        public_key: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("unmarshal public key failed: {reason}")]
    PublicKeyParse { public_key: String, reason: String },

    #[error("invalid base URI {uri}: {reason}")]
    InvalidBaseUri { uri: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Http { status: StatusCode, message: String },

    #[error("{message}: {source}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}", context_display(.message, .fields, .source))]
    Context {
        message: Option<String>,
        fields: Fields,
        #[source]
        source: Box<LicensingError>,
    },
}

fn context_display(message: &Option<String>, fields: &Fields, source: &LicensingError) -> String {
    match (message, fields.is_empty()) {
        (Some(message), true) => format!("{}: {}", message, source),
        (Some(message), false) => format!("{} [{}]: {}", message, fields, source),
        (None, false) => format!("{} [{}]", source, fields),
        (None, true) => source.to_string(),
    }
}

impl LicensingError {
    pub(crate) fn decode(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            message: message.into(),
            source,
        }
    }

    /// HTTP status of the remote failure, looking through context layers
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            Self::Context { source, .. } => source.status_code(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(StatusCode::NOT_FOUND)
    }

    /// Innermost error underneath any context layers
    pub fn root(&self) -> &LicensingError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Looks up an identifying field on this error or any wrapped error
    pub fn field(&self, key: &str) -> Option<&str> {
        match self {
            Self::Context { fields, source, .. } => fields.get(key).or_else(|| source.field(key)),
            _ => None,
        }
    }

    pub fn with_fields(self, fields: Fields) -> Self {
        Self::Context {
            message: None,
            fields,
            source: Box::new(self),
        }
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self::Context {
            message: Some(message.into()),
            fields: Fields::new(),
            source: Box::new(self),
        }
    }
}

/// Result type for licensing operations
pub type LicensingResult<T> = Result<T, LicensingError>;

/// Context wrapping for licensing results
pub trait ResultExt<T> {
    fn with_fields(self, fields: Fields) -> LicensingResult<T>;
    fn with_message(self, message: &str) -> LicensingResult<T>;
}

impl<T> ResultExt<T> for LicensingResult<T> {
    fn with_fields(self, fields: Fields) -> LicensingResult<T> {
        self.map_err(|e| e.with_fields(fields))
    }

    fn with_message(self, message: &str) -> LicensingResult<T> {
        self.map_err(|e| e.with_message(message))
    }
}
