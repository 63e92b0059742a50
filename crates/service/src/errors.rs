use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// Serializing the map or writing it to disk failed; the mutation was undone.
    #[error("persistence error: {0}")]
    Persistence(String),
    /// The backing file could not be read or parsed when opening the store.
    #[error("load error: {0}")]
    Load(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str, key: &str) -> Self { Self::NotFound(format!("{entity} `{key}` not found")) }
    pub fn already_exists(entity: &str, key: &str) -> Self { Self::AlreadyExists(format!("{entity} `{key}` already exists")) }

    /// Reword a generic map-store miss or clash in terms of `entity`.
    pub fn in_context_of(self, entity: &str, key: &str) -> Self {
        match self {
            Self::NotFound(_) => Self::not_found(entity, key),
            Self::AlreadyExists(_) => Self::already_exists(entity, key),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rewords_only_lookup_errors() {
        let e = ServiceError::not_found("entry", "ipa").in_context_of("beer", "ipa");
        assert_eq!(e.to_string(), "not found: beer `ipa` not found");
        let e = ServiceError::already_exists("entry", "ipa").in_context_of("beer", "ipa");
        assert_eq!(e.to_string(), "already exists: beer `ipa` already exists");
        let e = ServiceError::Persistence("disk full".into()).in_context_of("beer", "ipa");
        assert!(matches!(e, ServiceError::Persistence(m) if m == "disk full"));
    }
}
