use std::io::Read;

use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("at JSON path {path} → {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn with_path<'de, T, R>(de: &mut serde_json::Deserializer<R>) -> Result<T, LoadError>
where
    T: DeserializeOwned,
    R: serde_json::de::Read<'de>,
{
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| LoadError::Json {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, LoadError> {
    with_path(&mut serde_json::Deserializer::from_str(src))
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LoadError> {
    with_path(&mut serde_json::Deserializer::from_slice(bytes))
}

/// Buffers the whole reader first; graphs are small and slice parsing is
/// considerably faster than `IoRead`.
pub fn from_reader_with_path<T: DeserializeOwned>(mut reader: impl Read) -> Result<T, LoadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_slice_with_path(&bytes)
}
