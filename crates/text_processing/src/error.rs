use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Invalid spelling rule #{index} ({pattern}): {source}")]
    InvalidRule {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
