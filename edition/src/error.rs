use std::path::PathBuf;

/// Error returned by the output stages of a run.
///
/// Markup problems never show up here; they are absorbed by the tokenizer
/// and the normalizer.
#[derive(Debug, thiserror::Error)]
pub enum EditionError {
    /// The finished document could not be written.
    #[error("Failed to write artifact {}: {source}", .path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The directory receiving transport pages could not be created.
    #[error("Failed to create transport directory {}: {source}", .path.display())]
    TransportSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A transport page could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Some transport pages were not delivered, even as plain text.
    #[error("Failed to deliver {failed} of {total} transport pages")]
    Dispatch { failed: usize, total: usize },
}
