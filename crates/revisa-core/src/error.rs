//! Engine error types

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors raised by the revision engine
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Event rejected before it touched any page
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    /// A log names a topic the page does not carry
    #[error("Page {page_id} has a log naming unknown topic '{topic}'")]
    UnknownTopic { page_id: String, topic: String },
    /// Page not found
    #[error("Page not found: {0}")]
    PageNotFound(String),
    /// Log entry not found on a page
    #[error("Log {log_id} not found on page {page_id}")]
    LogNotFound { page_id: String, log_id: String },
    /// Rename target already exists on the page
    #[error("Topic '{topic}' already exists on page {page_id}")]
    TopicConflict { page_id: String, topic: String },
    /// A batch stopped at its first failing event
    #[error("Batch aborted at event {index}: {source}")]
    BatchAborted {
        index: usize,
        #[source]
        source: Box<EngineError>,
    },
}

/// Engine result type
pub type Result<T> = std::result::Result<T, EngineError>;
