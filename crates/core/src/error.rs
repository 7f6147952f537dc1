#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The workflow id or version is still empty after tag resolution.
    #[error("Vistrails id or version not provided")]
    MissingWorkflowIdentity,

    #[error("Validation failed: {0}")]
    Validation(String),
}
