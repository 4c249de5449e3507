/// Errors surfaced by the presentation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    /// The host could not supply a rendering context.
    #[error("graphics host could not supply a rendering context")]
    ContextUnavailable,

    /// The host could not resolve the GPU entry points.
    #[error("graphics host could not resolve the GPU API")]
    ApiUnavailable,

    /// The caller's buffer cannot hold a full frame.
    #[error("destination holds {actual} bytes but a frame needs {required}")]
    DestinationTooSmall { required: usize, actual: usize },
}
