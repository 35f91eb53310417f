use crate::resource_action::ResourceAction;
use crate::types::ResourceName;
use thiserror::Error;

/// Error produced by a detector or by the pending computation it returned.
pub type DetectorError = Box<dyn std::error::Error + Send + Sync>;

/// Store-layer error type.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
///
/// None of these mean "permission denied". A denial is a falsy
/// [`Verdict`](crate::Verdict), never an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid resource or action name input.
    #[error("invalid name: {0}")]
    InvalidName(String),
    /// Declaration that cannot be applied, such as an empty action list.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),
    /// Action already bound while rebinding is rejected.
    #[error("detector already bound for {0}")]
    DuplicateBinding(ResourceAction),
    /// Target cannot be mapped to a resource name.
    #[error("cannot resolve resource name: {0}")]
    NameResolution(String),
    /// No resource was declared under the resolved name.
    #[error("unknown resource {0}")]
    UnknownResource(ResourceName),
    /// The resource is known but the action has no detector.
    #[error("unknown action {} on resource {}", .0.action(), .0.resource())]
    UnknownAction(ResourceAction),
    /// Detector failure wrapper.
    #[error("detector error: {0}")]
    Detector(#[source] DetectorError),
}

impl From<DetectorError> for Error {
    fn from(error: DetectorError) -> Self {
        Self::Detector(error)
    }
}
