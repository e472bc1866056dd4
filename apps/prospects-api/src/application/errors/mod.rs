//! Conversion of request failures into the `ErrorDocument` wire envelope.
//!
//! Every failing request ends in exactly one [`Failure`]. The [`ErrorTranslator`] maps it to
//! an [`ErrorDocument`] plus status code, and [`Translated`] writes that pair to the response.

pub mod document;
pub mod failure;
pub mod translator;
pub mod writer;

pub use document::ErrorDocument;
pub use failure::{
    Failure, HandlerOutcome, OutcomeError, UnclassifiedException, UpstreamServiceFailure,
    ValidationFailure,
};
pub use translator::{ErrorTranslator, FailureLog, JsonSnapshotSerializer, SnapshotSerializer, TracingFailureLog};
pub use writer::Translated;
