use crate::application::errors::{ErrorTranslator, Failure, UnclassifiedException};
use axum::{body::Body, response::IntoResponse};
use http::Response;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::ResponseForPanic;
use tracing::error;

/// Turns a handler panic into an unclassified failure document.
#[derive(Clone, Debug)]
pub struct PanicResponder {
    translator: Arc<ErrorTranslator>,
}

impl PanicResponder {
    pub fn new(translator: Arc<ErrorTranslator>) -> Self {
        Self { translator }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.as_str()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            *s
        } else {
            "unknown panic payload"
        };
        error!("Request handler panicked: {}", detail);

        // The panic payload stays in the log; callers only see that something broke.
        let failure: Failure =
            UnclassifiedException::new("Panic", "The request could not be completed.").into();
        self.translator.translate(&failure).into_response()
    }
}
