//! Body, path and query extractors whose rejections use the error document.

use super::errors::{Failure, Translated, ValidationFailure};
use crate::AppState;
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query, Request};
use http::request::Parts;
use serde::de::DeserializeOwned;

/// JSON body. A missing or malformed body is reported under the `body` field.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T> FromRequest<AppState> for JsonBody<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = Translated;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject(state, "body", rejection.body_text())),
        }
    }
}

/// Query string parameters. Missing or unparsable parameters are reported under `query`.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T> FromRequestParts<AppState> for QueryParams<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = Translated;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject(state, "query", rejection.body_text())),
        }
    }
}

/// Named path segments. Unparsable segments are reported under `path`.
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

impl<T> FromRequestParts<AppState> for PathParams<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = Translated;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject(state, "path", rejection.body_text())),
        }
    }
}

fn reject(state: &AppState, field: &str, message: String) -> Translated {
    let failure: Failure = ValidationFailure::single(field, message).into();
    state.translator.translate(&failure)
}
