use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::JsonBody;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::prospect::{Prospect, ProspectSearch};
use core_lib::{CoreError, FieldErrors, ProspectRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const NO_RECORDS_FOUND: &str = "No records found";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetExistingProspectQuery(pub ProspectSearch);

impl Request for GetExistingProspectQuery {
    type Response = Prospect;
    const NAME: &'static str = "GetExistingProspectCustomerDetails.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct GetExistingProspectHandler {
    prospects: Arc<dyn ProspectRepository>,
}

impl GetExistingProspectHandler {
    pub fn new(prospects: Arc<dyn ProspectRepository>) -> Self {
        Self { prospects }
    }
}

impl RequestHandler<GetExistingProspectQuery> for GetExistingProspectHandler {
    async fn handle(&self, query: GetExistingProspectQuery) -> Result<Prospect, CoreError> {
        self.prospects
            .find_prospect(&query.0)
            .await?
            .ok_or_else(|| CoreError::NotFound(NO_RECORDS_FOUND.to_string()))
    }
}

// --- Axum Route Handler ---

pub async fn get_existing_prospect_details(
    State(state): State<AppState>,
    JsonBody(query): JsonBody<GetExistingProspectQuery>,
) -> Result<ApiResponse<Prospect>, Translated> {
    let handler = GetExistingProspectHandler::new(state.prospects.clone());
    respond(&state.translator, &handler, query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatch::dispatch;
    use crate::application::errors::Failure;
    use core_lib::adapters::in_memory_repository::InMemoryRepository;
    use core_lib::domain::prospect::NewProspect;

    #[tokio::test]
    async fn finds_prospect_by_pan() {
        let repo = Arc::new(InMemoryRepository::seeded());
        let id = repo
            .create_prospect(&NewProspect {
                company_id: 1,
                user_id: 7,
                name: "Ravi Kumar".into(),
                mobile_number: "9876543210".into(),
                aadhar_number: None,
                pan_number: Some("ABCDE1234F".into()),
                state_id: 33,
                lob_id: 1,
                location_id: 10,
            })
            .await
            .unwrap();

        let query = GetExistingProspectQuery(ProspectSearch {
            user_id: 7,
            company_id: 1,
            pan_number: Some("ABCDE1234F".into()),
            ..Default::default()
        });
        let prospect = dispatch(&GetExistingProspectHandler::new(repo), query)
            .await
            .unwrap();
        assert_eq!(prospect.prospect_id, id);
    }

    #[tokio::test]
    async fn unknown_prospect_is_a_handler_failure() {
        let repo = Arc::new(InMemoryRepository::seeded());
        let query = GetExistingProspectQuery(ProspectSearch {
            user_id: 7,
            company_id: 1,
            mobile_number: Some("9876543210".into()),
            ..Default::default()
        });
        match dispatch(&GetExistingProspectHandler::new(repo), query).await {
            Err(Failure::Handler(outcome)) => {
                assert_eq!(outcome.error.unwrap().message, NO_RECORDS_FOUND);
                assert_eq!(outcome.request_type, "GetExistingProspectCustomerDetails.Query");
            }
            other => panic!("expected handler failure, got {other:?}"),
        }
    }
}
