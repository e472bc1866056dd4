use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::JsonBody;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::lead::{LeadPage, LeadPageRequest};
use core_lib::{CoreError, FieldErrors, LeadRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Paged lead work list for the translander (lead follow-up) screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetLeadTranslanderDetailsQuery(pub LeadPageRequest);

impl Request for GetLeadTranslanderDetailsQuery {
    type Response = LeadPage;
    const NAME: &'static str = "GetLeadsForTranslander.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct GetLeadTranslanderDetailsHandler {
    leads: Arc<dyn LeadRepository>,
}

impl GetLeadTranslanderDetailsHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }
}

impl RequestHandler<GetLeadTranslanderDetailsQuery> for GetLeadTranslanderDetailsHandler {
    async fn handle(&self, query: GetLeadTranslanderDetailsQuery) -> Result<LeadPage, CoreError> {
        self.leads.lead_page(&query.0).await
    }
}

// --- Axum Route Handler ---

pub async fn get_lead_translander_details(
    State(state): State<AppState>,
    JsonBody(query): JsonBody<GetLeadTranslanderDetailsQuery>,
) -> Result<ApiResponse<LeadPage>, Translated> {
    let handler = GetLeadTranslanderDetailsHandler::new(state.leads.clone());
    respond(&state.translator, &handler, query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatch::dispatch;
    use crate::application::errors::Failure;
    use core_lib::adapters::in_memory_repository::InMemoryRepository;

    #[tokio::test]
    async fn page_size_is_bounded() {
        let handler = GetLeadTranslanderDetailsHandler::new(Arc::new(InMemoryRepository::seeded()));
        let query = GetLeadTranslanderDetailsQuery(LeadPageRequest {
            company_id: 1,
            user_id: 7,
            current_page: 1,
            page_size: 500,
            ..Default::default()
        });
        match dispatch(&handler, query).await {
            Err(Failure::Validation(v)) => assert_eq!(
                v.errors.get("pageSize"),
                Some(&["must be between 1 and 100".to_string()][..])
            ),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_work_list_is_an_empty_page() {
        let handler = GetLeadTranslanderDetailsHandler::new(Arc::new(InMemoryRepository::seeded()));
        let query = GetLeadTranslanderDetailsQuery(LeadPageRequest {
            company_id: 1,
            user_id: 7,
            current_page: 1,
            page_size: 10,
            ..Default::default()
        });
        let page = dispatch(&handler, query).await.unwrap();
        assert_eq!(page.total_count, 0);
        assert!(page.leads.is_empty());
    }
}
