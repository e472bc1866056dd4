//! Applicant details of a lead: a person, or a firm/company.

use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::{JsonBody, QueryParams};
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::lead::{LeadIndividualDetail, LeadNonIndividualDetail};
use core_lib::{CoreError, FieldErrors, LeadRepository, Validate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualScope {
    pub company_id: i32,
    pub user_id: i32,
    pub lead_id: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonIndividualScope {
    pub user_id: i32,
    pub lead_id: i32,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadIndividualDetailsCommand {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lead_id: i32,
    pub detail: LeadIndividualDetail,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNonIndividualDetailCommand {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lead_id: i32,
    pub detail: LeadNonIndividualDetail,
}

impl Request for CreateLeadIndividualDetailsCommand {
    type Response = i32;
    const NAME: &'static str = "CreateLeadIndividualDetails.Command";

    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::of(self);
        errors.merge(FieldErrors::of(&self.detail));
        errors
    }
}

impl Request for CreateNonIndividualDetailCommand {
    type Response = i32;
    const NAME: &'static str = "CreateNonIndividualDetail.Command";

    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::of(self);
        errors.merge(FieldErrors::of(&self.detail));
        errors
    }
}

pub struct CreateLeadApplicantHandler {
    leads: Arc<dyn LeadRepository>,
}

impl CreateLeadApplicantHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }
}

impl RequestHandler<CreateLeadIndividualDetailsCommand> for CreateLeadApplicantHandler {
    async fn handle(&self, command: CreateLeadIndividualDetailsCommand) -> Result<i32, CoreError> {
        let applicant_id = self
            .leads
            .add_individual_detail(
                command.company_id,
                command.user_id,
                command.lead_id,
                &command.detail,
            )
            .await?;
        info!("Individual applicant recorded for lead {}", command.lead_id);
        Ok(applicant_id)
    }
}

impl RequestHandler<CreateNonIndividualDetailCommand> for CreateLeadApplicantHandler {
    async fn handle(&self, command: CreateNonIndividualDetailCommand) -> Result<i32, CoreError> {
        let applicant_id = self
            .leads
            .add_non_individual_detail(command.user_id, command.lead_id, &command.detail)
            .await?;
        info!("Non-individual applicant recorded for lead {}", command.lead_id);
        Ok(applicant_id)
    }
}

// --- Axum Route Handlers ---

pub async fn create_lead_individual_details(
    State(state): State<AppState>,
    QueryParams(scope): QueryParams<IndividualScope>,
    JsonBody(detail): JsonBody<LeadIndividualDetail>,
) -> Result<ApiResponse<i32>, Translated> {
    let command = CreateLeadIndividualDetailsCommand {
        company_id: scope.company_id,
        user_id: scope.user_id,
        lead_id: scope.lead_id,
        detail,
    };
    let handler = CreateLeadApplicantHandler::new(state.leads.clone());
    respond(&state.translator, &handler, command).await
}

pub async fn create_non_individual_detail(
    State(state): State<AppState>,
    QueryParams(scope): QueryParams<NonIndividualScope>,
    JsonBody(detail): JsonBody<LeadNonIndividualDetail>,
) -> Result<ApiResponse<i32>, Translated> {
    let command = CreateNonIndividualDetailCommand {
        user_id: scope.user_id,
        lead_id: scope.lead_id,
        detail,
    };
    let handler = CreateLeadApplicantHandler::new(state.leads.clone());
    respond(&state.translator, &handler, command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatch::dispatch;
    use crate::application::errors::Failure;
    use chrono::NaiveDate;
    use core_lib::adapters::in_memory_repository::InMemoryRepository;

    fn person() -> LeadIndividualDetail {
        LeadIndividualDetail {
            first_name: "Ravi".into(),
            last_name: None,
            date_of_birth: NaiveDate::from_ymd_opt(1988, 1, 30).unwrap(),
            gender: "Male".into(),
            occupation_id: 1,
            monthly_income: None,
        }
    }

    #[tokio::test]
    async fn unknown_lead_is_a_handler_failure() {
        let handler = CreateLeadApplicantHandler::new(Arc::new(InMemoryRepository::seeded()));
        let command = CreateLeadIndividualDetailsCommand {
            company_id: 1,
            user_id: 7,
            lead_id: 44,
            detail: person(),
        };
        match dispatch(&handler, command).await {
            Err(Failure::Handler(outcome)) => {
                assert!(outcome.is_request_valid);
                assert_eq!(outcome.error.unwrap().message, "Lead 44 was not found.");
            }
            other => panic!("expected handler failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn scope_and_body_errors_are_reported_together() {
        let handler = CreateLeadApplicantHandler::new(Arc::new(InMemoryRepository::seeded()));
        let command = CreateNonIndividualDetailCommand {
            user_id: 7,
            lead_id: 0,
            detail: LeadNonIndividualDetail {
                entity_name: "".into(),
                constitution_id: 1,
                registration_number: None,
                gst_number: None,
                contact_person: "Balaji".into(),
                contact_mobile: "9876543210".into(),
            },
        };
        match dispatch(&handler, command).await {
            Err(Failure::Validation(v)) => {
                assert!(v.errors.get("leadId").is_some());
                assert!(v.errors.get("entityName").is_some());
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
}
