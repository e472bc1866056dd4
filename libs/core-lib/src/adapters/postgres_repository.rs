use crate::domain::field_verification::{
    AssetSearch, FvrAsset, FvrDetail, FvrLookupKind, HirerSearch, PersonType,
};
use crate::domain::lead::{
    Guarantor, Lead, LeadHeader, LeadIndividualDetail, LeadNonIndividualDetail, LeadPage,
    LeadPageRequest, LeadSearch,
};
use crate::domain::lookup::{
    DocumentCategory, FieldExecutive, LeadStatus, LineOfBusiness, Location, LocationFilter, Lookup,
};
use crate::domain::prospect::{NewProspect, Prospect, ProspectReportFilter, ProspectSearch};
use crate::{CoreError, FieldVerificationRepository, LeadRepository, ProspectRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

fn infra(e: sqlx::Error) -> CoreError {
    CoreError::Infrastructure(Box::new(e))
}

type LookupRow = (i32, String, Option<String>);

fn into_lookups(rows: Vec<LookupRow>) -> Vec<Lookup> {
    rows.into_iter()
        .map(|(id, name, category)| Lookup { id, name, category })
        .collect()
}

#[derive(sqlx::FromRow, Debug)]
struct ProspectRow {
    prospect_id: i32,
    company_id: i32,
    name: String,
    mobile_number: String,
    aadhar_number: Option<String>,
    pan_number: Option<String>,
    state_id: i32,
    lob_id: i32,
    location_id: i32,
    created_by: i32,
    created_on: DateTime<Utc>,
}

impl From<ProspectRow> for Prospect {
    fn from(row: ProspectRow) -> Self {
        Prospect {
            prospect_id: row.prospect_id,
            company_id: row.company_id,
            name: row.name,
            mobile_number: row.mobile_number,
            aadhar_number: row.aadhar_number,
            pan_number: row.pan_number,
            state_id: row.state_id,
            lob_id: row.lob_id,
            location_id: row.location_id,
            created_by: row.created_by,
            created_on: row.created_on,
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
struct LeadHeaderRow {
    lead_id: i32,
    lead_number: String,
    prospect_id: i32,
    vehicle_number: Option<String>,
    status_id: i32,
    lob_id: i32,
    loan_amount: Option<i64>,
}

impl From<LeadHeaderRow> for LeadHeader {
    fn from(row: LeadHeaderRow) -> Self {
        LeadHeader {
            lead_id: Some(row.lead_id),
            lead_number: Some(row.lead_number),
            prospect_id: row.prospect_id,
            vehicle_number: row.vehicle_number,
            status_id: row.status_id,
            lob_id: row.lob_id,
            loan_amount: row.loan_amount,
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
struct FvrRow {
    field_verification_id: i32,
    lead_id: i32,
    person_type: String,
    person_name: String,
    residence_type_id: Option<i32>,
    years_at_residence: Option<i32>,
    remarks: Option<String>,
    verified_by: i32,
}

impl From<FvrRow> for FvrDetail {
    fn from(row: FvrRow) -> Self {
        FvrDetail {
            field_verification_id: Some(row.field_verification_id),
            lead_id: Some(row.lead_id),
            person_type: row.person_type,
            person_name: row.person_name,
            residence_type_id: row.residence_type_id,
            years_at_residence: row.years_at_residence,
            remarks: row.remarks,
            verified_by: row.verified_by,
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
struct AssetRow {
    field_verification_id: i32,
    lead_id: i32,
    asset_type_id: i32,
    vehicle_number: String,
    make: Option<String>,
    model: Option<String>,
    manufacture_year: Option<i32>,
    remarks: Option<String>,
    verified_by: i32,
}

impl From<AssetRow> for FvrAsset {
    fn from(row: AssetRow) -> Self {
        FvrAsset {
            field_verification_id: Some(row.field_verification_id),
            lead_id: Some(row.lead_id),
            asset_type_id: row.asset_type_id,
            vehicle_number: row.vehicle_number,
            make: row.make,
            model: row.model,
            manufacture_year: row.manufacture_year,
            remarks: row.remarks,
            verified_by: row.verified_by,
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
struct LeadPageRow {
    total_count: i64,
    #[sqlx(flatten)]
    header: LeadHeaderRow,
}

// The stored functions yield NULL when the lead does not exist.
fn lead_must_exist(id: Option<i32>, lead_id: i32) -> Result<i32, CoreError> {
    id.ok_or_else(|| CoreError::NotFound(format!("Lead {lead_id} was not found.")))
}

/// PostgreSQL implementation of the repository ports.
///
/// Every operation is a single call to a stored function in the `fos` schema; the
/// database owns the business SQL.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProspectRepository for PostgresRepository {
    async fn prospect_lookups(&self) -> Result<Vec<Lookup>, CoreError> {
        let rows: Vec<LookupRow> =
            sqlx::query_as("SELECT id, name, category FROM fos.get_prospect_lookups()")
                .fetch_all(&self.pool)
                .await
                .map_err(infra)?;
        Ok(into_lookups(rows))
    }

    async fn states(&self) -> Result<Vec<Lookup>, CoreError> {
        let rows: Vec<LookupRow> = sqlx::query_as("SELECT id, name, category FROM fos.get_states()")
            .fetch_all(&self.pool)
            .await
            .map_err(infra)?;
        Ok(into_lookups(rows))
    }

    async fn lines_of_business(
        &self,
        company_id: i32,
        user_id: i32,
    ) -> Result<Vec<LineOfBusiness>, CoreError> {
        let rows: Vec<(i32, String)> =
            sqlx::query_as("SELECT lob_id, lob_name FROM fos.get_lob_list($1, $2)")
                .bind(company_id)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(infra)?;
        Ok(rows
            .into_iter()
            .map(|(lob_id, lob_name)| LineOfBusiness { lob_id, lob_name })
            .collect())
    }

    async fn document_categories(
        &self,
        company_id: i32,
        user_id: i32,
    ) -> Result<Vec<DocumentCategory>, CoreError> {
        let rows: Vec<(i32, String, bool)> = sqlx::query_as(
            "SELECT category_id, category_name, is_mandatory FROM fos.get_document_categories($1, $2)",
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;
        Ok(rows
            .into_iter()
            .map(|(category_id, category_name, is_mandatory)| DocumentCategory {
                category_id,
                category_name,
                is_mandatory,
            })
            .collect())
    }

    async fn field_executives(
        &self,
        company_id: i32,
        location_id: i32,
    ) -> Result<Vec<FieldExecutive>, CoreError> {
        let rows: Vec<(i32, String, i32, Option<String>)> = sqlx::query_as(
            "SELECT executive_id, executive_name, location_id, mobile_number FROM fos.get_field_executives($1, $2)",
        )
        .bind(company_id)
        .bind(location_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;
        Ok(rows
            .into_iter()
            .map(
                |(executive_id, executive_name, location_id, mobile_number)| FieldExecutive {
                    executive_id,
                    executive_name,
                    location_id,
                    mobile_number,
                },
            )
            .collect())
    }

    async fn branch_locations(&self, filter: &LocationFilter) -> Result<Vec<Location>, CoreError> {
        let rows: Vec<(i32, String, i32, bool)> = sqlx::query_as(
            "SELECT location_id, location_name, lob_id, is_active FROM fos.get_branch_locations($1, $2, $3, $4)",
        )
        .bind(filter.user_id)
        .bind(filter.company_id)
        .bind(filter.lob_id)
        .bind(filter.is_active)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;
        Ok(rows
            .into_iter()
            .map(|(location_id, location_name, lob_id, is_active)| Location {
                location_id,
                location_name,
                lob_id,
                is_active,
            })
            .collect())
    }

    async fn find_prospect(&self, search: &ProspectSearch) -> Result<Option<Prospect>, CoreError> {
        let row: Option<ProspectRow> = sqlx::query_as(
            "SELECT * FROM fos.get_existing_prospect($1, $2, $3, $4, $5, $6)",
        )
        .bind(search.user_id)
        .bind(search.company_id)
        .bind(search.prospect_id)
        .bind(&search.mobile_number)
        .bind(&search.aadhar_number)
        .bind(&search.pan_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;
        Ok(row.map(Prospect::from))
    }

    async fn create_prospect(&self, prospect: &NewProspect) -> Result<i32, CoreError> {
        let result: Result<(i32,), sqlx::Error> = sqlx::query_as(
            "SELECT fos.create_prospect($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(prospect.company_id)
        .bind(prospect.user_id)
        .bind(&prospect.name)
        .bind(&prospect.mobile_number)
        .bind(&prospect.aadhar_number)
        .bind(&prospect.pan_number)
        .bind(prospect.state_id)
        .bind(prospect.lob_id)
        .bind(prospect.location_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok((prospect_id,)) => Ok(prospect_id),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(CoreError::Rejected(format!(
                    "A prospect with PAN {} already exists.",
                    prospect.pan_number.as_deref().unwrap_or_default()
                )))
            }
            Err(e) => Err(infra(e)),
        }
    }

    async fn prospects_for_report(
        &self,
        filter: &ProspectReportFilter,
    ) -> Result<Vec<Prospect>, CoreError> {
        let rows: Vec<ProspectRow> =
            sqlx::query_as("SELECT * FROM fos.get_prospect_report($1, $2, $3)")
                .bind(filter.company_id)
                .bind(filter.lob_id)
                .bind(filter.location_id)
                .fetch_all(&self.pool)
                .await
                .map_err(infra)?;
        Ok(rows.into_iter().map(Prospect::from).collect())
    }
}

#[async_trait]
impl LeadRepository for PostgresRepository {
    async fn lead_statuses(&self) -> Result<Vec<LeadStatus>, CoreError> {
        let rows: Vec<(i32, String)> =
            sqlx::query_as("SELECT status_id, status_name FROM fos.get_lead_statuses()")
                .fetch_all(&self.pool)
                .await
                .map_err(infra)?;
        Ok(rows
            .into_iter()
            .map(|(status_id, status_name)| LeadStatus {
                status_id,
                status_name,
            })
            .collect())
    }

    async fn asset_lookups(&self, company_id: i32, user_id: i32) -> Result<Vec<Lookup>, CoreError> {
        let rows: Vec<LookupRow> =
            sqlx::query_as("SELECT id, name, category FROM fos.get_asset_lookup($1, $2)")
                .bind(company_id)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(infra)?;
        Ok(into_lookups(rows))
    }

    async fn lead_generation_lookups(
        &self,
        company_id: i32,
        user_id: i32,
    ) -> Result<Vec<Lookup>, CoreError> {
        let rows: Vec<LookupRow> = sqlx::query_as(
            "SELECT id, name, category FROM fos.get_lead_generation_lookup($1, $2)",
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;
        Ok(into_lookups(rows))
    }

    async fn leads_for_prospect(
        &self,
        company_id: i32,
        prospect_id: i32,
    ) -> Result<Vec<LeadHeader>, CoreError> {
        let rows: Vec<LeadHeaderRow> =
            sqlx::query_as("SELECT * FROM fos.get_prospect_leads($1, $2)")
                .bind(company_id)
                .bind(prospect_id)
                .fetch_all(&self.pool)
                .await
                .map_err(infra)?;
        Ok(rows.into_iter().map(LeadHeader::from).collect())
    }

    async fn lead_page(&self, request: &LeadPageRequest) -> Result<LeadPage, CoreError> {
        // Each row carries the unpaged match count.
        let rows: Vec<LeadPageRow> = sqlx::query_as(
            "SELECT * FROM fos.get_leads_for_translander($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(request.company_id)
        .bind(request.user_id)
        .bind(request.current_page)
        .bind(request.page_size)
        .bind(&request.search_value)
        .bind(&request.vehicle_number)
        .bind(&request.lead_number)
        .bind(request.status)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(LeadPage {
            total_count: rows.first().map_or(0, |row| row.total_count),
            current_page: request.current_page,
            page_size: request.page_size,
            leads: rows.into_iter().map(|row| row.header.into()).collect(),
        })
    }

    async fn find_lead(&self, search: &LeadSearch) -> Result<Option<Lead>, CoreError> {
        let header: Option<LeadHeaderRow> =
            sqlx::query_as("SELECT * FROM fos.get_lead_details($1, $2, $3, $4, $5)")
                .bind(search.company_id)
                .bind(search.user_id)
                .bind(search.lead_id)
                .bind(&search.vehicle_number)
                .bind(&search.lead_number)
                .fetch_optional(&self.pool)
                .await
                .map_err(infra)?;

        let Some(header) = header else {
            return Ok(None);
        };

        let guarantors: Vec<(String, String, Option<String>)> = sqlx::query_as(
            "SELECT name, mobile_number, relationship FROM fos.get_lead_guarantors($1)",
        )
        .bind(header.lead_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(Some(Lead {
            header: Some(header.into()),
            guarantors: guarantors
                .into_iter()
                .map(|(name, mobile_number, relationship)| Guarantor {
                    name,
                    mobile_number,
                    relationship,
                })
                .collect(),
        }))
    }

    async fn create_lead_header(
        &self,
        company_id: i32,
        user_id: i32,
        location_id: i32,
        header: &LeadHeader,
    ) -> Result<LeadHeader, CoreError> {
        let row: LeadHeaderRow =
            sqlx::query_as("SELECT * FROM fos.create_lead_header($1, $2, $3, $4, $5, $6, $7)")
                .bind(company_id)
                .bind(user_id)
                .bind(location_id)
                .bind(header.prospect_id)
                .bind(&header.vehicle_number)
                .bind(header.lob_id)
                .bind(header.loan_amount)
                .fetch_one(&self.pool)
                .await
                .map_err(infra)?;
        Ok(row.into())
    }

    async fn add_guarantors(&self, lead: &Lead) -> Result<bool, CoreError> {
        let Some(lead_id) = lead.lead_id() else {
            return Ok(false);
        };

        let mut tx = self.pool.begin().await.map_err(infra)?;
        for guarantor in &lead.guarantors {
            let (added,): (bool,) = sqlx::query_as("SELECT fos.add_lead_guarantor($1, $2, $3, $4)")
                .bind(lead_id)
                .bind(&guarantor.name)
                .bind(&guarantor.mobile_number)
                .bind(&guarantor.relationship)
                .fetch_one(&mut *tx)
                .await
                .map_err(infra)?;
            if !added {
                tx.rollback().await.map_err(infra)?;
                return Ok(false);
            }
        }
        tx.commit().await.map_err(infra)?;
        Ok(true)
    }

    async fn add_individual_detail(
        &self,
        company_id: i32,
        user_id: i32,
        lead_id: i32,
        detail: &LeadIndividualDetail,
    ) -> Result<i32, CoreError> {
        let (id,): (Option<i32>,) = sqlx::query_as(
            "SELECT fos.create_lead_individual_detail($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(company_id)
        .bind(user_id)
        .bind(lead_id)
        .bind(&detail.first_name)
        .bind(&detail.last_name)
        .bind(detail.date_of_birth)
        .bind(&detail.gender)
        .bind(detail.occupation_id)
        .bind(detail.monthly_income)
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;
        lead_must_exist(id, lead_id)
    }

    async fn add_non_individual_detail(
        &self,
        user_id: i32,
        lead_id: i32,
        detail: &LeadNonIndividualDetail,
    ) -> Result<i32, CoreError> {
        let (id,): (Option<i32>,) = sqlx::query_as(
            "SELECT fos.create_lead_non_individual_detail($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user_id)
        .bind(lead_id)
        .bind(&detail.entity_name)
        .bind(detail.constitution_id)
        .bind(&detail.registration_number)
        .bind(&detail.gst_number)
        .bind(&detail.contact_person)
        .bind(&detail.contact_mobile)
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;
        lead_must_exist(id, lead_id)
    }
}

#[async_trait]
impl FieldVerificationRepository for PostgresRepository {
    async fn lookups(
        &self,
        kind: FvrLookupKind,
        company_id: i32,
        user_id: i32,
    ) -> Result<Vec<Lookup>, CoreError> {
        let sql = match kind {
            FvrLookupKind::Hirer => "SELECT id, name, category FROM fos.get_fvr_hirer_lookup($1, $2)",
            FvrLookupKind::Neighbour => {
                "SELECT id, name, category FROM fos.get_fvr_neighbour_lookup($1, $2)"
            }
            FvrLookupKind::Asset => "SELECT id, name, category FROM fos.get_fvr_asset_lookup($1, $2)",
        };
        let rows: Vec<LookupRow> = sqlx::query_as(sql)
            .bind(company_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(infra)?;
        Ok(into_lookups(rows))
    }

    async fn hirer_details(&self, search: &HirerSearch) -> Result<Option<FvrDetail>, CoreError> {
        let row: Option<FvrRow> =
            sqlx::query_as("SELECT * FROM fos.get_lead_hirer_details($1, $2, $3, $4, $5)")
                .bind(search.user_id)
                .bind(search.company_id)
                .bind(&search.mode)
                .bind(&search.lead_number)
                .bind(&search.vehicle_number)
                .fetch_optional(&self.pool)
                .await
                .map_err(infra)?;
        Ok(row.map(FvrDetail::from))
    }

    async fn verification_detail(
        &self,
        company_id: i32,
        lead_id: i32,
        person_type: PersonType,
        field_verification_id: Option<i32>,
    ) -> Result<Option<FvrDetail>, CoreError> {
        let row: Option<FvrRow> =
            sqlx::query_as("SELECT * FROM fos.get_fvr_details($1, $2, $3, $4)")
                .bind(company_id)
                .bind(lead_id)
                .bind(person_type.as_str())
                .bind(field_verification_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(infra)?;
        Ok(row.map(FvrDetail::from))
    }

    async fn asset_details(&self, search: &AssetSearch) -> Result<Option<FvrAsset>, CoreError> {
        let row: Option<AssetRow> =
            sqlx::query_as("SELECT * FROM fos.get_lead_asset_details($1, $2, $3, $4)")
                .bind(search.company_id)
                .bind(search.user_id)
                .bind(&search.lead_number)
                .bind(&search.vehicle_number)
                .fetch_optional(&self.pool)
                .await
                .map_err(infra)?;
        Ok(row.map(FvrAsset::from))
    }

    async fn add_asset_detail(
        &self,
        company_id: i32,
        user_id: i32,
        lead_id: i32,
        asset: &FvrAsset,
    ) -> Result<i32, CoreError> {
        let (id,): (Option<i32>,) = sqlx::query_as(
            "SELECT fos.add_fvr_asset_detail($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(company_id)
        .bind(user_id)
        .bind(lead_id)
        .bind(asset.asset_type_id)
        .bind(&asset.vehicle_number)
        .bind(&asset.make)
        .bind(&asset.model)
        .bind(asset.manufacture_year)
        .bind(&asset.remarks)
        .bind(asset.verified_by)
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;
        lead_must_exist(id, lead_id)
    }

    async fn add_hirer_detail(
        &self,
        company_id: i32,
        lead_id: i32,
        detail: &FvrDetail,
    ) -> Result<i32, CoreError> {
        let (verification_id,): (Option<i32>,) = sqlx::query_as(
            "SELECT fos.add_fvr_hirer_detail($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(company_id)
        .bind(lead_id)
        .bind(&detail.person_type)
        .bind(&detail.person_name)
        .bind(detail.residence_type_id)
        .bind(detail.years_at_residence)
        .bind(&detail.remarks)
        .bind(detail.verified_by)
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;

        lead_must_exist(verification_id, lead_id)
    }
}
