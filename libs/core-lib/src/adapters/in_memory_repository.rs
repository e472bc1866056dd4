use crate::domain::field_verification::{
    AssetSearch, FvrAsset, FvrDetail, FvrLookupKind, HirerSearch, PersonType,
};
use crate::domain::lead::{
    Lead, LeadHeader, LeadIndividualDetail, LeadNonIndividualDetail, LeadPage, LeadPageRequest,
    LeadSearch,
};
use crate::domain::lookup::{
    DocumentCategory, FieldExecutive, LeadStatus, LineOfBusiness, Location, LocationFilter, Lookup,
};
use crate::domain::prospect::{NewProspect, Prospect, ProspectReportFilter, ProspectSearch};
use crate::{CoreError, FieldVerificationRepository, LeadRepository, ProspectRepository};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

/// Reference data served by the lookup endpoints. Read-only once the repository is built.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub prospect_lookups: Vec<Lookup>,
    pub states: Vec<Lookup>,
    pub lines_of_business: Vec<LineOfBusiness>,
    pub document_categories: Vec<DocumentCategory>,
    pub field_executives: Vec<FieldExecutive>,
    pub locations: Vec<Location>,
    pub lead_statuses: Vec<LeadStatus>,
    pub asset_lookups: Vec<Lookup>,
    pub lead_generation_lookups: Vec<Lookup>,
    pub hirer_lookups: Vec<Lookup>,
    pub neighbour_lookups: Vec<Lookup>,
    pub fvr_asset_lookups: Vec<Lookup>,
}

impl ReferenceData {
    /// A small data set covering every lookup, used for local runs and tests.
    pub fn sample() -> Self {
        Self {
            prospect_lookups: vec![
                Lookup::new(1, "Salaried", Some("Occupation")),
                Lookup::new(2, "Self Employed", Some("Occupation")),
                Lookup::new(3, "Walk-in", Some("Source")),
                Lookup::new(4, "Referral", Some("Source")),
            ],
            states: vec![
                Lookup::new(27, "Maharashtra", Some("State")),
                Lookup::new(29, "Karnataka", Some("State")),
                Lookup::new(33, "Tamil Nadu", Some("State")),
            ],
            lines_of_business: vec![
                LineOfBusiness {
                    lob_id: 1,
                    lob_name: "Commercial Vehicle".into(),
                },
                LineOfBusiness {
                    lob_id: 2,
                    lob_name: "Tractor".into(),
                },
            ],
            document_categories: vec![
                DocumentCategory {
                    category_id: 1,
                    category_name: "KYC".into(),
                    is_mandatory: true,
                },
                DocumentCategory {
                    category_id: 2,
                    category_name: "Income Proof".into(),
                    is_mandatory: false,
                },
            ],
            field_executives: vec![FieldExecutive {
                executive_id: 501,
                executive_name: "Suresh P".into(),
                location_id: 10,
                mobile_number: Some("9840012345".into()),
            }],
            locations: vec![
                Location {
                    location_id: 10,
                    location_name: "Chennai".into(),
                    lob_id: 1,
                    is_active: true,
                },
                Location {
                    location_id: 11,
                    location_name: "Madurai".into(),
                    lob_id: 1,
                    is_active: false,
                },
                Location {
                    location_id: 20,
                    location_name: "Hubli".into(),
                    lob_id: 2,
                    is_active: true,
                },
            ],
            lead_statuses: vec![
                LeadStatus {
                    status_id: 1,
                    status_name: "Open".into(),
                },
                LeadStatus {
                    status_id: 2,
                    status_name: "Verified".into(),
                },
                LeadStatus {
                    status_id: 3,
                    status_name: "Closed".into(),
                },
            ],
            asset_lookups: vec![
                Lookup::new(1, "Goods Carrier", Some("AssetType")),
                Lookup::new(2, "Passenger Vehicle", Some("AssetType")),
                Lookup::new(3, "Tractor", Some("AssetType")),
            ],
            lead_generation_lookups: vec![
                Lookup::new(1, "Dealer", Some("LeadSource")),
                Lookup::new(2, "Direct", Some("LeadSource")),
                Lookup::new(1, "Proprietorship", Some("Constitution")),
                Lookup::new(2, "Partnership", Some("Constitution")),
            ],
            hirer_lookups: vec![
                Lookup::new(1, "Owned", Some("ResidenceType")),
                Lookup::new(2, "Rented", Some("ResidenceType")),
            ],
            neighbour_lookups: vec![
                Lookup::new(1, "Positive", Some("NeighbourFeedback")),
                Lookup::new(2, "Negative", Some("NeighbourFeedback")),
            ],
            fvr_asset_lookups: vec![
                Lookup::new(1, "Good", Some("AssetCondition")),
                Lookup::new(2, "Needs Repair", Some("AssetCondition")),
            ],
        }
    }
}

#[derive(Debug, Clone)]
struct StoredLead {
    company_id: i32,
    lead: Lead,
}

#[derive(Debug, Clone)]
enum ApplicantDetail {
    Individual(LeadIndividualDetail),
    NonIndividual(LeadNonIndividualDetail),
}

#[derive(Debug, Default)]
struct Store {
    reference: ReferenceData,
    prospects: DashMap<i32, Prospect>,
    leads: DashMap<i32, StoredLead>,
    // Keyed by lead id; a lead has one applicant.
    applicants: DashMap<i32, (i32, ApplicantDetail)>,
    verifications: DashMap<i32, FvrDetail>,
    assets: DashMap<i32, FvrAsset>,
    next_prospect_id: AtomicI32,
    next_lead_id: AtomicI32,
    next_applicant_id: AtomicI32,
    next_verification_id: AtomicI32,
}

/// In-memory implementation of the repository ports for testing and single-executable mode.
/// Implements all three ports over one shared store so leads and verifications can refer
/// to each other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<Store>,
}

impl InMemoryRepository {
    pub fn new(reference: ReferenceData) -> Self {
        Self {
            store: Arc::new(Store {
                reference,
                ..Default::default()
            }),
        }
    }

    /// Repository seeded with [`ReferenceData::sample`].
    pub fn seeded() -> Self {
        Self::new(ReferenceData::sample())
    }

    fn next_id(counter: &AtomicI32) -> i32 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Id of the company's lead carrying `lead_number` or `vehicle_number`.
    fn lead_id_for(
        &self,
        company_id: i32,
        lead_number: Option<&str>,
        vehicle_number: Option<&str>,
    ) -> Option<i32> {
        self.store.leads.iter().find_map(|entry| {
            if entry.value().company_id != company_id {
                return None;
            }
            let header = entry.value().lead.header.as_ref()?;
            let by_number = lead_number.is_some_and(|n| header.lead_number.as_deref() == Some(n));
            let by_vehicle =
                vehicle_number.is_some_and(|v| header.vehicle_number.as_deref() == Some(v));
            (by_number || by_vehicle).then_some(*entry.key())
        })
    }

    fn require_lead(&self, lead_id: i32) -> Result<(), CoreError> {
        if self.store.leads.contains_key(&lead_id) {
            Ok(())
        } else {
            Err(CoreError::NotFound(format!("Lead {lead_id} was not found.")))
        }
    }

    fn store_applicant(&self, lead_id: i32, detail: ApplicantDetail) -> i32 {
        // Re-submitting replaces the applicant but keeps its id.
        let applicant_id = self
            .store
            .applicants
            .get(&lead_id)
            .map(|entry| entry.value().0)
            .unwrap_or_else(|| Self::next_id(&self.store.next_applicant_id));
        self.store.applicants.insert(lead_id, (applicant_id, detail));
        applicant_id
    }

    fn headers_of(&self, company_id: i32) -> Vec<LeadHeader> {
        let mut headers: Vec<LeadHeader> = self
            .store
            .leads
            .iter()
            .filter(|entry| entry.value().company_id == company_id)
            .filter_map(|entry| entry.value().lead.header.clone())
            .collect();
        headers.sort_by_key(|h| h.lead_id);
        headers
    }

    /// Display name of the applicant recorded for a lead.
    pub fn applicant_name(&self, lead_id: i32) -> Option<String> {
        self.store
            .applicants
            .get(&lead_id)
            .map(|entry| match &entry.value().1 {
                ApplicantDetail::Individual(person) => match &person.last_name {
                    Some(last) => format!("{} {last}", person.first_name),
                    None => person.first_name.clone(),
                },
                ApplicantDetail::NonIndividual(entity) => entity.entity_name.clone(),
            })
    }
}

#[async_trait]
impl ProspectRepository for InMemoryRepository {
    async fn prospect_lookups(&self) -> Result<Vec<Lookup>, CoreError> {
        Ok(self.store.reference.prospect_lookups.clone())
    }

    async fn states(&self) -> Result<Vec<Lookup>, CoreError> {
        Ok(self.store.reference.states.clone())
    }

    async fn lines_of_business(
        &self,
        _company_id: i32,
        _user_id: i32,
    ) -> Result<Vec<LineOfBusiness>, CoreError> {
        Ok(self.store.reference.lines_of_business.clone())
    }

    async fn document_categories(
        &self,
        _company_id: i32,
        _user_id: i32,
    ) -> Result<Vec<DocumentCategory>, CoreError> {
        Ok(self.store.reference.document_categories.clone())
    }

    async fn field_executives(
        &self,
        _company_id: i32,
        location_id: i32,
    ) -> Result<Vec<FieldExecutive>, CoreError> {
        Ok(self
            .store
            .reference
            .field_executives
            .iter()
            .filter(|e| e.location_id == location_id)
            .cloned()
            .collect())
    }

    async fn branch_locations(&self, filter: &LocationFilter) -> Result<Vec<Location>, CoreError> {
        Ok(self
            .store
            .reference
            .locations
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect())
    }

    async fn find_prospect(&self, search: &ProspectSearch) -> Result<Option<Prospect>, CoreError> {
        Ok(self
            .store
            .prospects
            .iter()
            .find(|entry| search.matches(entry.value()))
            .map(|entry| entry.value().clone()))
    }

    async fn create_prospect(&self, prospect: &NewProspect) -> Result<i32, CoreError> {
        if let Some(pan) = prospect.pan_number.as_deref() {
            let duplicate = self.store.prospects.iter().any(|entry| {
                entry.value().company_id == prospect.company_id
                    && entry.value().pan_number.as_deref() == Some(pan)
            });
            if duplicate {
                return Err(CoreError::Rejected(format!(
                    "A prospect with PAN {pan} already exists."
                )));
            }
        }

        let prospect_id = Self::next_id(&self.store.next_prospect_id);
        self.store.prospects.insert(
            prospect_id,
            prospect.clone().into_prospect(prospect_id, Utc::now()),
        );
        Ok(prospect_id)
    }

    async fn prospects_for_report(
        &self,
        filter: &ProspectReportFilter,
    ) -> Result<Vec<Prospect>, CoreError> {
        let mut prospects: Vec<Prospect> = self
            .store
            .prospects
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        prospects.sort_by_key(|p| p.prospect_id);
        Ok(prospects)
    }
}

#[async_trait]
impl LeadRepository for InMemoryRepository {
    async fn lead_statuses(&self) -> Result<Vec<LeadStatus>, CoreError> {
        Ok(self.store.reference.lead_statuses.clone())
    }

    async fn asset_lookups(&self, _company_id: i32, _user_id: i32) -> Result<Vec<Lookup>, CoreError> {
        Ok(self.store.reference.asset_lookups.clone())
    }

    async fn lead_generation_lookups(
        &self,
        _company_id: i32,
        _user_id: i32,
    ) -> Result<Vec<Lookup>, CoreError> {
        Ok(self.store.reference.lead_generation_lookups.clone())
    }

    async fn leads_for_prospect(
        &self,
        company_id: i32,
        prospect_id: i32,
    ) -> Result<Vec<LeadHeader>, CoreError> {
        Ok(self
            .headers_of(company_id)
            .into_iter()
            .filter(|h| h.prospect_id == prospect_id)
            .collect())
    }

    async fn lead_page(&self, request: &LeadPageRequest) -> Result<LeadPage, CoreError> {
        let matching: Vec<LeadHeader> = self
            .headers_of(request.company_id)
            .into_iter()
            .filter(|h| request.matches(h))
            .collect();
        let total_count = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let page_size = usize::try_from(request.page_size).unwrap_or_default();
        Ok(LeadPage {
            total_count,
            current_page: request.current_page,
            page_size: request.page_size,
            leads: matching
                .into_iter()
                .skip(request.offset())
                .take(page_size)
                .collect(),
        })
    }

    async fn find_lead(&self, search: &LeadSearch) -> Result<Option<Lead>, CoreError> {
        Ok(self.store.leads.iter().find_map(|entry| {
            let stored = entry.value();
            let header = stored.lead.header.as_ref()?;
            (stored.company_id == search.company_id && search.matches(header))
                .then(|| stored.lead.clone())
        }))
    }

    async fn create_lead_header(
        &self,
        company_id: i32,
        _user_id: i32,
        _location_id: i32,
        header: &LeadHeader,
    ) -> Result<LeadHeader, CoreError> {
        let lead_id = Self::next_id(&self.store.next_lead_id);
        let mut stored = header.clone();
        stored.lead_id = Some(lead_id);
        stored.lead_number = Some(format!("LD{company_id:03}{lead_id:06}"));
        if stored.status_id == 0 {
            stored.status_id = 1;
        }

        self.store.leads.insert(
            lead_id,
            StoredLead {
                company_id,
                lead: Lead {
                    header: Some(stored.clone()),
                    guarantors: Vec::new(),
                },
            },
        );
        Ok(stored)
    }

    async fn add_guarantors(&self, lead: &Lead) -> Result<bool, CoreError> {
        let Some(lead_id) = lead.lead_id() else {
            return Ok(false);
        };
        match self.store.leads.get_mut(&lead_id) {
            Some(mut entry) => {
                entry
                    .value_mut()
                    .lead
                    .guarantors
                    .extend(lead.guarantors.iter().cloned());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_individual_detail(
        &self,
        _company_id: i32,
        _user_id: i32,
        lead_id: i32,
        detail: &LeadIndividualDetail,
    ) -> Result<i32, CoreError> {
        self.require_lead(lead_id)?;
        Ok(self.store_applicant(lead_id, ApplicantDetail::Individual(detail.clone())))
    }

    async fn add_non_individual_detail(
        &self,
        _user_id: i32,
        lead_id: i32,
        detail: &LeadNonIndividualDetail,
    ) -> Result<i32, CoreError> {
        self.require_lead(lead_id)?;
        Ok(self.store_applicant(lead_id, ApplicantDetail::NonIndividual(detail.clone())))
    }
}

#[async_trait]
impl FieldVerificationRepository for InMemoryRepository {
    async fn lookups(
        &self,
        kind: FvrLookupKind,
        _company_id: i32,
        _user_id: i32,
    ) -> Result<Vec<Lookup>, CoreError> {
        let reference = &self.store.reference;
        Ok(match kind {
            FvrLookupKind::Hirer => reference.hirer_lookups.clone(),
            FvrLookupKind::Neighbour => reference.neighbour_lookups.clone(),
            FvrLookupKind::Asset => reference.fvr_asset_lookups.clone(),
        })
    }

    async fn hirer_details(&self, search: &HirerSearch) -> Result<Option<FvrDetail>, CoreError> {
        let Some(lead_id) = self.lead_id_for(
            search.company_id,
            search.lead_number.as_deref(),
            search.vehicle_number.as_deref(),
        ) else {
            return Ok(None);
        };
        Ok(self
            .store
            .verifications
            .iter()
            .find(|entry| {
                entry.value().lead_id == Some(lead_id)
                    && PersonType::Hirer.matches(&entry.value().person_type)
            })
            .map(|entry| entry.value().clone()))
    }

    async fn verification_detail(
        &self,
        company_id: i32,
        lead_id: i32,
        person_type: PersonType,
        field_verification_id: Option<i32>,
    ) -> Result<Option<FvrDetail>, CoreError> {
        let owned = self
            .store
            .leads
            .get(&lead_id)
            .is_some_and(|entry| entry.value().company_id == company_id);
        if !owned {
            return Ok(None);
        }
        Ok(self
            .store
            .verifications
            .iter()
            .filter(|entry| {
                let detail = entry.value();
                detail.lead_id == Some(lead_id)
                    && person_type.matches(&detail.person_type)
                    && field_verification_id.is_none_or(|id| *entry.key() == id)
            })
            .max_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone()))
    }

    async fn asset_details(&self, search: &AssetSearch) -> Result<Option<FvrAsset>, CoreError> {
        let Some(lead_id) = self.lead_id_for(
            search.company_id,
            search.lead_number.as_deref(),
            search.vehicle_number.as_deref(),
        ) else {
            return Ok(None);
        };
        Ok(self
            .store
            .assets
            .iter()
            .filter(|entry| entry.value().lead_id == Some(lead_id))
            .max_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone()))
    }

    async fn add_asset_detail(
        &self,
        _company_id: i32,
        _user_id: i32,
        lead_id: i32,
        asset: &FvrAsset,
    ) -> Result<i32, CoreError> {
        self.require_lead(lead_id)?;
        let verification_id = Self::next_id(&self.store.next_verification_id);
        let mut stored = asset.clone();
        stored.field_verification_id = Some(verification_id);
        stored.lead_id = Some(lead_id);
        self.store.assets.insert(verification_id, stored);
        Ok(verification_id)
    }

    async fn add_hirer_detail(
        &self,
        _company_id: i32,
        lead_id: i32,
        detail: &FvrDetail,
    ) -> Result<i32, CoreError> {
        self.require_lead(lead_id)?;
        let verification_id = Self::next_id(&self.store.next_verification_id);
        let mut stored = detail.clone();
        stored.field_verification_id = Some(verification_id);
        stored.lead_id = Some(lead_id);
        self.store.verifications.insert(verification_id, stored);
        Ok(verification_id)
    }
}
