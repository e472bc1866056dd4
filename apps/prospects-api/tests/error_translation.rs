use async_trait::async_trait;
use axum_test::TestServer;
use core_lib::{
    Cache, CoreError, ProspectRepository,
    adapters::cms_document_store::CmsDocumentStore,
    domain::lookup::{DocumentCategory, FieldExecutive, LineOfBusiness, Location, LocationFilter, Lookup},
    domain::prospect::{NewProspect, Prospect, ProspectReportFilter, ProspectSearch},
};
use http::{HeaderName, HeaderValue, StatusCode};
use prospects_api::{AppState, application::middleware::AuthenticatedUser, create_app};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

async fn authorize(state: &AppState) {
    let user = serde_json::to_vec(&AuthenticatedUser {
        user_id: "7".into(),
    })
    .unwrap();
    state.tokens.set(TOKEN, &user).await.unwrap();
}

async fn setup(state: AppState) -> TestServer {
    authorize(&state).await;
    TestServer::new(create_app(state)).expect("Failed to create TestServer")
}

fn bearer() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {TOKEN}")).unwrap(),
    )
}

/// Prospect repository whose reads either fail or panic.
struct BrokenRepository {
    panic: bool,
}

#[async_trait]
impl ProspectRepository for BrokenRepository {
    async fn prospect_lookups(&self) -> Result<Vec<Lookup>, CoreError> {
        Err(CoreError::Configuration("lookup table missing".into()))
    }

    async fn states(&self) -> Result<Vec<Lookup>, CoreError> {
        if self.panic {
            panic!("state cache poisoned");
        }
        Err(CoreError::Infrastructure("connection timeout".into()))
    }

    async fn lines_of_business(&self, _: i32, _: i32) -> Result<Vec<LineOfBusiness>, CoreError> {
        Ok(Vec::new())
    }

    async fn document_categories(&self, _: i32, _: i32) -> Result<Vec<DocumentCategory>, CoreError> {
        Ok(Vec::new())
    }

    async fn field_executives(&self, _: i32, _: i32) -> Result<Vec<FieldExecutive>, CoreError> {
        Ok(Vec::new())
    }

    async fn branch_locations(&self, _: &LocationFilter) -> Result<Vec<Location>, CoreError> {
        Ok(Vec::new())
    }

    async fn find_prospect(&self, _: &ProspectSearch) -> Result<Option<Prospect>, CoreError> {
        Ok(None)
    }

    async fn create_prospect(&self, _: &NewProspect) -> Result<i32, CoreError> {
        Err(CoreError::Internal("read-only".into()))
    }

    async fn prospects_for_report(&self, _: &ProspectReportFilter) -> Result<Vec<Prospect>, CoreError> {
        Err(CoreError::Infrastructure("report query cancelled".into()))
    }
}

fn assert_no_validation_errors(body: &Value) {
    assert_eq!(body["validationErrors"], json!({}));
}

#[tokio::test]
async fn invalid_pan_yields_validation_document() {
    let server = setup(AppState::in_memory()).await;
    let (name, value) = bearer();

    let response = server
        .post("/api/Prospects/CreateNewProspect")
        .add_header(name, value)
        .json(&json!({
            "companyId": 1,
            "userId": 7,
            "name": "Ravi Kumar",
            "mobileNumber": "9876543210",
            "panNumber": "ABC12",
            "stateId": 33,
            "lobId": 1,
            "locationId": 10
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "statusCode": 400,
            "message": "Request validation failed.",
            "validationErrors": {"panNumber": ["invalid format"]},
            "additionalData": {}
        })
    );
}

#[tokio::test]
async fn missing_hirer_details_yield_handler_document() {
    let server = setup(AppState::in_memory()).await;
    let (name, value) = bearer();

    let response = server
        .get("/api/FieldVerification/GetLeadHirerDetails")
        .add_query_param("userId", "7")
        .add_query_param("companyId", "1")
        .add_query_param("mode", "view")
        .add_query_param("leadNumber", "LD001000009")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["message"], "No records found");
    assert_no_validation_errors(&body);
    assert!(body.get("innerError").is_none());
    assert_eq!(body["additionalData"]["requestType"], "GetLeadHirerDetails.Query");

    let request: Value =
        serde_json::from_str(body["additionalData"]["request"].as_str().unwrap()).unwrap();
    assert_eq!(request["userId"], 7);
    assert_eq!(request["companyId"], 1);
    assert_eq!(request["mode"], "view");
    assert_eq!(request["leadNumber"], "LD001000009");
}

#[tokio::test]
async fn infrastructure_error_yields_unclassified_document() {
    let mut state = AppState::in_memory();
    state.prospects = Arc::new(BrokenRepository { panic: false });
    let server = setup(state).await;
    let (name, value) = bearer();

    let response = server
        .get("/api/Prospects/GetStates")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["statusCode"], 500);
    assert_eq!(body["message"], "An unexpected error occurred.");
    assert_no_validation_errors(&body);
    assert_eq!(body["innerError"]["errorType"], "Infrastructure");
    assert_eq!(body["innerError"]["message"], "connection timeout");
    assert!(!response.text().to_lowercase().contains("backtrace"));
}

#[tokio::test]
async fn handler_panic_yields_unclassified_document() {
    let mut state = AppState::in_memory();
    state.prospects = Arc::new(BrokenRepository { panic: true });
    let server = setup(state).await;
    let (name, value) = bearer();

    let response = server
        .get("/api/Prospects/GetStates")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["statusCode"], 500);
    assert_eq!(body["innerError"]["errorType"], "Panic");
    assert!(!response.text().contains("state cache poisoned"));
}

#[tokio::test]
async fn file_server_status_is_passed_through() {
    let cms = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/kyc.pdf"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"missing"}"#))
        .mount(&cms)
        .await;

    let mut state = AppState::in_memory();
    state.documents = Some(Arc::new(
        CmsDocumentStore::new(&cms.uri(), "documents").unwrap(),
    ));
    let server = setup(state).await;
    let (name, value) = bearer();

    let response = server
        .get("/api/Prospects/DownloadDocument")
        .add_query_param("fileName", "kyc.pdf")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["message"], "An upstream service request failed.");
    assert_no_validation_errors(&body);
    assert_eq!(body["innerError"]["errorType"], "UpstreamServiceFailure");
    assert_eq!(body["innerError"]["statusCode"], 404);
    assert_eq!(
        body["innerError"]["additionalData"]["responseData"],
        r#"{"error":"missing"}"#
    );
}

#[tokio::test]
async fn unreachable_file_server_is_bad_gateway() {
    let mut state = AppState::in_memory();
    // Nothing listens on port 9 of the loopback interface.
    state.documents = Some(Arc::new(
        CmsDocumentStore::new("http://127.0.0.1:9", "documents").unwrap(),
    ));
    let server = setup(state).await;
    let (name, value) = bearer();

    let response = server
        .get("/api/Prospects/DownloadDocument")
        .add_query_param("fileName", "kyc.pdf")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert!(response.json::<Value>()["innerError"]["additionalData"]
        .as_object()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn missing_token_yields_unauthorized_document() {
    let server = setup(AppState::in_memory()).await;

    let response = server.get("/api/Prospects/GetStates").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert_eq!(body["statusCode"], 401);
    assert_no_validation_errors(&body);
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let server = setup(AppState::in_memory()).await;

    let response = server
        .get("/api/FieldVerification/GetFvrHirerLookup")
        .add_query_param("companyId", "1")
        .add_query_param("userId", "7")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer someone-else"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_body_is_a_validation_failure() {
    let server = setup(AppState::in_memory()).await;
    let (name, value) = bearer();

    let response = server
        .post("/api/Prospects/GetBranchLocations")
        .add_header(name, value)
        .text("{not json")
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "Request validation failed.");
    assert!(body["validationErrors"]["body"].is_array());
}

#[tokio::test]
async fn unparsable_query_is_a_validation_failure() {
    let server = setup(AppState::in_memory()).await;

    let response = server
        .get("/api/Leads/GetLeadDetails")
        .add_query_param("companyId", "one")
        .add_query_param("userId", "7")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["validationErrors"]["query"].is_array());
}

#[tokio::test]
async fn file_server_redirect_status_becomes_bad_gateway() {
    let cms = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/kyc.pdf"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&cms)
        .await;

    let mut state = AppState::in_memory();
    state.documents = Some(Arc::new(
        CmsDocumentStore::new(&cms.uri(), "documents").unwrap(),
    ));
    let server = setup(state).await;
    let (name, value) = bearer();

    let response = server
        .get("/api/Prospects/DownloadDocument")
        .add_query_param("fileName", "kyc.pdf")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body = response.json::<Value>();
    assert_eq!(body["statusCode"], 502);
    assert_eq!(body["innerError"]["statusCode"], 502);
    assert_eq!(body["innerError"]["errorType"], "UpstreamServiceFailure");
}

#[tokio::test]
async fn failed_report_query_yields_unclassified_document() {
    let mut state = AppState::in_memory();
    state.prospects = Arc::new(BrokenRepository { panic: false });
    let server = setup(state).await;
    let (name, value) = bearer();

    let response = server
        .get("/api/Prospects/DownloadProspectReport")
        .add_query_param("companyId", "1")
        .add_query_param("userId", "7")
        .add_query_param("outputType", "pdf")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["innerError"]["errorType"], "Infrastructure");
    assert_eq!(body["innerError"]["message"], "report query cancelled");
}
