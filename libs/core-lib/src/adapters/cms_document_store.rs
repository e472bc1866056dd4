use crate::{CoreError, DocumentStore};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Status reported when the file server is unreachable or answers outside 4xx/5xx.
const BAD_GATEWAY: u16 = 502;

/// Document store backed by the CMS file server's REST interface.
///
/// Documents are fetched with `GET {base_url}/{base_path}/{file_name}`. Any non-success
/// answer becomes [`CoreError::Upstream`] carrying the raw response body. 4xx and 5xx
/// statuses pass through; anything else (redirects, 304) is reported as 502.
#[derive(Debug, Clone)]
pub struct CmsDocumentStore {
    http: reqwest::Client,
    base_url: String,
    base_path: String,
}

impl CmsDocumentStore {
    pub fn new(base_url: &str, base_path: &str) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::Configuration(format!("failed to build CMS client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            base_path: base_path.trim_matches('/').to_string(),
        })
    }

    fn document_url(&self, file_name: &str) -> String {
        if self.base_path.is_empty() {
            format!("{}/{}", self.base_url, file_name)
        } else {
            format!("{}/{}/{}", self.base_url, self.base_path, file_name)
        }
    }
}

#[async_trait]
impl DocumentStore for CmsDocumentStore {
    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>, CoreError> {
        let url = self.document_url(file_name);
        debug!("Fetching document from CMS: {}", url);

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!("CMS request failed: {}", e);
            CoreError::Upstream {
                status: BAD_GATEWAY,
                message: format!("File server request failed: {e}"),
                response_data: None,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(|e| CoreError::Upstream {
                status: BAD_GATEWAY,
                message: format!("Failed to read file server response: {e}"),
                response_data: None,
            })?;
            Ok(bytes.to_vec())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!("CMS returned {} for {}", status, file_name);
            let reported = if status.is_client_error() || status.is_server_error() {
                status.as_u16()
            } else {
                BAD_GATEWAY
            };
            Err(CoreError::Upstream {
                status: reported,
                message: format!("File server returned {status} for {file_name}"),
                response_data: (!body.is_empty()).then_some(body),
            })
        }
    }
}
