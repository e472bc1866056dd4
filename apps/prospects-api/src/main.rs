use core_lib::{
    Cache, DocumentStore, FieldVerificationRepository, LeadRepository, ProspectRepository,
    adapters::{
        cms_document_store::CmsDocumentStore, in_memory_cache::InMemoryCache,
        in_memory_repository::InMemoryRepository, postgres_repository::PostgresRepository,
    },
};
use dotenvy::dotenv;
use prospects_api::{
    AppState,
    application::{errors::ErrorTranslator, middleware::AuthenticatedUser},
    config::AppConfig,
    create_app,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

// Configured tokens live for the lifetime of the process.
const TOKEN_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

struct Repositories {
    prospects: Arc<dyn ProspectRepository>,
    leads: Arc<dyn LeadRepository>,
    field_verifications: Arc<dyn FieldVerificationRepository>,
}

async fn repositories(database_url: Option<&str>) -> Result<Repositories, sqlx::Error> {
    match database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            info!("Connected to Postgres, using stored-function repository");
            let repository = Arc::new(PostgresRepository::new(pool));
            Ok(Repositories {
                prospects: repository.clone(),
                leads: repository.clone(),
                field_verifications: repository,
            })
        }
        None => {
            warn!("DATABASE_URL not set, using seeded in-memory repository");
            let repository = Arc::new(InMemoryRepository::seeded());
            Ok(Repositories {
                prospects: repository.clone(),
                leads: repository.clone(),
                field_verifications: repository,
            })
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing (logging)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting FOS Prospects API v{}...", env!("CARGO_PKG_VERSION"));
    // Load environment (.env) if present
    dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let repositories = match repositories(config.database_url.as_deref()).await {
        Ok(repositories) => repositories,
        Err(e) => {
            error!("Failed to connect to Postgres: {}", e);
            return;
        }
    };

    let documents: Option<Arc<dyn DocumentStore>> = match &config.cms {
        Some(cms) => match CmsDocumentStore::new(&cms.url, &cms.path) {
            Ok(store) => {
                info!("Documents served from file server at {}", cms.url);
                Some(Arc::new(store))
            }
            Err(e) => {
                error!("Failed to create file server client: {}", e);
                return;
            }
        },
        None => {
            warn!("FOS_CMS_URL not set (document downloads disabled)");
            None
        }
    };

    let tokens: Arc<dyn Cache> = Arc::new(InMemoryCache::new(10_000, TOKEN_TTL_SECONDS));
    for api_token in &config.api_tokens {
        let user = AuthenticatedUser {
            user_id: api_token.user_id.clone(),
        };
        let seeded = match serde_json::to_vec(&user) {
            Ok(bytes) => tokens.set(&api_token.token, &bytes).await,
            Err(e) => Err(core_lib::CoreError::Internal(e.to_string())),
        };
        if let Err(e) = seeded {
            error!("Failed to register API token for user {}: {}", user.user_id, e);
            return;
        }
    }
    if config.api_tokens.is_empty() {
        warn!("FOS_API_TOKENS not set; authenticated routes will reject every request");
    }

    let app_state = AppState {
        prospects: repositories.prospects,
        leads: repositories.leads,
        field_verifications: repositories.field_verifications,
        documents,
        tokens,
        translator: Arc::new(ErrorTranslator::default()),
    };

    let app = create_app(app_state).layer(config.cors_layer());

    info!("FOS Prospects API listening on {}", config.bind_addr);

    // Create a TCP listener
    let listener = TcpListener::bind(config.bind_addr).await.unwrap_or_else(|e| {
        panic!("Failed to bind to address {}: {}", config.bind_addr, e);
    });

    // Run the server
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap_or_else(|e| {
            panic!("Server failed to run: {}", e);
        });
}
