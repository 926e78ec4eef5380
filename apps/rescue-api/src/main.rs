use core_lib::{
    AdoptionRepository, BreedRepository, CatRepository, PasswordEncoder, UserRepository,
    adapters::{
        InMemoryAdoptionRepository, InMemoryBreedRepository, InMemoryCatRepository,
        InMemoryUserRepository, TheCatApiClient,
    },
};
use dotenvy::dotenv;
use rescue_api::{
    AppState,
    application::{
        breed_import::BreedImporter, data_init::DataInitializer, password::Argon2PasswordEncoder,
        token::TokenService,
    },
    config::AppConfig,
    create_app,
};
use std::{process::ExitCode, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment (.env) if present, before RUST_LOG is read
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Rescue API v{}...", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // A weak secret must stop the service before it issues anything
    let tokens = match TokenService::new(&config.jwt_secret, config.jwt_expiration_ms) {
        Ok(tokens) => Arc::new(tokens),
        Err(e) => {
            error!("Token service setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::default());
    let cats: Arc<dyn CatRepository> = Arc::new(InMemoryCatRepository::default());
    let breeds: Arc<dyn BreedRepository> = Arc::new(InMemoryBreedRepository::default());
    let adoptions: Arc<dyn AdoptionRepository> = Arc::new(InMemoryAdoptionRepository::default());
    let passwords: Arc<dyn PasswordEncoder> = Arc::new(Argon2PasswordEncoder::default());

    if config.cat_api.fetch_on_startup {
        match TheCatApiClient::new(&config.cat_api.base_url, config.cat_api.api_key.clone()) {
            Ok(client) => {
                let importer = BreedImporter::new(Arc::new(client), breeds.clone());
                if let Err(e) = importer.import().await {
                    warn!("Breed import failed, continuing without breeds: {}", e);
                }
            }
            Err(e) => warn!("Could not create Cat API client: {}", e),
        }
    } else {
        info!("Breed import on startup disabled");
    }

    if config.data_init_enabled {
        let initializer = DataInitializer::new(
            users.clone(),
            cats.clone(),
            breeds.clone(),
            adoptions.clone(),
            passwords.clone(),
        );
        if let Err(e) = initializer.initialize_data().await {
            warn!("Sample data initialization failed: {}", e);
        }
    }

    let app = create_app(AppState {
        users,
        cats,
        breeds,
        adoptions,
        passwords,
        tokens,
    });

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", config.bind_addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Rescue API listening on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server failed to run: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
