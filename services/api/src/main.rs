use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use api::jwt::{JwtConfig, TokenService};
use api::repositories::{IncidentRepository, UserRepository, VehicleRepository};
use api::routes::create_router;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting fleet API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!().run(&pool).await?;
    info!("Database migrations applied");

    // The signing secret is loaded once and shared, immutable, across all
    // request handlers
    let jwt_config = JwtConfig::from_env()?;
    let token_service = TokenService::new(&jwt_config);

    let user_repository = UserRepository::new(pool.clone());
    let vehicle_repository = VehicleRepository::new(pool.clone());
    let incident_repository = IncidentRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        vehicle_repository,
        incident_repository,
        token_service,
    };

    // Start the web server
    let app = create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Fleet API service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
