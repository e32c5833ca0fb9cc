use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymdesk::config::Config;
use gymdesk::middleware::{ErrorHandler, RequestId};
use gymdesk::modules::{expenses, installments, members, memberships, payments};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymdesk=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting GymDesk back office");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Currency: {}", config.app.currency);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let frontend_origin = config.app.frontend_origin.clone();

    // Start HTTP server
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(ErrorHandler)
            .wrap(RequestId)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .route("/", web::get().to(index))
            .configure(members::controllers::configure)
            .configure(memberships::controllers::plan_controller::configure)
            .configure(memberships::controllers::membership_controller::configure)
            .configure(installments::controllers::configure)
            .configure(payments::controllers::configure)
            .configure(expenses::controllers::configure)
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "gymdesk"
    }))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "GymDesk Back Office",
        "version": "0.1.0",
        "status": "running"
    }))
}
