use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use licensor::config::Config;
use licensor::db::{create_pool, init_db, queries, AppState};
use licensor::handlers;
use licensor::models::{CreateBrand, CreateCustomer, CreateLicense, CreateProduct};

#[derive(Parser, Debug)]
#[command(name = "licensor")]
#[command(about = "Centralized license issuance, activation, and validation engine")]
struct Cli {
    /// Seed the database with dev data (brand, product, customer, license)
    #[arg(long)]
    seed: bool,
}

/// Seeds the database with dev data for testing.
/// Only runs in dev mode and when the database is empty.
fn seed_dev_data(state: &AppState) {
    let mut conn = state.db.get().expect("Failed to get db connection for seeding");

    let existing = queries::list_brands(&conn, 1, 0).expect("Failed to list brands");
    if !existing.is_empty() {
        tracing::info!("Database already has data, skipping seed");
        return;
    }

    let brand = queries::create_brand(
        &conn,
        &CreateBrand {
            name: "Acme Software".to_string(),
            email: "licensing@acme.example".to_string(),
        },
    )
    .expect("Failed to create dev brand");

    let product = queries::create_product(
        &conn,
        &CreateProduct {
            name: "Acme Studio Pro".to_string(),
            brand_id: brand.id.clone(),
        },
    )
    .expect("Failed to create dev product");

    let customer = queries::create_customer(
        &conn,
        &CreateCustomer {
            email: "dev@licensor.local".to_string(),
        },
    )
    .expect("Failed to create dev customer");

    let license = queries::create_license(
        &mut conn,
        &CreateLicense {
            customer_id: customer.id.clone(),
            product_id: product.id.clone(),
            key: None,
            max_seats: 3,
            expires_at: None,
        },
    )
    .expect("Failed to create dev license");

    tracing::info!("============================================");
    tracing::info!("DEV DATA SEEDED");
    tracing::info!("Brand:    {} ({})", brand.name, brand.id);
    tracing::info!("Product:  {} ({})", product.name, product.id);
    tracing::info!("Customer: {} ({})", customer.email, customer.id);
    tracing::info!("License:  {} ({} seats)", license.id, license.max_seats);
    tracing::info!("Key:      {}", license.key);
    tracing::info!("============================================");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "licensor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let state = AppState { db: db_pool };

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed flag ignored: not in dev mode (set LICENSOR_ENV=dev)");
        } else {
            seed_dev_data(&state);
        }
    }

    let app = handlers::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Licensor server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
