pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::invoice_actions::InvoiceActions;
use infrastructure::credential_verifier::DieselCredentialVerifier;
use infrastructure::dashboard_store::DieselDashboardStore;
use infrastructure::listing_cache::InMemoryListingCache;

pub use db::{create_pool, DbPool};

/// The mutation pipeline as wired for the running service: diesel store,
/// shared in-process listing cache.
pub type AppActions = InvoiceActions<DieselDashboardStore, Arc<InMemoryListingCache>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::create_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::delete_invoice,
        handlers::customers::list_customers,
        handlers::auth::login,
    ),
    components(schemas(
        handlers::invoices::InvoiceResponse,
        handlers::invoices::ListInvoicesResponse,
        handlers::customers::CustomerResponse,
        handlers::auth::LoginForm,
    )),
    tags(
        (name = "invoices", description = "Invoice listing and mutations"),
        (name = "customers", description = "Customer directory"),
        (name = "auth", description = "Credentials login"),
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    // One cache for the whole server: invalidations issued by one worker must
    // be visible to all of them.
    let cache = Arc::new(InMemoryListingCache::new());

    Ok(HttpServer::new(move || {
        let store = DieselDashboardStore::new(pool.clone());
        let actions = InvoiceActions::new(store.clone(), cache.clone());
        let verifier = DieselCredentialVerifier::new(pool.clone());

        App::new()
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(store))
            .app_data(web::Data::new(actions))
            .app_data(web::Data::new(verifier))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .service(
                web::scope("/dashboard")
                    .route("/invoices", web::get().to(handlers::invoices::list_invoices))
                    .route("/invoices", web::post().to(handlers::invoices::create_invoice))
                    .route("/invoices/{id}", web::get().to(handlers::invoices::get_invoice))
                    .route("/invoices/{id}", web::put().to(handlers::invoices::update_invoice))
                    .route(
                        "/invoices/{id}",
                        web::delete().to(handlers::invoices::delete_invoice),
                    )
                    .route("/customers", web::get().to(handlers::customers::list_customers)),
            )
            .route("/login", web::post().to(handlers::auth::login))
    })
    .bind((host.to_string(), port))?
    .run())
}
