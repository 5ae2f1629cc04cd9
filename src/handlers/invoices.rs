use std::sync::Arc;

use actix_web::http::header::{ContentType, LOCATION};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::invoice_actions::{ActionOutcome, INVOICES_PATH};
use crate::domain::form::FormInput;
use crate::domain::invoice::InvoiceView;
use crate::domain::pagination::{generate_pagination, PageItem};
use crate::errors::AppError;
use crate::infrastructure::listing_cache::InMemoryListingCache;
use crate::AppActions;

/// Invoices shown per listing page.
pub const ITEMS_PER_PAGE: i64 = 6;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListInvoicesParams {
    /// Case-insensitive search over customer name, customer email, and status.
    #[serde(default)]
    pub query: String,
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_image_url: String,
    /// Amount in cents.
    pub amount: i64,
    pub status: String,
    /// Calendar day in YYYY-MM-DD form.
    pub date: String,
}

impl From<InvoiceView> for InvoiceResponse {
    fn from(view: InvoiceView) -> Self {
        InvoiceResponse {
            id: view.id,
            customer_id: view.customer_id,
            customer_name: view.customer_name,
            customer_email: view.customer_email,
            customer_image_url: view.customer_image_url,
            amount: view.amount_cents,
            status: view.status.to_string(),
            date: view.date.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListInvoicesResponse {
    pub items: Vec<InvoiceResponse>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    /// Page labels for the pagination control: numbers and "..." markers.
    #[schema(value_type = Vec<String>)]
    pub pagination: Vec<PageItem>,
}

// ── Outcome mapping ──────────────────────────────────────────────────────────

fn outcome_response(outcome: ActionOutcome) -> HttpResponse {
    match outcome {
        ActionOutcome::Redirect(path) => HttpResponse::SeeOther()
            .insert_header((LOCATION, path))
            .finish(),
        ActionOutcome::Completed(message) => {
            HttpResponse::Ok().json(json!({ "message": message }))
        }
        ActionOutcome::Invalid {
            field_errors,
            message,
        } => HttpResponse::UnprocessableEntity().json(json!({
            "message": message,
            "errors": field_errors,
        })),
        ActionOutcome::Failed(message) => {
            HttpResponse::InternalServerError().json(json!({ "message": message }))
        }
    }
}

fn listing_key(query: &str, page: i64) -> String {
    format!("{}?query={}&page={}", INVOICES_PATH, query, page)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /dashboard/invoices
///
/// Paginated, filterable invoice listing joined with customer details.
/// Responses are served from the listing cache until a mutation invalidates
/// it.
#[utoipa::path(
    get,
    path = "/dashboard/invoices",
    params(
        ("query" = Option<String>, Query, description = "Search over customer name, email, and status"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
    ),
    responses(
        (status = 200, description = "One page of invoices", body = ListInvoicesResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn list_invoices(
    actions: web::Data<AppActions>,
    cache: web::Data<Arc<InMemoryListingCache>>,
    params: web::Query<ListInvoicesParams>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    let page = params.page.max(1);
    let query = params.query.trim().to_string();

    let key = listing_key(&query, page);
    if let Some(body) = cache.lookup(&key) {
        return Ok(HttpResponse::Ok().content_type(ContentType::json()).body(body));
    }

    let actions = actions.into_inner();
    let listing = {
        let query = query.clone();
        web::block(move || actions.list_invoices(&query, page, ITEMS_PER_PAGE))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??
    };

    let total_pages = (listing.total + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE;
    let response = ListInvoicesResponse {
        items: listing.items.into_iter().map(InvoiceResponse::from).collect(),
        total: listing.total,
        page,
        total_pages,
        pagination: generate_pagination(page, total_pages),
    };

    let body = serde_json::to_string(&response).map_err(|e| AppError::Internal(e.to_string()))?;
    cache.store(&key, body.clone());

    Ok(HttpResponse::Ok().content_type(ContentType::json()).body(body))
}

/// GET /dashboard/invoices/{id}
#[utoipa::path(
    get,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 200, description = "Invoice found", body = InvoiceResponse),
        (status = 404, description = "Invoice not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    actions: web::Data<AppActions>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let actions = actions.into_inner();

    let result = web::block(move || actions.get_invoice(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(invoice) => Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice))),
        None => Err(AppError::NotFound),
    }
}

/// POST /dashboard/invoices
///
/// Runs the create pipeline over the submitted form. Succeeds with a 303 to
/// the invoices listing; validation failures come back as 422 with per-field
/// messages.
#[utoipa::path(
    post,
    path = "/dashboard/invoices",
    responses(
        (status = 303, description = "Invoice created; redirect to the listing"),
        (status = 422, description = "Validation failed; field errors in the body"),
        (status = 500, description = "The store rejected the write"),
    ),
    tag = "invoices"
)]
pub async fn create_invoice(
    actions: web::Data<AppActions>,
    form: web::Form<FormInput>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let actions = actions.into_inner();

    let outcome = web::block(move || actions.create_invoice(&form))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(outcome_response(outcome))
}

/// PUT /dashboard/invoices/{id}
#[utoipa::path(
    put,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 303, description = "Invoice updated; redirect to the listing"),
        (status = 422, description = "Validation failed; field errors in the body"),
        (status = 500, description = "The store rejected the write"),
    ),
    tag = "invoices"
)]
pub async fn update_invoice(
    actions: web::Data<AppActions>,
    path: web::Path<Uuid>,
    form: web::Form<FormInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let form = form.into_inner();
    let actions = actions.into_inner();

    let outcome = web::block(move || actions.update_invoice(id, &form))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(outcome_response(outcome))
}

/// DELETE /dashboard/invoices/{id}
#[utoipa::path(
    delete,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 200, description = "Invoice deleted"),
        (status = 500, description = "The store rejected the delete"),
    ),
    tag = "invoices"
)]
pub async fn delete_invoice(
    actions: web::Data<AppActions>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let actions = actions.into_inner();

    let outcome = web::block(move || actions.delete_invoice(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(outcome_response(outcome))
}
