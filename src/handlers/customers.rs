use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::invoice::CustomerSummary;
use crate::domain::ports::CustomerDirectory;
use crate::errors::AppError;
use crate::infrastructure::dashboard_store::DieselDashboardStore;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchCustomersParams {
    /// Case-insensitive search over customer name and email.
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    /// Sum of pending invoice amounts, in cents.
    pub total_pending: i64,
    /// Sum of paid invoice amounts, in cents.
    pub total_paid: i64,
}

impl From<CustomerSummary> for CustomerResponse {
    fn from(summary: CustomerSummary) -> Self {
        CustomerResponse {
            id: summary.id,
            name: summary.name,
            email: summary.email,
            image_url: summary.image_url,
            total_invoices: summary.total_invoices,
            total_pending: summary.total_pending,
            total_paid: summary.total_paid,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /dashboard/customers
///
/// Customers matching the search query, with per-customer invoice totals.
#[utoipa::path(
    get,
    path = "/dashboard/customers",
    params(
        ("query" = Option<String>, Query, description = "Search over customer name and email"),
    ),
    responses(
        (status = 200, description = "Matching customers", body = [CustomerResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    store: web::Data<DieselDashboardStore>,
    params: web::Query<SearchCustomersParams>,
) -> Result<HttpResponse, AppError> {
    let query = params.into_inner().query.trim().to_string();
    let store = store.into_inner();

    let summaries = web::block(move || store.search(&query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let customers: Vec<CustomerResponse> =
        summaries.into_iter().map(CustomerResponse::from).collect();
    Ok(HttpResponse::Ok().json(customers))
}
