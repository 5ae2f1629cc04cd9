use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::application::auth::{authenticate, LoginOutcome};
use crate::errors::AppError;
use crate::infrastructure::credential_verifier::DieselCredentialVerifier;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// POST /login
///
/// Checks the submitted credentials. Classified failures come back inline as
/// a message; anything else surfaces as a server error.
#[utoipa::path(
    post,
    path = "/login",
    responses(
        (status = 303, description = "Authenticated; redirect to the dashboard"),
        (status = 401, description = "Credentials rejected; message in the body"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "auth"
)]
pub async fn login(
    verifier: web::Data<DieselCredentialVerifier>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let verifier = verifier.into_inner();

    let outcome = web::block(move || authenticate(verifier.as_ref(), &form.email, &form.password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(match outcome {
        LoginOutcome::Redirect(path) => HttpResponse::SeeOther()
            .insert_header((LOCATION, path))
            .finish(),
        LoginOutcome::Rejected(message) => {
            HttpResponse::Unauthorized().json(json!({ "message": message }))
        }
    })
}
