use actix_web::{HttpResponse, Responder, http, http::StatusCode, web};

use crate::services::resolver::{RedirectError, resolve};
use crate::state::app_state::AppState;

/// Forward a scanned dynamic QR code to its current destination.
pub async fn redirect_to_destination(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let code = path.into_inner();
    match resolve(app_state.store.clone(), Some(code.as_str())).await {
        // Accounting runs detached; the redirect does not wait for it
        Ok(redirect) => HttpResponse::Found()
            .append_header((http::header::LOCATION, redirect.destination))
            .finish(),
        Err(err) => error_page(err),
    }
}

/// `/r` without a code.
pub async fn redirect_without_code(app_state: web::Data<AppState>) -> impl Responder {
    match resolve(app_state.store.clone(), None).await {
        Ok(redirect) => HttpResponse::Found()
            .append_header((http::header::LOCATION, redirect.destination))
            .finish(),
        Err(err) => error_page(err),
    }
}

fn status_for(err: RedirectError) -> StatusCode {
    match err {
        RedirectError::InvalidCode => StatusCode::BAD_REQUEST,
        RedirectError::NotFound => StatusCode::NOT_FOUND,
        RedirectError::Deactivated => StatusCode::GONE,
        RedirectError::Malformed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_page(err: RedirectError) -> HttpResponse {
    let body = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Oops!</title></head>\n\
         <body>\n<h1>Oops!</h1>\n<p>{}</p>\n<a href=\"/\">Go to the home page</a>\n</body>\n</html>\n",
        err
    );
    HttpResponse::build(status_for(err))
        .content_type("text/html; charset=utf-8")
        .body(body)
}
