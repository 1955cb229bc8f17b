use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::errors::AppError;
use crate::middlewares::authmw::current_owner;
use crate::models::payload::QrPayload;
use crate::services::qr_codes::{self, ListFilter, NewQrCode, QrCodeEdit};
use crate::state::app_state::AppState;
use crate::structs::qr_request::{
    CreateQrRequest, DownloadParams, ListParams, PreviewRequest, PreviewResponse, QrCodeResponse,
    StatsResponse, UpdateQrRequest,
};

const DEFAULT_DOWNLOAD_SIZE: u32 = 512;

fn parse_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::InvalidRequest("Invalid QR code ID format".to_string()))
}

fn check<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|errors| AppError::InvalidRequest(errors.to_string()))
}

/// Create a static or dynamic QR code
pub async fn create_qr_code(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    web::Json(body): web::Json<CreateQrRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = current_owner(&req)?;
    check(&body)?;

    let payload = QrPayload::from_parts(&body.qr_type, body.data)?;
    let record = qr_codes::create_qr_code(
        app_state.store.as_ref(),
        &app_state.config,
        &owner_id,
        NewQrCode {
            name: body.name,
            payload,
            is_dynamic: body.is_dynamic,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(QrCodeResponse::from(record)))
}

/// Validate form data and return the string that would be encoded
pub async fn preview_qr_code(
    web::Json(body): web::Json<PreviewRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = QrPayload::from_parts(&body.qr_type, body.data)?;
    let content = qr_codes::preview(&payload)?;
    Ok(HttpResponse::Ok().json(PreviewResponse { content }))
}

pub async fn get_qr_code(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = current_owner(&req)?;
    let id = parse_id(&path.into_inner())?;

    let record = qr_codes::get_owned(app_state.store.as_ref(), &owner_id, &id).await?;
    Ok(HttpResponse::Ok().json(QrCodeResponse::from(record)))
}

/// List the caller's QR codes, newest first
pub async fn get_owner_qr_codes(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    // Ownership of `owner_id` is enforced by the ResourceOwnership middleware
    let owner_id = path.into_inner();
    let params = query.into_inner();
    let filter = ListFilter {
        search: params.search,
        limit: params.limit,
    };

    let records = qr_codes::list_qr_codes(app_state.store.as_ref(), &owner_id, &filter).await?;
    let response: Vec<QrCodeResponse> = records.into_iter().map(QrCodeResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_owner_stats(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = path.into_inner();
    let stats = qr_codes::owner_stats(app_state.store.as_ref(), &owner_id).await?;
    Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
}

/// Change name, destination or status of a dynamic QR code
pub async fn update_qr_code(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    web::Json(body): web::Json<UpdateQrRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = current_owner(&req)?;
    let id = parse_id(&path.into_inner())?;
    check(&body)?;

    let record = qr_codes::edit_qr_code(
        app_state.store.as_ref(),
        &owner_id,
        &id,
        QrCodeEdit {
            name: body.name,
            redirect_url: body.redirect_url,
            is_active: body.is_active,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(QrCodeResponse::from(record)))
}

pub async fn delete_qr_code(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = current_owner(&req)?;
    let id = parse_id(&path.into_inner())?;

    qr_codes::delete_qr_code(app_state.store.as_ref(), &owner_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Download the QR code as PNG, JPEG or SVG
pub async fn download_qr_code(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<DownloadParams>,
) -> Result<HttpResponse, AppError> {
    let owner_id = current_owner(&req)?;
    let id = parse_id(&path.into_inner())?;
    let params = query.into_inner();
    let size = params.size.unwrap_or(DEFAULT_DOWNLOAD_SIZE);

    let rendered =
        qr_codes::download_qr_code(app_state.store.as_ref(), &owner_id, &id, params.format, size)
            .await?;

    Ok(HttpResponse::Ok()
        .content_type(rendered.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(rendered.file_name)],
        })
        .body(rendered.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store::InMemoryQrCodeStore;
    use crate::routes::init_routes;
    use crate::test_support::{bearer, test_state};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    macro_rules! app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(test_state($store))
                    .configure(init_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn requires_token() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));
        let req = test::TestRequest::post()
            .uri("/api/qr-codes")
            .set_json(json!({"name": "x", "type": "text", "data": {"text": "hi"}}))
            .to_request();
        let resp = test::try_call_service(&app, req).await;
        let status = match resp {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_then_fetch_dynamic_code() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));

        let req = test::TestRequest::post()
            .uri("/api/qr-codes")
            .insert_header(bearer("alice"))
            .set_json(json!({
                "name": "Guest wifi",
                "type": "wifi",
                "data": {"ssid": "Net1", "password": "pw123", "encryption": "WPA", "hidden": true},
                "is_dynamic": true
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;

        assert_eq!(created["type"], "wifi");
        assert_eq!(created["redirect_url"], "WIFI:T:WPA;S:Net1;P:pw123;H:true;;");
        let short_code = created["short_code"].as_str().unwrap();
        assert!(created["content"].as_str().unwrap().ends_with(&format!("/r/{}", short_code)));

        let id = created["id"].as_str().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/api/qr-codes/{}", id))
            .insert_header(bearer("alice"))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["name"], "Guest wifi");
        assert_eq!(fetched["scan_count"], 0);
    }

    #[actix_web::test]
    async fn validation_errors_are_bad_requests() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));

        let req = test::TestRequest::post()
            .uri("/api/qr-codes")
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Mail", "type": "email", "data": {"email": "not-an-email"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid email");

        let req = test::TestRequest::post()
            .uri("/api/qr-codes")
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Sms", "type": "sms", "data": {}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "unsupported QR code type: sms");
    }

    #[actix_web::test]
    async fn preview_returns_formatted_content() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));
        let req = test::TestRequest::post()
            .uri("/api/qr-codes/preview")
            .insert_header(bearer("alice"))
            .set_json(json!({"type": "email", "data": {"email": "a@b.com", "subject": "Hi"}}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["content"], "mailto:a@b.com?subject=Hi");
    }

    #[actix_web::test]
    async fn edit_and_scan_flow() {
        let store = Arc::new(InMemoryQrCodeStore::new());
        let app = app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/api/qr-codes")
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Site", "type": "url", "data": {"url": "example.com"}, "is_dynamic": true}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();
        let code = created["short_code"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/qr-codes/{}", id))
            .insert_header(bearer("alice"))
            .set_json(json!({"redirect_url": "example.org"}))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["redirect_url"], "https://example.org");
        assert_eq!(updated["content"], created["content"]);

        let req = test::TestRequest::get()
            .uri(&format!("/r/{}", code))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://example.org"
        );
    }

    #[actix_web::test]
    async fn other_owner_gets_forbidden() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));
        let req = test::TestRequest::post()
            .uri("/api/qr-codes")
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Note", "type": "text", "data": {"text": "hi"}}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/qr-codes/{}", id))
            .insert_header(bearer("mallory"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/qr-codes/{}", id))
            .insert_header(bearer("alice"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn static_edit_conflicts() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));
        let req = test::TestRequest::post()
            .uri("/api/qr-codes")
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Call", "type": "phone", "data": {"phone": "+1 555"}}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["content"], "tel:+1 555");

        let req = test::TestRequest::put()
            .uri(&format!("/api/qr-codes/{}", created["id"].as_str().unwrap()))
            .insert_header(bearer("alice"))
            .set_json(json!({"is_active": false}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn list_is_scoped_to_path_owner() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));
        for name in ["First", "Second"] {
            let req = test::TestRequest::post()
                .uri("/api/qr-codes")
                .insert_header(bearer("alice"))
                .set_json(json!({"name": name, "type": "text", "data": {"text": name}}))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/api/users/alice/qr-codes?limit=5")
            .insert_header(bearer("alice"))
            .to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list.as_array().unwrap().len(), 2);

        let req = test::TestRequest::get()
            .uri("/api/users/alice/stats")
            .insert_header(bearer("alice"))
            .to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["total"], 2);
        assert_eq!(stats["active"], 2);

        let req = test::TestRequest::get()
            .uri("/api/users/alice/qr-codes")
            .insert_header(bearer("mallory"))
            .to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        };
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn download_sets_filename() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));
        let req = test::TestRequest::post()
            .uri("/api/qr-codes")
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "menu", "type": "url", "data": {"url": "example.com"}}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/qr-codes/{}/download?format=png&size=300",
                created["id"].as_str().unwrap()
            ))
            .insert_header(bearer("alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.contains("menu-300px.png"));

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/qr-codes/{}/download?size=333",
                created["id"].as_str().unwrap()
            ))
            .insert_header(bearer("alice"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn malformed_id_is_rejected() {
        let app = app!(Arc::new(InMemoryQrCodeStore::new()));
        let req = test::TestRequest::get()
            .uri("/api/qr-codes/not-an-id")
            .insert_header(bearer("alice"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
