use actix_web::web;

use crate::handlers::health_handlers::health_check;
use crate::handlers::qr_handlers::{
    create_qr_code, delete_qr_code, download_qr_code, get_owner_qr_codes, get_owner_stats,
    get_qr_code, preview_qr_code, update_qr_code,
};
use crate::handlers::redirect_handlers::{redirect_to_destination, redirect_without_code};
use crate::middlewares::authmw::JwtAuth;
use crate::middlewares::res_owner::ResourceOwnership;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Scan entry point for dynamic QR codes, public
    cfg.route("/r/{short_code}", web::get().to(redirect_to_destination));
    cfg.route("/r", web::get().to(redirect_without_code));
    cfg.route("/r/", web::get().to(redirect_without_code));
    // API routes - require authentication
    cfg.service(
        web::scope("/api")
            .wrap(JwtAuth)
            .route("/health/check", web::get().to(health_check))
            .route("/qr-codes", web::post().to(create_qr_code))
            .route("/qr-codes/preview", web::post().to(preview_qr_code))
            .route("/qr-codes/{id}", web::get().to(get_qr_code))
            .route("/qr-codes/{id}", web::put().to(update_qr_code))
            .route("/qr-codes/{id}", web::delete().to(delete_qr_code))
            .route("/qr-codes/{id}/download", web::get().to(download_qr_code))
            .service(
                web::resource("/users/{owner_id}/qr-codes")
                    .wrap(ResourceOwnership {
                        param_name: "owner_id".to_string(),
                    })
                    .route(web::get().to(get_owner_qr_codes)),
            )
            .service(
                web::resource("/users/{owner_id}/stats")
                    .wrap(ResourceOwnership {
                        param_name: "owner_id".to_string(),
                    })
                    .route(web::get().to(get_owner_stats)),
            ),
    );
}
