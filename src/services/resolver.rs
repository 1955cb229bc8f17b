//! Scan-time resolution of dynamic QR codes.

use std::sync::Arc;

use actix_web::http::header::HeaderValue;
use actix_web::rt::task::JoinHandle;
use log::{debug, warn};
use thiserror::Error;

use crate::db::store::QrCodeStore;

/// Why a scan could not be forwarded. Each variant has its own message on the error page.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RedirectError {
    #[error("Invalid code")]
    InvalidCode,
    #[error("QR code not found")]
    NotFound,
    #[error("This QR code is temporarily deactivated")]
    Deactivated,
    #[error("Invalid QR code")]
    Malformed,
}

/// A successful resolution.
#[derive(Debug)]
pub struct Redirect {
    pub destination: String,
    /// Detached scan-accounting task. Dropping it does not cancel the write.
    pub accounting: JoinHandle<()>,
}

/// Look up `short_code` and return where the scanner should be sent.
///
/// On success a scan is recorded in the background; the redirect never waits
/// for it and a failed write is only logged. The counter is written as
/// `read + 1`, so concurrent scans of one record can undercount.
pub async fn resolve(
    store: Arc<dyn QrCodeStore>,
    short_code: Option<&str>,
) -> Result<Redirect, RedirectError> {
    let short_code = match short_code {
        Some(code) if !code.is_empty() => code,
        _ => return Err(RedirectError::InvalidCode),
    };

    let record = match store.find_by_short_code(short_code).await {
        Ok(Some(record)) => record,
        Ok(None) => return Err(RedirectError::NotFound),
        Err(e) => {
            warn!("Lookup of short code {} failed: {}", short_code, e);
            return Err(RedirectError::NotFound);
        }
    };

    if !record.is_active {
        return Err(RedirectError::Deactivated);
    }

    let (id, destination) = match (record.id, record.is_dynamic, record.redirect_url) {
        // Destination must fit in a Location header
        (Some(id), true, Some(url)) if !url.is_empty() && HeaderValue::from_str(&url).is_ok() => {
            (id, url)
        }
        _ => {
            warn!("Short code {} resolves to a record without a destination", short_code);
            return Err(RedirectError::Malformed);
        }
    };

    let scan_count = record.scan_count + 1;
    let code = short_code.to_string();
    let accounting = actix_web::rt::spawn(async move {
        let now = chrono::Utc::now().timestamp_millis();
        match store.record_scan(&id, scan_count, now).await {
            Ok(()) => debug!("Recorded scan {} for {}", scan_count, code),
            Err(e) => warn!("Failed to record scan for {}: {}", code, e),
        }
    });

    Ok(Redirect {
        destination,
        accounting,
    })
}
