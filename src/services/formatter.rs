//! Turns typed form data into the exact string encoded in a QR symbol.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::models::payload::{
    EmailData, PhoneData, QrPayload, TextData, UrlData, VCardData, WifiData, WifiEncryption,
};

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn format_content(payload: &QrPayload) -> String {
    match payload {
        QrPayload::Url(data) => format_url(data),
        QrPayload::Text(data) => format_text(data),
        QrPayload::VCard(data) => format_vcard(data),
        QrPayload::Email(data) => format_email(data),
        QrPayload::Phone(data) => format_phone(data),
        QrPayload::Wifi(data) => format_wifi(data),
    }
}

/// Trims the input and prefixes `https://` unless an http(s) scheme is already present.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn format_url(data: &UrlData) -> String {
    normalize_url(&data.url)
}

fn format_text(data: &TextData) -> String {
    data.text.clone()
}

// Values are inserted verbatim; `;`, `,` and newlines are not escaped.
fn format_vcard(data: &VCardData) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{};{};;;", data.last_name, data.first_name),
        format!("FN:{} {}", data.first_name, data.last_name),
    ];

    let optional = [
        ("ORG:", &data.organization, ""),
        ("TEL:", &data.phone, ""),
        ("EMAIL:", &data.email, ""),
        ("URL:", &data.website, ""),
        ("ADR:;;", &data.address, ";;;;"),
        ("NOTE:", &data.note, ""),
    ];
    for (prefix, value, suffix) in optional {
        if let Some(value) = non_empty(value) {
            lines.push(format!("{}{}{}", prefix, value, suffix));
        }
    }

    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

fn format_email(data: &EmailData) -> String {
    let mut mailto = format!("mailto:{}", data.email);

    let params: Vec<String> = [("subject", &data.subject), ("body", &data.body)]
        .into_iter()
        .filter_map(|(key, value)| {
            non_empty(value).map(|v| format!("{}={}", key, utf8_percent_encode(v, URI_COMPONENT)))
        })
        .collect();

    if !params.is_empty() {
        mailto.push('?');
        mailto.push_str(&params.join("&"));
    }
    mailto
}

fn format_phone(data: &PhoneData) -> String {
    format!("tel:{}", data.phone)
}

fn format_wifi(data: &WifiData) -> String {
    let mut wifi = format!("WIFI:T:{};S:{};", data.encryption, data.ssid);

    if data.encryption != WifiEncryption::NoPass {
        if let Some(password) = non_empty(&data.password) {
            wifi.push_str(&format!("P:{};", password));
        }
    }
    if data.hidden {
        wifi.push_str("H:true;");
    }

    wifi.push(';');
    wifi
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
