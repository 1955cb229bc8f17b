/// Build the URL printed into a dynamic QR code.
///
/// `base_url` comes from configuration; a trailing slash is tolerated.
pub fn short_url(base_url: &str, short_code: &str) -> String {
    format!("{}/r/{}", base_url.trim_end_matches('/'), short_code)
}
