use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const RANDOM_LEN: usize = 10;
pub const TIMESTAMP_LEN: usize = 6;
pub const SHORT_CODE_LEN: usize = RANDOM_LEN + TIMESTAMP_LEN;

/// Generate a short code for a dynamic QR code.
///
/// Ten random alphanumeric characters followed by the six low-order base-36
/// digits of the current time in milliseconds. Practically unique, not
/// guaranteed: the store's unique index on `short_code` is the real guard.
pub fn generate_short_code() -> String {
    generate_short_code_with(&mut rand::rng(), chrono::Utc::now().timestamp_millis())
}

pub fn generate_short_code_with<R: Rng + ?Sized>(rng: &mut R, now_millis: i64) -> String {
    let mut code = String::with_capacity(SHORT_CODE_LEN);
    for _ in 0..RANDOM_LEN {
        let idx = rng.random_range(0..ALPHABET.len());
        code.push(char::from(ALPHABET[idx]));
    }
    code.push_str(&timestamp_suffix(now_millis));
    code
}

fn timestamp_suffix(now_millis: i64) -> String {
    let mut value = now_millis.unsigned_abs();
    let mut digits = [b'0'; TIMESTAMP_LEN];
    for slot in digits.iter_mut().rev() {
        *slot = BASE36_DIGITS[(value % 36) as usize];
        value /= 36;
    }
    digits.iter().map(|&b| char::from(b)).collect()
}
