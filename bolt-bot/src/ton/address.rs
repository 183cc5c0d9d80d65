//! Syntactic TON address check, done before any API call.
//!
//! Accepts the user-friendly form (48 base64 / base64url characters) and the raw form
//! `<workchain>:<64 hex digits>`. Whether the account exists is up to the API.

const FRIENDLY_LEN: usize = 48;
const RAW_HASH_LEN: usize = 64;

pub fn is_valid_address(input: &str) -> bool {
    match input.split_once(':') {
        Some((workchain, hash)) => is_raw(workchain, hash),
        None => is_friendly(input),
    }
}

fn is_friendly(input: &str) -> bool {
    input.len() == FRIENDLY_LEN
        && input
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'+' | b'/'))
}

fn is_raw(workchain: &str, hash: &str) -> bool {
    workchain.parse::<i32>().is_ok()
        && hash.len() == RAW_HASH_LEN
        && hash.bytes().all(|b| b.is_ascii_hexdigit())
}
