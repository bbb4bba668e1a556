//! Peer identifier and API key utilities
//!
//! Format checks are advisory: callers get a plain boolean, never an
//! error. An empty or absent identifier is valid and means
//! "auto-assign".
//!
//! Random identifiers are correlation tokens, not secrets: the entropy
//! source is not cryptographically secure and collisions, while
//! unlikely, must be tolerated by callers (retry on collision when
//! global uniqueness is required).

use std::sync::OnceLock;

use rand::Rng;
use regex_lite::Regex;

/// Characters drawn for random tokens (base36)
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of one [`random_token`]
const TOKEN_LENGTH: usize = 11;

/// Default length for [`random_id`]
pub const DEFAULT_ID_LENGTH: usize = 16;

fn peer_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // segments of word characters joined by single space/underscore/
        // hyphen separators; no leading or trailing separator
        Regex::new(r"^[A-Za-z0-9_-]+([ _-][A-Za-z0-9_-]+)*$").expect("peer id pattern compiles")
    })
}

fn api_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("api key pattern compiles")
    })
}

/// Check a peer identifier
///
/// Empty or absent identifiers are valid and request auto-assignment.
pub fn validate_peer_id(id: Option<&str>) -> bool {
    match id {
        None | Some("") => true,
        Some(id) => peer_id_pattern().is_match(id),
    }
}

/// Check an API key against the canonical lowercase UUID form
///
/// Empty or absent keys are valid.
pub fn validate_api_key(key: Option<&str>) -> bool {
    match key {
        None | Some("") => true,
        Some(key) => api_key_pattern().is_match(key),
    }
}

/// Short random token for client-session correlation
pub fn random_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Fixed-length random identifier from the same entropy source
///
/// Padded from additional tokens when one draw yields fewer characters
/// than requested.
pub fn random_id(length: usize) -> String {
    let mut id = String::with_capacity(length + TOKEN_LENGTH);
    while id.len() < length {
        id.push_str(&random_token());
    }
    id.truncate(length);
    id
}
