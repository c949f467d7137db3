//! Fingerprint lookup for the last upload of a tag.
//!
//! A fingerprint is opaque: two uploads are "the same" iff their
//! fingerprints are byte-equal. Older log rows only embed it in free text
//! after the last [`FINGERPRINT_DELIMITER`]; newer rows also store it as a
//! separate field, which takes precedence.

use crate::model::TagState;

/// Separates the free-text prefix from the fingerprint in log user text
pub const FINGERPRINT_DELIMITER: char = '@';

/// Substring after the last delimiter, or the whole text if there is none.
///
/// ```
/// use popcon_core::fingerprint::extract_fingerprint;
///
/// assert_eq!(extract_fingerprint("SiStripNoiseHandler@run=10@part=TI"), "part=TI");
/// assert_eq!(extract_fingerprint("no delimiter"), "no delimiter");
/// ```
pub fn extract_fingerprint(log_text: &str) -> &str {
    match log_text.rfind(FINGERPRINT_DELIMITER) {
        Some(idx) => &log_text[idx + FINGERPRINT_DELIMITER.len_utf8()..],
        None => log_text,
    }
}

/// Fingerprint of the last upload recorded in `tag_state`.
///
/// Empty tags have the empty fingerprint.
pub fn recorded_fingerprint(tag_state: &TagState) -> &str {
    if tag_state.is_empty() {
        return "";
    }
    tag_state
        .last_fingerprint()
        .unwrap_or_else(|| extract_fingerprint(tag_state.last_log_text()))
}

/// User text for a new log entry: `<handler>@<fingerprint>`
pub fn compose_user_text(handler_name: &str, fingerprint: &str) -> String {
    format!("{}{}{}", handler_name, FINGERPRINT_DELIMITER, fingerprint)
}
