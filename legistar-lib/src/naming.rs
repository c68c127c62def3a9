//! Field name normalization for Legistar responses
//!
//! Legistar returns fields named after the entity they belong to, in mixed
//! case (`BodyGUID`, `ActionENumberFlag`, `MeetingAgendaFile`). Records expose
//! them as lower-case identifiers with the entity prefix removed (`guid`,
//! `e_number_flag`, `agenda_file`).

use once_cell::sync::Lazy;
use regex::Regex;

/// A capitalized word preceded by anything but a separator (`ENumber` -> `E_Number`)
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^_])([A-Z][a-z]+)").expect("valid regex"));

/// A lowercase letter or digit followed by an uppercase letter (`rF` -> `r_F`)
static CASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert a raw Legistar field name to its canonical attribute name
///
/// A leading `prefix` is stripped when something remains after it. The rest
/// is converted from camel case to lower case with underscores.
pub fn normalize_field_name(raw: &str, prefix: &str) -> String {
    let stripped = strip_prefix(raw, prefix);
    to_snake_case(stripped)
}

/// Convert a camel case identifier to lower case with underscores
///
/// Already-normalized input comes back unchanged.
pub fn to_snake_case(name: &str) -> String {
    let spaced = WORD_BOUNDARY.replace_all(name, "${1}_${2}");
    let spaced = CASE_BOUNDARY.replace_all(&spaced, "${1}_${2}");
    spaced.to_lowercase()
}

/// Build the raw name Legistar uses for an entity field (`Body` + `GUID` -> `BodyGUID`)
pub fn raw_field_name(prefix: &str, suffix: &str) -> String {
    format!("{}{}", prefix, suffix)
}

fn strip_prefix<'a>(raw: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return raw;
    }

    match raw.strip_prefix(prefix) {
        Some(rest) => {
            let rest = rest.trim_start_matches('_');
            if rest.is_empty() { raw } else { rest }
        }
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_stripped() {
        assert_eq!(normalize_field_name("ActionENumberFlag", "Action"), "e_number_flag");
        assert_eq!(normalize_field_name("BodyGUID", "Body"), "guid");
        assert_eq!(normalize_field_name("BodyName", "Body"), "name");
        assert_eq!(normalize_field_name("GovernmentGUID", "Government"), "guid");
    }

    #[test]
    fn test_acronym_boundaries() {
        assert_eq!(normalize_field_name("BodyOLSUsed", "Body"), "ols_used");
        assert_eq!(normalize_field_name("MeetingItemGUID", "MeetingItem"), "guid");
        assert_eq!(normalize_field_name("ItemID", "Item"), "id");
        assert_eq!(to_snake_case("HTTPServerName"), "http_server_name");
    }

    #[test]
    fn test_multi_word_fields() {
        assert_eq!(normalize_field_name("ActionActiveTenseFlag", "Action"), "active_tense_flag");
        assert_eq!(normalize_field_name("BodyTypeSort", "Body"), "type_sort");
        assert_eq!(normalize_field_name("MeetingAgendaFile", "Meeting"), "agenda_file");
        assert_eq!(
            normalize_field_name("AttendanceTypePluralName", "AttendanceType"),
            "plural_name"
        );
    }

    #[test]
    fn test_digits() {
        assert_eq!(to_snake_case("Address2Line"), "address2_line");
        assert_eq!(to_snake_case("Version2"), "version2");
    }

    #[test]
    fn test_prefix_absent_or_whole_name() {
        // No prefix match keeps the whole name
        assert_eq!(normalize_field_name("MeetingYear", "Body"), "meeting_year");
        // A field that is only the prefix is not reduced to nothing
        assert_eq!(normalize_field_name("Body", "Body"), "body");
        assert_eq!(normalize_field_name("PartnerGUID", ""), "partner_guid");
    }

    #[test]
    fn test_idempotent_on_normalized_input() {
        for name in ["guid", "e_number_flag", "ols_used", "address2_line", "name"] {
            assert_eq!(to_snake_case(name), name);
            assert_eq!(to_snake_case(&to_snake_case(name)), name);
        }

        let once = normalize_field_name("ActionENumberFlag", "Action");
        assert_eq!(normalize_field_name(&once, "Action"), once);
    }

    #[test]
    fn test_raw_field_name() {
        assert_eq!(raw_field_name("Body", "GUID"), "BodyGUID");
        assert_eq!(raw_field_name("MeetingItem", "GUID"), "MeetingItemGUID");
    }
}
