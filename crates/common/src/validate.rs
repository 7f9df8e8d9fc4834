// Pure field validators used by every entity form.
//
// Each validator maps a candidate value to valid/invalid plus a
// human-readable reason. They are called on every field mutation; the
// draft layer aggregates the results into its invalid-field set.
//
// Quantity strings (memory/cpu/volume sizes) are NOT validated here:
// their grammar lives server-side behind `POST /quantityValid` and the
// draft layer tracks the answer as an async tri-state.

use std::sync::OnceLock;

use regex::Regex;

/// Endpoint names are DNS label segments, capped harder than other names.
pub const MAX_ENDPOINT_NAME_LEN: usize = 15;

const IDENTIFIER_PATTERN: &str = "^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";
const VERSION_PATTERN: &str = r"^(\d+)\.(\d+)\.(\d+)(-[0-9a-z-]+(\.[0-9a-z-]+)*)?(\+[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?$";

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern should compile"))
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern should compile"))
}

/// Outcome of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidity {
    pub valid: bool,
    /// Human-readable reason; empty when valid.
    pub message: String,
}

impl FieldValidity {
    pub fn ok() -> Self {
        Self { valid: true, message: String::new() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self { valid: false, message: message.into() }
    }
}

/// The kinds of single-string fields the forms validate locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Command/container/image/resource/volume names.
    Identifier,
    /// Identifier, additionally capped at 15 characters.
    EndpointName,
    /// Semver-like version string.
    Version,
    /// Any field that must simply be non-empty.
    RequiredText,
    /// Numeric string, strictly positive.
    TargetPort,
}

/// Validate one field value against the rules for its kind.
pub fn validate(value: &str, kind: FieldKind) -> FieldValidity {
    match kind {
        FieldKind::Identifier => validate_identifier(value),
        FieldKind::EndpointName => validate_endpoint_name(value),
        FieldKind::Version => validate_version(value),
        FieldKind::RequiredText => validate_required_text(value),
        FieldKind::TargetPort => validate_target_port(value),
    }
}

/// Lowercase-dash identifier: `^[a-z0-9]([-a-z0-9]*[a-z0-9])?$`.
pub fn validate_identifier(value: &str) -> FieldValidity {
    if identifier_regex().is_match(value) {
        FieldValidity::ok()
    } else {
        FieldValidity::invalid(
            "must be lowercase letters, digits and dashes, \
             starting and ending with a letter or digit",
        )
    }
}

/// Identifier rule plus the 15-character endpoint cap.
pub fn validate_endpoint_name(value: &str) -> FieldValidity {
    if value.len() > MAX_ENDPOINT_NAME_LEN {
        return FieldValidity::invalid(format!(
            "must be at most {MAX_ENDPOINT_NAME_LEN} characters"
        ));
    }
    validate_identifier(value)
}

/// Semver-like version, with optional pre-release and build suffixes.
pub fn validate_version(value: &str) -> FieldValidity {
    if version_regex().is_match(value) {
        FieldValidity::ok()
    } else {
        FieldValidity::invalid("must be a version like 1.0.4 or 1.4.7-alpha1")
    }
}

/// Required free-text field: any non-empty string.
pub fn validate_required_text(value: &str) -> FieldValidity {
    if value.is_empty() {
        FieldValidity::invalid("must not be empty")
    } else {
        FieldValidity::ok()
    }
}

/// Target port: numeric, strictly greater than zero, and within the
/// 16-bit port range the wire format carries.
pub fn validate_target_port(value: &str) -> FieldValidity {
    match value.parse::<u16>() {
        Ok(port) if port > 0 => FieldValidity::ok(),
        _ => FieldValidity::invalid("must be a port number between 1 and 65535"),
    }
}

/// Composite command references: at least one entry, none empty.
pub fn validate_composite_refs(refs: &[String]) -> FieldValidity {
    if refs.is_empty() {
        return FieldValidity::invalid("must reference at least one command");
    }
    if refs.iter().any(|name| name.is_empty()) {
        return FieldValidity::invalid("must not contain empty command references");
    }
    FieldValidity::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Identifier ──────────────────────────────────────────────────

    #[test]
    fn identifier_accepts_lowercase_dash_names() {
        for name in ["my-command", "a", "a0", "runtime-1", "0start"] {
            assert!(validate_identifier(name).valid, "{name} should be valid");
        }
    }

    #[test]
    fn identifier_rejects_invalid_names() {
        for name in ["", "My-Command", "-leading", "trailing-", "has_underscore", "dot.name"] {
            assert!(!validate_identifier(name).valid, "{name} should be invalid");
        }
    }

    #[test]
    fn identifier_invalid_result_carries_reason() {
        let result = validate_identifier("Bad Name");
        assert!(!result.valid);
        assert!(result.message.contains("lowercase"));
    }

    // ── Endpoint name ───────────────────────────────────────────────

    #[test]
    fn endpoint_name_within_limit_is_valid() {
        assert!(validate_endpoint_name("http-8080").valid);
        // Exactly 15 characters.
        assert!(validate_endpoint_name("a23456789012345").valid);
    }

    #[test]
    fn endpoint_name_too_long_is_invalid_even_if_pattern_conformant() {
        let result = validate_endpoint_name("this-name-is-way-too-long");
        assert!(!result.valid);
        assert!(result.message.contains("15"));
    }

    #[test]
    fn endpoint_name_still_applies_identifier_pattern() {
        assert!(!validate_endpoint_name("Bad").valid);
        assert!(!validate_endpoint_name("").valid);
    }

    // ── Version ─────────────────────────────────────────────────────

    #[test]
    fn version_accepts_semver_forms() {
        for v in ["1.0.4", "1.4.7-alpha1", "0.0.1", "2.1.0-rc.1", "1.0.0+build.42"] {
            assert!(validate_version(v).valid, "{v} should be valid");
        }
    }

    #[test]
    fn version_rejects_non_semver_forms() {
        for v in ["v1.0", "1.0", "1", "", "1.0.x", "1.0.0-ALPHA"] {
            assert!(!validate_version(v).valid, "{v} should be invalid");
        }
    }

    #[test]
    fn version_invalid_message_shows_example() {
        let result = validate_version("v1.0");
        assert!(result.message.contains("1.0.4"));
    }

    // ── Required text ───────────────────────────────────────────────

    #[test]
    fn required_text_rejects_empty_only() {
        assert!(!validate_required_text("").valid);
        assert!(validate_required_text("x").valid);
        // Whitespace is non-empty; trimming is the form's concern.
        assert!(validate_required_text(" ").valid);
    }

    // ── Target port ─────────────────────────────────────────────────

    #[test]
    fn target_port_must_be_positive_number() {
        assert!(validate_target_port("8080").valid);
        assert!(validate_target_port("1").valid);
        assert!(!validate_target_port("0").valid);
        assert!(!validate_target_port("-1").valid);
        assert!(!validate_target_port("http").valid);
        assert!(!validate_target_port("").valid);
    }

    #[test]
    fn target_port_must_fit_the_wire_range() {
        assert!(validate_target_port("65535").valid);
        let result = validate_target_port("70000");
        assert!(!result.valid);
        assert!(result.message.contains("65535"));
    }

    // ── Composite references ────────────────────────────────────────

    #[test]
    fn composite_refs_require_at_least_one_entry() {
        assert!(!validate_composite_refs(&[]).valid);
        assert!(validate_composite_refs(&["build".into()]).valid);
    }

    #[test]
    fn composite_refs_reject_empty_entries() {
        let refs = vec!["build".to_string(), String::new()];
        let result = validate_composite_refs(&refs);
        assert!(!result.valid);
        assert!(result.message.contains("empty"));
    }

    // ── Dispatcher ──────────────────────────────────────────────────

    #[test]
    fn dispatcher_routes_by_field_kind() {
        assert!(validate("my-name", FieldKind::Identifier).valid);
        assert!(!validate("My-Name", FieldKind::Identifier).valid);
        assert!(validate("1.2.3", FieldKind::Version).valid);
        assert!(!validate("this-name-is-way-too-long", FieldKind::EndpointName).valid);
        assert!(!validate("", FieldKind::RequiredText).valid);
        assert!(validate("443", FieldKind::TargetPort).valid);
    }
}
