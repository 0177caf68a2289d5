//! Environment redaction for the development-only `/debug` page.

use std::collections::BTreeMap;

/// Lowercased key fragments that mark a variable as sensitive.
pub const SENSITIVE_MARKERS: &[&str] = &["secret", "api_", "password", "token", "key"];

const VISIBLE_CHARS: usize = 5;
const MASK: &str = "***";

pub fn is_sensitive(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_MARKERS.iter().any(|marker| key.contains(marker))
}

/// Keep a short prefix of long values; hide short ones entirely.
pub fn mask_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if value.chars().count() > VISIBLE_CHARS {
        let prefix: String = value.chars().take(VISIBLE_CHARS).collect();
        format!("{prefix}{MASK}")
    } else {
        MASK.to_string()
    }
}

/// Copy of `vars` with every sensitive value masked, sorted by key.
pub fn redact_env<'a, I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let redacted: BTreeMap<String, String> = vars
        .into_iter()
        .map(|(key, value)| {
            let shown = if is_sensitive(key) {
                mask_value(value)
            } else {
                value.clone()
            };
            (key.clone(), shown)
        })
        .collect();
    redacted.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_match_anywhere_in_key() {
        assert!(is_sensitive("SECRET_SAUCE"));
        assert!(is_sensitive("API_URL"));
        assert!(is_sensitive("DB_PASSWORD"));
        assert!(is_sensitive("GITHUB_TOKEN"));
        assert!(is_sensitive("WEB3FORMS_KEY"));
        assert!(is_sensitive("keyboard_layout"));
        assert!(is_sensitive("DB_SECRET"));
        assert!(!is_sensitive("HOME"));
        assert!(!is_sensitive("RAPID_URL"));
    }

    #[test]
    fn long_values_keep_a_prefix() {
        assert_eq!(mask_value("abcdef123"), "abcde***");
    }

    #[test]
    fn short_values_fully_hidden() {
        assert_eq!(mask_value("abcde"), "***");
        assert_eq!(mask_value("a"), "***");
        assert_eq!(mask_value(""), "");
    }

    #[test]
    fn masking_respects_char_boundaries() {
        assert_eq!(mask_value("ééééééé"), "ééééé***");
    }

    #[test]
    fn redact_env_masks_only_sensitive_values() {
        let mut vars = BTreeMap::new();
        vars.insert("PATH".to_string(), "/usr/bin".to_string());
        vars.insert("AWS_SECRET_ACCESS_KEY".to_string(), "wJalrXUtnFEMI".to_string());
        vars.insert("session_token".to_string(), "tok".to_string());

        let redacted = redact_env(&vars);
        assert_eq!(
            redacted,
            vec![
                ("AWS_SECRET_ACCESS_KEY".to_string(), "wJalr***".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
                ("session_token".to_string(), "***".to_string()),
            ]
        );
    }
}
