/// Turns a free-text identifier (usually an email address) into a file-name
/// fragment.
///
/// `@` becomes `_at_` and `.` becomes `_dot_`. Path separators, characters
/// reserved on common filesystems and control characters become `_`.
/// Surrounding whitespace is trimmed. The mapping is total and deterministic;
/// different inputs may map to the same output.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);

    for ch in raw.trim().chars() {
        match ch {
            '@' => out.push_str("_at_"),
            '.' => out.push_str("_dot_"),
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => out.push('_'),
            c if c.is_control() => out.push('_'),
            c => out.push(c),
        }
    }

    out
}

/// Lower-cased extension of `path`, if any.
pub fn extension_lowercase(path: &std::path::Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn sanitizes_email_addresses() {
        assert_eq!(sanitize_identifier("a@b.com"), "a_at_b_dot_com");
        assert_eq!(
            sanitize_identifier("first.last@mail.example.org"),
            "first_dot_last_at_mail_dot_example_dot_org"
        );
    }

    #[test]
    fn replaces_path_separators_and_reserved_characters() {
        assert_eq!(sanitize_identifier("../etc/passwd"), "_dot__dot__etc_passwd");
        assert_eq!(sanitize_identifier("a\\b:c*d?e"), "a_b_c_d_e");
        assert_eq!(sanitize_identifier("tab\there"), "tab_here");
    }

    #[test]
    fn is_deterministic_and_trims_whitespace() {
        assert_eq!(sanitize_identifier("  x@y.z "), sanitize_identifier("x@y.z"));
        assert_eq!(sanitize_identifier(""), "");
        assert_eq!(sanitize_identifier("Анна"), "Анна");
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(extension_lowercase(Path::new("clip.MOV")).as_deref(), Some("mov"));
        assert_eq!(extension_lowercase(Path::new("noext")), None);
    }
}
