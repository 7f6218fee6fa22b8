//! RFC 8288 `Link` header handling for Canvas pagination.

/// Extract the `rel="next"` target from a `Link` header value.
///
/// Canvas sends every relation (`current`, `next`, `prev`, `first`, `last`)
/// in one comma-separated header. Returns `None` on the last page.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let target = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_ascii_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });
        is_next.then(|| target.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_among_relations() {
        let header = concat!(
            r#"<https://canvas.example/api/v1/folders/5/files?page=1&per_page=100>; rel="current","#,
            r#"<https://canvas.example/api/v1/folders/5/files?page=2&per_page=100>; rel="next","#,
            r#"<https://canvas.example/api/v1/folders/5/files?page=1&per_page=100>; rel="first","#,
            r#"<https://canvas.example/api/v1/folders/5/files?page=3&per_page=100>; rel="last""#,
        );
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://canvas.example/api/v1/folders/5/files?page=2&per_page=100")
        );
    }

    #[test]
    fn test_last_page() {
        let header = r#"<https://canvas.example/a?page=3>; rel="current", <https://canvas.example/a?page=1>; rel="first""#;
        assert_eq!(parse_next_link(header), None);
    }

    #[test]
    fn test_unquoted_and_spaced() {
        let header = "<https://canvas.example/a?page=2> ; rel=next";
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://canvas.example/a?page=2")
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_next_link(""), None);
        assert_eq!(parse_next_link("https://canvas.example/a; rel=\"next\""), None);
    }
}
