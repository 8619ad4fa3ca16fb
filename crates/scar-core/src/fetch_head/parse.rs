//! Parse HTTP response header lines collected during the probe.

/// Headers of interest from a HEAD response. With redirects, lines from every
/// hop are collected in order, so the final response wins.
#[derive(Debug, Default)]
pub(crate) struct ParsedHead {
    pub content_length: Option<u64>,
    pub content_disposition: Option<String>,
}

pub(crate) fn parse_headers(lines: &[String]) -> ParsedHead {
    let mut parsed = ParsedHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    parsed.content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("content-disposition") {
                parsed.content_disposition = Some(value.to_string());
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_headers_content_length() {
        let lines = [
            "HTTP/1.1 200 OK".to_string(),
            "Content-Length: 1048576".to_string(),
        ];
        let p = parse_headers(&lines);
        assert_eq!(p.content_length, Some(1_048_576));
        assert!(p.content_disposition.is_none());
    }

    #[test]
    fn parse_headers_case_insensitive() {
        let lines = ["content-length: 42".to_string()];
        let p = parse_headers(&lines);
        assert_eq!(p.content_length, Some(42));
    }

    #[test]
    fn parse_headers_non_numeric_length_ignored() {
        let lines = ["Content-Length: chunked".to_string()];
        let p = parse_headers(&lines);
        assert!(p.content_length.is_none());
    }

    #[test]
    fn parse_headers_redirect_final_response_wins() {
        let lines = [
            "HTTP/1.1 302 Found".to_string(),
            "Content-Length: 0".to_string(),
            "HTTP/1.1 200 OK".to_string(),
            "Content-Length: 9000".to_string(),
        ];
        let p = parse_headers(&lines);
        assert_eq!(p.content_length, Some(9000));
    }

    #[test]
    fn parse_headers_content_disposition() {
        let lines = ["Content-Disposition: attachment; filename=\"build.tar.gz\"".to_string()];
        let p = parse_headers(&lines);
        assert!(p
            .content_disposition
            .as_deref()
            .unwrap()
            .contains("build.tar.gz"));
    }
}
