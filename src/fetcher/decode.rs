//! Charset detection and decoding for fetched documents. Declared charsets
//! win over sniffing: Content-Type header first, then `<meta charset>` in
//! the document head, then a chardetng guess over the first 4KB.

use crate::fetcher::errors::FetchError;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

pub fn decode_body(content_type: &str, body: &[u8]) -> Result<String, FetchError> {
    let encoding = detect_encoding(content_type, body);
    let (decoded, _actual, had_errors) = encoding.decode(body);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "failed to decode body as {}",
            encoding.name()
        )));
    }
    Ok(decoded.into_owned())
}

fn detect_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(enc) = charset_from(content_type) {
        return enc;
    }

    let head = &body[..body.len().min(4096)];
    let head_str = String::from_utf8_lossy(head);
    if let Some(captures) = META_CHARSET.captures(&head_str)
        && let Some(label) = captures.get(1)
        && let Some(enc) = Encoding::for_label(label.as_str().as_bytes())
    {
        return enc;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, false);
    detector.guess(None, true)
}

fn charset_from(content_type: &str) -> Option<&'static Encoding> {
    let captures = HEADER_CHARSET.captures(content_type)?;
    Encoding::for_label(captures.get(1)?.as_str().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_wins() {
        let body = "<html><body>hello</body></html>".as_bytes();
        let enc = detect_encoding("text/html; charset=utf-8", body);
        assert_eq!(enc, encoding_rs::UTF_8);
    }

    #[test]
    fn meta_charset_used_when_header_silent() {
        let body = b"<html><head><meta charset=\"windows-1251\"></head></html>";
        let enc = detect_encoding("text/html", body);
        assert_eq!(enc, encoding_rs::WINDOWS_1251);
    }

    #[test]
    fn decodes_windows_1251_cyrillic() {
        // "Вопрос" in windows-1251
        let body: &[u8] = &[0xC2, 0xEE, 0xEF, 0xF0, 0xEE, 0xF1];
        let decoded = decode_body("text/html; charset=windows-1251", body).unwrap();
        assert_eq!(decoded, "Вопрос");
    }

    #[test]
    fn decodes_plain_utf8() {
        let decoded = decode_body("text/html; charset=utf-8", "Привет".as_bytes()).unwrap();
        assert_eq!(decoded, "Привет");
    }
}
