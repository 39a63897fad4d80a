pub mod ip;

/// Alphabet for generated short codes: 62 alphanumeric symbols
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated short codes
pub const RANDOM_CODE_LENGTH: usize = 6;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Custom short codes: non-empty, bounded, alphanumeric plus `_` and `-`
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 64
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Host of a referrer URL, `None` for empty or unparsable referrers
pub fn referrer_host(referrer: &str) -> Option<String> {
    if referrer.is_empty() {
        return None;
    }
    url::Url::parse(referrer)
        .ok()?
        .host_str()
        .map(|h| h.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length_and_alphabet() {
        for _ in 0..50 {
            let code = generate_random_code(RANDOM_CODE_LENGTH);
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_is_valid_short_code() {
        assert!(is_valid_short_code("abc123"));
        assert!(is_valid_short_code("my-code_1"));
        assert!(!is_valid_short_code(""));
        assert!(!is_valid_short_code("has space"));
        assert!(!is_valid_short_code("slash/code"));
        assert!(!is_valid_short_code(&"x".repeat(65)));
    }

    #[test]
    fn test_referrer_host() {
        assert_eq!(
            referrer_host("https://a.com/page1"),
            Some("a.com".to_string())
        );
        assert_eq!(
            referrer_host("http://sub.example.org:8080/x?y=1"),
            Some("sub.example.org".to_string())
        );
        assert_eq!(referrer_host(""), None);
        assert_eq!(referrer_host("not a url"), None);
    }
}
