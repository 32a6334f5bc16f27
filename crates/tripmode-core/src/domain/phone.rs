/// Canonicalizes a phone number for storage and exact matching.
///
/// Every character that is not an ASCII digit is dropped; a leading `+` on the
/// raw value is kept as the prefix of the result. Values without any digit
/// normalize to `None`.
pub fn normalize_phone(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let digits: String = value.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    if value.starts_with('+') {
        Some(format!("+{digits}"))
    } else {
        Some(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_phone;

    #[test]
    fn normalize_phone_strips_formatting() {
        assert_eq!(
            normalize_phone("+1 (555) 123-4567").as_deref(),
            Some("+15551234567")
        );
        assert_eq!(
            normalize_phone("555.123.4567").as_deref(),
            Some("5551234567")
        );
    }

    #[test]
    fn normalize_phone_rejects_empty_and_missing() {
        assert!(normalize_phone("").is_none());
        assert!(None::<&str>.and_then(normalize_phone).is_none());
    }

    #[test]
    fn normalize_phone_rejects_values_without_digits() {
        assert!(normalize_phone("+").is_none());
        assert!(normalize_phone("call me").is_none());
    }

    #[test]
    fn normalize_phone_only_honors_plus_in_first_position() {
        assert_eq!(normalize_phone(" +44 20").as_deref(), Some("4420"));
        assert_eq!(normalize_phone("00+44").as_deref(), Some("0044"));
    }

    #[test]
    fn normalize_phone_keeps_extension_digits() {
        assert_eq!(
            normalize_phone("415-555-1212 x89").as_deref(),
            Some("415555121289")
        );
    }
}
