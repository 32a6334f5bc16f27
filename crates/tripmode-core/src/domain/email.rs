pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn normalize_email_trims_and_keeps_case() {
        let value = normalize_email("  Ada@Example.com ");
        assert_eq!(value.as_deref(), Some("Ada@Example.com"));
    }

    #[test]
    fn normalize_email_rejects_blank() {
        assert!(normalize_email(" \t ").is_none());
    }
}
