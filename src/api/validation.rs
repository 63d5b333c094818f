use super::ApiError;

/// Parses an identity query parameter (`id` or `row`).
///
/// Missing, blank and non-numeric values all map to the same
/// "Invalid parameter" error; range checks are left to the service.
pub fn parse_identity(raw: Option<&str>) -> Result<i64, ApiError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<i64>().ok())
        .ok_or_else(ApiError::invalid_parameter)
}

pub fn validate_anime_id(raw: Option<&str>) -> Result<i64, ApiError> {
    let id = parse_identity(raw)?;
    if id <= 0 {
        return Err(ApiError::invalid_parameter());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        assert_eq!(parse_identity(Some("42")).unwrap(), 42);
        assert_eq!(parse_identity(Some(" 7 ")).unwrap(), 7);
        assert_eq!(parse_identity(Some("-3")).unwrap(), -3);
        assert!(parse_identity(None).is_err());
        assert!(parse_identity(Some("")).is_err());
        assert!(parse_identity(Some("abc")).is_err());
        assert!(parse_identity(Some("1.5")).is_err());
    }

    #[test]
    fn test_validate_anime_id() {
        assert!(validate_anime_id(Some("1")).is_ok());
        assert!(validate_anime_id(Some("0")).is_err());
        assert!(validate_anime_id(Some("-5")).is_err());
    }
}
