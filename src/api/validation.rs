use super::ApiError;

/// Ids arrive as path strings. Both saved-search backends key on `i32`, so the
/// conversion happens here, once, for either backend.
pub fn parse_saved_search_id(raw: &str) -> Result<i32, ApiError> {
    let id: i32 = raw.trim().parse().map_err(|_| {
        ApiError::validation(format!(
            "Invalid saved search ID: {raw:?}. ID must be a positive integer"
        ))
    })?;

    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid saved search ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_user_order(order: Option<i32>) -> Result<Option<i32>, ApiError> {
    match order {
        Some(o) if o < 0 => Err(ApiError::validation(format!(
            "Invalid user_order: {o}. Order must not be negative"
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_saved_search_id() {
        assert_eq!(parse_saved_search_id("1").unwrap(), 1);
        assert_eq!(parse_saved_search_id(" 42 ").unwrap(), 42);
        assert!(parse_saved_search_id("0").is_err());
        assert!(parse_saved_search_id("-3").is_err());
        assert!(parse_saved_search_id("abc").is_err());
        assert!(parse_saved_search_id("").is_err());
        assert!(parse_saved_search_id("99999999999").is_err());
    }

    #[test]
    fn test_validate_user_order() {
        assert_eq!(validate_user_order(None).unwrap(), None);
        assert_eq!(validate_user_order(Some(0)).unwrap(), Some(0));
        assert!(validate_user_order(Some(-1)).is_err());
    }
}
