use super::{ApiError, RecipeRequest};

const MAX_NAME_LENGTH: usize = 255;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

/// Trimmed, non-empty name of at most 255 characters.
pub fn validate_name<'a>(field: &str, name: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{} cannot be empty", field)));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::validation(format!(
            "{} must be {} characters or less",
            field, MAX_NAME_LENGTH
        )));
    }

    Ok(trimmed)
}

pub fn validate_difficulty(difficulty: Option<i32>) -> Result<Option<i32>, ApiError> {
    match difficulty {
        Some(d) if !(1..=5).contains(&d) => Err(ApiError::validation(format!(
            "Invalid difficulty: {}. Difficulty must be between 1 and 5",
            d
        ))),
        other => Ok(other),
    }
}

pub fn validate_positive(field: &str, value: Option<i32>) -> Result<Option<i32>, ApiError> {
    match value {
        Some(v) if v <= 0 => Err(ApiError::validation(format!(
            "{} must be greater than zero",
            field
        ))),
        other => Ok(other),
    }
}

pub fn validate_price(price: Option<f64>) -> Result<Option<f64>, ApiError> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(ApiError::validation(
            "Price must be a non-negative number",
        )),
        other => Ok(other),
    }
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(trimmed),
        _ => Err(ApiError::validation(format!(
            "Invalid email address: '{}'",
            trimmed
        ))),
    }
}

/// Field-level checks of a recipe payload; references are checked against the store separately.
pub fn validate_recipe(request: &RecipeRequest) -> Result<(), ApiError> {
    validate_name("Recipe name", &request.name)?;
    validate_difficulty(request.difficulty)?;
    validate_positive("Servings", request.servings)?;
    validate_positive("Duration", request.duration_minutes)?;
    validate_price(request.price)?;
    if let Some(creator_id) = request.creator_id {
        validate_id("creator", creator_id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str) -> RecipeRequest {
        RecipeRequest {
            name: name.to_string(),
            description: None,
            duration_minutes: Some(30),
            servings: Some(2),
            difficulty: Some(3),
            price: Some(4.5),
            is_favorite: false,
            creator_id: None,
            ingredient_ids: vec![],
        }
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("recipe", 1).is_ok());
        assert!(validate_id("recipe", 0).is_err());
        assert!(validate_id("recipe", -4).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Name", "  Basil ").unwrap(), "Basil");
        assert!(validate_name("Name", "").is_err());
        assert!(validate_name("Name", "   ").is_err());
        assert!(validate_name("Name", &"é".repeat(255)).is_ok());
        assert!(validate_name("Name", &"a".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_difficulty() {
        assert!(validate_difficulty(None).is_ok());
        assert!(validate_difficulty(Some(1)).is_ok());
        assert!(validate_difficulty(Some(5)).is_ok());
        assert!(validate_difficulty(Some(0)).is_err());
        assert!(validate_difficulty(Some(6)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(None).is_ok());
        assert!(validate_price(Some(0.0)).is_ok());
        assert!(validate_price(Some(-0.01)).is_err());
        assert!(validate_price(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("chef@example.com").is_ok());
        assert!(validate_email("chef").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("chef@").is_err());
    }

    #[test]
    fn test_validate_recipe() {
        assert!(validate_recipe(&recipe("Ratatouille")).is_ok());
        assert!(validate_recipe(&recipe(" ")).is_err());

        let mut zero_servings = recipe("Soup");
        zero_servings.servings = Some(0);
        assert!(validate_recipe(&zero_servings).is_err());

        let mut negative_duration = recipe("Soup");
        negative_duration.duration_minutes = Some(-5);
        assert!(validate_recipe(&negative_duration).is_err());
    }
}
