use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// Raw form fields as read from a multipart request. `facilities` and
/// `image_urls` come from repeated fields; `image_urls` is the retained
/// list submitted on update and is ignored on create.
#[derive(Debug, Default, Clone)]
pub struct ListingForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub price_per_night: Option<String>,
    pub facilities: Vec<String>,
    pub image_urls: Vec<String>,
}

/// Form fields after validation, with the price parsed.
#[derive(Debug, Clone)]
pub struct ValidListing {
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub kind: String,
    pub price_per_night: f64,
    pub facilities: Vec<String>,
}

impl ListingForm {
    /// Validate all required fields, collecting every failure rather than
    /// stopping at the first. Messages are per-field and user-facing.
    pub fn validate(&self) -> Result<ValidListing, Vec<String>> {
        let mut errors = Vec::new();

        let name = require_text(&self.name, "Name is required", &mut errors);
        let city = require_text(&self.city, "City is required", &mut errors);
        let country = require_text(&self.country, "Country is required", &mut errors);
        let description = require_text(&self.description, "Description is required", &mut errors);
        let kind = require_text(&self.kind, "Type is required", &mut errors);

        let price = self
            .price_per_night
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok());
        if price.is_none() {
            errors.push("Price per night is required and must be a number".to_string());
        }

        if self.facilities.iter().all(|f| f.trim().is_empty()) {
            errors.push("Facilities are required".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidListing {
            name: name.unwrap_or_default(),
            city: city.unwrap_or_default(),
            country: country.unwrap_or_default(),
            description: description.unwrap_or_default(),
            kind: kind.unwrap_or_default(),
            price_per_night: price.unwrap_or_default(),
            facilities: self.facilities.clone(),
        })
    }
}

fn require_text(value: &Option<String>, message: &str, errors: &mut Vec<String>) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            errors.push(message.to_string());
            None
        }
    }
}

/// A fully assembled record handed to the repository for insertion.
/// The repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub owner_id: Uuid,
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub kind: String,
    pub price_per_night: f64,
    pub facilities: Vec<String>,
    pub image_urls: Vec<String>,
    pub last_updated: DateTime<FixedOffset>,
}

/// Full replacement of the mutable fields, applied in a single write.
/// `image_urls` already contains the merged array (fresh uploads first,
/// then the client-retained URLs).
#[derive(Debug, Clone)]
pub struct ListingPatch {
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub kind: String,
    pub price_per_night: f64,
    pub facilities: Vec<String>,
    pub image_urls: Vec<String>,
    pub last_updated: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> ListingForm {
        ListingForm {
            name: Some("Lotus Inn".into()),
            city: Some("Hanoi".into()),
            country: Some("Vietnam".into()),
            description: Some("x".into()),
            kind: Some("Hotel".into()),
            price_per_night: Some("50".into()),
            facilities: vec!["wifi".into()],
            image_urls: vec![],
        }
    }

    #[test]
    fn complete_form_passes() {
        let valid = complete_form().validate().unwrap();
        assert_eq!(valid.name, "Lotus Inn");
        assert_eq!(valid.price_per_night, 50.0);
        assert_eq!(valid.facilities, vec!["wifi".to_string()]);
    }

    #[test]
    fn empty_form_collects_every_field_message() {
        let errors = ListingForm::default().validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Name is required",
                "City is required",
                "Country is required",
                "Description is required",
                "Type is required",
                "Price per night is required and must be a number",
                "Facilities are required",
            ]
        );
    }

    #[test]
    fn non_numeric_price_is_rejected() {
        let mut form = complete_form();
        form.price_per_night = Some("fifty".into());
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Price per night is required and must be a number"]);
    }

    #[test]
    fn blank_facilities_are_rejected() {
        let mut form = complete_form();
        form.facilities = vec!["  ".into()];
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Facilities are required"]);
    }
}
