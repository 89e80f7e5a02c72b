//! Field rules shared by the create and update paths.

use thiserror::Error;

use super::models::{ComicCandidate, ComicFields, Condition};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Condition must be either \"new\" or \"used\".")]
    InvalidCondition,

    #[error("Discount must be a value between 0 and 100.")]
    InvalidDiscount,

    #[error("Check price, numberOfPages and yearOfPublication.")]
    InvalidNumericField,

    #[error("Field \"{0}\" is required.")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidCondition => "invalid_condition",
            ValidationError::InvalidDiscount => "invalid_discount",
            ValidationError::InvalidNumericField => "invalid_numeric_field",
            ValidationError::MissingField(_) => "missing_field",
        }
    }
}

/// Check a candidate against the catalog's field rules.
///
/// Rules run in a fixed order and the first failure is returned: condition,
/// discount range, non-negative numerics, then required fields.
pub fn validate_record_fields(candidate: &ComicCandidate) -> Result<ComicFields, ValidationError> {
    let condition = candidate
        .condition
        .as_deref()
        .and_then(Condition::parse)
        .ok_or(ValidationError::InvalidCondition)?;

    let discount = candidate.discount.unwrap_or(0.0);
    if !(0.0..=100.0).contains(&discount) {
        return Err(ValidationError::InvalidDiscount);
    }

    let negative = candidate.price.is_some_and(|price| price < 0.0)
        || candidate.number_of_pages.is_some_and(|pages| pages < 0)
        || candidate.year_of_publication.is_some_and(|year| year < 0);
    if negative {
        return Err(ValidationError::InvalidNumericField);
    }

    let price = candidate.price.ok_or(ValidationError::MissingField("price"))?;
    let number_of_pages = candidate
        .number_of_pages
        .ok_or(ValidationError::MissingField("numberOfPages"))?;
    let year_of_publication = candidate
        .year_of_publication
        .ok_or(ValidationError::MissingField("yearOfPublication"))?;

    let book_name = required_text(&candidate.book_name, "bookName")?;
    let author_name = required_text(&candidate.author_name, "authorName")?;

    Ok(ComicFields {
        book_name,
        author_name,
        year_of_publication,
        price,
        discount,
        number_of_pages,
        condition,
        description: candidate.description.clone(),
    })
}

fn required_text(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.clone()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ComicCandidate {
        ComicCandidate {
            book_name: Some("Hellboy: Seed of Destruction".into()),
            author_name: Some("Mike Mignola".into()),
            year_of_publication: Some(1994),
            price: Some(17.99),
            discount: None,
            number_of_pages: Some(128),
            condition: Some("new".into()),
            description: None,
        }
    }

    #[test]
    fn valid_candidate_defaults_discount() {
        let fields = validate_record_fields(&valid()).unwrap();
        assert_eq!(fields.discount, 0.0);
        assert_eq!(fields.condition, Condition::New);
        assert_eq!(fields.book_name, "Hellboy: Seed of Destruction");
    }

    #[test]
    fn condition_must_be_new_or_used() {
        for condition in [None, Some("mint"), Some("NEW"), Some("")] {
            let candidate = ComicCandidate {
                condition: condition.map(String::from),
                ..valid()
            };
            assert_eq!(
                validate_record_fields(&candidate),
                Err(ValidationError::InvalidCondition)
            );
        }
    }

    #[test]
    fn discount_bounds_are_inclusive() {
        for discount in [0.0, 100.0, 42.5] {
            let candidate = ComicCandidate {
                discount: Some(discount),
                ..valid()
            };
            assert!(validate_record_fields(&candidate).is_ok());
        }

        for discount in [-0.01, 100.01, -50.0, 250.0] {
            let candidate = ComicCandidate {
                discount: Some(discount),
                ..valid()
            };
            assert_eq!(
                validate_record_fields(&candidate),
                Err(ValidationError::InvalidDiscount)
            );
        }
    }

    #[test]
    fn negative_numbers_are_rejected() {
        let candidates = [
            ComicCandidate {
                price: Some(-1.0),
                ..valid()
            },
            ComicCandidate {
                number_of_pages: Some(-1),
                ..valid()
            },
            ComicCandidate {
                year_of_publication: Some(-1994),
                ..valid()
            },
        ];

        for candidate in candidates {
            assert_eq!(
                validate_record_fields(&candidate),
                Err(ValidationError::InvalidNumericField)
            );
        }
    }

    #[test]
    fn negative_value_wins_over_missing_field() {
        let candidate = ComicCandidate {
            price: None,
            number_of_pages: Some(-3),
            ..valid()
        };
        assert_eq!(
            validate_record_fields(&candidate),
            Err(ValidationError::InvalidNumericField)
        );
    }

    #[test]
    fn missing_required_fields_are_named() {
        let candidate = ComicCandidate {
            price: None,
            ..valid()
        };
        assert_eq!(
            validate_record_fields(&candidate),
            Err(ValidationError::MissingField("price"))
        );

        let candidate = ComicCandidate {
            author_name: Some("   ".into()),
            ..valid()
        };
        let err = validate_record_fields(&candidate).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("authorName"));
        assert_eq!(err.to_string(), "Field \"authorName\" is required.");
    }

    #[test]
    fn condition_is_checked_before_discount() {
        let candidate = ComicCandidate {
            condition: Some("mint".into()),
            discount: Some(500.0),
            ..valid()
        };
        assert_eq!(
            validate_record_fields(&candidate),
            Err(ValidationError::InvalidCondition)
        );
    }
}
