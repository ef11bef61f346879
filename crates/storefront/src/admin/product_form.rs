//! New-product form: validation and submission.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use shopfront_core::{CategoryId, Price, PopupMessage};
use thiserror::Error;
use tracing::{info, instrument};

use crate::auth::Viewer;
use crate::error::{AppError, add_breadcrumb};
use crate::popup::PopupStore;
use crate::products::{ApiClient, NewProduct};
use crate::storage::KeyValueStore;

/// Maximum number of images attached to one product.
pub const MAX_IMAGES: usize = 5;

/// Longest accepted product name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Longest accepted product description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 400;

/// Raw input of the new-product form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub image_urls: Vec<String>,
}

/// A form field that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Description,
    Price,
    Stock,
    Category,
    Images,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Category => "category",
            Self::Images => "images",
        })
    }
}

/// What is wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("is required")]
    Required,
    #[error("must be a non-negative amount")]
    InvalidPrice,
    #[error("must be a whole number of units")]
    InvalidStock,
    #[error("at most {} images allowed", MAX_IMAGES)]
    TooManyImages,
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
}

/// Every field error found in one validation pass, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", describe(.0))]
pub struct FormErrors(Vec<(FormField, FieldError)>);

impl FormErrors {
    /// The error for a field, if any.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&FieldError> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, e)| e)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &FieldError)> {
        self.0.iter().map(|(f, e)| (*f, e))
    }

    fn push(&mut self, field: FormField, error: FieldError) {
        self.0.push((field, error));
    }
}

fn describe(errors: &[(FormField, FieldError)]) -> String {
    errors
        .iter()
        .map(|(field, error)| format!("{field} {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl NewProductForm {
    /// Check every field and build the product to send.
    ///
    /// Text fields are trimmed; blank counts as missing. All problems are
    /// reported together rather than stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] listing each invalid field.
    pub fn validate(&self) -> Result<NewProduct, FormErrors> {
        let mut errors = FormErrors::default();

        let name = required(&self.name, FormField::Name, &mut errors)
            .and_then(|name| bounded(name, MAX_NAME_LEN, FormField::Name, &mut errors));
        let description = required(&self.description, FormField::Description, &mut errors)
            .and_then(|text| {
                bounded(text, MAX_DESCRIPTION_LEN, FormField::Description, &mut errors)
            });

        let price = required(&self.price, FormField::Price, &mut errors).and_then(|raw| {
            let parsed = Decimal::from_str(raw)
                .ok()
                .and_then(|amount| Price::new(amount).ok());
            if parsed.is_none() {
                errors.push(FormField::Price, FieldError::InvalidPrice);
            }
            parsed
        });

        let stock = required(&self.stock, FormField::Stock, &mut errors).and_then(|raw| {
            let parsed = raw.parse::<u32>().ok();
            if parsed.is_none() {
                errors.push(FormField::Stock, FieldError::InvalidStock);
            }
            parsed
        });

        let category = required(&self.category, FormField::Category, &mut errors);

        let image_urls: Vec<String> = self
            .image_urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();
        if image_urls.len() > MAX_IMAGES {
            errors.push(FormField::Images, FieldError::TooManyImages);
        }

        match (name, description, price, stock, category) {
            (Some(name), Some(description), Some(price), Some(stock), Some(category))
                if errors.is_empty() =>
            {
                Ok(NewProduct {
                    name: name.to_string(),
                    description: description.to_string(),
                    price,
                    stock,
                    category: CategoryId::new(category),
                    image_urls,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required<'a>(value: &'a str, field: FormField, errors: &mut FormErrors) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, FieldError::Required);
        None
    } else {
        Some(value)
    }
}

fn bounded<'a>(
    value: &'a str,
    max: usize,
    field: FormField,
    errors: &mut FormErrors,
) -> Option<&'a str> {
    if value.chars().count() > max {
        errors.push(field, FieldError::TooLong { max });
        None
    } else {
        Some(value)
    }
}

/// Validate and submit the form as the given viewer.
///
/// A viewer without the `admin` capability and a form with invalid fields are
/// both refused before anything is sent; neither stashes a popup. Once the
/// request is sent, its outcome is stashed as a popup for the next view: a
/// success message, or a failure message carrying the error text.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`], [`AppError::Form`], the backend's
/// [`AppError::Api`] error, or a storage error if the popup cannot be stashed.
#[instrument(skip_all, fields(name = %form.name.trim()))]
pub async fn submit_new_product<S: KeyValueStore>(
    api: &ApiClient,
    popups: &PopupStore<S>,
    viewer: &Viewer,
    form: &NewProductForm,
) -> Result<NewProduct, AppError> {
    let token = viewer.require_admin()?;
    let product = form.validate()?;

    match api.create_product(token, &product).await {
        Ok(()) => {
            popups.stash(&PopupMessage::success("Success", "Product created"))?;
            add_breadcrumb("admin", "Created product", Some(&[("name", product.name.as_str())]));
            info!("Product submitted");
            Ok(product)
        }
        Err(e) => {
            popups.stash(&PopupMessage::failure(
                "Failed to create product",
                e.to_string(),
            ))?;
            Err(e.into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::auth::Identity;
    use crate::config::ApiConfig;
    use crate::storage::MemoryStore;

    fn valid_form() -> NewProductForm {
        NewProductForm {
            name: " Lamp ".to_string(),
            description: "A lamp".to_string(),
            price: "19.90".to_string(),
            stock: "0".to_string(),
            category: "cat-1".to_string(),
            image_urls: vec!["https://img.example/1.jpg".to_string(), "  ".to_string()],
        }
    }

    #[test]
    fn test_valid_form_builds_product() {
        let product = valid_form().validate().unwrap();
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price.amount(), Decimal::new(1990, 2));
        assert_eq!(product.stock, 0);
        assert_eq!(product.category.as_str(), "cat-1");
        assert_eq!(product.image_urls, ["https://img.example/1.jpg"]);
    }

    #[test]
    fn test_blank_form_reports_every_required_field() {
        let errors = NewProductForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            [
                FormField::Name,
                FormField::Description,
                FormField::Price,
                FormField::Stock,
                FormField::Category,
            ]
        );
        assert!(errors.iter().all(|(_, e)| *e == FieldError::Required));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let form = NewProductForm {
            price: "-1".to_string(),
            stock: "2.5".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(FormField::Price), Some(&FieldError::InvalidPrice));
        assert_eq!(errors.get(FormField::Stock), Some(&FieldError::InvalidStock));
        assert_eq!(errors.get(FormField::Name), None);
    }

    #[test]
    fn test_rejects_too_many_images() {
        let form = NewProductForm {
            image_urls: (0..=MAX_IMAGES).map(|i| format!("https://img/{i}")).collect(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(FormField::Images), Some(&FieldError::TooManyImages));
        assert_eq!(errors.to_string(), "images at most 5 images allowed");
    }

    #[test]
    fn test_name_and_description_length_limits() {
        let at_limit = NewProductForm {
            name: "n".repeat(MAX_NAME_LEN),
            description: "é".repeat(MAX_DESCRIPTION_LEN),
            ..valid_form()
        };
        let product = at_limit.validate().unwrap();
        assert_eq!(product.name.chars().count(), 50);
        assert_eq!(product.description.chars().count(), 400);

        let over = NewProductForm {
            name: "n".repeat(MAX_NAME_LEN + 1),
            description: "d".repeat(MAX_DESCRIPTION_LEN + 1),
            ..valid_form()
        };
        let errors = over.validate().unwrap_err();
        assert_eq!(errors.get(FormField::Name), Some(&FieldError::TooLong { max: 50 }));
        assert_eq!(
            errors.get(FormField::Description),
            Some(&FieldError::TooLong { max: 400 })
        );
        assert!(errors.to_string().starts_with("name must be at most 50 characters"));
    }

    #[tokio::test]
    async fn test_non_admin_is_refused_without_popup() {
        let api = ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            timeout: Duration::from_millis(100),
        })
        .unwrap();
        let popups = PopupStore::new(MemoryStore::new());
        let viewer = Viewer::signed_in(Identity::new(SecretString::from("tok"), ["customer"]));

        let result = submit_new_product(&api, &popups, &viewer, &valid_form()).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(popups.take(), None);
    }
}
