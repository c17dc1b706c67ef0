//! Request bodies and the validation pass that turns them into domain input.
//!
//! Every field is held as an optional raw JSON value so that a missing or
//! mistyped field is reported as a [`FieldError`] alongside the others,
//! rather than aborting deserialization at the first problem. Numeric fields
//! also accept numeric strings (`"quantity": "2"`).

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde_json::{Number, Value};
use utoipa::ToSchema;

use crate::domain::errors::{DomainError, FieldError};
use crate::domain::ids::ObjectId;
use crate::domain::product::NewProduct;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    /// 24-character hexadecimal product id.
    #[schema(value_type = Option<String>)]
    pub product_id: Option<Value>,
    #[schema(value_type = Option<i64>, minimum = 1)]
    pub quantity: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    #[schema(value_type = Option<i64>, minimum = 1)]
    pub quantity: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[schema(value_type = Option<f64>, minimum = 0)]
    pub price: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[schema(value_type = Option<i64>, minimum = 0)]
    pub stock_quantity: Option<Value>,
    /// Absolute URI; an empty string is treated as absent.
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(value_type = Option<String>)]
    pub username: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub password: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub password: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemInput {
    pub product_id: ObjectId,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Collects field errors for one request body.
#[derive(Debug, Default)]
struct Report(Vec<FieldError>);

impl Report {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// `build` yields `None` only when a field was rejected, which the report
    /// has already recorded.
    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, DomainError> {
        match build() {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(DomainError::Validation(self.0)),
        }
    }

    /// `Some(None)` when absent; `None` when the value is not a string, which
    /// is reported.
    fn string<'v>(
        &mut self,
        field: &'static str,
        label: &str,
        value: Option<&'v Value>,
    ) -> Option<Option<&'v str>> {
        match value {
            None => Some(None),
            Some(Value::String(s)) => Some(Some(s.as_str())),
            Some(_) => {
                self.push(field, format!("{label} must be a string"));
                None
            }
        }
    }

    /// Like [`Report::string`], with numeric strings converted to numbers.
    fn number(
        &mut self,
        field: &'static str,
        label: &str,
        value: Option<&Value>,
    ) -> Option<Option<Number>> {
        let parsed = match value {
            None => return Some(None),
            Some(Value::Number(n)) => Some(n.clone()),
            Some(Value::String(s)) => s.trim().parse::<Number>().ok(),
            Some(_) => None,
        };
        if parsed.is_none() {
            self.push(field, format!("{label} must be a number"));
            return None;
        }
        Some(parsed)
    }

    fn required_text(
        &mut self,
        field: &'static str,
        label: &str,
        value: Option<&Value>,
    ) -> Option<String> {
        match self.string(field, label, value)?.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                self.push(field, format!("{label} is required"));
                None
            }
        }
    }

    fn integer(
        &mut self,
        field: &'static str,
        label: &str,
        value: Option<&Value>,
        min: i32,
        min_message: &str,
    ) -> Option<i32> {
        let Some(n) = self.number(field, label, value)? else {
            self.push(field, format!("{label} is required"));
            return None;
        };
        let Some(v) = as_integer(&n) else {
            self.push(field, format!("{label} must be an integer"));
            return None;
        };
        match i32::try_from(v) {
            Ok(v) if v >= min => Some(v),
            Ok(_) => {
                self.push(field, min_message.to_string());
                None
            }
            Err(_) if v < i64::from(min) => {
                self.push(field, min_message.to_string());
                None
            }
            Err(_) => {
                self.push(field, format!("{label} is too large"));
                None
            }
        }
    }
}

/// Integral JSON numbers, including floats with no fractional part.
fn as_integer(n: &Number) -> Option<i64> {
    if let Some(v) = n.as_i64() {
        return Some(v);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn is_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !raw.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

impl CartItemRequest {
    pub fn validate(&self) -> Result<CartItemInput, DomainError> {
        let mut report = Report::default();

        let product_id = report
            .required_text("productId", "Product ID", self.product_id.as_ref())
            .and_then(|raw| match ObjectId::parse_for("Product", &raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    report.push(
                        "productId",
                        "Product ID must be a valid 24-character hexadecimal identifier",
                    );
                    None
                }
            });
        let quantity = report.integer(
            "quantity",
            "Quantity",
            self.quantity.as_ref(),
            1,
            "Quantity must be at least 1",
        );

        report.finish(|| {
            Some(CartItemInput {
                product_id: product_id?,
                quantity: quantity?,
            })
        })
    }
}

impl UpdateCartItemRequest {
    pub fn validate(&self) -> Result<i32, DomainError> {
        let mut report = Report::default();
        let quantity = report.integer(
            "quantity",
            "Quantity",
            self.quantity.as_ref(),
            1,
            "Quantity must be at least 1",
        );
        report.finish(|| quantity)
    }
}

impl ProductRequest {
    pub fn validate(&self) -> Result<NewProduct, DomainError> {
        let mut report = Report::default();

        let name = report.required_text("name", "Product name", self.name.as_ref());
        let description =
            report.required_text("description", "Description", self.description.as_ref());

        let price = match report.number("price", "Price", self.price.as_ref()) {
            None => None,
            Some(None) => {
                report.push("price", "Price is required");
                None
            }
            Some(Some(n)) => match BigDecimal::from_str(&n.to_string()) {
                Ok(p) if p < BigDecimal::from(0) => {
                    report.push("price", "Price cannot be negative");
                    None
                }
                Ok(p) => Some(p),
                Err(_) => {
                    report.push("price", "Price must be a number");
                    None
                }
            },
        };

        let stock_quantity = report.integer(
            "stockQuantity",
            "Stock quantity",
            self.stock_quantity.as_ref(),
            0,
            "Stock quantity cannot be negative",
        );

        let image_url = match report
            .string("imageUrl", "Image URL", self.image_url.as_ref())
            .flatten()
            .map(str::trim)
        {
            None | Some("") => None,
            Some(raw) => match url::Url::parse(raw) {
                Ok(_) => Some(raw.to_string()),
                Err(_) => {
                    report.push("imageUrl", "Image URL must be a valid URI");
                    None
                }
            },
        };

        report.finish(|| {
            Some(NewProduct {
                name: name?,
                price: price?,
                description: description?,
                stock_quantity: stock_quantity?,
                image_url,
            })
        })
    }
}

impl Report {
    fn email(&mut self, value: Option<&Value>) -> Option<String> {
        let email = self.required_text("email", "Email", value)?;
        if !is_email(&email) {
            self.push("email", "Email must be a valid email address");
            return None;
        }
        Some(email.to_ascii_lowercase())
    }

    /// Passwords are taken verbatim, without trimming.
    fn password(&mut self, value: Option<&Value>, min_len: usize) -> Option<String> {
        match self.string("password", "Password", value)? {
            None | Some("") => {
                self.push("password", "Password is required");
                None
            }
            Some(p) if p.chars().count() < min_len => {
                self.push(
                    "password",
                    format!("Password must be at least {min_len} characters"),
                );
                None
            }
            Some(p) => Some(p.to_string()),
        }
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<RegisterInput, DomainError> {
        let mut report = Report::default();

        let username = report
            .required_text("username", "Username", self.username.as_ref())
            .filter(|u| {
                let len = u.chars().count();
                if (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
                    return true;
                }
                report.push(
                    "username",
                    format!(
                        "Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
                    ),
                );
                false
            });
        let email = report.email(self.email.as_ref());
        let password = report.password(self.password.as_ref(), PASSWORD_MIN_LEN);

        report.finish(|| {
            Some(RegisterInput {
                username: username?,
                email: email?,
                password: password?,
            })
        })
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<LoginInput, DomainError> {
        let mut report = Report::default();

        let email = report.email(self.email.as_ref());
        let password = report.password(self.password.as_ref(), 1);

        report.finish(|| {
            Some(LoginInput {
                email: email?,
                password: password?,
            })
        })
    }
}
