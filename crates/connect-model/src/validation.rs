//! Input validation
//!
//! [`Validator`] collects every field error instead of stopping at the
//! first, then reports them as one [`ConnectError::ValidationFailed`].

use crate::error::{ConnectError, ConnectResult};

/// Accumulates field errors.
///
/// # Example
///
/// ```
/// use connect_model::Validator;
///
/// let mut v = Validator::new();
/// v.length("name", "Al", 3, 80);
/// v.email("email", "not-an-email");
/// let err = v.finish().unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "\"name\" length must be at least 3 characters long, \"email\" must be a valid email"
/// );
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` unless `ok` holds.
    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    /// Trimmed value must not be empty.
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            !value.trim().is_empty(),
            format!("\"{field}\" is not allowed to be empty"),
        )
    }

    /// Character length of the trimmed value must fall in `min..=max`.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.trim().chars().count();
        if len < min {
            self.errors
                .push(format!("\"{field}\" length must be at least {min} characters long"));
        } else if len > max {
            self.errors.push(format!(
                "\"{field}\" length must be less than or equal to {max} characters long"
            ));
        }
        self
    }

    /// Character length of the trimmed value must be at least `min`.
    pub fn min_length(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        self.length(field, value, min, usize::MAX)
    }

    /// Minimal structural email check: one `@`, non-empty local part, a dot in the domain.
    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(is_email(value), format!("\"{field}\" must be a valid email"))
    }

    /// Absolute http(s) URL.
    pub fn uri(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(is_http_url(value), format!("\"{field}\" must be a valid uri"))
    }

    /// Numeric range check, inclusive.
    pub fn range(&mut self, field: &str, value: f64, min: f64, max: f64) -> &mut Self {
        if !value.is_finite() {
            self.errors.push(format!("\"{field}\" must be a number"));
        } else if value < min {
            self.errors
                .push(format!("\"{field}\" must be greater than or equal to {min}"));
        } else if value > max {
            self.errors
                .push(format!("\"{field}\" must be less than or equal to {max}"));
        }
        self
    }

    /// Whether no errors were recorded so far.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Recorded errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// `Ok` if nothing was recorded, else every message joined with ", ".
    pub fn finish(self) -> ConnectResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConnectError::ValidationFailed(self.errors.join(", ")))
        }
    }
}

/// Structural email check.
pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
            .unwrap_or(false)
}

/// Absolute http(s) URL with a host.
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}
