//! Validation of incoming expense payloads and normalization of timestamps.

use time::OffsetDateTime;

use crate::{
    Error,
    error::FieldViolation,
    expense::{ExpenseData, ExpensePayload},
};

impl ExpensePayload {
    /// Check the payload against the constraints every stored expense must
    /// satisfy.
    ///
    /// A missing timestamp becomes zero, it is up to the caller whether to
    /// replace it with the current time.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every field that:
    /// - is required but missing (`amt`, `category`, `user_id`),
    /// - or breaks a constraint (`amt` must be greater than zero, `user_id`
    ///   must not be empty).
    pub fn validate(self) -> Result<ExpenseData, Error> {
        let mut violations = Vec::new();

        match self.amount {
            None => violations.push(FieldViolation {
                field: "amt",
                reason: "is required",
            }),
            Some(amount) if amount.is_nan() || amount <= 0.0 => {
                violations.push(FieldViolation {
                    field: "amt",
                    reason: "must be greater than zero",
                })
            }
            Some(_) => {}
        }

        if self.category.is_none() {
            violations.push(FieldViolation {
                field: "category",
                reason: "is required",
            });
        }

        match self.user_id.as_deref() {
            None => violations.push(FieldViolation {
                field: "user_id",
                reason: "is required",
            }),
            Some("") => violations.push(FieldViolation {
                field: "user_id",
                reason: "must not be empty",
            }),
            Some(_) => {}
        }

        match (self.amount, self.category, self.user_id) {
            (Some(amount), Some(category), Some(user_id)) if violations.is_empty() => {
                Ok(ExpenseData {
                    amount,
                    category,
                    subcategory: self.subcategory,
                    description: self.description,
                    timestamp: self.timestamp.unwrap_or(0),
                    user_id,
                    cashback: self.cashback,
                })
            }
            _ => Err(Error::Validation(violations)),
        }
    }
}

impl ExpenseData {
    /// Replace an unset (zero) timestamp with `now`, in milliseconds since the
    /// Unix epoch. Any other timestamp is kept as is.
    pub fn with_default_timestamp(mut self, now: i64) -> Self {
        if self.timestamp == 0 {
            self.timestamp = now;
        }

        self
    }
}

/// The current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
