use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::utils::db_utils::{Pagination, QryOrder};

pub const DEFAULT_SORT: &str = "created_at";

#[derive(Debug, Deserialize, Validate)]
pub struct OrdinaryInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
}

impl OrdinaryInquiry {
    pub fn pagination(&self) -> AppResult<Pagination> {
        Pagination::new(self.page, self.limit, DEFAULT_SORT.to_string(), QryOrder::DESC)
    }
}

/// Inclusive numeric bounds of a search filter.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
#[validate(schema(function = validate_range))]
pub struct NumberRange {
    pub start: i64,
    pub end: i64,
}

fn validate_range(range: &NumberRange) -> Result<(), ValidationError> {
    if range.start > range.end {
        return Err(ValidationError::new("range").with_message("start is after end".into()));
    }
    Ok(())
}

impl NumberRange {
    pub fn condition(&self, field: &str) -> String {
        format!("{field} >= {} AND {field} <= {}", self.start, self.end)
    }
}

/// Builds the page window, rejecting sort fields outside `allowed`.
pub fn sorted_pagination(
    page: u32,
    limit: u32,
    sort: Option<&str>,
    direction: Option<QryOrder>,
    allowed: &[&str],
) -> AppResult<Pagination> {
    let order_by = sort.unwrap_or(DEFAULT_SORT);
    if !allowed.contains(&order_by) {
        return Err(AppError::Validation {
            description: format!("sort by '{order_by}' is not allowed"),
        });
    }
    Pagination::new(
        page,
        limit,
        order_by.to_string(),
        direction.unwrap_or_default(),
    )
}

/// `(a = true OR b = true)` over whitelisted boolean fields.
pub fn options_condition(options: &[String], allowed: &[&str]) -> AppResult<Option<String>> {
    if options.is_empty() {
        return Ok(None);
    }
    let mut parts = Vec::with_capacity(options.len());
    for option in options {
        if !allowed.contains(&option.as_str()) {
            return Err(AppError::Validation {
                description: format!("unknown option '{option}'"),
            });
        }
        parts.push(format!("{option} = true"));
    }
    Ok(Some(format!("({})", parts.join(" OR "))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_created_at_desc() {
        let p = sorted_pagination(1, 10, None, None, &["created_at"]).unwrap();
        assert_eq!(p.order_by, "created_at");
        assert_eq!(p.order_dir, QryOrder::DESC);
    }

    #[test]
    fn sort_outside_whitelist_rejected() {
        let res = sorted_pagination(1, 10, Some("member_password"), None, &["created_at"]);
        assert!(matches!(res, Err(AppError::Validation { .. })));
    }

    #[test]
    fn range_condition_is_inclusive() {
        let range = NumberRange { start: 100, end: 500 };
        assert!(range.validate().is_ok());
        assert_eq!(
            range.condition("property_price"),
            "property_price >= 100 AND property_price <= 500"
        );
        assert!(NumberRange { start: 5, end: 1 }.validate().is_err());
    }

    #[test]
    fn options_are_or_joined() {
        let cond = options_condition(
            &["property_barter".to_string(), "property_rent".to_string()],
            &["property_barter", "property_rent"],
        )
        .unwrap();
        assert_eq!(
            cond.as_deref(),
            Some("(property_barter = true OR property_rent = true)")
        );
        assert!(options_condition(&["x".to_string()], &["property_rent"]).is_err());
        assert!(options_condition(&[], &["property_rent"]).unwrap().is_none());
    }
}
