//! Aggregate request validation
//!
//! Turns raw query-string values into a typed `AggregateRequest`. Grouping
//! aliases (English and Russian) are normalized here; nothing downstream
//! sees the raw tokens.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use utoipa::IntoParams;

/// Aggregate computed per bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Count,
    Sum,
}

impl AggregateKind {
    /// Exact, case-sensitive wire token
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "count" => Some(Self::Count),
            "sum" => Some(Self::Sum),
            _ => None,
        }
    }
}

/// Bucket size of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Case-insensitive, accepts English and Russian names
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "day" | "день" => Some(Self::Day),
            "week" | "неделя" => Some(Self::Week),
            "month" | "месяц" => Some(Self::Month),
            _ => None,
        }
    }
}

/// Raw aggregate query parameters as received
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RawAggregateParams {
    /// Product identifier (unsigned integer)
    #[param(example = "42")]
    pub product_id: Option<String>,
    /// First day of the range, inclusive (YYYY-MM-DD)
    #[param(example = "2023-01-01")]
    pub start_date: Option<String>,
    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[param(example = "2023-01-31")]
    pub end_date: Option<String>,
    /// `count` or `sum`
    #[param(example = "sum")]
    pub aggregate_type: Option<String>,
    /// `day`, `week`, `month`, `день`, `неделя` or `месяц`
    #[param(example = "day")]
    pub group_by: Option<String>,
}

/// Validated aggregate request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateRequest {
    pub product_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub aggregate: AggregateKind,
    pub granularity: Granularity,
}

/// Rejected aggregate request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing parameters: {}", .0.join(", "))]
    MissingParameters(Vec<&'static str>),

    #[error("Invalid group_by parameter. Use 'day', 'week', 'month', 'день', 'неделя', or 'месяц'")]
    InvalidGroupBy(String),

    #[error("Invalid aggregate_type parameter. Use 'count' or 'sum'")]
    InvalidAggregateType(String),

    #[error("Invalid product_id parameter '{0}'. Use a non-negative integer")]
    InvalidProductId(String),

    #[error("Invalid {field} parameter '{value}'. Use YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid date range: start_date {start} is after end_date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl ValidationError {
    /// Name of the offending parameter, None when several are missing
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameters(fields) if fields.len() == 1 => Some(fields[0]),
            Self::MissingParameters(_) => None,
            Self::InvalidGroupBy(_) => Some("group_by"),
            Self::InvalidAggregateType(_) => Some("aggregate_type"),
            Self::InvalidProductId(_) => Some("product_id"),
            Self::InvalidDate { field, .. } => Some(field),
            Self::InvalidRange { .. } => Some("start_date"),
        }
    }
}

/// Treat absent and empty values alike
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Validate raw parameters, reporting only the first failure
pub fn validate(raw: &RawAggregateParams) -> Result<AggregateRequest, ValidationError> {
    let fields = [
        ("product_id", present(&raw.product_id)),
        ("start_date", present(&raw.start_date)),
        ("end_date", present(&raw.end_date)),
        ("aggregate_type", present(&raw.aggregate_type)),
        ("group_by", present(&raw.group_by)),
    ];
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

    let [
        (_, Some(product_id)),
        (_, Some(start_date)),
        (_, Some(end_date)),
        (_, Some(aggregate_type)),
        (_, Some(group_by)),
    ] = fields
    else {
        return Err(ValidationError::MissingParameters(missing));
    };

    let granularity = Granularity::parse(group_by)
        .ok_or_else(|| ValidationError::InvalidGroupBy(group_by.to_string()))?;
    let aggregate = AggregateKind::parse(aggregate_type)
        .ok_or_else(|| ValidationError::InvalidAggregateType(aggregate_type.to_string()))?;
    let product_id = product_id
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidProductId(product_id.to_string()))?;
    let start_date = parse_date("start_date", start_date)?;
    let end_date = parse_date("end_date", end_date)?;

    if start_date > end_date {
        return Err(ValidationError::InvalidRange {
            start: start_date,
            end: end_date,
        });
    }

    Ok(AggregateRequest {
        product_id,
        start_date,
        end_date,
        aggregate,
        granularity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        product_id: &str,
        start: &str,
        end: &str,
        aggregate: &str,
        group_by: &str,
    ) -> RawAggregateParams {
        RawAggregateParams {
            product_id: Some(product_id.to_string()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            aggregate_type: Some(aggregate.to_string()),
            group_by: Some(group_by.to_string()),
        }
    }

    fn valid() -> RawAggregateParams {
        params("42", "2023-01-01", "2023-01-31", "sum", "day")
    }

    #[test]
    fn test_valid_request() {
        let request = validate(&valid()).unwrap();
        assert_eq!(request.product_id, 42);
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2023, 1, 31).unwrap());
        assert_eq!(request.aggregate, AggregateKind::Sum);
        assert_eq!(request.granularity, Granularity::Day);
    }

    #[test]
    fn test_missing_parameter_is_named() {
        let mut raw = valid();
        raw.end_date = None;
        let err = validate(&raw).unwrap_err();
        assert_eq!(err, ValidationError::MissingParameters(vec!["end_date"]));
        assert_eq!(err.to_string(), "Missing parameters: end_date");
        assert_eq!(err.field(), Some("end_date"));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut raw = valid();
        raw.product_id = Some(String::new());
        raw.group_by = Some(String::new());
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameters(vec!["product_id", "group_by"])
        );
        assert!(err.to_string().starts_with("Missing parameters"));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_missing_reported_before_other_failures() {
        let mut raw = params("abc", "bad", "2023-01-31", "avg", "year");
        raw.end_date = None;
        assert!(matches!(
            validate(&raw),
            Err(ValidationError::MissingParameters(_))
        ));
    }

    #[test]
    fn test_group_by_aliases() {
        for (token, expected) in [
            ("day", Granularity::Day),
            ("DAY", Granularity::Day),
            ("день", Granularity::Day),
            ("ДЕНЬ", Granularity::Day),
            ("week", Granularity::Week),
            ("Неделя", Granularity::Week),
            ("month", Granularity::Month),
            ("месяц", Granularity::Month),
        ] {
            let raw = params("42", "2023-01-01", "2023-01-31", "sum", token);
            assert_eq!(validate(&raw).unwrap().granularity, expected, "token {token}");
        }
    }

    #[test]
    fn test_invalid_group_by() {
        let raw = params("42", "2023-01-01", "2023-01-31", "sum", "year");
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid group_by parameter. Use 'day', 'week', 'month', 'день', 'неделя', or 'месяц'"
        );
    }

    #[test]
    fn test_group_by_checked_before_aggregate_type() {
        let raw = params("42", "2023-01-01", "2023-01-31", "avg", "year");
        assert!(matches!(
            validate(&raw),
            Err(ValidationError::InvalidGroupBy(_))
        ));
    }

    #[test]
    fn test_aggregate_type_is_case_sensitive() {
        let raw = params("42", "2023-01-01", "2023-01-31", "SUM", "day");
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid aggregate_type parameter. Use 'count' or 'sum'"
        );
    }

    #[test]
    fn test_invalid_product_id() {
        for bad in ["abc", "-1", "4.2", "18446744073709551616"] {
            let raw = params(bad, "2023-01-01", "2023-01-31", "count", "day");
            assert_eq!(
                validate(&raw),
                Err(ValidationError::InvalidProductId(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_invalid_dates_name_the_field() {
        let raw = params("42", "2023-02-30", "2023-01-31", "count", "day");
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field(), Some("start_date"));

        let raw = params("42", "2023-01-01", "31/01/2023", "count", "day");
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field(), Some("end_date"));
        assert!(err.to_string().contains("31/01/2023"));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let raw = params("42", "2023-02-01", "2023-01-01", "count", "day");
        let err = validate(&raw).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRange { .. }));
        assert!(err.to_string().contains("2023-02-01"));
        assert!(err.to_string().contains("2023-01-01"));
    }

    #[test]
    fn test_single_day_range_accepted() {
        let raw = params("42", "2023-01-01", "2023-01-01", "count", "month");
        assert!(validate(&raw).is_ok());
    }
}
