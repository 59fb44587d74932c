//! Wire types and display labels

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `/date_range` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub min_date: String,
    pub max_date: String,
}

/// One bucket of an `/aggregate` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: String,
    pub value: f64,
}

/// Language of the selector labels shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Ru,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Count,
    Sum,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 2] = [AggregateKind::Count, AggregateKind::Sum];

    /// Token sent as `aggregate_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Count, Language::Ru) => "Количество покупок",
            (Self::Sum, Language::Ru) => "Сумма продаж",
            (Self::Count, Language::En) => "Purchase count",
            (Self::Sum, Language::En) => "Sales total",
        }
    }

    /// Resolve a selector label in either language, or a wire token
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|kind| {
            kind.as_str() == label
                || kind.label(Language::Ru) == label
                || kind.label(Language::En).eq_ignore_ascii_case(label)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Day, Granularity::Week, Granularity::Month];

    /// Token sent as `group_by`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Day, Language::Ru) => "День",
            (Self::Week, Language::Ru) => "Неделя",
            (Self::Month, Language::Ru) => "Месяц",
            (Self::Day, Language::En) => "Day",
            (Self::Week, Language::En) => "Week",
            (Self::Month, Language::En) => "Month",
        }
    }

    /// Resolve a selector label in either language, or a wire token
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|g| {
            g.as_str() == label
                || g.label(Language::Ru).to_lowercase() == label
                || g.label(Language::En).to_lowercase() == label
        })
    }
}

/// Parameters of one `/aggregate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    pub product_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub aggregate: AggregateKind,
    pub granularity: Granularity,
}

impl AggregateQuery {
    pub(crate) fn to_params(&self) -> [(&'static str, String); 5] {
        [
            ("product_id", self.product_id.to_string()),
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
            ("aggregate_type", self.aggregate.as_str().to_string()),
            ("group_by", self.granularity.as_str().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_labels_map_to_tokens() {
        assert_eq!(
            AggregateKind::from_label("Количество покупок"),
            Some(AggregateKind::Count)
        );
        assert_eq!(AggregateKind::from_label("Сумма продаж"), Some(AggregateKind::Sum));
        assert_eq!(AggregateKind::from_label("sales total"), Some(AggregateKind::Sum));
        assert_eq!(AggregateKind::from_label("sum"), Some(AggregateKind::Sum));
        assert_eq!(AggregateKind::from_label("average"), None);
    }

    #[test]
    fn test_granularity_labels_map_to_tokens() {
        assert_eq!(Granularity::from_label("День"), Some(Granularity::Day));
        assert_eq!(Granularity::from_label("неделя"), Some(Granularity::Week));
        assert_eq!(Granularity::from_label("Месяц"), Some(Granularity::Month));
        assert_eq!(Granularity::from_label("Week"), Some(Granularity::Week));
        assert_eq!(Granularity::from_label(" month "), Some(Granularity::Month));
        assert_eq!(Granularity::from_label("year"), None);
    }

    #[test]
    fn test_query_params() {
        let query = AggregateQuery {
            product_id: 42,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
            aggregate: AggregateKind::Sum,
            granularity: Granularity::Week,
        };
        let params = query.to_params();
        assert_eq!(params[0], ("product_id", "42".to_string()));
        assert_eq!(params[1], ("start_date", "2023-01-01".to_string()));
        assert_eq!(params[2], ("end_date", "2023-01-31".to_string()));
        assert_eq!(params[3], ("aggregate_type", "sum".to_string()));
        assert_eq!(params[4], ("group_by", "week".to_string()));
    }
}
