//! Search criteria for `MeetingSearch` and `ItemSearch`

use crate::request::ParamValue;

/// Field holding the free-text query
pub const SEARCH_TEXT: &str = "SearchText";

/// Criteria sent as the nested `MeetingSearchCriteria` / `ItemSearchCriteria` structure
///
/// Fields are passed through by their service names; the transport orders
/// them the way the service schema declares.
///
/// ```
/// use legistar::SearchCriteria;
///
/// let criteria = SearchCriteria::new()
///     .text("zoning")
///     .with("BodyGUID", "B-1");
/// assert_eq!(criteria.get("SearchText"), Some("zoning"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    fields: Vec<(String, ParamValue)>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text query
    pub fn text(self, text: impl Into<String>) -> Self {
        self.with(SEARCH_TEXT, text.into())
    }

    /// Set any criteria field; setting a field twice keeps the last value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    /// Text value of a field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).and_then(|(_, v)| match v {
            ParamValue::Text(s) => Some(s.as_str()),
            ParamValue::Map(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn to_param(&self) -> ParamValue {
        ParamValue::Map(self.fields.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let criteria = SearchCriteria::new()
            .text("budget")
            .with("MatterFile", "120001")
            .text("zoning");

        assert_eq!(criteria.get(SEARCH_TEXT), Some("zoning"));
        assert_eq!(criteria.get("MatterFile"), Some("120001"));
        assert!(criteria.get("BodyGUID").is_none());

        let ParamValue::Map(fields) = criteria.to_param() else {
            panic!("expected map");
        };
        let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["SearchText", "MatterFile"]);
    }

    #[test]
    fn test_nested_values() {
        let criteria = SearchCriteria::new().with(
            "DateRange",
            ParamValue::map([("From", "2012-01-01"), ("To", "2012-12-31")]),
        );
        assert!(!criteria.is_empty());
        assert!(criteria.get("DateRange").is_none());
    }
}
