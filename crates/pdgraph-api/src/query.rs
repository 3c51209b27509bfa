//! Query string construction.

use pdgraph_core::PageArgs;
use reqwest::Url;
use serde_json::Value;

/// Ordered query parameters. A `None` value means "absent" and is dropped
/// before encoding, which is different from an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Option<String>)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        self.0.push((key.into(), value.map(Into::into)));
    }

    pub fn with(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.push(key, value);
        self
    }

    /// Parameters that survive encoding.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key.as_str(), v)))
    }

    /// Append the present parameters to `url`. Leaves `url` without a `?`
    /// when nothing is present.
    pub fn apply(&self, url: &mut Url) {
        if self.present().next().is_none() {
            return;
        }
        url.query_pairs_mut().extend_pairs(self.present());
    }
}

/// Page arguments as provider query parameters.
///
/// Array filters follow PagerDuty's list convention: the key gains a `[]`
/// suffix and is repeated once per element (`statuses[]=a&statuses[]=b`).
/// An empty array therefore contributes no parameter at all, and `null`
/// values are dropped like any other absent value.
impl From<&PageArgs> for QueryParams {
    fn from(args: &PageArgs) -> Self {
        let mut query = QueryParams::new()
            .with("limit", args.limit.map(|v| v.to_string()))
            .with("offset", args.offset.map(|v| v.to_string()));

        for (key, value) in &args.filters {
            match value {
                Value::Array(values) => {
                    let key = if key.ends_with("[]") {
                        key.clone()
                    } else {
                        format!("{}[]", key)
                    };
                    for value in values {
                        query.push(key.clone(), scalar(value));
                    }
                }
                other => query.push(key.clone(), scalar(other)),
            }
        }
        query
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://api.pagerduty.com/incidents").unwrap()
    }

    #[test]
    fn test_absent_values_are_dropped() {
        let query = QueryParams::new()
            .with("limit", Some("10"))
            .with("offset", None::<String>)
            .with("since", Some(""));

        let mut url = base();
        query.apply(&mut url);
        assert_eq!(url.as_str(), "https://api.pagerduty.com/incidents?limit=10&since=");
    }

    #[test]
    fn test_no_present_values_means_no_question_mark() {
        let query = QueryParams::new()
            .with("limit", None::<String>)
            .with("offset", None::<String>);

        let mut url = base();
        query.apply(&mut url);
        assert_eq!(url.as_str(), "https://api.pagerduty.com/incidents");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_values_are_url_encoded() {
        let query = QueryParams::new().with("query", Some("disk full & more"));
        let mut url = base();
        query.apply(&mut url);
        assert_eq!(url.query(), Some("query=disk+full+%26+more"));
    }

    #[test]
    fn test_page_args_expand_arrays_and_drop_nulls() {
        let args: PageArgs = serde_json::from_value(json!({
            "limit": 5,
            "statuses": ["triggered", "acknowledged"],
            "urgency": null
        }))
        .unwrap();

        let query = QueryParams::from(&args);
        let present: Vec<_> = query.present().collect();
        assert_eq!(
            present,
            vec![
                ("limit", "5"),
                ("statuses[]", "triggered"),
                ("statuses[]", "acknowledged"),
            ]
        );
    }

    #[test]
    fn test_array_filters_use_bracket_keys() {
        let args: PageArgs = serde_json::from_value(json!({
            "urgencies[]": ["high"],
            "service_ids": [],
            "date_range": "all"
        }))
        .unwrap();

        let query = QueryParams::from(&args);
        let mut present: Vec<_> = query.present().collect();
        present.sort();
        assert_eq!(present, vec![("date_range", "all"), ("urgencies[]", "high")]);

        let mut url = base();
        QueryParams::new().with("urgencies[]", Some("high")).apply(&mut url);
        assert_eq!(url.query(), Some("urgencies%5B%5D=high"));
    }
}
