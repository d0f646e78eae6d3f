//! Multi-valued query strings.
//!
//! List parameters may be sent either as repeated keys
//! (`?ids=1&ids=2`) or as one comma separated value (`?ids=1,2`); both forms
//! may be mixed in a single request.

use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::{datetime, Page, ParamError, Result};

/// Decoded query-string pairs in request order.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decodes a raw query string (without the leading `?`).
    pub fn parse(raw: &str) -> Self {
        let pairs = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First non-blank value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// All values for `name`, with comma separated values split apart.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .flat_map(|(_, v)| v.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Parses an optional scalar parameter.
    pub fn parse_opt<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.get(name)
            .map(|raw| raw.parse().map_err(|_| ParamError::invalid(name, raw)))
            .transpose()
    }

    /// Parses a required scalar parameter.
    pub fn require<T: FromStr>(&self, name: &str) -> Result<T> {
        self.parse_opt(name)?
            .ok_or_else(|| ParamError::missing(name))
    }

    /// Parses a list parameter; absent means empty.
    pub fn parse_list<T: FromStr>(&self, name: &str) -> Result<Vec<T>> {
        self.values(name)
            .into_iter()
            .map(|raw| raw.parse().map_err(|_| ParamError::invalid(name, raw)))
            .collect()
    }

    /// Parses an optional `yyyy-MM-dd HH:mm:ss` timestamp.
    pub fn datetime(&self, name: &str) -> Result<Option<NaiveDateTime>> {
        self.get(name)
            .map(|raw| datetime::parse(raw).map_err(|_| ParamError::invalid(name, raw)))
            .transpose()
    }

    /// Parses a required `yyyy-MM-dd HH:mm:ss` timestamp.
    pub fn require_datetime(&self, name: &str) -> Result<NaiveDateTime> {
        self.datetime(name)?
            .ok_or_else(|| ParamError::missing(name))
    }

    /// Reads the `from` / `size` pair.
    pub fn page(&self) -> Result<Page> {
        Page::new(self.parse_opt("from")?, self.parse_opt("size")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_and_comma_separated() {
        let q = QueryParams::parse("ids=1&ids=2,3&ids=&other=x");
        assert_eq!(q.values("ids"), vec!["1", "2", "3"]);
        assert_eq!(q.parse_list::<u64>("ids").unwrap(), vec![1, 2, 3]);
        assert!(q.parse_list::<u64>("missing").unwrap().is_empty());
    }

    #[test]
    fn test_scalars() {
        let q = QueryParams::parse("paid=true&size=5&text=Big%20Show&bad=abc");
        assert_eq!(q.parse_opt::<bool>("paid").unwrap(), Some(true));
        assert_eq!(q.get("text"), Some("Big Show"));
        assert_eq!(q.parse_opt::<u32>("nope").unwrap(), None);
        assert!(matches!(
            q.parse_opt::<i64>("bad"),
            Err(ParamError::Invalid { .. })
        ));
        assert!(matches!(
            q.require::<i64>("eventId"),
            Err(ParamError::Missing { .. })
        ));
    }

    #[test]
    fn test_datetime_decoding() {
        let q = QueryParams::parse("start=2024-01-01%2000%3A00%3A00&end=2024-01-02+10:00:00");
        assert_eq!(
            datetime::format(&q.require_datetime("start").unwrap()),
            "2024-01-01 00:00:00"
        );
        assert_eq!(
            datetime::format(&q.require_datetime("end").unwrap()),
            "2024-01-02 10:00:00"
        );
        assert!(q.datetime("rangeStart").unwrap().is_none());
        assert!(QueryParams::parse("start=tomorrow")
            .datetime("start")
            .is_err());
    }

    #[test]
    fn test_page() {
        let q = QueryParams::parse("from=20&size=5");
        assert_eq!(q.page().unwrap(), Page { from: 20, size: 5 });
        assert!(QueryParams::parse("size=0").page().is_err());
        assert!(QueryParams::parse("from=-1").page().is_err());
        assert_eq!(QueryParams::default().page().unwrap(), Page::default());
    }
}
