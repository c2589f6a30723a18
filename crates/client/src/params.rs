/// Ordered request parameters.
///
/// A flat list of key/value pairs rather than a map: Sling-style servers use
/// repeated keys for multi-valued properties (`:member=a&:member=b`), and
/// insertion order is occasionally significant for `@Delete`-style operation
/// suffixes. Values are always strings; file uploads go through
/// `execute_file_post` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one pair, builder style.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Append one key once per value — the wire form of a multi-valued field.
    pub fn add_each<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.pairs.push((key.to_string(), value.into()));
        }
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Percent-encoded `k=v&k=v` string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_encoding() {
        let params = Params::new()
            .add("sling:resourceType", "app/site")
            .add("title", "fish & chips");
        assert_eq!(
            params.to_query_string(),
            "sling%3AresourceType=app%2Fsite&title=fish%20%26%20chips"
        );
    }

    #[test]
    fn test_multi_valued_keys_repeat() {
        let params = Params::new().add_each(":member", ["alice", "bob"]);
        assert_eq!(
            params.pairs(),
            &[
                (":member".to_string(), "alice".to_string()),
                (":member".to_string(), "bob".to_string()),
            ]
        );
        assert_eq!(params.to_query_string(), "%3Amember=alice&%3Amember=bob");
    }

    #[test]
    fn test_empty() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
    }

    #[test]
    fn test_from_iterator_preserves_order() {
        let params: Params = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(params.len(), 3);
        assert_eq!(params.to_query_string(), "a=1&b=2&a=3");
    }
}
