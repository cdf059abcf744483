/// Cache key for one inference call: the JSON array `[data_repr, prompt]`.
///
/// JSON string escaping keeps the two components unambiguous, so distinct
/// (data, prompt) pairs never share a key.
pub fn cache_key(data_repr: &str, prompt: &str) -> String {
    serde_json::Value::Array(vec![
        serde_json::Value::String(data_repr.to_string()),
        serde_json::Value::String(prompt.to_string()),
    ])
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_and_unambiguous() {
        assert_eq!(cache_key("img-1", "Q?"), r#"["img-1","Q?"]"#);
        assert_eq!(cache_key("img-1", "Q?"), cache_key("img-1", "Q?"));
        // Moving text across the boundary must change the key.
        assert_ne!(cache_key("a\",\"b", "c"), cache_key("a", "b\",\"c"));
        assert_ne!(cache_key("ab", "c"), cache_key("a", "bc"));
    }
}
