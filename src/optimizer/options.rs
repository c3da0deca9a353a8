//! Per-call options for `QueryOptimizer::execute_query`.

/// Operation label used when the caller does not name one.
pub const DEFAULT_OPERATION: &str = "SELECT";

// == Query Options ==
/// How a single query interacts with the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// TTL in seconds, `None` uses the optimizer's default
    pub ttl: Option<u64>,
    /// When false the cache is neither read nor written
    pub enabled: bool,
    /// Invalidation groups for the stored result
    pub tags: Vec<String>,
    /// Label recorded with the query metric
    pub operation: String,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl = Some(ttl_seconds);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    /// Bypasses the cache for this call.
    pub fn uncached(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            ttl: None,
            enabled: true,
            tags: Vec::new(),
            operation: DEFAULT_OPERATION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = QueryOptions::default();
        assert_eq!(options.ttl, None);
        assert!(options.enabled);
        assert!(options.tags.is_empty());
        assert_eq!(options.operation, "SELECT");
    }

    #[test]
    fn test_builder() {
        let options = QueryOptions::new()
            .with_ttl(30)
            .with_tags(["leads", "analytics"])
            .with_operation("AGGREGATE")
            .uncached();

        assert_eq!(options.ttl, Some(30));
        assert_eq!(options.tags, vec!["leads", "analytics"]);
        assert_eq!(options.operation, "AGGREGATE");
        assert!(!options.enabled);
    }
}
