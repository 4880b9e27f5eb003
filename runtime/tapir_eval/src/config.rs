//! Evaluation configuration.
//!
//! A small `Copy` policy struct, set once per interpreter through
//! [`InterpreterBuilder`](crate::InterpreterBuilder) or read from the
//! environment by hosts.

/// Whether resolved references may be written back onto the tape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CacheMode {
    /// Inline cache on: a plain reference that resolves to a stable callable
    /// is replaced in its tape cell by that callable.
    #[default]
    Rewrite,
    /// Every visit resolves through the environment chain. Observes
    /// rebinding of outer names between visits.
    NoRewrite,
}

/// Default maximum call nesting.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Evaluation policy for one interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EvalConfig {
    pub cache: CacheMode,
    /// Maximum nesting of function calls and re-entries, `None` for
    /// unlimited (the stack is grown on demand).
    pub max_depth: Option<usize>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            cache: CacheMode::Rewrite,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl EvalConfig {
    /// Read `TAPIR_CACHE` (`on`/`off`) and `TAPIR_MAX_DEPTH`
    /// (a number or `unlimited`). Unset or unparsable values keep the
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = EvalConfig::default();
        match lookup("TAPIR_CACHE").as_deref() {
            Some("off" | "0" | "false") => config.cache = CacheMode::NoRewrite,
            Some("on" | "1" | "true") => config.cache = CacheMode::Rewrite,
            Some(other) => tracing::warn!(value = other, "ignoring unknown TAPIR_CACHE"),
            None => {}
        }
        match lookup("TAPIR_MAX_DEPTH").as_deref() {
            Some("unlimited") => config.max_depth = None,
            Some(n) => match n.parse() {
                Ok(n) => config.max_depth = Some(n),
                Err(_) => tracing::warn!(value = n, "ignoring unparsable TAPIR_MAX_DEPTH"),
            },
            None => {}
        }
        config
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.cache, CacheMode::Rewrite);
        assert_eq!(config.max_depth, Some(DEFAULT_MAX_DEPTH));
        assert_eq!(EvalConfig::from_lookup(lookup(&[])), config);
    }

    #[test]
    fn test_from_lookup_reads_both_keys() {
        let config = EvalConfig::from_lookup(lookup(&[
            ("TAPIR_CACHE", "off"),
            ("TAPIR_MAX_DEPTH", "64"),
        ]));
        assert_eq!(config.cache, CacheMode::NoRewrite);
        assert_eq!(config.max_depth, Some(64));
    }

    #[test]
    fn test_from_lookup_unlimited_and_garbage() {
        let config = EvalConfig::from_lookup(lookup(&[
            ("TAPIR_CACHE", "maybe"),
            ("TAPIR_MAX_DEPTH", "unlimited"),
        ]));
        assert_eq!(config.cache, CacheMode::Rewrite);
        assert_eq!(config.max_depth, None);

        let config = EvalConfig::from_lookup(lookup(&[("TAPIR_MAX_DEPTH", "deep")]));
        assert_eq!(config.max_depth, Some(DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn test_builder_style_setters() {
        let config = EvalConfig::default()
            .with_cache(CacheMode::NoRewrite)
            .with_max_depth(None);
        assert_eq!(config.cache, CacheMode::NoRewrite);
        assert_eq!(config.max_depth, None);
    }
}
