/// Errors raised while declaring validation rules.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A regular expression rule was given a pattern that does not compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, RuleError>;
