use thiserror::Error;

pub type ShieldResult<T> = Result<T, ShieldError>;

#[derive(Error, Debug)]
pub enum ShieldError {
    /// A detection pattern failed to compile. A broken pattern table is a
    /// safety-critical misconfiguration: fatal at initialization, never
    /// caught per message.
    #[error("malformed detection pattern '{pattern}': {source}")]
    Taxonomy {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("taxonomy table '{0}' has no patterns or no redirect")]
    EmptyTaxonomy(&'static str),

    /// A child-role profile arrived without a resolved age. This must never
    /// be silently defaulted to an unsafe "allow".
    #[error("no resolved age for child account '{user_id}'")]
    MissingAge { user_id: String },

    #[error("configuration error: {0}")]
    Config(String),
}
