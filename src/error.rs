use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A constructor received dimensions or bounds it cannot work with.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    /// A heavy-hitter query received a threshold or total outside its domain.
    #[error("invalid query: {0}")]
    InvalidQuery(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
