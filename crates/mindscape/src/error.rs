#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout option `{field}`: {value}")]
    InvalidConfig { field: &'static str, value: f64 },
    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },
    #[error("unknown layout type: {name}")]
    UnknownLayout { name: String },
    #[error("unknown orphan policy: {name}")]
    UnknownOrphanPolicy { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
