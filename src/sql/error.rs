use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SqlError {
    #[error("no data supplied")]
    EmptyUpdate,

    #[error("minimum {what} ({min}) cannot be greater than maximum {what} ({max})")]
    InvalidRange { what: &'static str, min: i64, max: i64 },
}
