pub mod error;
pub mod filter;
pub mod update;
pub mod value;

pub use error::SqlError;
pub use filter::{validate_range, WhereBuilder, WhereClause};
pub use update::SetClause;
pub use value::{bind_value, SqlValue};
