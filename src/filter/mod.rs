//! Product listing queries: validated paging, sorting and filtering, rendered
//! as parameterised SQL.

pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod types;

pub use error::FilterError;
pub use filter::ProductFilter;
pub use types::*;
