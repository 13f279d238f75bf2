//! Command implementations.

pub mod documents;
pub mod index;
pub mod parse;
pub mod report;
pub mod search;
pub mod serve;

pub use self::documents::execute_documents;
pub use self::index::execute_index;
pub use self::parse::execute_parse;
pub use self::report::{execute_report, execute_templates};
pub use self::search::{execute_context, execute_search};
pub use self::serve::execute_serve;
