pub mod engine;
pub mod handlers;
pub mod rate_limit;
pub mod registry;

pub use engine::{MAX_PREDICTIONS, QueryResult, query, share_percent};
pub use handlers::{AppState, DEFAULT_LIMIT, Session, router};
pub use registry::{DEFAULT_WORDLIST, WordlistRegistry};
