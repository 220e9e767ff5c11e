pub mod fetch;
pub mod language;
pub mod preprocess;
pub mod text;
pub mod types;

pub use fetch::{FetchError, PayloadFetcher};
pub use language::{Language, detect_language};
pub use types::{NormalizedEntry, RawCandidate, ResultSet, SearchPayload};
