pub mod audio;
pub mod candidates;
pub mod enrich;
pub mod extract;
pub mod fields;
pub mod normalize;
pub mod search;

pub use candidates::collect_query_candidates;
pub use normalize::EntryNormalizer;
pub use search::SearchEngine;

#[cfg(test)]
mod tests;
