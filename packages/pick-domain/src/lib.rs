pub mod filter;
pub mod item;
pub mod query;
pub mod rank;

pub use filter::FilterSpec;
pub use item::{CatalogItem, Interpretation};
pub use rank::{RankedCandidate, ScoredItem};
