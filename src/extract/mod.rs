pub mod amount;
pub mod filter;
pub mod heuristics;
pub mod reconcile;

pub use filter::ListingFilter;
pub use reconcile::{Candidate, CandidateSource, StructuredData};
