pub mod candidates;
pub mod deals;
pub(crate) mod money;
pub mod scoring;
