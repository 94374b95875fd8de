pub mod competitor;
pub mod creative;
pub mod error;
pub mod insight;
pub mod research;
pub mod sentinel;
pub mod swot;
