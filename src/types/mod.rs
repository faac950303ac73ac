// Shared domain types, used by the API layer and the copier.

pub mod board;

pub use board::*;
