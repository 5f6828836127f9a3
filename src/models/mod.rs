pub mod document;
pub mod order;
