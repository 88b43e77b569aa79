pub mod posting;
pub mod dictionary;
pub mod document;
pub mod indexer;
