pub mod dump;
pub mod fmt;
pub mod get;
pub mod input;
pub mod merge;
