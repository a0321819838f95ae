pub mod categories;
pub mod entries;
pub mod export;
