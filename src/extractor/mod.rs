// src/extractor/mod.rs

pub mod textbook;

pub use textbook::TextbookResolver;
