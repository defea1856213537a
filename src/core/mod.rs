pub mod document_parser;
pub mod errors;
pub mod field_extractor;
pub mod fuzzy_matcher;
pub mod models;
pub mod pdf;
pub mod scorer;
pub mod service;
pub mod settings_store;
pub mod skill_catalog;
pub mod skill_normalizer;
pub mod visualization;
