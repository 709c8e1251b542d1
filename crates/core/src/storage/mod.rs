pub mod kv;
pub mod preferences;
