pub mod crypto;
pub mod news;
pub mod notification;
pub mod preferences;
pub mod settings;
pub mod tracked;
pub mod weather;
