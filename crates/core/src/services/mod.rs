pub mod crypto_service;
pub mod fallback;
pub mod news_service;
pub mod weather_service;
