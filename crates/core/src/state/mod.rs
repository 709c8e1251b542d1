pub mod crypto;
pub mod feed;
pub mod notifications;
pub mod policy;
pub mod slice;
pub mod store;
