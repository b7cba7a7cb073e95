pub mod ip;
pub mod proxy;
pub mod store;
