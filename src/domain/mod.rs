pub mod cart;
pub mod errors;
pub mod ids;
pub mod ports;
pub mod product;
pub mod reconciler;
pub mod user;
