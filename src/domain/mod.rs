pub mod cart;
pub mod catalog;
pub mod errors;
pub mod identity;
pub mod inventory;
pub mod lifecycle;
pub mod order;
pub mod ports;
pub mod schedule;
