pub mod cart_service;
pub mod checkout_service;
pub mod inventory_ledger;
pub mod order_service;
