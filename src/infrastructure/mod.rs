pub mod models;
pub mod pg_store;

#[cfg(test)]
pub(crate) mod memory;
