#[cfg(test)]
pub mod memory_store;
pub mod mongo_store;
pub mod mongodb;
pub mod store;
