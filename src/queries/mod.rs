pub mod catalog;
pub mod conversations;
pub mod customers;
pub mod orders;
