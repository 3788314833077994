pub mod conversation;
pub mod locks;
pub mod orders;
