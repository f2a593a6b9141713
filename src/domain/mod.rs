pub mod bookmark;
pub mod category;
pub mod client_state;
pub mod document;
pub mod error;
pub mod id_generator;
pub mod repositories;
