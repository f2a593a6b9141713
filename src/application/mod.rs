// src/application/mod.rs
pub mod error;
pub mod save_queue;
pub mod session;
pub mod transfer;
pub mod view;

pub use session::{Action, Session};
pub use view::View;
