//! SeaORM entities.

pub mod author;
pub mod post;
