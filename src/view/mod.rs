//! Plain structured outputs handed to the rendering collaborators.

pub mod plot;
pub mod table;
