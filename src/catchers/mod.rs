mod unauthorized;
mod unprocessable_entity;

pub use unauthorized::*;
pub use unprocessable_entity::*;
