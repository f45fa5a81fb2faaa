mod actions;
mod form;
mod stock;

pub use actions::*;
pub use form::*;
pub use stock::*;
