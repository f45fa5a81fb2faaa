mod batch;
mod scenario;

pub use batch::*;
pub use scenario::*;
