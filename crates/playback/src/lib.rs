mod controller;
mod driver;
mod error;
mod event;
mod state;

pub use controller::*;
pub use driver::*;
pub use error::*;
pub use event::*;
pub use state::*;
