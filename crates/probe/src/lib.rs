mod config;
mod error;
mod loader;
mod object_url;
mod prober;
mod session;

pub use config::*;
pub use error::*;
pub use loader::*;
pub use object_url::*;
pub use prober::*;
pub use session::*;
