mod client;
mod env;
mod error;
mod export;
mod http;
mod types;

pub use client::WorkbenchClient;
pub use env::{ClientEnv, filter_empty};
pub use error::Error;
pub use export::{ExportFailure, ExportReport, ExportedFile, MERGED_FILE_NAME};
pub use http::ReqwestHttp;
