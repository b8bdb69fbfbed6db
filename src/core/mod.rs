pub mod models;
pub mod process;
pub mod token;

pub use models::{CheckStatusResponse, CreateResourceResponse, ProcessInList, ResultRecord};
pub use process::ScanProcess;
pub use token::LoginToken;
