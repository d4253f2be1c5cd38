//! Record store: models, initialization and pupil queries

pub mod init;
pub mod models;
pub mod pupils;

pub use init::*;
pub use models::*;
pub use pupils::*;
