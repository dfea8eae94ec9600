pub mod config;
pub mod constants;
pub mod error;
pub mod local_store;
pub mod op_state;
pub mod types;

pub use config::Config;
pub use constants::*;
pub use error::{ClientError, ClientResult};
pub use local_store::{FileStore, LocalStore, MemoryStore};
pub use op_state::{InFlightGuard, InFlightTicket, OpState};
pub use types::*;
