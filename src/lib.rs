pub mod chain;
pub mod cli;
pub mod core;
pub mod editor;
pub mod gate;
pub mod utils;

// Re-export commonly used types
pub use crate::chain::{AppDataStore, DomainDataSource, Erc20Metadata, StorageContract, TokenInfoSource};
pub use crate::core::{Address, ClientError, ClientResult, Config, DomainConfig, Token, TokenList};
pub use crate::editor::TokenListEditor;
pub use crate::gate::{ReadinessGate, RenderMode};
