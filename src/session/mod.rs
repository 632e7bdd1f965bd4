//! Session state: stored tokens and the coordinator that renews them
//!
//! # Module Layout
//!
//! - [`token_store`] -- token persistence backends (file, keyring, memory)
//! - [`manager`]     -- [`SessionManager`], sole owner of the refresh logic

pub mod manager;
pub mod token_store;

pub use manager::SessionManager;
pub use token_store::{
    open_token_store, FileTokenStore, KeyringTokenStore, MemoryTokenStore, SessionTokens,
    TokenStore,
};
