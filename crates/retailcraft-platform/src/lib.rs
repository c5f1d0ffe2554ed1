pub mod client;
pub mod config;
pub mod contracts;
pub mod session;

pub use client::RetailClient;
pub use config::ClientConfig;
pub use contracts::{DataPayload, Envelope, IntoPayload, LoginGrant, NoPayload, SummaryPayload};
pub use session::{AuthSession, Session, SessionError, SessionState};
