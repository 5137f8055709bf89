pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod observe;
pub mod policy;
pub mod server;
pub mod service;
pub mod signing;
pub mod types;
pub mod validation;

pub use config::{Config, ConfigError};
pub use error::{SigningError, ValidationError};
pub use hash::HashAlgorithm;
pub use policy::KeyUsagePolicy;
pub use server::{AppState, router, run};
pub use service::{Operation, SigningService};
pub use signing::{KeyStore, Signer};
pub use types::{Endpoint, KeyMeta, KeyMetas, PublicKey, Signature, SigningRequest};
