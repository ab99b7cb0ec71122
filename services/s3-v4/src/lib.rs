//! AWS SigV4 signer for s3 compatible services.
//!
//! Signing never touches the request it is given: [`RequestSigner::sign`]
//! returns an [`Authorization`] holding the headers to send, and
//! [`RequestSigner::presign`] returns a self-contained url.
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use s3sign_core::RequestDescriptor;
//! use s3sign_v4::{Credential, Payload, RequestSigner};
//! use std::time::Duration;
//!
//! # fn main() -> s3sign_core::Result<()> {
//! let signer = RequestSigner::new("s3", "us-east-1");
//! let cred = Credential::new("access_key_id", "secret_access_key");
//!
//! let req = RequestDescriptor::new(Method::PUT, "https://examplebucket.s3.amazonaws.com/hello.txt")?;
//! let auth = signer.sign(&req, &Payload::from("Hello, World!"), &cred)?;
//! assert!(auth.headers().contains_key("authorization"));
//!
//! let req = RequestDescriptor::new(Method::GET, "https://examplebucket.s3.amazonaws.com/hello.txt")?;
//! let url = signer.presign(&req, &cred, Some(Duration::from_secs(600)))?;
//! assert!(url.contains("X-Amz-Expires=600"));
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::EMPTY_STRING_SHA256;
pub use constants::UNSIGNED_PAYLOAD;

mod config;
pub use config::Config;
mod credential;
pub use credential::Credential;
mod payload;
pub use payload::hash_async_reader;
pub use payload::hash_reader;
pub use payload::Payload;

mod canonical;
pub use canonical::canonical_query_string;
pub use canonical::uri_encode;
pub use canonical::uri_encode_path;
pub use canonical::CanonicalRequest;
mod signature;
pub use signature::calculate_signature;
pub use signature::derive_signing_key;
pub use signature::string_to_sign;
pub use signature::SigningScope;
mod authorization;
pub use authorization::format_authorization;
pub use authorization::Authorization;
mod sign_request;
pub use sign_request::RequestSigner;
