//! Core components for signing object storage requests.
//!
//! This crate provides the service-neutral building blocks used by the s3sign
//! signers. It holds no signing algorithm of its own: everything here is a
//! stateless helper or a plain value type, safe to share across threads.
//!
//! ## Overview
//!
//! - [`RequestDescriptor`]: an immutable description of the request to sign
//! - [`Error`] and [`ErrorKind`]: the error type shared by all signers
//! - [`Env`]: environment access used by configuration loading
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use s3sign_core::RequestDescriptor;
//!
//! # fn main() -> s3sign_core::Result<()> {
//! let req = RequestDescriptor::new(Method::GET, "https://storage.example.com/bucket/a%20b.txt?acl")?
//!     .with_header("range", "bytes=0-9")?;
//!
//! assert_eq!(req.path, "/bucket/a b.txt");
//! assert_eq!(req.host(), "storage.example.com");
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

mod request;
pub use request::RequestDescriptor;
