//! Blocking client for the Egnyte public file-system API.
//!
//! # Overview
//! A `Client` holds the domain's base URL and a bearer token. Its `Request`
//! wrapper turns a relative path into a complete `HttpRequest`, hands it to
//! a `Transport`, and wraps the answer in a `Response`. `File` maps file
//! operations (metadata, move, delete, upload, mkdir) onto those calls.
//!
//! # Design
//! - Requests are immutable per-call descriptors; a transport only needs
//!   `&self`, so one client can be shared across threads.
//! - HTTP failure statuses are data, not errors: check `Response::is_error`
//!   and `Response::error_details`, or opt into `Response::into_result`.
//! - Transport failures propagate unchanged as `Error::Transport`.
//!
//! ```no_run
//! use egnyte_core::{Client, Config, Permissions};
//!
//! let client = Client::with_config(Config::new("acme", "oauth-token"))?;
//! let file = client.file();
//!
//! file.mkdir("/Shared", "Reports")?.into_result()?;
//! file.upload("/Shared/Reports", "q1.txt", "quarterly numbers")?.into_result()?;
//!
//! let moved = file.mv("/Shared/Reports/q1.txt", "/Shared/Archive/q1.txt", Some(Permissions::KeepOriginal))?;
//! if moved.is_error() {
//!     let details = moved.error_details()?;
//!     eprintln!("{} {}", details.status.code, details.status.text);
//! }
//! # Ok::<(), egnyte_core::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod error_map;
pub mod file;
pub mod http;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::{Config, API_ENDPOINT, PROVIDER_DOMAIN};
pub use error::{Error, Result};
pub use error_map::ErrorMap;
pub use file::File;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{Body, Request};
pub use response::{ErrorDetails, Response, StatusInfo, API_EXCEPTION_HEADER};
pub use transport::{Transport, UreqTransport};
pub use types::{AddFolderAction, MoveAction, Permissions};
