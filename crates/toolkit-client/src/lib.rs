//! Generated clients for the toolkit engine.
//!
//! A [`GeneratedClient`] exposes a closed set of operations derived from a
//! resolved [`Mapping`](toolkit_engine_selection::Mapping): `list_<entity>`,
//! `get_<singular>`, `create_<singular>`, `update_<singular>` and
//! `delete_<singular>`. Each dispatches to the chosen endpoint with
//! authentication attached and transient failures retried.
//!
//! # Examples
//!
//! ```no_run
//! use toolkit_engine_client::{ClientBuilder, OperationArgs};
//! use toolkit_engine_core::{Credentials, ResolvedAuth};
//! use toolkit_engine_selection::Mapping;
//!
//! # async fn example(mapping: Mapping) -> toolkit_engine_core::Result<()> {
//! let creds: Credentials = [("access_token", "tok")].into_iter().collect();
//! let client = ClientBuilder::new().build(&mapping, "https://api.hubapi.com", &creds, |c| {
//!     let mut headers = std::collections::BTreeMap::new();
//!     headers.insert(
//!         "Authorization".to_string(),
//!         format!("Bearer {}", c.require("access_token")?),
//!     );
//!     Ok(ResolvedAuth::from_headers(headers))
//! })?;
//!
//! let contacts = client.call("list_contacts", OperationArgs::new()).await?;
//! println!("{:?}", contacts.into_records());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod builder;
mod client;
mod operation;

pub use builder::{ClientBuilder, build};
pub use client::GeneratedClient;
pub use operation::{
    OperationArgs, OperationOutput, OperationTable, RequestSpec, ResponseShape, operation_name,
};
