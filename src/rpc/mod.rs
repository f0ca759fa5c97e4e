//! RPC layer
//!
//! [`RpcInvoker`] sends one request to the gateway and hands back an
//! [`Envelope`]; the envelope turns the numeric `code` into a value or an
//! [`Error`](crate::Error) using the table in
//! [`Error::from_status_code`](crate::Error::from_status_code).

mod commands;
mod envelope;
mod invoker;

pub use envelope::Envelope;
pub use invoker::{fetch_version, RpcInvoker};
