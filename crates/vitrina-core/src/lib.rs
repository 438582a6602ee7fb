//! Core types and trait definitions for the Vitrina showcase backend.
//!
//! Domain records, the storage and delivery seams, and the verification
//! flow live here; HTTP and database specifics stay in the other crates.

#![allow(async_fn_in_trait)]

pub mod code;
pub mod error;
pub mod feature;
pub mod flow;
pub mod mailer;
pub mod project;
pub mod store;
pub mod task;
pub mod verification;

pub use error::{DeliveryError, FlowError, Result};
