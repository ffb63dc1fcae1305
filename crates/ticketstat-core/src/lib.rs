//! ticketstat-core: support-ticket classification and report engine.
//!
//! Tickets flow through [`source::TicketSource`] into
//! [`classify::Classifier`], are folded per [`window::Span`] by
//! [`aggregate`] and [`keyword`], and are serialized by [`render::Renderer`].
//! [`report::ReportEngine`] drives the span loop.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums in [`error`], each mapped to a stable
//!   [`error::ErrorCode`].
//! - **Logging**: `tracing` macros; entry points carry `#[instrument]`.
//! - **Time**: instants are UTC; the configured offset applies only to
//!   window boundaries and display dates.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod keyword;
pub mod model;
pub mod render;
pub mod report;
pub mod source;
pub mod taxonomy;
pub mod window;
