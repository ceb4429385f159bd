#![forbid(unsafe_code)]

//! Wall-clock runtime for `typer-core`.
//!
//! [`TyperDriver`] moves a [`Typer`](typer_core::Typer) onto a background
//! thread and feeds it real elapsed time. Use this when nothing else in the
//! application owns a frame loop; otherwise call
//! [`Typer::advance`](typer_core::Typer::advance) from your own.

pub mod cancellation;
pub mod driver;

pub use cancellation::{CancellationSource, CancellationToken};
pub use driver::{DriverHandle, TyperDriver};
