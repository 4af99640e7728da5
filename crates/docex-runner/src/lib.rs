// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run materialized examples and check their output.
//!
//! Each project's setup lines run one after another in an execution root
//! copied from the build root. The last command's combined output is
//! compared line by line with `<name>.txt` from the reference directory.

pub mod command;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod runner;
pub mod verify;

pub use command::CommandLine;
pub use error::RunError;
pub use pipeline::{check_output, write_transcript, Pipeline};
pub use process::CancelToken;
pub use report::{Outcome, Report, Status};
pub use runner::Runner;
pub use verify::{verify, Mismatch, Verdict};
