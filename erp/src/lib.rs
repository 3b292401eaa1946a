// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Client for the ERP work-record API: job listing and mutation, attendance
//! intervals, the work-code directory and login.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::similar_names, clippy::single_match_else, clippy::match_bool)]

mod client;
mod config;
mod decode;
mod error;
mod http;
mod types;

pub use crate::client::ErpClient;
pub use crate::config::{Endpoints, ErpConfig};
pub use crate::decode::{Field, parse_instant};
pub use crate::error::ErpError;
pub use crate::types::{
    AttendanceInterval, CreatedJob, Credentials, Identity, JobId, JobPayload, JobRecord,
    UpdatedJob, WorkCodeItem,
};
