// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod arg;
mod cli;
mod cmd_auth;
mod cmd_code;
mod cmd_day;
mod cmd_job;
mod cmd_recent;
mod config;
mod context;
mod formatter;
mod prompt;
mod table;

pub use crate::cli::{Cli, Commands, run};
pub use crate::config::parse_config;
pub use crate::context::Context;
