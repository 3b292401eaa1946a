// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};

use crate::arg::{CommonArgs, OutputFormat};
use crate::context::Context;
use crate::formatter::Formatter;

#[derive(Debug, Clone, Copy)]
pub struct CmdRecent {
    pub output_format: OutputFormat,
}

impl CmdRecent {
    pub const NAME: &str = "recent";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List recently used work codes and descriptions, newest first")
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        let mut recent = ctx.controller.recent();
        recent.reverse();

        let formatter = Formatter::recent().with_output_format(self.output_format);
        println!("{}", formatter.format(&recent));
        Ok(())
    }
}
