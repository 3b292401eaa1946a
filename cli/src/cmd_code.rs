// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg, value_parser};

use crate::arg::{CommonArgs, OutputFormat};
use crate::context::Context;
use crate::formatter::Formatter;

#[derive(Debug, Clone)]
pub struct CmdCodeSearch {
    pub query: String,
    pub output_format: OutputFormat,
}

impl CmdCodeSearch {
    pub const NAME: &str = "search";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("s")
            .about("Search the work-code directory by text")
            .arg(arg!([QUERY] "Text to search for, lists every code when omitted"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            query: matches.get_one("QUERY").cloned().unwrap_or_default(),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        ctx.require_login()?;
        let items = ctx.codes.search_by_text(&self.query).await?;

        let formatter = Formatter::codes().with_output_format(self.output_format);
        println!("{}", formatter.format(&items));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdCodeShow {
    pub code: u32,
    pub output_format: OutputFormat,
}

impl CmdCodeShow {
    pub const NAME: &str = "show";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Resolve a work code to its directory entry")
            .arg(arg!(<CODE> "Work code").value_parser(value_parser!(u32)))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            code: matches
                .get_one("CODE")
                .copied()
                .ok_or("Work code is required")?,
            output_format: CommonArgs::get_output_format(matches),
        })
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        ctx.require_login()?;
        let item = ctx
            .codes
            .resolve_by_code(&self.code.to_string())
            .await
            .ok_or_else(|| format!("Invalid work code {}", self.code))?;

        let formatter = Formatter::codes().with_output_format(self.output_format);
        println!("{}", formatter.format(&[item]));
        Ok(())
    }
}
