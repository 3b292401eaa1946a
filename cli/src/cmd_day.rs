// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use workcal_core::{ItemKind, format_date, format_minutes, minutes_between, week_of};

use crate::arg::{CommonArgs, OutputFormat, parse_day};
use crate::context::Context;
use crate::formatter::Formatter;

#[derive(Debug, Clone)]
pub struct CmdDay {
    pub date: Option<String>,
    pub week: bool,
    pub verbose: bool,
    pub output_format: OutputFormat,
}

impl CmdDay {
    pub const NAME: &str = "day";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("d")
            .about("Show the jobs and attendance of a day")
            .arg(arg!([DATE] "Day to show: YYYY-MM-DD, today, yesterday or tomorrow"))
            .arg(arg!(-w --week "Show the whole week containing the day"))
            .arg(arg!(-v --verbose "Show dates and places of work"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            date: matches.get_one("DATE").cloned(),
            week: matches.get_flag("week"),
            verbose: matches.get_flag("verbose"),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn today() -> Self {
        Self {
            date: None,
            week: false,
            verbose: false,
            output_format: OutputFormat::Table,
        }
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        ctx.require_login()?;
        let day = parse_day(self.date.as_deref().unwrap_or("today"))?;
        let (from, to) = if self.week { week_of(day) } else { (day, day) };
        tracing::debug!(%from, %to, "showing range");

        if let Err(e) = ctx.controller.on_range_changed(from, to).await {
            eprintln!("{}", e.banner().yellow());
        }

        let mut items = ctx.view.items();
        items.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

        let formatter = Formatter::items(self.verbose || self.week)
            .with_output_format(self.output_format);
        println!("{}", formatter.format(&items));

        if self.output_format == OutputFormat::Table {
            let total: i64 = items
                .iter()
                .filter(|a| a.kind == ItemKind::Job)
                .map(|a| minutes_between(a.start, a.end))
                .sum();
            let range = match from == to {
                true => format_date(from),
                false => format!("{} ~ {}", format_date(from), format_date(to)),
            };
            println!("{} {}", range.bold(), format!("total {}", format_minutes(total)).dimmed());
        }
        Ok(())
    }
}
