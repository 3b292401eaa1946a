// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, arg, value_parser};
use jiff::Zoned;
use jiff::civil::{Date, Time};
use workcal_core::{EntryId, parse_date, parse_time};

/// The output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn output_format() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(OutputFormat))
            .default_value("table")
    }

    pub fn get_output_format(matches: &ArgMatches) -> OutputFormat {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(OutputFormat::Table)
    }

    pub fn yes() -> Arg {
        arg!(-y --yes "Do not ask for confirmation")
    }

    pub fn get_yes(matches: &ArgMatches) -> bool {
        matches.get_flag("yes")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JobArgs;

impl JobArgs {
    pub fn id() -> Arg {
        arg!(id: <ID> "Id of the job")
    }

    pub fn get_id(matches: &ArgMatches) -> Result<EntryId, String> {
        let id = matches
            .get_one::<String>("id")
            .ok_or_else(|| "Job id is required".to_string())?;

        id.parse()
            .map_err(|e| format!("Invalid job id {id:?}: {e}"))
    }

    pub fn date(required: bool) -> Arg {
        arg!(-d --date <DATE> "Day of the job: YYYY-MM-DD, today, yesterday or tomorrow")
            .required(required)
    }

    pub fn get_date(matches: &ArgMatches) -> Option<String> {
        matches.get_one("date").cloned()
    }

    pub fn from(required: bool) -> Arg {
        arg!(--from <TIME> "Start time, HH:MM").required(required)
    }

    pub fn get_from(matches: &ArgMatches) -> Option<String> {
        matches.get_one("from").cloned()
    }

    pub fn to(required: bool) -> Arg {
        arg!(--to <TIME> "End time, HH:MM").required(required)
    }

    pub fn get_to(matches: &ArgMatches) -> Option<String> {
        matches.get_one("to").cloned()
    }

    pub fn code(required: bool) -> Arg {
        arg!(--code <CODE> "Work code from the directory")
            .value_parser(value_parser!(u32))
            .required(required)
    }

    pub fn get_code(matches: &ArgMatches) -> Option<u32> {
        matches.get_one("code").copied()
    }

    pub fn description() -> Arg {
        arg!(--description <DESCRIPTION> "Description of the work")
    }

    pub fn get_description(matches: &ArgMatches) -> Option<String> {
        matches.get_one("description").cloned()
    }

    pub fn place() -> Arg {
        arg!(--place <PLACE> "Place of work, defaults to the last one used")
    }

    pub fn get_place(matches: &ArgMatches) -> Option<String> {
        matches.get_one("place").cloned()
    }
}

/// Parses a day: `YYYY-MM-DD` or one of `today`, `yesterday`, `tomorrow`.
pub fn parse_day(s: &str) -> Result<Date, String> {
    let today = Zoned::now().date();
    let day = match s.trim().to_lowercase().as_str() {
        "" | "today" => Ok(today),
        "yesterday" => today.yesterday(),
        "tomorrow" => today.tomorrow(),
        other => return parse_date(other).map_err(|_| format!("Invalid date: {s:?}")),
    };
    day.map_err(|e| e.to_string())
}

/// Parses a wall-clock time, `HH:MM`.
pub fn parse_clock(s: &str) -> Result<Time, String> {
    parse_time(s.trim()).map_err(|_| format!("Invalid time {s:?}, expected HH:MM"))
}
