// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use jiff::civil::Date;
use workcal_core::{
    CreateDefaults, DeleteOutcome, Entry, EntryId, ErrorKind, MoveOutcome, SubmitOutcome,
    describe_error, format_time, item_from_entry,
};

use crate::arg::{CommonArgs, JobArgs, OutputFormat, parse_clock, parse_day};
use crate::context::Context;
use crate::formatter::Formatter;

#[derive(Debug, Clone)]
pub struct CmdJobNew {
    pub date: String,
    pub from: String,
    pub to: String,
    pub code: u32,
    pub description: Option<String>,
    pub place: Option<String>,
    pub output_format: OutputFormat,
}

impl CmdJobNew {
    pub const NAME: &str = "new";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("add")
            .about("Record a new job")
            .arg(JobArgs::date(true))
            .arg(JobArgs::from(true))
            .arg(JobArgs::to(true))
            .arg(JobArgs::code(true))
            .arg(JobArgs::description())
            .arg(JobArgs::place())
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            date: JobArgs::get_date(matches).ok_or("Date is required")?,
            from: JobArgs::get_from(matches).ok_or("Start time is required")?,
            to: JobArgs::get_to(matches).ok_or("End time is required")?,
            code: JobArgs::get_code(matches).ok_or("Work code is required")?,
            description: JobArgs::get_description(matches),
            place: JobArgs::get_place(matches),
            output_format: CommonArgs::get_output_format(matches),
        })
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        let day = parse_day(&self.date)?;
        let start = day.to_datetime(parse_clock(&self.from)?);
        let end = day.to_datetime(parse_clock(&self.to)?);
        ctx.load_day(day).await?;

        tracing::debug!(%start, %end, code = self.code, "creating job");
        let defaults = CreateDefaults {
            work_code: Some(self.code),
            description: self.description.unwrap_or_default(),
            place_of_work: self.place,
        };
        let form = ctx.controller.open_for_create((start, end), defaults).await;

        match ctx.controller.submit(form).await? {
            SubmitOutcome::Created(Some(id)) => {
                print_job(ctx, &EntryId::Confirmed(id), self.output_format);
                Ok(())
            }
            SubmitOutcome::Created(None) => {
                let failed = ctx
                    .engine
                    .entries()
                    .into_iter()
                    .find(|a| a.id.is_local() && a.start == start && a.end == end);
                Err(failure(failed.as_ref(), ErrorKind::Create))
            }
            SubmitOutcome::Updated(_) => Err("Unexpected update while creating a job".into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CmdJobEdit {
    pub id: EntryId,
    pub date: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub code: Option<u32>,
    pub description: Option<String>,
    pub place: Option<String>,
    pub output_format: OutputFormat,
}

impl CmdJobEdit {
    pub const NAME: &str = "edit";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Change a job")
            .arg(JobArgs::id())
            .arg(JobArgs::date(true))
            .arg(JobArgs::from(false))
            .arg(JobArgs::to(false))
            .arg(JobArgs::code(false))
            .arg(JobArgs::description())
            .arg(JobArgs::place())
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            id: JobArgs::get_id(matches)?,
            date: JobArgs::get_date(matches).ok_or("Date is required")?,
            from: JobArgs::get_from(matches),
            to: JobArgs::get_to(matches),
            code: JobArgs::get_code(matches),
            description: JobArgs::get_description(matches),
            place: JobArgs::get_place(matches),
            output_format: CommonArgs::get_output_format(matches),
        })
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        let day = parse_day(&self.date)?;
        ctx.load_day(day).await?;

        let mut form = ctx
            .controller
            .on_edit_requested(&self.id.to_string())
            .await
            .ok_or_else(|| not_found(&self.id, day))?;

        if let Some(from) = &self.from {
            form.time_from = format_time(parse_clock(from)?);
        }
        if let Some(to) = &self.to {
            form.time_to = format_time(parse_clock(to)?);
        }
        if let Some(code) = self.code {
            form.work_code = Some(code);
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(place) = self.place {
            form.place_of_work = place;
        }

        match ctx.controller.submit(form).await? {
            SubmitOutcome::Updated(Some(_)) => {
                print_job(ctx, &self.id, self.output_format);
                Ok(())
            }
            SubmitOutcome::Updated(None) => {
                Err(failure(ctx.engine.entry(&self.id).as_ref(), ErrorKind::Update))
            }
            SubmitOutcome::Created(_) => Err("Unexpected create while editing a job".into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CmdJobMove {
    pub id: EntryId,
    pub date: String,
    pub on: Option<String>,
    pub from: String,
    pub to: String,
    pub output_format: OutputFormat,
}

impl CmdJobMove {
    pub const NAME: &str = "move";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("mv")
            .about("Move or resize a job")
            .arg(JobArgs::id())
            .arg(JobArgs::date(true))
            .arg(arg!(--on <DATE> "Day to move the job to, defaults to its current day"))
            .arg(JobArgs::from(true))
            .arg(JobArgs::to(true))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            id: JobArgs::get_id(matches)?,
            date: JobArgs::get_date(matches).ok_or("Date is required")?,
            on: matches.get_one("on").cloned(),
            from: JobArgs::get_from(matches).ok_or("Start time is required")?,
            to: JobArgs::get_to(matches).ok_or("End time is required")?,
            output_format: CommonArgs::get_output_format(matches),
        })
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        let day = parse_day(&self.date)?;
        let target = match &self.on {
            Some(on) => parse_day(on)?,
            None => day,
        };
        let start = target.to_datetime(parse_clock(&self.from)?);
        let end = target.to_datetime(parse_clock(&self.to)?);
        ctx.load_day(day).await?;

        let outcome = ctx
            .controller
            .on_event_moved_or_resized(&self.id.to_string(), start, end)
            .await;
        match outcome {
            MoveOutcome::Applied => match ctx.engine.entry(&self.id) {
                Some(entry) if !entry.errors.update.is_empty() => {
                    Err(failure(Some(&entry), ErrorKind::Update))
                }
                _ => {
                    print_job(ctx, &self.id, self.output_format);
                    Ok(())
                }
            },
            MoveOutcome::Revert if ctx.engine.entry(&self.id).is_none() => {
                Err(not_found(&self.id, day).into())
            }
            MoveOutcome::Revert => {
                Err("A job must stay within one day and end after it starts".into())
            }
            MoveOutcome::Ignored => Err(format!("Job {} cannot be moved", self.id).into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CmdJobDelete {
    pub id: EntryId,
    pub date: String,
    pub yes: bool,
}

impl CmdJobDelete {
    pub const NAME: &str = "delete";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete a job")
            .arg(JobArgs::id())
            .arg(JobArgs::date(true))
            .arg(CommonArgs::yes())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            id: JobArgs::get_id(matches)?,
            date: JobArgs::get_date(matches).ok_or("Date is required")?,
            yes: CommonArgs::get_yes(matches),
        })
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        let day = parse_day(&self.date)?;
        ctx.load_day(day).await?;
        if ctx.engine.entry(&self.id).is_none() {
            return Err(not_found(&self.id, day).into());
        }

        match ctx.controller.request_delete(&self.id).await? {
            DeleteOutcome::Cancelled => println!("Cancelled"),
            DeleteOutcome::Discarded | DeleteOutcome::Deleted => {
                println!("{} {}", "Deleted job".green(), self.id);
            }
        }
        Ok(())
    }
}

fn print_job(ctx: &Context, id: &EntryId, output_format: OutputFormat) {
    let Some(entry) = ctx.engine.entry(id) else {
        tracing::warn!(%id, "job vanished after saving");
        return;
    };
    let items = [item_from_entry(&entry, false)];
    let formatter = Formatter::items(true).with_output_format(output_format);
    println!("{}", formatter.format(&items));
}

fn failure(entry: Option<&Entry>, kind: ErrorKind) -> Box<dyn Error> {
    match entry.map(|a| a.errors.get(kind)).filter(|a| !a.is_empty()) {
        Some(slot) => describe_error(kind, slot).into(),
        None => "The server did not accept the job".into(),
    }
}

fn not_found(id: &EntryId, day: Date) -> String {
    format!("Job {id} not found on {day}")
}
