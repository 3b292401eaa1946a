// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf, sync::Arc};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::BoxFuture};
use tracing_subscriber::EnvFilter;
use workcal_core::{APP_NAME, Confirm};

use crate::cmd_auth::{CmdLogin, CmdLogout};
use crate::cmd_code::{CmdCodeSearch, CmdCodeShow};
use crate::cmd_day::CmdDay;
use crate::cmd_job::{CmdJobDelete, CmdJobEdit, CmdJobMove, CmdJobNew};
use crate::cmd_recent::CmdRecent;
use crate::config::parse_config;
use crate::context::Context;
use crate::prompt::{AssumeYes, PromptConfirm};

/// Run the workcal command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    }
    Ok(())
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Record your working day in the ERP calendar.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(false) // defaults to today
            .arg_required_else_help(false)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/workcal/config.toml on Linux and \
MacOS, %APPDATA%/workcal/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdLogin::command())
            .subcommand(CmdLogout::command())
            .subcommand(CmdDay::command())
            .subcommand(
                Command::new("job")
                    .alias("j")
                    .about("Manage the jobs of a day")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdJobNew::command())
                    .subcommand(CmdJobEdit::command())
                    .subcommand(CmdJobMove::command())
                    .subcommand(CmdJobDelete::command()),
            )
            .subcommand(
                Command::new("code")
                    .alias("c")
                    .about("Look up work codes")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdCodeSearch::command())
                    .subcommand(CmdCodeShow::command()),
            )
            .subcommand(CmdRecent::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdLogin::NAME, matches)) => Login(CmdLogin::from(matches)),
            Some((CmdLogout::NAME, _)) => Logout(CmdLogout),
            Some((CmdDay::NAME, matches)) => Day(CmdDay::from(matches)),
            Some(("job", matches)) => match matches.subcommand() {
                Some((CmdJobNew::NAME, matches)) => JobNew(CmdJobNew::from(matches)?),
                Some((CmdJobEdit::NAME, matches)) => JobEdit(CmdJobEdit::from(matches)?),
                Some((CmdJobMove::NAME, matches)) => JobMove(CmdJobMove::from(matches)?),
                Some((CmdJobDelete::NAME, matches)) => JobDelete(CmdJobDelete::from(matches)?),
                _ => unreachable!(),
            },
            Some(("code", matches)) => match matches.subcommand() {
                Some((CmdCodeSearch::NAME, matches)) => CodeSearch(CmdCodeSearch::from(matches)),
                Some((CmdCodeShow::NAME, matches)) => CodeShow(CmdCodeShow::from(matches)?),
                _ => unreachable!(),
            },
            Some((CmdRecent::NAME, matches)) => Recent(CmdRecent::from(matches)),
            None => Day(CmdDay::today()),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Sign in
    Login(CmdLogin),

    /// Sign out
    Logout(CmdLogout),

    /// Show a day or week
    Day(CmdDay),

    /// Record a new job
    JobNew(CmdJobNew),

    /// Change a job
    JobEdit(CmdJobEdit),

    /// Move or resize a job
    JobMove(CmdJobMove),

    /// Delete a job
    JobDelete(CmdJobDelete),

    /// Search work codes
    CodeSearch(CmdCodeSearch),

    /// Resolve a work code
    CodeShow(CmdCodeShow),

    /// List recent entries
    Recent(CmdRecent),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        let confirm: Arc<dyn Confirm> = match &self {
            JobDelete(a) if a.yes => Arc::new(AssumeYes),
            _ => Arc::new(PromptConfirm),
        };

        match self {
            Login(a)      => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            Logout(a)     => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            Day(a)        => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            JobNew(a)     => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            JobEdit(a)    => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            JobMove(a)    => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            JobDelete(a)  => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            CodeSearch(a) => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            CodeShow(a)   => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
            Recent(a)     => Self::run_with(config, confirm, |x| a.run(x).boxed()).await,
        }
    }

    async fn run_with<F>(
        config: Option<PathBuf>,
        confirm: Arc<dyn Confirm>,
        f: F,
    ) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a Context) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config).await?;
        let ctx = Context::new(config, confirm).await?;

        let result = f(&ctx).await;

        ctx.close().await;
        result
    }
}
