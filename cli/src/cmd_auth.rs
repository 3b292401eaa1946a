// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;

use crate::context::Context;
use crate::prompt::prompt_login;

#[derive(Debug, Clone)]
pub struct CmdLogin {
    pub user: Option<String>,
}

impl CmdLogin {
    pub const NAME: &str = "login";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Sign in to the ERP")
            .arg(arg!(-u --user <LOGIN> "Login name, prompted when omitted"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            user: matches.get_one("user").cloned(),
        }
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        tracing::debug!("signing in...");
        let (user, password) = prompt_login(self.user)?;
        let identity = ctx.session.login(&user, &password).await?;

        ctx.controller.on_login_changed().await?;
        println!("{} {}", "Signed in as".green(), identity.user_name.bold());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdLogout;

impl CmdLogout {
    pub const NAME: &str = "logout";

    pub fn command() -> Command {
        Command::new(Self::NAME).about("Forget the stored login")
    }

    pub async fn run(self, ctx: &Context) -> Result<(), Box<dyn Error>> {
        let user = ctx.session.user_name();
        ctx.session.logout().await?;
        ctx.controller.on_login_changed().await?;

        match user {
            Some(user) => println!("{} {}", "Signed out".green(), user.bold()),
            None => println!("Not signed in"),
        }
        Ok(())
    }
}
