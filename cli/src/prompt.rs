// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use cliclack::{confirm, input, intro, outro, password};
use workcal_core::Confirm;

/// Asks for the login name (unless given) and the password.
pub fn prompt_login(user: Option<String>) -> Result<(String, String), Box<dyn Error>> {
    intro("Sign in to the ERP")?;

    let user = match user {
        Some(user) => user,
        None => input("Login:")
            .placeholder("e.g., j.doe")
            .validate(|s: &String| match s.trim().is_empty() {
                true => Err("Login is required"),
                false => Ok(()),
            })
            .interact()?,
    };
    let password: String = password("Password:").mask('•').interact()?;

    outro("Signing in...")?;
    Ok((user, password))
}

/// Interactive yes/no prompt on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptConfirm;

#[async_trait::async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let message = message.to_string();
        let answer =
            tokio::task::spawn_blocking(move || confirm(message).initial_value(false).interact())
                .await;

        match answer {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                tracing::debug!(err = %e, "confirmation prompt aborted");
                false
            }
            Err(e) => {
                tracing::warn!(err = %e, "confirmation prompt failed");
                false
            }
        }
    }
}

/// Accepts every confirmation, for `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

#[async_trait::async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&self, message: &str) -> bool {
        tracing::debug!(message, "confirmation assumed");
        true
    }
}
