//! Login / logout commands - manage the saved session

use anyhow::Result;
use colored::Colorize;

use super::{clear_session, get_context, get_moodlog_dir, password_or_prompt, save_session, Session};
use crate::output;
use moodlog_core::Credentials;

pub fn run(email: String, password: Option<String>, json: bool) -> Result<()> {
    let password = password_or_prompt(password, false)?;
    let ctx = get_context()?;

    let result = ctx
        .account_service
        .login(Credentials::new(email, password));

    if let Ok(login) = &result {
        save_session(
            &ctx.data_dir,
            &Session {
                token: login.token.clone(),
                account_id: login.account_id,
            },
        )?;
    }

    output::finish(json, result, |login| {
        output::success(&format!("Logged in as account {}", login.account_id));
        if login.onboarding_required {
            println!(
                "{}",
                "Finish setting up your profile with `mood onboarding complete --name <NAME>`"
                    .yellow()
            );
        }
    })
}

pub fn run_logout(json: bool) -> Result<()> {
    let removed = clear_session(&get_moodlog_dir()?)?;

    output::finish(json, Ok(serde_json::json!({ "removed": removed })), |_| {
        if removed {
            output::success("Logged out");
        } else {
            println!("{}", "No active session".dimmed());
        }
    })
}
