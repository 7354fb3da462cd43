//! Register command - create an account

use anyhow::Result;

use super::{get_context, password_or_prompt};
use crate::output;
use moodlog_core::Credentials;

pub fn run(email: String, password: Option<String>, json: bool) -> Result<()> {
    let password = password_or_prompt(password, true)?;
    let ctx = get_context()?;

    let result = ctx
        .account_service
        .register(Credentials::new(email, password));

    output::finish(json, result, |id| {
        output::success(&format!("Account {} created", id));
        output::info("Log in with `mood login` to start journaling.");
    })
}
