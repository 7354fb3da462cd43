//! Onboarding commands - finish or skip the first-run profile step

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{get_context, require_account};
use crate::output;

#[derive(Subcommand)]
pub enum OnboardingCommands {
    /// Complete onboarding, optionally choosing a display name
    Complete {
        /// Display name to use
        #[arg(long)]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Skip onboarding and keep the current display name
    Skip {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show whether onboarding is still pending
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: OnboardingCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        OnboardingCommands::Complete { name, json } => {
            let result = require_account(&ctx)
                .and_then(|id| ctx.account_service.complete_onboarding(id, name.as_deref()));
            output::finish(json, result, |()| output::success("Onboarding complete"))
        }
        OnboardingCommands::Skip { json } => {
            let result =
                require_account(&ctx).and_then(|id| ctx.account_service.mark_onboarding_done(id));
            output::finish(json, result, |()| output::success("Onboarding skipped"))
        }
        OnboardingCommands::Status { json } => {
            let result =
                require_account(&ctx).and_then(|id| ctx.account_service.onboarding_required(id));
            output::finish(json, result, |required| {
                if required {
                    println!("{}", "Onboarding pending".yellow());
                } else {
                    println!("{}", "Onboarding complete".green());
                }
            })
        }
    }
}
