//! Profile commands - show and edit the account profile

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use super::{get_context, require_account};
use crate::output;
use moodlog_core::ImageUpload;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show display name, email and picture
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the display name
    Name {
        /// New display name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a new profile picture, replacing the current one
    Image {
        /// Image file to upload
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn read_upload(path: &Path) -> Result<ImageUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    Ok(ImageUpload::new(file_name, bytes))
}

pub fn run(command: ProfileCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        ProfileCommands::Show { json } => {
            let result = require_account(&ctx).and_then(|id| ctx.account_service.get_profile(id));
            output::finish(json, result, |profile| {
                println!("{}", profile.display_name.bold());
                println!("  Email: {}", profile.email);
                println!("  Image: {}", profile.image_url);
            })
        }
        ProfileCommands::Name { name, json } => {
            let result = require_account(&ctx)
                .and_then(|id| ctx.account_service.update_display_name(id, &name));
            output::finish(json, result, |()| output::success("Display name updated"))
        }
        ProfileCommands::Image { file, json } => {
            let upload = file.as_deref().map(read_upload).transpose()?;
            let result =
                require_account(&ctx).and_then(|id| ctx.account_service.replace_image(id, upload));
            output::finish(json, result, |image| {
                output::success("Profile picture updated");
                println!("  URL: {}", image.url);
                println!("  {}", format!("Asset id: {}", image.public_id).dimmed());
            })
        }
    }
}
