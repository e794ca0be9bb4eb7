// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shelter - operator CLI for the animal adoption workflow.
//!
//! Every command runs as the user named by `--as`, so the access policy
//! applies exactly as it would for that user.

mod commands;
mod upload;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use shelter_core::types::{SortBy, SortOrder};
use shelter_core::{AnimalStatus, Gender, Role};

/// Shelter - animal adoption workflow.
#[derive(Parser, Debug)]
#[command(name = "shelter", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Username to act as.
    #[arg(long = "as", global = true, value_name = "USERNAME")]
    acting_as: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage users.
    #[command(subcommand)]
    User(UserCommand),
    /// Manage animals.
    #[command(subcommand)]
    Animal(AnimalCommand),
    /// Submit and moderate adoption requests.
    #[command(subcommand)]
    Adopt(AdoptCommand),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a user. The first user may be added without `--as`.
    Add {
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long, default_value = "user")]
        role: Role,
    },
}

#[derive(Args, Debug)]
struct AnimalFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    breed: String,
    #[arg(long)]
    age_months: u32,
    #[arg(long)]
    gender: Gender,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "available")]
    status: AnimalStatus,
}

#[derive(Args, Debug)]
struct AnimalChanges {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    breed: Option<String>,
    #[arg(long)]
    age_months: Option<u32>,
    #[arg(long)]
    gender: Option<Gender>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    status: Option<AnimalStatus>,
}

#[derive(Subcommand, Debug)]
enum AnimalCommand {
    /// Add an animal, copying photos into the upload directory.
    Add {
        #[command(flatten)]
        fields: AnimalFields,
        /// Photo file; repeat for several. At least one is required.
        #[arg(long = "photo", required = true)]
        photos: Vec<PathBuf>,
    },
    /// Change fields of an animal.
    Edit {
        id: i64,
        #[command(flatten)]
        changes: AnimalChanges,
    },
    Show {
        id: i64,
    },
    /// List animals, available ones first.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "created_at")]
        sort_by: SortBy,
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        #[arg(long)]
        status: Option<AnimalStatus>,
    },
    Search {
        text: Option<String>,
        #[arg(long)]
        status: Option<AnimalStatus>,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        breed: Option<String>,
    },
    /// Delete an animal with its requests and photos.
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum AdoptCommand {
    /// Request to adopt an animal.
    Submit {
        animal_id: i64,
        #[arg(long)]
        contact: String,
    },
    Approve {
        request_id: i64,
    },
    Reject {
        request_id: i64,
    },
    /// Show one request.
    Show {
        request_id: i64,
    },
    /// Pending requests awaiting moderation.
    Pending,
    /// Your own requests.
    Mine,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => shelter_config::load_and_validate_path(path),
        None => shelter_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            shelter_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.app.log_level);

    match commands::run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            eprintln!("error: {}", err.notice());
            if let shelter_core::ShelterError::Invalid(detail) = &err {
                eprintln!("  {detail}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shelter={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
