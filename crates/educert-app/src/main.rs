// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// EduCert — certificate issuance and verification
//
// Entry point. Parses the command line, initialises logging and backend
// services, and runs one command.
//
// Commands:
// - educert issue      Issue a certificate
// - educert verify     Look a certificate up by id
// - educert check      Verify and recompute the digest
// - educert list       A student's certificates
// - educert stats      Registry or per-student counters
// - educert recent     Most recently issued certificates
// - educert audit      Audit trail
// - educert config     Show or change settings

mod render;
mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand};
use educert_core::error::Result;
use educert_core::human_errors::{Severity, humanize_error};
use educert_core::types::{IssueRequest, ISSUE_DATE_FORMAT, PortfolioQuery, SortKey};
use educert_core::RegistryBackend;
use serde::Serialize;

use services::app_services::AppServices;

#[derive(Parser, Debug)]
#[command(name = "educert")]
#[command(about = "Issue and verify education certificates", long_about = None)]
struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Data directory (default: $XDG_DATA_HOME/educert)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a certificate
    Issue {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        course: String,
        #[arg(long)]
        institution: String,
        /// Issue date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        duration: Option<String>,
        /// File to attach (repeatable)
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look a certificate up by id
    Verify {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// Look a certificate up and recompute its digest from the stored fields
    Check { id: String },

    /// List the certificates issued to a student
    List {
        #[arg(long)]
        email: String,
        /// Only certificates whose course or institution contains this text
        #[arg(long)]
        search: Option<String>,
        /// date | course | institution
        #[arg(long, default_value = "date")]
        sort: SortKey,
        #[arg(long)]
        json: bool,
    },

    /// Show counters for the whole registry, or for one student
    Stats {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Most recently issued certificates, newest first
    Recent {
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },

    /// Show the audit trail
    Audit {
        /// Only entries about this certificate id
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Choose the registry storage engine (json or sqlite)
    SetBackend { backend: RegistryBackend },
    /// Set the base URL verification links are built from
    SetBaseUrl { url: String },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::info!("EduCert starting");

    let result = match AppServices::init(cli.data_dir.as_deref()) {
        Ok(svc) => run(&svc, cli.command).await,
        Err(e) => {
            tracing::error!(error = %e, "failed to open storage");
            Err(e)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let human = humanize_error(&e);
            eprintln!("{}", render::human_error(&human));
            match human.severity {
                Severity::ActionRequired => ExitCode::from(1),
                Severity::Transient | Severity::Permanent => ExitCode::from(2),
            }
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(svc: &AppServices, command: Commands) -> Result<()> {
    match command {
        Commands::Issue {
            name,
            email,
            course,
            institution,
            date,
            description,
            grade,
            duration,
            attachments,
            json,
        } => {
            let request = IssueRequest {
                student_name: name,
                student_email: email,
                course_name: course,
                institution_name: institution,
                issue_date: date
                    .unwrap_or_else(|| Local::now().date_naive().format(ISSUE_DATE_FORMAT).to_string()),
                description,
                grade,
                duration,
            };
            let record = svc.issue(&request, &attachments).await?;
            if json {
                print_json(&record)?;
            } else {
                println!("Certificate issued.");
                println!("{}", render::certificate(&record, &svc.verification_url(&record.id)));
            }
        }

        Commands::Verify { id, json } => {
            let record = svc.verify(&id)?;
            if json {
                print_json(&record)?;
            } else {
                println!("{}", render::certificate(&record, &svc.verification_url(&record.id)));
            }
        }

        Commands::Check { id } => {
            let record = svc.check(&id)?;
            println!("{}: digest matches stored fields ({})", record.id, record.certificate_hash);
        }

        Commands::List {
            email,
            search,
            sort,
            json,
        } => {
            let records = svc.portfolio(&email, &PortfolioQuery { search, sort })?;
            if json {
                print_json(&records)?;
            } else {
                println!("{}", render::certificate_list(&records));
            }
        }

        Commands::Stats { email, json } => match email {
            Some(email) => {
                let stats = svc.portfolio_stats(&email, Local::now().date_naive())?;
                if json {
                    print_json(&stats)?;
                } else {
                    println!("{}", render::portfolio_stats(&stats));
                }
            }
            None => {
                let stats = svc.registry_stats()?;
                if json {
                    print_json(&stats)?;
                } else {
                    println!("{}", render::registry_stats(&stats));
                }
            }
        },

        Commands::Recent { limit } => {
            println!("{}", render::certificate_list(&svc.recent(limit)?));
        }

        Commands::Audit { subject, limit } => {
            let entries = match subject {
                Some(s) => svc.audit_entries_for(&s)?,
                None => svc.recent_audit_entries(limit)?,
            };
            println!("{}", render::audit_entries(&entries));
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("# data directory: {}", svc.data_dir().display());
                print_json(&svc.config())?;
            }
            ConfigCommands::SetBackend { backend } => {
                let mut config = svc.config();
                config.registry_backend = backend;
                svc.save_config(&config)?;
                println!("Registry backend set to {backend:?}; existing certificates stay in the previous store.");
            }
            ConfigCommands::SetBaseUrl { url } => {
                let mut config = svc.config();
                config.verify_base_url = url;
                svc.save_config(&config)?;
                println!("Verification base URL updated.");
            }
        },
    }
    Ok(())
}
