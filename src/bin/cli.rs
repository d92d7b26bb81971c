//! Guidance Portal CLI
//!
//! Local administration and smoke-testing entry point for the portal
//! services.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use portal::{
    assets::{AssetResolver, StaticAssets},
    error::{AppError, Result},
    models::{Config, RegistrationForm, StoreBackend},
    services::{AnnouncementFeed, FacultyDirectory, IdentityVerifier, RegistrationService},
    storage::{DocumentStore, HttpStore, LocalStore},
    utils::http,
};

/// Guidance Portal - school guidance-office services
#[derive(Parser, Debug)]
#[command(name = "portal", version, about = "School guidance-office portal services")]
struct Cli {
    /// Path to data directory containing config.toml
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify a student's LRN and surname against the records store
    Verify {
        #[arg(long)]
        lrn: String,

        #[arg(long)]
        surname: String,
    },

    /// Submit a download registration and issue a token
    Register {
        #[arg(long)]
        lrn: String,

        #[arg(long)]
        surname: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        contact: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        guardian_name: String,

        #[arg(long)]
        guardian_contact: String,

        #[arg(long)]
        relationship: String,

        /// Accept the privacy consent
        #[arg(long)]
        consent: bool,
    },

    /// Recover a previously issued token
    Recover {
        #[arg(long)]
        lrn: String,

        #[arg(long)]
        surname: String,
    },

    /// Show published announcements
    Announcements {
        /// Show the full feed instead of the capped dashboard cards
        #[arg(long)]
        all: bool,
    },

    /// Show the faculty directory
    Faculty {
        /// Filter to a single department
        #[arg(long)]
        department: Option<String>,

        /// Group members by department
        #[arg(long)]
        grouped: bool,
    },

    /// Validate configuration files
    Validate,

    /// Show collection counts
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the configured document store backend.
async fn build_store(data_dir: &PathBuf, config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.store.backend {
        StoreBackend::Local => {
            let root = data_dir.join(&config.store.root);
            Ok(Arc::new(LocalStore::new(root)))
        }
        StoreBackend::Http => {
            let base_url = config
                .store
                .base_url
                .as_deref()
                .ok_or_else(|| AppError::config("store.base_url is required for http backend"))?;
            let client = http::create_client(&config.http)?;
            Ok(Arc::new(HttpStore::new(client, base_url)?))
        }
        StoreBackend::S3 => {
            #[cfg(feature = "s3")]
            {
                let bucket = config
                    .store
                    .bucket
                    .clone()
                    .ok_or_else(|| AppError::config("store.bucket is required for s3 backend"))?;
                Ok(Arc::new(
                    portal::storage::S3Store::connect(bucket, config.store.prefix.clone()).await,
                ))
            }
            #[cfg(not(feature = "s3"))]
            {
                Err(AppError::config(
                    "this build does not include the s3 backend (enable the `s3` feature)",
                ))
            }
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Guidance Portal starting...");

    let config_path = cli.data_dir.join("config.toml");
    let config = Arc::new(Config::load_or_default(&config_path));

    log::info!("Loaded configuration from {}", cli.data_dir.display());

    let assets: Arc<dyn AssetResolver> =
        Arc::new(StaticAssets::new(config.assets.base_url.as_deref())?);

    match cli.command {
        Command::Verify { lrn, surname } => {
            let store = build_store(&cli.data_dir, &config).await?;
            let verifier = IdentityVerifier::new(Arc::clone(&config), store);

            let record = verifier.verify(&lrn, &surname).await?;
            log::info!("Student verified successfully.");
            println!("Verified: {} ({})", record.student_info.surname, lrn);
        }

        Command::Register {
            lrn,
            surname,
            address,
            contact,
            email,
            guardian_name,
            guardian_contact,
            relationship,
            consent,
        } => {
            let store = build_store(&cli.data_dir, &config).await?;
            let service = RegistrationService::new(Arc::clone(&config), store);

            let form = RegistrationForm {
                lrn,
                surname,
                address,
                contact,
                email,
                guardian_name,
                guardian_contact,
                relationship,
            };

            let issued = service.register(&form, consent).await?;
            if issued.newly_issued {
                log::info!("Registration recorded, token issued.");
            } else {
                log::info!("Already registered, returning the existing token.");
            }
            println!("Token: {}", issued.token);
            println!("Download: {}", issued.report_path);
        }

        Command::Recover { lrn, surname } => {
            let store = build_store(&cli.data_dir, &config).await?;
            let service = RegistrationService::new(Arc::clone(&config), store);

            let token = service.recover(&lrn, &surname).await?;
            println!("Token: {token}");
        }

        Command::Announcements { all } => {
            let store = build_store(&cli.data_dir, &config).await?;
            let feed = AnnouncementFeed::new(Arc::clone(&config), store, Arc::clone(&assets));

            if all {
                let details = feed.full_feed().await?;
                if details.is_empty() {
                    println!("No announcements available yet.");
                }
                for detail in details {
                    println!("{} ({})", detail.title, detail.date_text);
                    if let Some(time) = &detail.time {
                        println!("  Time: {time}");
                    }
                    if let Some(location) = &detail.location {
                        println!("  Location: {location}");
                    }
                    if let Some(audience) = &detail.audience {
                        println!("  Audience: {audience}");
                    }
                    if let Some(category) = &detail.category {
                        println!("  Category: {category}");
                    }
                    if !detail.summary.is_empty() {
                        println!("  {}", detail.summary);
                    }
                    for attachment in &detail.attachments {
                        println!("  Attachment: {attachment}");
                    }
                }
            } else {
                let cards = feed.recent_cards().await?;
                if cards.is_empty() {
                    println!("No announcements.");
                }
                for card in cards {
                    println!("{} ({})", card.title, card.date_text);
                    println!("  {}", card.summary);
                    println!("  Image: {}", card.thumbnail);
                }
            }
        }

        Command::Faculty {
            department,
            grouped,
        } => {
            let store = build_store(&cli.data_dir, &config).await?;
            let directory = FacultyDirectory::new(Arc::clone(&config), store, Arc::clone(&assets));

            if grouped {
                if let Some(principal) = directory.principal_card().await? {
                    println!("Principal: {} <{}>", principal.name, principal.email);
                    println!("  Photo: {}", principal.photo_url);
                }

                for (dept, members) in directory.grouped().await? {
                    println!("{dept}:");
                    for member in members {
                        println!("  {}", member.name);
                    }
                }
            } else {
                let cards = directory.cards(department.as_deref()).await?;
                if cards.is_empty() {
                    println!("No faculty data found.");
                }
                for card in cards {
                    println!("{} - {}", card.name, card.department);
                    println!("  Photo: {}", card.photo_url);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (store, collections, feed, and assets)");

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Data directory: {}", cli.data_dir.display());

            let store = build_store(&cli.data_dir, &config).await?;
            let collections = [
                config.collections.student_records.as_str(),
                config.collections.student_downloads.as_str(),
                config.collections.announcements.as_str(),
                config.collections.faculty.as_str(),
            ];
            for collection in collections {
                let count = store.list(collection).await?.len();
                println!("{collection}: {count} documents");
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
