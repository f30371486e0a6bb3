//! mandrill_template: manage Mandrill email templates from the command line
//!
//! # Usage
//!
//! ```bash
//! # Pull a template into templates/welcome/
//! mandrill_template export welcome
//!
//! # Push it back to the QA environment as qa-welcome and publish it
//! mandrill_template --env qa upload welcome --publish
//!
//! # Compare drafts with published versions
//! mandrill_template list --verbose
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use mandrill_template::config::{Config, DEFAULT_CONFIG_FILE};
use mandrill_template::env::AppEnv;
use mandrill_template::mandrill::{MandrillClient, MergeVar};
use mandrill_template::output::{local_table, remote_table};
use mandrill_template::report::{ReportGenerator, WkhtmltoimageRenderer};
use mandrill_template::sync::{RenderMode, TemplateSync};
use mandrill_template::templates::{load_merge_vars, TemplateStore};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mandrill_template")]
#[command(version, about = "Sync Mandrill email templates with local files", long_about = None)]
struct Cli {
    /// Environment prefix applied to remote slugs <dev|qa|prod>
    #[arg(long, global = true, default_value = "prod")]
    env: AppEnv,

    /// Config file (TOML)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level, overrides the config file (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a template from remote to local files
    Export {
        slug: String,
    },
    /// Export all templates of the selected environment to local files
    ExportAll,
    /// Upload a template to remote as draft
    Upload {
        slug: String,
        /// Publish after uploading
        #[arg(short, long)]
        publish: bool,
    },
    /// Upload all local templates to remote as drafts
    UploadAll {
        /// Publish after uploading
        #[arg(short, long)]
        publish: bool,
    },
    /// Delete a template from remote
    Delete {
        slug: String,
        /// Also remove the local template directory
        #[arg(long)]
        delete_local: bool,
    },
    /// Generate new template files
    Generate {
        slug: String,
    },
    /// Publish a template from its draft
    Publish {
        slug: String,
    },
    /// Render the mail body of a local template
    ///
    /// PARAMS_FILE is a JSON array of {"name": ..., "content": ...} merge vars.
    Render {
        slug: String,
        params_file: Option<PathBuf>,
        /// Render locally, substituting {{var}} placeholders
        #[arg(long)]
        handlebars: bool,
    },
    /// Generate a preview report for all local templates
    Report,
    /// Show remote and local templates, optionally filtered by label
    List {
        label: Option<String>,
        /// Show published fields next to draft fields
        #[arg(short, long)]
        verbose: bool,
    },
}

impl Commands {
    fn needs_remote(&self) -> bool {
        match self {
            Commands::Generate { .. } | Commands::Report => false,
            Commands::Render { handlebars, .. } => !handlebars,
            _ => true,
        }
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mandrill_template={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_yaml<T: Serialize>(value: &T) -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    init_logging(cli.log_level.as_deref().unwrap_or(&config.logging.level));
    debug!("Environment: {}", cli.env);

    let client = if cli.command.needs_remote() {
        config.validate()?;
        MandrillClient::from_config(&config.mandrill)?
    } else {
        // Local-only commands never reach the API
        MandrillClient::new(String::new(), config.mandrill.api_url.clone())?
    };

    let store = TemplateStore::new(&config.storage.templates_dir);
    let report = ReportGenerator::new(
        WkhtmltoimageRenderer::new(config.report.wkhtmltoimage.clone()),
        &config.report.output_dir,
    );
    let sync = TemplateSync::new(client, store, cli.env, report);

    match cli.command {
        Commands::Export { slug } => {
            let template = sync.export(&slug).await?;
            println!(
                "Exported {} to {}",
                slug,
                sync.store().template_dir(template.slug()).display()
            );
        }
        Commands::ExportAll => {
            let exported = sync.export_all().await?;
            for slug in &exported {
                println!("Exported {}", slug);
            }
            println!("\nTotal: {} template(s)", exported.len());
        }
        Commands::Upload { slug, publish } => {
            let outcome = sync.upload(&slug, publish).await?;
            print_yaml(&outcome.result)?;
            if let Some(published) = &outcome.published {
                print_yaml(published)?;
            }
        }
        Commands::UploadAll { publish } => {
            let outcome = sync.upload_all(publish).await?;
            for upload in &outcome.uploaded {
                print_yaml(&upload.result)?;
                if upload.published.is_some() {
                    println!("Template published {}. feeling good.", upload.slug);
                }
            }
            for slug in &outcome.skipped {
                println!("Template data not found {}. Please generate first.", slug);
            }
        }
        Commands::Delete { slug, delete_local } => {
            let outcome = sync.delete(&slug, delete_local).await?;
            match (&outcome.remote, &outcome.remote_message) {
                (Some(deleted), _) => print_yaml(deleted)?,
                (None, Some(message)) => println!("{}", message),
                (None, None) => {}
            }
            if delete_local && !outcome.local_deleted {
                println!("Local template data not found {}.", slug);
            }
        }
        Commands::Generate { slug } => {
            let template = sync.generate(&slug).await?;
            println!(
                "Generated {}",
                sync.store().template_dir(template.slug()).display()
            );
        }
        Commands::Publish { slug } => {
            print_yaml(&sync.publish(&slug).await?)?;
        }
        Commands::Render {
            slug,
            params_file,
            handlebars,
        } => {
            let merge_vars = match params_file.as_deref() {
                Some(path) => read_params(path).await?,
                None => Vec::new(),
            };
            let mode = if handlebars {
                RenderMode::Local
            } else {
                RenderMode::Remote
            };
            println!("{}", sync.render(&slug, &merge_vars, mode).await?);
        }
        Commands::Report => {
            let summary = sync.report().await?;
            for slug in &summary.previewed {
                println!("Preview for template '{}' generated.", slug);
            }
            for slug in &summary.missing {
                println!("Template data not found for '{}'.", slug);
            }
            println!("Report complete: {}", summary.index_path.display());
        }
        Commands::List { label, verbose } => {
            let listing = sync.list(label.as_deref()).await?;
            println!("Remote Templates");
            println!("----------------------");
            println!("{}", remote_table(&listing.remote, verbose));
            println!("Local Templates");
            println!("----------------------");
            println!("{}", local_table(&listing.local));
        }
    }

    Ok(())
}

async fn read_params(path: &Path) -> anyhow::Result<Vec<MergeVar>> {
    load_merge_vars(path)
        .await
        .with_context(|| format!("Failed to read merge vars from {}", path.display()))
}
