use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use social_seller::config::load_config;
use social_seller::filter::{date_bounds, distinct_platforms, distinct_statuses};
use social_seller::notify::format_notify_report;
use social_seller::render::{render_html, render_text, Theme};
use social_seller::{logging, storage, FilterCriteria, Session};

#[derive(Parser)]
#[command(name = "social-seller")]
#[command(about = "Lead dashboard with sentiment, notifications, PDF summaries and backups", long_about = None)]
struct Cli {
    /// Project root; relative paths in the config resolve against it
    #[arg(long, env = "ROOT", default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to config/dashboard.yml under the root)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Keep only these statuses (repeatable)
    #[arg(long = "status")]
    statuses: Vec<String>,

    /// Keep only these platforms (repeatable)
    #[arg(long = "platform")]
    platforms: Vec<String>,

    /// First day of the period, YYYY-MM-DD
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the period, YYYY-MM-DD
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            statuses: args.statuses,
            platforms: args.platforms,
            date_from: args.from,
            date_to: args.to,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard to the terminal
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Write the dashboard as a self-contained HTML page
    Html {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,

        /// Dark color scheme
        #[arg(long)]
        dark: bool,

        /// Embed the PDF summary as a download link
        #[arg(long)]
        with_pdf: bool,
    },

    /// Send the configured message to every matching lead
    Notify {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Export a PDF summary of the matching leads
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value = "lead_report.pdf")]
        out: PathBuf,
    },

    /// Export the matching leads as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value = "leads_export.csv")]
        out: PathBuf,
    },

    /// Upload a file to the configured remote storage
    Backup { file: PathBuf },

    /// List the available filter choices and the date range of the data
    Options,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.root, cli.config.as_deref())?;
    logging::init(&cli.root, &config.logging).context("Failed to set up error logging")?;

    let mut session =
        Session::from_config(&cli.root, config).context("Failed to set up dashboard adapters")?;

    if let Commands::Backup { file } = &cli.command {
        if session.backup(file) {
            println!("✅ Backup of {} completed", file.display());
            return Ok(());
        }
        eprintln!("❌ Backup of {} failed; see the error log", file.display());
        std::process::exit(1);
    }

    if let Some(warning) = session.refresh() {
        eprintln!("⚠️  {}", warning);
    }

    match cli.command {
        Commands::Dashboard { filters } => {
            print!("{}", render_text(&session.view(&filters.into())));
        }
        Commands::Html {
            filters,
            out,
            dark,
            with_pdf,
        } => {
            let criteria: FilterCriteria = filters.into();
            let theme = if dark { Theme::Dark } else { Theme::Light };
            let pdf = with_pdf.then(|| session.report(&criteria));
            let html = render_html(&session.view(&criteria), theme, pdf.as_deref());
            storage::write_bytes(&out, html.as_bytes())?;
            println!("Dashboard written to {}", out.display());
        }
        Commands::Notify { filters } => {
            let report = session.notify(&filters.into());
            if report.outcomes.is_empty() {
                println!("No leads match the current filters.");
            } else {
                print!("{}", format_notify_report(&report));
            }
        }
        Commands::Report { filters, out } => {
            let pdf = session.report(&filters.into());
            storage::write_bytes(&out, &pdf)?;
            println!("PDF report written to {}", out.display());
        }
        Commands::Export { filters, out } => {
            let leads = session.filtered(&filters.into());
            storage::export_csv(&leads, &out)?;
            println!("Exported {} leads to {}", leads.len(), out.display());
        }
        Commands::Options => {
            let leads = &session.table().leads;
            println!("Statuses: {}", distinct_statuses(leads).join(", "));
            println!("Platforms: {}", distinct_platforms(leads).join(", "));
            match date_bounds(leads) {
                Some((min, max)) => println!("Dates: {} to {}", min, max),
                None => println!("Dates: none"),
            }
        }
        Commands::Backup { .. } => {}
    }

    Ok(())
}
