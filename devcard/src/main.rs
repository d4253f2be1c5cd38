//! devcard - pupil development cards
//!
//! Keeps pupil records in a local SQLite file, loads assessment scores from
//! the age-group workbooks and fills the speech therapy table of a Word
//! report. Without a subcommand the interactive menu starts.

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use devcard::extract::LayoutKind;
use devcard::report::ReportFiller;
use devcard::ui::{self, Console, Services};
use devcard::AccessGate;
use devcard_common::config::{
    find_config_file, load_toml_config, AppPaths, RootFolderResolver, TomlConfig,
};
use devcard_common::db::PersonalInfo;
use devcard_common::{Error, ScoreMap};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for devcard
#[derive(Parser, Debug)]
#[command(name = "devcard")]
#[command(about = "Pupil development cards and speech therapy reports")]
#[command(version)]
struct Args {
    /// Folder holding the database and license files
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: devcard.toml in the root folder)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (default)
    Menu,

    /// Print all pupils
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a pupil, optionally loading scores and filling a report
    Add {
        #[command(flatten)]
        info: InfoArgs,

        /// Development card workbook to load scores from
        #[arg(long)]
        workbook: Option<PathBuf>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Replace a pupil's personal info
    EditInfo {
        id: i64,

        #[command(flatten)]
        info: InfoArgs,
    },

    /// Reload a pupil's scores from a workbook
    EditScores {
        id: i64,

        workbook: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Delete a pupil
    Delete { id: i64 },

    /// Fill a report from a pupil's stored scores
    Fill {
        id: i64,

        /// Age group whose report sections are used
        #[arg(long)]
        layout: LayoutKind,

        #[arg(long)]
        template: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
struct InfoArgs {
    #[arg(long)]
    surname: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    patronymic: String,

    /// DD-MM-YYYY
    #[arg(long)]
    birth_date: String,
}

impl InfoArgs {
    fn parse(&self) -> devcard_common::Result<PersonalInfo> {
        PersonalInfo::parse(&self.surname, &self.name, &self.patronymic, &self.birth_date)
    }
}

#[derive(ClapArgs, Debug)]
struct ReportArgs {
    /// Report template to fill after loading scores
    #[arg(long, requires = "output")]
    template: Option<PathBuf>,

    /// Where to save the filled report
    #[arg(long, requires = "template")]
    output: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<(PathBuf, TomlConfig)> {
    let root_hint = RootFolderResolver::new()
        .with_cli_arg(args.root_folder.clone())
        .resolve();

    let config = match find_config_file(args.config.as_deref(), &root_hint) {
        Some(path) => load_toml_config(&path)?.unwrap_or_default(),
        None => TomlConfig::default(),
    };

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder.clone())
        .with_toml(Some(&config))
        .resolve();
    Ok((root_folder, config))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let (root_folder, config) = load_config(&args)?;

    // RUST_LOG wins over the configured level; logs go to stderr so they
    // do not interleave with prompts on stdout
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting devcard v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let paths = AppPaths::new(root_folder, &config);
    paths.ensure_root_exists()?;
    info!("Root folder: {}", paths.root_folder.display());
    info!("Database: {}", paths.database.display());

    let services = Services::open(&paths)
        .await
        .context("Failed to open the pupil database")?;

    let mut console = Console::stdio();
    let gate = AccessGate::from_paths(&paths);
    if let Err(e) = gate.check_access(|| console.ask_raw("Enter your key")) {
        console.error(e);
        return Ok(ExitCode::FAILURE);
    }

    match args.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            ui::run(&services, &mut console).await;
        }
        Command::List { json } => {
            ui::list_pupils(&services, &mut console, json).await;
        }
        Command::Add {
            info,
            workbook,
            report,
        } => {
            let id = services.store.add_pupil(&info.parse()?).await?;
            println!("Added pupil {}", id);
            if let Some(workbook) = workbook {
                load_scores(&services, id, &workbook, &report).await?;
            }
        }
        Command::EditInfo { id, info } => {
            services.store.update_personal_info(id, &info.parse()?).await?;
            println!("Updated pupil {}", id);
        }
        Command::EditScores {
            id,
            workbook,
            report,
        } => {
            load_scores(&services, id, &workbook, &report).await?;
        }
        Command::Delete { id } => {
            services.store.delete_pupil(id).await?;
            println!("Deleted pupil {}", id);
        }
        Command::Fill {
            id,
            layout,
            template,
            output,
        } => {
            let pupil = services
                .store
                .get_pupil(id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("pupil {}", id)))?;
            fill_and_save(&services.filler, &template, &output, &pupil.scores, layout)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn load_scores(services: &Services, id: i64, workbook: &Path, report: &ReportArgs) -> Result<()> {
    let extraction = services.extractor.read_scores(workbook)?;
    services.store.update_scores(id, &extraction.scores).await?;
    println!(
        "Loaded {} score(s) for pupil {} ({} group)",
        extraction.scores.len(),
        id,
        extraction.layout
    );

    if let (Some(template), Some(output)) = (&report.template, &report.output) {
        fill_and_save(&services.filler, template, output, &extraction.scores, extraction.layout)?;
    }
    Ok(())
}

fn fill_and_save(
    filler: &ReportFiller,
    template: &Path,
    output: &Path,
    scores: &ScoreMap,
    layout: LayoutKind,
) -> Result<()> {
    let report = filler.fill(template, scores, layout)?;
    for failure in &report.failures {
        warn!("{}", failure);
        eprintln!("[ERROR] {}", failure);
    }
    report.save(output)?;
    println!("Report saved to {}", output.display());
    Ok(())
}
