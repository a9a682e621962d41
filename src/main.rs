use anyhow::Result;
use clap::{Parser, Subcommand};

use currency_tracker::cli::{
    handle_backup_command, handle_character_command, handle_currency_command,
    handle_export_command, handle_log_command, BackupCommands, CharacterCommands,
    CurrencyCommands, ExportArgs, LogCommands,
};
use currency_tracker::config::{Dirty, Settings, TrackerPaths};
use currency_tracker::currency::{seed_default_presets, CurrencyRegistry};
use currency_tracker::export::{ExportFormat, Exporter};
use currency_tracker::lang::EnglishLocalizer;
use currency_tracker::logging::init_logging;
use currency_tracker::services::LogService;
use currency_tracker::storage::LogStore;

#[derive(Parser)]
#[command(
    name = "ctrack",
    version,
    about = "Track in-game currency balances in plain-text logs",
    long_about = "ctrack keeps one append-friendly text log per currency and container \
                  for each character. Logs can be edited, merged, reordered, exported \
                  to CSV or Markdown, and backed up into rotating archives."
)]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the settings file and register the built-in currencies
    Init,

    /// Show current configuration and paths, or change settings
    Config {
        /// Maximum number of backup archives per character (0 = unlimited)
        #[arg(long)]
        max_backups: Option<usize>,

        /// Default export format: csv or md
        #[arg(long)]
        export_format: Option<ExportFormat>,

        /// Records shown per page by `log list`
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Active character commands
    #[command(subcommand)]
    Character(CharacterCommands),

    /// Currency table commands
    #[command(subcommand)]
    Currency(CurrencyCommands),

    /// Transaction log commands
    #[command(subcommand)]
    Log(LogCommands),

    /// Export a log to CSV or Markdown
    Export(ExportArgs),

    /// Backup commands
    #[command(subcommand)]
    Backup(BackupCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = TrackerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let data_folder = paths.data_folder(settings.active_character.as_ref());

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing currency tracker at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            let _ = seed_default_presets(&mut settings);
            let _ = settings.normalize_currencies();
            if let Some(character) = &settings.active_character {
                paths.ensure_character_dir(character)?;
            }
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next: ctrack character set <name> <server>");
        }

        Some(Commands::Config {
            max_backups,
            export_format,
            page_size,
        }) => {
            let mut dirty = Dirty::No;
            if let Some(max) = max_backups {
                settings.max_backup_files_count = max;
                dirty = Dirty::Yes;
            }
            if let Some(format) = export_format {
                settings.export_format = format;
                dirty = Dirty::Yes;
            }
            if let Some(size) = page_size {
                settings.records_per_page = size.max(1);
                dirty = Dirty::Yes;
            }
            save_if_dirty(&paths, &settings, dirty)?;
            print_config(&paths, &settings);
        }

        Some(Commands::Character(cmd)) => {
            let dirty = handle_character_command(&paths, &mut settings, cmd)?;
            save_if_dirty(&paths, &settings, dirty)?;
        }

        Some(Commands::Currency(cmd)) => {
            let dirty = handle_currency_command(&mut settings, cmd)?;
            save_if_dirty(&paths, &settings, dirty)?;
        }

        Some(Commands::Log(cmd)) => {
            let registry = CurrencyRegistry::from_settings(&settings);
            let store = LogStore::new(data_folder);
            let service = LogService::new(&store, &registry, &EnglishLocalizer);
            handle_log_command(&service, &registry, &paths, settings.records_per_page, cmd)
                .await?;
        }

        Some(Commands::Export(args)) => {
            let registry = CurrencyRegistry::from_settings(&settings);
            let store = LogStore::new(data_folder);
            let service = LogService::new(&store, &registry, &EnglishLocalizer);
            let exporter = Exporter::new(&store, &registry, &EnglishLocalizer);
            handle_export_command(&service, &exporter, &registry, settings.export_format, args)?;
        }

        Some(Commands::Backup(cmd)) => {
            handle_backup_command(data_folder.as_deref(), &settings, cmd).await?;
        }

        None => {
            println!("ctrack - currency transaction logs");
            println!();
            println!("Run 'ctrack --help' for usage information.");
        }
    }

    Ok(())
}

fn save_if_dirty(paths: &TrackerPaths, settings: &Settings, dirty: Dirty) -> Result<()> {
    if dirty.is_dirty() {
        settings.save(paths)?;
    }
    Ok(())
}

fn print_config(paths: &TrackerPaths, settings: &Settings) {
    println!("Currency Tracker Configuration");
    println!("==============================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    match &settings.active_character {
        Some(character) => {
            println!("Active character: {}", character);
            println!(
                "Data folder:      {}",
                paths.character_dir(character).display()
            );
        }
        None => println!("Active character: (none)"),
    }
    println!();
    println!("Settings:");
    println!("  Max backups:      {}", settings.max_backup_files_count);
    println!("  Export format:    {}", settings.export_format);
    println!("  Records per page: {}", settings.records_per_page);
    println!(
        "  Currencies:       {} preset, {} custom",
        settings.preset_currencies().len(),
        settings.custom_currencies().len()
    );
}
