use std::path::PathBuf;

use chrono::Local;
use clap::Parser;

use dayslip::config::{self, DashConfig};
use dayslip::fetch::keyring::{self, TICKTICK_ACCOUNT};
use dayslip::print::ReceiptPrinter;
use dayslip::sections::Dashboard;

#[derive(Parser, Debug)]
#[command(
    name = "dayslip",
    version,
    about = "Print today's tasks, events and weather on a receipt printer"
)]
struct Args {
    /// Config file (default: ~/.config/dayslip/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Send to the printer even when the config says dry_run
    #[arg(short, long)]
    print: bool,

    /// Debug logging for this run
    #[arg(short, long)]
    verbose: bool,

    /// Save a TickTick API token to the system keyring and exit
    #[arg(long, value_name = "TOKEN")]
    store_ticktick_token: Option<String>,
}

// Logs go to the systemd user journal (`journalctl --user -t dayslip -f`).
// dayslip itself logs at info (debug when enabled), dependencies at warn.
fn init_logging() {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("dayslip") {
                let max = if dayslip::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("dayslip".to_string()),
        Err(e) => {
            eprintln!("Journal unavailable, logging disabled: {}", e);
            return;
        }
    };

    if let Err(e) = log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })) {
        eprintln!("Failed to install logger: {}", e);
        return;
    }
    // Global max must be Debug so debug logs can pass through when enabled
    log::set_max_level(log::LevelFilter::Debug);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging();
    dayslip::set_debug_logging(args.verbose);

    if let Some(token) = args.store_ticktick_token.as_deref() {
        keyring::store_token(TICKTICK_ACCOUNT, token).await?;
        println!("TickTick token stored in keyring");
        return Ok(());
    }

    let path = args.config.unwrap_or_else(config::default_config_path);
    let config = DashConfig::load(&path)?;
    dayslip::set_debug_logging(config.debug_logging || args.verbose);

    // One reference time for every section.
    let now = Local::now().fixed_offset();
    log::debug!("Building dashboard for {}", now);
    let dashboard = Dashboard::build(&config, now).await;

    let mut printer = if config.printer.dry_run && !args.print {
        ReceiptPrinter::dry(config.printer.width)
    } else {
        ReceiptPrinter::open(&config.printer.device, config.printer.width)?
    };
    dashboard.print(&mut printer)?;

    log::info!("Dashboard printed");
    Ok(())
}
