//! `worknet` CLI -- shared meeting times and holiday calendars for teams spread
//! across countries.
//!
//! ## Usage
//!
//! ```sh
//! # Half-hour UTC slots where everyone is within 08:00-18:00 local time
//! worknet slots --zone Europe/Paris --zone America/New_York --date 2025-06-15
//!
//! # Same, from country names or a configured group (uses the 15th of the month)
//! worknet slots --group steering --month 2025-06
//!
//! # Month calendar with holidays from a JSON table for the selected countries
//! worknet grid --month 2025-12 --holidays holidays.json --country France
//!
//! # Holidays in a month, filtered by name
//! worknet holidays --holidays holidays.json --month 2025-12 --search christmas
//!
//! # Configured countries and groups
//! worknet countries
//! ```

mod config;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use meeting_engine::{
    calendar_date, find_suitable_slots_in, group_by_month, CountryDirectory, DayKind, HolidayQuery,
    HolidayRow, HolidayTable, MeetingSlot, MonthGrid, Selection, WorkingWindow,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::PlannerConfig;

/// Day of the month searched when only `--month` is given.
const DEFAULT_MEETING_DAY: u32 = 15;

#[derive(Parser)]
#[command(
    name = "worknet",
    version,
    about = "Find shared meeting times and holiday-free days across countries"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file layered over the bundled defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output on stderr (-q warn, -qq error)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List UTC half-hour slots inside every participant's working hours
    #[command(group(ArgGroup::new("when").required(true).args(["date", "month"])))]
    Slots {
        /// IANA time zone (repeatable)
        #[arg(long = "zone")]
        zones: Vec<String>,
        /// Country name from the configured directory (repeatable)
        #[arg(long = "country")]
        countries: Vec<String>,
        /// Configured country group, e.g. "steering"
        #[arg(long)]
        group: Option<String>,
        /// Meeting date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Meeting month (YYYY-MM); the 15th is searched
        #[arg(long)]
        month: Option<YearMonth>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show a Monday-first month calendar with holidays marked
    Grid {
        /// Month to show (YYYY-MM)
        #[arg(long)]
        month: YearMonth,
        /// JSON array of {country, date, name} holiday rows
        #[arg(long)]
        holidays: Option<PathBuf>,
        /// Restrict holidays to these countries (repeatable; default: all in the file)
        #[arg(long = "country")]
        countries: Vec<String>,
        /// Restrict holidays to a configured country group
        #[arg(long)]
        group: Option<String>,
        /// Extra holiday date (YYYY-MM-DD, repeatable)
        #[arg(long = "holiday")]
        extra: Vec<NaiveDate>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the public holidays of a month
    Holidays {
        /// JSON array of {country, date, name} holiday rows
        #[arg(long)]
        holidays: PathBuf,
        /// Month to list (YYYY-MM)
        #[arg(long)]
        month: YearMonth,
        /// Restrict to these countries (repeatable; default: all)
        #[arg(long = "country")]
        countries: Vec<String>,
        /// Restrict to a configured country group
        #[arg(long)]
        group: Option<String>,
        /// Case-insensitive text the holiday name must contain
        #[arg(long)]
        search: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List configured countries, their time zones and country groups
    Countries {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// A `YYYY-MM` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct YearMonth {
    year: i32,
    month: u32,
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{}'", s))?;
        let year: i32 = year.parse().map_err(|_| format!("invalid year in '{}'", s))?;
        let month: u32 = month.parse().map_err(|_| format!("invalid month in '{}'", s))?;
        calendar_date(year, month, 1).map_err(|e| e.to_string())?;
        Ok(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    let cfg = PlannerConfig::load(cli.config.as_deref())?;
    info!(
        window = %cfg.window,
        config = ?cfg.loaded_from,
        "configuration loaded"
    );

    match cli.command {
        Commands::Slots {
            zones,
            countries,
            group,
            date,
            month,
            json,
        } => {
            let date = match (date, month) {
                (Some(date), _) => date,
                (None, Some(ym)) => calendar_date(ym.year, ym.month, DEFAULT_MEETING_DAY)?,
                (None, None) => anyhow::bail!("either --date or --month is required"),
            };
            let zones = collect_zones(&cfg.directory, zones, &countries, group.as_deref())?;
            run_slots(&zones, date, cfg.window, json)?;
        }
        Commands::Grid {
            month,
            holidays,
            countries,
            group,
            extra,
            json,
        } => {
            debug!(%month, "building month grid");
            let mut dates: HashSet<NaiveDate> = extra.into_iter().collect();
            if let Some(path) = holidays.as_deref() {
                let table = load_holidays(path)?;
                let selected =
                    select_countries(&cfg.directory, &table, countries, group.as_deref())?;
                dates.extend(table.holiday_dates(&selected, month.year, month.month)?);
            }
            let grid = MonthGrid::new(month.year, month.month, &dates)?;
            if json {
                let value = serde_json::json!({ "title": grid.title(), "grid": grid });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", render_grid(&grid));
            }
        }
        Commands::Holidays {
            holidays,
            month,
            countries,
            group,
            search,
            json,
        } => {
            let table = load_holidays(&holidays)?;
            let selected = select_countries(&cfg.directory, &table, countries, group.as_deref())?;
            let mut query = HolidayQuery::month(month.year, month.month).countries(selected);
            if let Some(term) = search {
                query = query.search(term);
            }
            let rows = table.filter(&query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No holidays match your filters.");
            } else {
                print!("{}", render_holidays(&rows));
            }
        }
        Commands::Countries { json } => {
            if json {
                let countries: BTreeMap<&str, &str> = cfg
                    .directory
                    .countries()
                    .map(|(c, tz)| (c, tz.as_str()))
                    .collect();
                let groups: BTreeMap<&str, &[String]> = cfg.directory.groups().collect();
                let value = serde_json::json!({ "countries": countries, "groups": groups });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for (country, tz) in cfg.directory.countries() {
                    println!("{:<16} {}", country, tz);
                }
                for (name, members) in cfg.directory.groups() {
                    let mut sorted = members.to_vec();
                    sorted.sort();
                    println!();
                    println!("{}: {}", name, sorted.join(", "));
                }
            }
        }
    }

    Ok(())
}

/// Configure the global subscriber on stderr. `RUST_LOG` takes precedence over
/// the `-v`/`-q` flags.
fn init_tracing(verbose: u8, quiet: u8) -> Result<()> {
    let default_level = match (quiet, verbose) {
        (q, _) if q >= 2 => "error",
        (1, _) => "warn",
        (_, v) if v >= 3 => "trace",
        (_, 2) => "debug",
        (_, 1) => "info",
        _ => "warn",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid RUST_LOG filter")?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}

/// Explicit zones first, then zones of the named countries and group members.
fn collect_zones(
    directory: &CountryDirectory,
    mut zones: Vec<String>,
    countries: &[String],
    group: Option<&str>,
) -> Result<Vec<String>> {
    let mut names = countries.to_vec();
    if let Some(group) = group {
        let available: Vec<&str> = directory.countries().map(|(c, _)| c).collect();
        names.extend(directory.selection(&Selection::Group(group.to_string()), &available)?);
    }

    for name in &names {
        if directory.zone_for(name).is_none() {
            info!(country = %name, "country has no time zone mapping, skipping");
        }
    }
    zones.extend(
        directory
            .zones_for(&names)
            .into_iter()
            .map(|tz| tz.as_str().to_string()),
    );
    Ok(zones)
}

fn run_slots(zones: &[String], date: NaiveDate, window: WorkingWindow, json: bool) -> Result<()> {
    if zones.is_empty() {
        println!("Please select at least one time zone or country with a time zone mapping.");
        return Ok(());
    }

    let slots: Vec<MeetingSlot> = find_suitable_slots_in(zones, date, window)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&slots)?);
        return Ok(());
    }

    println!("Suggested meeting times on {} ({} local time)", date, window);
    if slots.is_empty() {
        println!(
            "No suitable meeting time found between {} local time for all countries. \
             Try deselecting countries",
            window
        );
    }
    for slot in &slots {
        println!("{}", slot);
    }
    Ok(())
}

fn load_holidays(path: &Path) -> Result<HolidayTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read holiday file: {}", path.display()))?;
    let rows: Vec<HolidayRow> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid holiday rows in {}", path.display()))?;
    debug!(rows = rows.len(), path = %path.display(), "holiday table loaded");
    Ok(HolidayTable::new(rows))
}

/// Group members present in `table`, then any explicit countries.
/// No selection at all means every country in the table.
fn select_countries(
    directory: &CountryDirectory,
    table: &HolidayTable,
    countries: Vec<String>,
    group: Option<&str>,
) -> Result<Vec<String>> {
    let available = table.countries();
    let mode = match (countries.is_empty(), group) {
        (_, Some(name)) => Selection::Group(name.to_string()),
        (true, None) => Selection::All,
        (false, None) => Selection::None,
    };

    let mut selected = directory.selection(&mode, &available)?;
    for country in countries {
        if !selected.contains(&country) {
            selected.push(country);
        }
    }
    Ok(selected)
}

fn render_grid(grid: &MonthGrid) -> String {
    let mut out = format!("{:^28}\n", grid.title());
    out.push_str(" Mo  Tu  We  Th  Fr  Sa  Su\n");
    for week in grid.weeks() {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                let n = chrono::Datelike::day(&day.date);
                match day.kind {
                    DayKind::Padding => "  . ".to_string(),
                    DayKind::Holiday => format!("{:>3}*", n),
                    DayKind::Free => format!("{:>3} ", n),
                }
            })
            .collect();
        out.push_str(cells.concat().trim_end());
        out.push('\n');
    }
    out.push_str(&format!(
        "\n{} free days, {} holidays (* = holiday, . = other month)\n",
        grid.free_days().count(),
        grid.holiday_count()
    ));
    out
}

fn render_holidays(rows: &[&HolidayRow]) -> String {
    let mut out = String::new();
    for ((year, month), group) in group_by_month(rows.iter().copied()) {
        let title = calendar_date(year, month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|_| format!("{:04}-{:02}", year, month));
        out.push_str(&format!("{}\n", title));
        for row in group {
            out.push_str(&format!("{} | {} | {}\n", row.date, row.country, row.name));
        }
    }
    out
}
