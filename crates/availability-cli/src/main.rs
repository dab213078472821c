//! `slots` CLI: resolve bookable slots from availability rules on the command line.
//!
//! Rules and appointments are read in the REST wire format, so API responses
//! can be piped straight in.
//!
//! ## Usage
//!
//! ```sh
//! # Slots for one day, with bookings marked
//! slots day -r rules.json -a appointments.json --date 2024-03-11
//!
//! # Same, as JSON, counting only confirmed bookings
//! slots day -r rules.json -a appointments.json --date 2024-03-11 --policy confirmed-only --json
//!
//! # Dates with availability in the next two weeks
//! curl -s $API/professionals/3/availability | slots dates --from 2024-03-04 --days 14
//!
//! # Rules grouped for the calendar view, or the rules governing one date
//! slots rules -r rules.json
//! slots rules -r rules.json --date 2024-03-04
//!
//! # Check a rule set before saving it
//! slots validate -r rules.json
//!
//! # Build the create-appointment payload for a chosen slot
//! slots book --professional 3 --date 2024-03-04 --time 14:00 --patient patient.json
//! ```

use anyhow::{Context, Result};
use availability_engine::{
    appointments_from_json, bookable_dates, date_key, group_rules, parse_date_key, resolve_day,
    resolve_rules, rules_from_json, validate_rules, AvailabilityRule, BookingRequest, DaySchedule,
    EngineConfig, OccupancyPolicy, SlotTime,
};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Resolve bookable appointment slots from availability rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one date into slots, marking booked ones
    Day {
        /// Rules file (reads from stdin if omitted)
        #[arg(short, long)]
        rules: Option<String>,
        /// Appointments file; without it every slot is available
        #[arg(short, long)]
        appointments: Option<String>,
        /// Date to resolve (yyyy-MM-dd)
        #[arg(long)]
        date: String,
        /// Only count appointments for this professional
        #[arg(long)]
        professional: Option<String>,
        /// Which statuses occupy a slot: exclude-cancelled or confirmed-only
        #[arg(long, env = "SLOTS_OCCUPANCY_POLICY")]
        policy: Option<String>,
        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List dates after --from that have availability
    Dates {
        /// Rules file (reads from stdin if omitted)
        #[arg(short, long)]
        rules: Option<String>,
        /// Day before the first candidate (defaults to today)
        #[arg(long)]
        from: Option<String>,
        /// How many days after --from to search
        #[arg(long, env = "SLOTS_HORIZON_DAYS")]
        days: Option<u32>,
        /// Print the dates as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Show rules grouped by weekday and date, or those governing --date
    Rules {
        /// Rules file (reads from stdin if omitted)
        #[arg(short, long)]
        rules: Option<String>,
        /// Only show the rules that govern this date (yyyy-MM-dd)
        #[arg(long)]
        date: Option<String>,
    },
    /// Check a rule set; exits non-zero if any rule is malformed
    Validate {
        /// Rules file (reads from stdin if omitted)
        #[arg(short, long)]
        rules: Option<String>,
    },
    /// Build the create-appointment payload for a slot
    Book {
        #[arg(long)]
        professional: String,
        /// Date of the slot (yyyy-MM-dd)
        #[arg(long)]
        date: String,
        /// Start time of the slot (HH:mm)
        #[arg(long)]
        time: String,
        /// Patient JSON file (reads from stdin if omitted)
        #[arg(long)]
        patient: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "loaded engine configuration");

    match cli.command {
        Commands::Day {
            rules,
            appointments,
            date,
            professional,
            policy,
            json,
            output,
        } => {
            let rules = load_rules(rules.as_deref())?;
            let date = parse_date_key(&date).context("Invalid --date")?;
            let policy = match policy {
                Some(p) => p.parse::<OccupancyPolicy>().context("Invalid --policy")?,
                None => config.occupancy_policy,
            };
            let appointments = match appointments {
                Some(path) => appointments_from_json(&read_input(Some(&path))?)
                    .with_context(|| format!("Failed to parse appointments: {}", path))?,
                None => Vec::new(),
            };

            let schedule = resolve_day(
                &rules,
                date,
                appointments.iter().filter(|a| {
                    a.date() == date
                        && professional
                            .as_deref()
                            .is_none_or(|p| a.professional_id.as_deref() == Some(p))
                }),
                policy,
            );

            let rendered = if json {
                serde_json::to_string_pretty(&schedule)?
            } else {
                render_schedule(&schedule)
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Dates {
            rules,
            from,
            days,
            json,
        } => {
            let rules = load_rules(rules.as_deref())?;
            let today = match from {
                Some(from) => parse_date_key(&from).context("Invalid --from")?,
                None => chrono::Local::now().date_naive(),
            };
            let horizon = days.unwrap_or(config.booking_horizon_days);
            let dates = bookable_dates(&rules, today, horizon);

            if json {
                let keys: Vec<String> = dates.iter().map(|d| date_key(*d)).collect();
                println!("{}", serde_json::to_string(&keys)?);
            } else {
                for date in &dates {
                    println!("{}", date_key(*date));
                }
            }
        }
        Commands::Rules { rules, date } => {
            let rules = load_rules(rules.as_deref())?;
            let rendered = match date {
                Some(date) => {
                    let date = parse_date_key(&date).context("Invalid --date")?;
                    let governing: Vec<&AvailabilityRule> = resolve_rules(&rules, date);
                    serde_json::to_string_pretty(&governing)?
                }
                None => serde_json::to_string_pretty(&group_rules(&rules))?,
            };
            println!("{}", rendered);
        }
        Commands::Validate { rules } => {
            let rules = load_rules(rules.as_deref())?;
            let problems = validate_rules(&rules);
            if problems.is_empty() {
                println!("{} rule(s) OK", rules.len());
            } else {
                for problem in &problems {
                    eprintln!("{}", problem);
                }
                process::exit(1);
            }
        }
        Commands::Book {
            professional,
            date,
            time,
            patient,
            notes,
        } => {
            let date = parse_date_key(&date).context("Invalid --date")?;
            let slot: SlotTime = time.parse().context("Invalid --time")?;
            let patient: serde_json::Value = serde_json::from_str(&read_input(patient.as_deref())?)
                .context("Patient must be a JSON object")?;

            let mut request = BookingRequest::new(professional, date, slot, patient);
            if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
                request = request.with_notes(notes);
            }
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "availability_engine=debug,slots=debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            EngineConfig::from_json(&json).with_context(|| format!("Invalid config: {}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_rules(path: Option<&str>) -> Result<Vec<AvailabilityRule>> {
    let json = read_input(path)?;
    rules_from_json(&json).context("Failed to parse availability rules")
}

/// One line per slot: `08:00  free` or `08:30  booked  CONFIRMED #7`.
fn render_schedule(schedule: &DaySchedule) -> String {
    let mut out = format!(
        "{} ({})\n",
        date_key(schedule.date),
        schedule.day_of_week
    );
    if schedule.slots.is_empty() {
        out.push_str("no availability\n");
        return out;
    }
    for slot in &schedule.slots {
        match &slot.occupying_appointment {
            None => out.push_str(&format!("{}  free\n", slot.time)),
            Some(appt) => out.push_str(&format!(
                "{}  booked  {}{}\n",
                slot.time,
                appt.status,
                appt.id.as_deref().map(|id| format!(" #{}", id)).unwrap_or_default()
            )),
        }
    }
    out.push_str(&format!(
        "{} of {} free\n",
        schedule.available_count(),
        schedule.slots.len()
    ));
    out
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
