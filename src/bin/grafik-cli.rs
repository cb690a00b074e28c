#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use grafik::{
    calendar, load_csv, save_csv, suggest_target_limits, CoreError, Doctor, DoctorId, DoctorRole,
    EngineConfig, FileCsvStore, OnCallEngine, PreferenceStore, TimetableEngine,
};
use serde::Deserialize;
use serde_json::to_writer_pretty;
use std::collections::HashMap;
use std::fs::File;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI pour le grafik de dyzurs (sans base de donnees)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier CSV de preferences (blob unique)
    #[arg(long, global = true, default_value = "preferences.csv")]
    store: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Preferences des medecins (table CSV unique)
    Prefs {
        #[command(subcommand)]
        cmd: PrefsCommand,
    },
    /// Generer le grafik de dyzurs puis l'horaire journalier
    Schedule {
        #[command(subcommand)]
        cmd: ScheduleCommand,
    },
    /// Fonctions calendaires
    Calendar {
        #[command(subcommand)]
        cmd: CalendarCommand,
    },
    /// Suggestion de limites cibles
    Limits {
        #[command(subcommand)]
        cmd: LimitsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Importer des preferences depuis un CSV externe vers le store
    Import {
        #[arg(long)]
        csv: String,
    },
    /// Exporter le store vers un fichier CSV
    Export {
        #[arg(long)]
        csv: String,
    },
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    /// Generer le grafik puis l'horaire pour une periode de reglement
    Run {
        /// Fichier JSON des medecins (id, role, no_optout, saturday_rule, target_limit)
        #[arg(long)]
        doctors: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        start_month: Option<u32>,
        #[arg(long, default_value_t = 500)]
        trials: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Medecin ayant termine la periode precedente (pour la regle de repos)
        #[arg(long)]
        previous_tail: Option<String>,
        #[arg(long, default_value = "roster.json")]
        out_roster: String,
        #[arg(long, default_value = "timetable.json")]
        out_timetable: String,
    },
}

#[derive(Subcommand, Debug)]
enum CalendarCommand {
    /// Lister les jours feries polonais d'une annee
    Holidays { year: i32 },
}

#[derive(Subcommand, Debug)]
enum LimitsCommand {
    /// Suggerer des limites cibles pour une periode
    Suggest {
        #[arg(long)]
        doctors: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        start_month: u32,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct DoctorEntry {
    id: String,
    role: DoctorRoleEntry,
    #[serde(default)]
    no_optout: bool,
    #[serde(default)]
    saturday_rule: bool,
    #[serde(default)]
    target_limit: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DoctorRoleEntry {
    Fixed,
    Rotation,
}

fn load_doctors(path: &str) -> Result<(Vec<Doctor>, HashMap<DoctorId, u32>)> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    let entries: Vec<DoctorEntry> =
        serde_json::from_reader(file).with_context(|| format!("parsing {path}"))?;
    let mut doctors = Vec::with_capacity(entries.len());
    let mut limits = HashMap::with_capacity(entries.len());
    for entry in entries {
        let role = match entry.role {
            DoctorRoleEntry::Fixed => DoctorRole::Fixed,
            DoctorRoleEntry::Rotation => DoctorRole::Rotation,
        };
        let doctor = Doctor::new(entry.id.clone(), role)
            .with_no_optout(entry.no_optout)
            .with_saturday_rule(entry.saturday_rule);
        limits.insert(doctor.id.clone(), entry.target_limit);
        doctors.push(doctor);
    }
    Ok((doctors, limits))
}

fn default_period() -> (i32, u32) {
    let now = Utc::now();
    let month = now.month();
    let start_month = if month % 2 == 0 { month - 1 } else { month };
    (now.year(), start_month)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let store = FileCsvStore::open(&cli.store);

    let code = match cli.cmd {
        Commands::Prefs { cmd } => match cmd {
            PrefsCommand::Import { csv } => {
                let data = std::fs::read(&csv).with_context(|| format!("reading {csv}"))?;
                let table = load_csv(data.as_slice()).with_context(|| "parsing CSV")?;
                store.save(&table)?;
                println!("{} enregistrement(s) importe(s)", table.records().len());
                0
            }
            PrefsCommand::Export { csv } => {
                let table = store.load();
                let mut out = File::create(&csv).with_context(|| format!("creating {csv}"))?;
                save_csv(&mut out, &table)?;
                println!("{} enregistrement(s) exporte(s)", table.records().len());
                0
            }
        },
        Commands::Schedule { cmd } => match cmd {
            ScheduleCommand::Run {
                doctors,
                year,
                start_month,
                trials,
                seed,
                previous_tail,
                out_roster,
                out_timetable,
            } => {
                let (default_year, default_start_month) = default_period();
                let year = year.unwrap_or(default_year);
                let start_month = start_month.unwrap_or(default_start_month);
                let period = grafik::SettlementPeriod::new(year, start_month)
                    .map_err(CoreError::InvalidInput)?;
                let dates = period.dates();
                let (doctors, target_limits) = load_doctors(&doctors)?;
                let prefs = store.load().project();
                let previous_tail = previous_tail.map(DoctorId::new);
                let config = EngineConfig::new(doctors.clone())
                    .with_trials(trials)
                    .with_seed(seed);

                let result = OnCallEngine::run(
                    &dates,
                    &doctors,
                    &prefs,
                    &target_limits,
                    previous_tail.as_ref(),
                    period.start_date(),
                    &config,
                );

                let timetable = TimetableEngine::run(
                    &dates,
                    &doctors,
                    &result.roster,
                    &prefs,
                    previous_tail.as_ref(),
                    period.start_date(),
                );

                let roster_file = File::create(&out_roster)
                    .with_context(|| format!("creating {out_roster}"))?;
                to_writer_pretty(roster_file, &result.roster)?;

                let timetable_file = File::create(&out_timetable)
                    .with_context(|| format!("creating {out_timetable}"))?;
                let rendered: HashMap<String, HashMap<String, String>> = timetable
                    .cells
                    .iter()
                    .map(|(date, row)| {
                        let row = row
                            .iter()
                            .map(|(doc, cell)| (doc.as_str().to_string(), format!("{cell:?}")))
                            .collect();
                        (date.to_string(), row)
                    })
                    .collect();
                to_writer_pretty(timetable_file, &rendered)?;

                let unfilled = result.roster.unfilled_dates();
                if unfilled.is_empty() {
                    println!("Grafik genere : {} jours, score {}", dates.len(), result.score);
                    0
                } else {
                    eprintln!("{} jour(s) non pourvu(s) :", unfilled.len());
                    for date in &unfilled {
                        let reasons = result
                            .rejections
                            .get(date)
                            .map(|m| {
                                m.iter()
                                    .map(|(doc, tag)| format!("{doc}={tag}"))
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            })
                            .unwrap_or_default();
                        eprintln!("  {date}: {reasons}");
                    }
                    if !result.denied_fixed.is_empty() {
                        eprintln!("{} claim(s) FIXED refuse(s) :", result.denied_fixed.len());
                        for denied in &result.denied_fixed {
                            eprintln!(
                                "  {}: {} refuse au profit de {}",
                                denied.date, denied.doctor, denied.winner
                            );
                        }
                    }
                    2
                }
            }
        },
        Commands::Calendar { cmd } => match cmd {
            CalendarCommand::Holidays { year } => {
                for (date, name) in calendar::holidays(year) {
                    println!("{date} | {name}");
                }
                0
            }
        },
        Commands::Limits { cmd } => match cmd {
            LimitsCommand::Suggest {
                doctors,
                year,
                start_month,
            } => {
                let period = grafik::SettlementPeriod::new(year, start_month)
                    .map_err(CoreError::InvalidInput)?;
                let (doctors, fixed_counts_input) = load_doctors(&doctors)?;
                // target_limit n'est pas pertinent ici ; seul le role FIXED compte
                // pour les comptes deja reclames, que l'operateur fournit via
                // target_limit sur les medecins FIXED.
                let fixed_counts: HashMap<DoctorId, u32> = doctors
                    .iter()
                    .filter(|d| d.role == DoctorRole::Fixed)
                    .map(|d| {
                        let count = fixed_counts_input.get(&d.id).copied().unwrap_or(0);
                        (d.id.clone(), count)
                    })
                    .collect();
                let suggested =
                    suggest_target_limits(&doctors, &fixed_counts, period.dates().len() as u32);
                for doctor in &doctors {
                    println!("{} | {}", doctor.id, suggested.get(&doctor.id).copied().unwrap_or(0));
                }
                0
            }
        },
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

