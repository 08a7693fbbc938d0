#![forbid(unsafe_code)]
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use creneau::{
    io,
    model::{AppointmentId, BranchId, StaffId, TimeSlot},
    notification::{prepare_reminder, TextReminder},
    planner::{Planner, SlotOptions},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planification salon (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'annuaire
    #[arg(long, global = true, default_value = "directory.json")]
    directory: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des membres depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Importer des rendez-vous depuis un CSV
    ImportAppointments {
        #[arg(long)]
        csv: String,
    },

    /// Réserver un rendez-vous (validé contre disponibilité et horaires)
    Book {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        branch: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
    },

    /// Annuler un rendez-vous
    Cancel {
        #[arg(long)]
        appointment_id: String,
    },

    /// Journée effective d'un membre (congés > exception > récurrent)
    Resolve {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        date: String,
    },

    /// Horaires effectifs d'une succursale
    BranchHours {
        #[arg(long)]
        branch: String,
        #[arg(long)]
        date: String,
    },

    /// Créneaux réservables pour une prestation
    Slots {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        date: String,
        /// Durée de la prestation en minutes
        #[arg(long, default_value_t = 30)]
        duration: u16,
        /// Pas entre débuts candidats en minutes
        #[arg(long, default_value_t = 15)]
        interval: u16,
    },

    /// Vérifier les conflits inter-succursales (par date, ou sur le motif
    /// hebdomadaire si --date est omis)
    Check {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        date: Option<String>,
        /// Créneaux proposés "HH:MM-HH:MM,..." ; défaut: journée résolue
        #[arg(long)]
        slots: Option<String>,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Valider des créneaux contre les horaires de la succursale
    Validate {
        #[arg(long)]
        branch: String,
        #[arg(long)]
        date: String,
        /// Créneaux "HH:MM-HH:MM,..."
        #[arg(long)]
        slots: String,
    },

    /// Taux d'occupation d'un membre sur une journée
    Utilization {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        date: String,
    },

    /// Matérialiser les affectations d'un membre sur une plage de dates
    /// (remplace celles déjà présentes sur la plage)
    Materialize {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Lister et optionnellement exporter les rendez-vous
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Générer un rappel texte pour un membre
    Notify {
        #[arg(long)]
        handle: String,
        #[arg(long, default_value_t = 2)]
        days_before: i64,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid date: {raw} (expected YYYY-MM-DD)"))
}

fn parse_slots(raw: &str) -> Result<Vec<TimeSlot>> {
    raw.split(',')
        .map(|chunk| chunk.trim())
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| chunk.parse::<TimeSlot>().map_err(anyhow::Error::from))
        .collect()
}

fn staff_id(planner: &Planner, handle: &str) -> Result<StaffId> {
    planner
        .directory()
        .find_staff_by_handle(handle)
        .map(|s| s.id.clone())
        .ok_or_else(|| anyhow!("unknown staff: {handle}"))
}

fn branch_id(planner: &Planner, name: &str) -> Result<BranchId> {
    planner
        .directory()
        .find_branch_by_name(name)
        .map(|b| b.id.clone())
        .ok_or_else(|| anyhow!("unknown branch: {name}"))
}

fn branch_label(planner: &Planner, id: &BranchId) -> String {
    planner
        .directory()
        .find_branch_by_id(id)
        .map(|b| b.name.clone())
        .unwrap_or_else(|| id.as_str().to_string())
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn fmt_slots(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.directory)?;
    let mut planner = match storage.load() {
        Ok(d) => {
            let mut p = Planner::new();
            *p.directory_mut() = d;
            p
        }
        Err(_) => Planner::new(),
    };

    let code = match cli.cmd {
        Commands::ImportStaff { csv } => {
            let staff = io::import_staff_csv(csv)?;
            planner.add_staff(staff);
            storage.save(planner.directory())?;
            0
        }
        Commands::ImportAppointments { csv } => {
            let appointments = io::import_appointments_csv(csv, planner.directory())?;
            planner.add_appointments(appointments);
            storage.save(planner.directory())?;
            0
        }
        Commands::Book {
            staff,
            branch,
            date,
            start,
            end,
        } => {
            let sid = staff_id(&planner, &staff)?;
            let bid = branch_id(&planner, &branch)?;
            let date = parse_date(&date)?;
            let id = planner.book_appointment(&sid, &bid, date, start.parse()?, end.parse()?)?;
            storage.save(planner.directory())?;
            println!("Booked appointment {}", id.as_str());
            0
        }
        Commands::Cancel { appointment_id } => {
            planner.cancel_appointment(&AppointmentId::new(appointment_id))?;
            storage.save(planner.directory())?;
            0
        }
        Commands::Resolve {
            staff,
            branch,
            date,
        } => {
            let sid = staff_id(&planner, &staff)?;
            let bid = branch_id(&planner, &branch)?;
            let day = planner.resolve_staff_day(&sid, &bid, parse_date(&date)?)?;
            if day.slots.is_empty() {
                println!("{}", day.kind);
            } else {
                println!("{} {}", day.kind, fmt_slots(&day.slots));
            }
            0
        }
        Commands::BranchHours { branch, date } => {
            let bid = branch_id(&planner, &branch)?;
            let day = planner.resolve_branch_day(&bid, parse_date(&date)?)?;
            if day.slots.is_empty() {
                println!("{}", day.kind);
            } else {
                println!("{} {}", day.kind, fmt_slots(&day.slots));
            }
            0
        }
        Commands::Slots {
            staff,
            branch,
            date,
            duration,
            interval,
        } => {
            let sid = staff_id(&planner, &staff)?;
            let bid = branch_id(&planner, &branch)?;
            let opts = SlotOptions {
                interval_minutes: interval,
            };
            let slots =
                planner.available_slots(&sid, &bid, parse_date(&date)?, duration, opts)?;
            for slot in &slots {
                println!("{slot}");
            }
            0
        }
        Commands::Check {
            staff,
            branch,
            date,
            slots,
            report,
        } => {
            let sid = staff_id(&planner, &staff)?;
            let bid = branch_id(&planner, &branch)?;

            // lignes: scope, succursale, proposé, existant, minutes
            let rows: Vec<[String; 5]> = match date {
                Some(raw) => {
                    let date = parse_date(&raw)?;
                    let proposed = match slots {
                        Some(raw) => parse_slots(&raw)?,
                        None => planner.resolve_staff_day(&sid, &bid, date)?.slots,
                    };
                    planner
                        .date_conflicts(&sid, &bid, date, &proposed)?
                        .iter()
                        .map(|c| {
                            [
                                date.to_string(),
                                branch_label(&planner, &c.branch),
                                c.proposed.to_string(),
                                c.existing.to_string(),
                                c.overlap_minutes.to_string(),
                            ]
                        })
                        .collect()
                }
                None => {
                    let schedule = planner
                        .directory()
                        .find_schedule(&sid, &bid)
                        .ok_or_else(|| anyhow!("no weekly schedule for {staff} at {branch}"))?;
                    planner
                        .weekly_conflicts(&sid, &bid, &schedule.week)?
                        .iter()
                        .map(|c| {
                            [
                                day_name(c.weekday).to_string(),
                                branch_label(&planner, &c.branch),
                                c.proposed.to_string(),
                                c.existing.to_string(),
                                c.overlap_minutes.to_string(),
                            ]
                        })
                        .collect()
                }
            };

            if rows.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", rows.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["scope", "branch", "proposed", "existing", "overlap_minutes"])?;
                    for row in &rows {
                        w.write_record(row)?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Validate {
            branch,
            date,
            slots,
        } => {
            let bid = branch_id(&planner, &branch)?;
            let proposed = parse_slots(&slots)?;
            match planner.validate_staff_against_branch_hours(&bid, parse_date(&date)?, &proposed)? {
                Some(message) => {
                    eprintln!("{message}");
                    2
                }
                None => {
                    println!("OK: within branch hours");
                    0
                }
            }
        }
        Commands::Utilization {
            staff,
            branch,
            date,
        } => {
            let sid = staff_id(&planner, &staff)?;
            let bid = branch_id(&planner, &branch)?;
            let m = planner.utilization(&sid, &bid, parse_date(&date)?)?;
            println!(
                "{} | booked {} / available {} min | {}%",
                m.status, m.booked_minutes, m.available_minutes, m.percentage
            );
            0
        }
        Commands::Materialize {
            staff,
            branch,
            from,
            to,
        } => {
            let sid = staff_id(&planner, &staff)?;
            let bid = branch_id(&planner, &branch)?;
            let count = planner.materialize(&sid, &bid, parse_date(&from)?, parse_date(&to)?)?;
            storage.save(planner.directory())?;
            println!("Materialized {count} assignment(s)");
            0
        }
        Commands::List { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_directory_json(path, planner.directory())?;
            }
            if let Some(path) = out_csv {
                io::export_appointments_csv(path, planner.directory())?;
            }
            // impression compacte
            for a in &planner.directory().appointments {
                let handle = planner
                    .directory()
                    .find_staff_by_id(&a.staff_id)
                    .map(|s| s.handle.as_str())
                    .unwrap_or("-");
                let branch = planner
                    .directory()
                    .find_branch_by_id(&a.branch_id)
                    .map(|b| b.name.as_str())
                    .unwrap_or("-");
                println!(
                    "{} | {} {}-{} | {} @ {} | {}",
                    a.id.as_str(),
                    a.date,
                    a.start,
                    a.end,
                    handle,
                    branch,
                    a.status
                );
            }
            0
        }
        Commands::Notify {
            handle,
            days_before,
            out,
        } => {
            let renderer = TextReminder;
            let today = chrono::Local::now().date_naive();
            let reminder =
                prepare_reminder(planner.directory(), &handle, days_before, today, &renderer)?;
            std::fs::write(&out, reminder.content)?;
            println!(
                "Reminder generated for {} (appointment {}) on {}",
                reminder.staff_handle, reminder.appointment_id, reminder.notice_on
            );
            0
        }
    };

    std::process::exit(code);
}
