use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clinical_query::config::{self, QueryConfig};
use clinical_query::db::{open_database, repository};
use clinical_query::models::{Appointment, AppointmentStatus, Interpretation, LabResult, Patient};
use clinical_query::query::summary::summarize_with;
use clinical_query::{QueryContext, QueryEngine, SqliteSource};
use rusqlite::Connection;

#[derive(Parser, Debug)]
#[command(
    name = "clinical-query",
    version,
    about = "Ask questions about a patient's structured health record."
)]
struct Args {
    /// Record store to open (created if missing).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Resolve relative dates against this day instead of today (YYYY-MM-DD).
    #[arg(long, global = true)]
    now: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a free-text question about one patient.
    Ask {
        #[arg(short, long)]
        patient: String,
        query: String,
        /// Print the full answer, including the record payload, as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the clinical summary for one patient.
    Summary {
        #[arg(short, long)]
        patient: String,
    },
    /// Register a new patient.
    AddPatient {
        #[arg(long)]
        id: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        gender: String,
        #[arg(long)]
        diagnosis: String,
        #[arg(long)]
        secondary_diagnosis: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        date_of_birth: Option<NaiveDate>,
    },
    /// Book an appointment, or record a completed one.
    AddAppointment {
        #[arg(short, long)]
        patient: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        time: String,
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        reason: String,
        /// "Scheduled" or "Completed".
        #[arg(long, default_value = "Scheduled")]
        status: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Record a lab result. The interpretation is derived from the
    /// reference range unless given.
    AddLab {
        #[arg(short, long)]
        patient: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        test: String,
        #[arg(long)]
        value: f64,
        #[arg(long)]
        unit: String,
        #[arg(long)]
        low: Option<f64>,
        #[arg(long)]
        high: Option<f64>,
        /// "Normal", "High" or "Low".
        #[arg(long)]
        interpretation: Option<String>,
    },
    /// List registered patients.
    ListPatients,
}

fn open_store(path: Option<PathBuf>) -> anyhow::Result<Connection> {
    let path = match path.or_else(config::default_database_path) {
        Some(path) => path,
        None => bail!("No --db given and no home directory to place the default store in"),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {}", parent.display()))?;
    }
    open_database(&path).with_context(|| format!("Cannot open record store {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    clinical_query::init_tracing();
    let args = Args::parse();

    let mut query_config = QueryConfig::from_env();
    if let Some(now) = args.now {
        query_config = query_config.with_reference_date(now);
    }

    let conn = open_store(args.db)?;

    match args.command {
        Command::Ask {
            patient,
            query,
            json,
        } => {
            let source = SqliteSource::new(&conn);
            let engine = QueryEngine::with_config(&source, query_config);
            let ctx = QueryContext::new(patient, engine.config().today());
            let answer = engine.answer(&ctx, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", answer.text);
            }
        }
        Command::Summary { patient } => {
            let source = SqliteSource::new(&conn);
            println!("{}", summarize_with(&source, &patient, &query_config));
        }
        Command::AddPatient {
            id,
            first_name,
            last_name,
            age,
            gender,
            diagnosis,
            secondary_diagnosis,
            allergies,
            date_of_birth,
        } => {
            let patient = Patient {
                patient_id: id,
                first_name,
                last_name,
                date_of_birth: date_of_birth.map(|d| d.to_string()),
                age,
                gender,
                primary_diagnosis: diagnosis,
                secondary_diagnosis,
                allergies,
                last_visit: None,
            };
            repository::insert_patient(&conn, &patient)
                .with_context(|| format!("Cannot register patient {}", patient.patient_id))?;
            println!("Registered {} ({})", patient.full_name(), patient.patient_id);
        }
        Command::AddAppointment {
            patient,
            date,
            time,
            doctor,
            reason,
            status,
            notes,
        } => {
            let status: AppointmentStatus = status.parse()?;
            let appointment = Appointment {
                id: 0,
                patient_id: patient,
                appointment_date: date.to_string(),
                appointment_time: time,
                doctor_name: doctor,
                reason,
                status,
                notes,
            };
            let id = repository::insert_appointment(&conn, &appointment).with_context(|| {
                format!("Cannot add appointment for {}", appointment.patient_id)
            })?;
            println!(
                "Added appointment #{id} on {} at {} ({status})",
                appointment.appointment_date, appointment.appointment_time
            );
        }
        Command::AddLab {
            patient,
            date,
            test,
            value,
            unit,
            low,
            high,
            interpretation,
        } => {
            let interpretation = match interpretation {
                Some(raw) => raw.parse()?,
                None => Interpretation::from_range(value, low, high),
            };
            let lab = LabResult {
                id: 0,
                patient_id: patient,
                result_date: date.to_string(),
                test_name: test,
                value,
                unit,
                reference_low: low,
                reference_high: high,
                interpretation,
            };
            let id = repository::insert_lab_result(&conn, &lab)
                .with_context(|| format!("Cannot add lab result for {}", lab.patient_id))?;
            println!("Added lab result #{id}: {} ({interpretation})", lab.test_name);
        }
        Command::ListPatients => {
            for patient in repository::list_patients(&conn)? {
                println!(
                    "{}\t{}\t{}y {}\t{}",
                    patient.patient_id,
                    patient.full_name(),
                    patient.age,
                    patient.gender,
                    patient.primary_diagnosis
                );
            }
        }
    }

    Ok(())
}
