use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_timetable::config::{ExamConfig, TimetableConfig};
use u_timetable::models::{Course, ExamCourse, Faculty, Invigilator, Room};
use u_timetable::scheduler::{exam_dates, ClassScheduler, ExamKpi, ExamScheduler, TimetableKpi};

/// Class timetable and exam schedule generator (JSON in, JSON out).
#[derive(Debug, Parser)]
#[command(name = "u-timetable", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the class timetable for both semester halves.
    Class {
        /// Request file (`-` for stdin).
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
        /// Seed for the random sampler (overrides the request).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate the exam schedule.
    Exam {
        /// Request file (`-` for stdin).
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
    /// List the exam dates of a range.
    Dates {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Weekly day with no exams.
        #[arg(long, default_value = "Sun")]
        rest_day: Weekday,
    },
}

#[derive(Debug, Deserialize)]
struct ClassRequest {
    #[serde(default)]
    config: TimetableConfig,
    courses: Vec<Course>,
    faculty: Vec<Faculty>,
    rooms: Vec<Room>,
}

#[derive(Debug, Deserialize)]
struct ExamRequest {
    #[serde(default)]
    config: ExamConfig,
    courses: Vec<ExamCourse>,
    invigilators: Vec<Invigilator>,
    rooms: Vec<Room>,
    start: NaiveDate,
    end: NaiveDate,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let output = match args.command {
        Command::Class { input, seed } => {
            let mut request: ClassRequest = read_request(&input)?;
            if let Some(seed) = seed {
                request.config.seed = Some(seed);
            }
            let mut scheduler = ClassScheduler::new(request.config);
            let timetable = scheduler
                .schedule(&request.courses, &request.faculty, &request.rooms)
                .context("class timetable rejected")?;

            let kpi = TimetableKpi::calculate(
                &timetable,
                &request.rooms,
                scheduler.catalog(),
                &scheduler.config().days,
            );
            info!(
                placement_rate = kpi.placement_rate,
                room_utilization = kpi.avg_room_utilization,
                "timetable KPIs"
            );
            to_json(&timetable, args.pretty)?
        }
        Command::Exam { input } => {
            let request: ExamRequest = read_request(&input)?;
            let schedule = ExamScheduler::new(request.config)
                .schedule_range(
                    &request.courses,
                    &request.invigilators,
                    &request.rooms,
                    request.start,
                    request.end,
                )
                .context("exam schedule rejected")?;

            let kpi = ExamKpi::calculate(&schedule, &request.invigilators);
            info!(
                completion_rate = kpi.completion_rate,
                dates_used = kpi.dates_used,
                duty_spread = kpi.duty_spread,
                "exam KPIs"
            );
            to_json(&schedule, args.pretty)?
        }
        Command::Dates {
            start,
            end,
            rest_day,
        } => {
            let config = ExamConfig::default().with_rest_day(rest_day);
            let dates = exam_dates(start, end, &config)?;
            to_json(&dates, args.pretty)?
        }
    };

    println!("{output}");
    Ok(())
}

fn read_request<T: for<'de> Deserialize<'de>>(input: &Path) -> Result<T> {
    let text = if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };
    serde_json::from_str(&text).context("malformed request JSON")
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
