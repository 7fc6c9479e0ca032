use campus_leads::catalog::{Catalog, IntakeCalendar};
use campus_leads::config::AppConfig;
use campus_leads::error::AppError;
use campus_leads::leads::{
    format_fee_range, Brochure, DirectorySink, HttpIntakeGateway, LeadFormSession, SubmitOutcome,
};
use campus_leads::telemetry;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct BrochureArgs {
    /// Institution slug, e.g. apex-university
    #[arg(long)]
    pub(crate) slug: String,
    /// Directory to write the brochure into
    #[arg(long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// Institution slug, e.g. apex-university
    #[arg(long)]
    pub(crate) slug: String,
    #[arg(long)]
    pub(crate) full_name: String,
    #[arg(long)]
    pub(crate) email: String,
    /// Ten-digit mobile number
    #[arg(long)]
    pub(crate) phone: String,
    #[arg(long)]
    pub(crate) state: String,
    /// Course name (defaults to the institution's first course)
    #[arg(long)]
    pub(crate) course: Option<String>,
    /// Intake year (defaults to the current year)
    #[arg(long)]
    pub(crate) intake_year: Option<String>,
    /// Agree to receive information about the programme
    #[arg(long)]
    pub(crate) consent: bool,
    /// Download directory for the brochure (defaults to BROCHURE_DOWNLOAD_DIR)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
}

pub(crate) fn run_catalog() -> Result<(), AppError> {
    let catalog = Catalog::standard();
    let calendar = IntakeCalendar::for_date(Local::now().date_naive());

    println!("Institutions");
    for institution in catalog.institutions() {
        println!(
            "\n{} ({})\n  Location: {}",
            institution.name, institution.slug, institution.location
        );
        for course in &institution.courses {
            println!(
                "  - {} [{}] {}",
                course.name,
                course.duration,
                format_fee_range(&course.fee_range)
            );
        }
    }
    println!("\nIntake years: {}", calendar.years().join(", "));

    Ok(())
}

pub(crate) fn run_brochure(args: BrochureArgs) -> Result<(), AppError> {
    let institution = Catalog::standard().get(&args.slug)?;
    let sink = DirectorySink::new(args.out_dir);
    let path = sink.save(&Brochure::for_institution(&institution))?;

    println!("Brochure for {} written to {}", institution.name, path.display());
    Ok(())
}

pub(crate) async fn run_apply(args: ApplyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let institution = Catalog::standard().get(&args.slug)?;
    let gateway = HttpIntakeGateway::from_config(&config.intake)?;
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| config.intake.download_dir.clone());
    let session = LeadFormSession::new(
        institution,
        IntakeCalendar::for_date(Local::now().date_naive()),
        config.intake.status_reset,
        Arc::new(gateway),
        Arc::new(DirectorySink::new(out_dir)),
    );

    session.update_draft(|draft| {
        draft.full_name = args.full_name;
        draft.email = args.email;
        draft.phone = args.phone;
        draft.state = args.state;
        if let Some(course) = args.course {
            draft.course = course;
        }
        if let Some(year) = args.intake_year {
            draft.intake_year = year;
        }
        draft.consent = args.consent;
    })?;

    let outcome = session.submit().await?;
    let message = session.message().unwrap_or_default();
    session.close();

    println!("Lead for {}", session.institution().name);
    match outcome {
        SubmitOutcome::Accepted { brochure } => {
            println!("  {message}");
            match brochure {
                Some(location) => println!("  Brochure: {location}"),
                None => println!("  Brochure could not be saved; see logs"),
            }
        }
        SubmitOutcome::Invalid(failure) => println!("  Rejected: {failure}"),
        SubmitOutcome::NotConfigured | SubmitOutcome::Failed | SubmitOutcome::Discarded => {
            println!("  {message}")
        }
    }

    Ok(())
}
