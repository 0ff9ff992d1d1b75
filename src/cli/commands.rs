use anyhow::{anyhow, Result};
use colored::Colorize;
use std::time::Duration;
use tracing::warn;

use crate::{
    app::init_config,
    constants::LOGOUT_GRACE_SECS,
    models::{
        Appointment, AppointmentStatus, DoctorRegistration, Medicine, NewPrescription, Profile,
        ThemeMode, UiState,
    },
    session::SessionContext,
    viewmodels::{AppointmentsViewModel, AuthViewModel, PrescriptionViewModel, ProfileViewModel},
};

use super::{Commands, RegisterArgs};

/// Run a subcommand against the session
pub async fn handle_command(command: Commands, ctx: SessionContext) -> Result<()> {
    match command {
        Commands::Init => {
            match init_config()? {
                Some(path) => println!("Created default configuration at: {}", path.display()),
                None => println!("Configuration already exists"),
            }
            Ok(())
        }
        Commands::Login { email, password } => {
            let vm = AuthViewModel::new(ctx);
            let state = vm.login(&email, &password).await;
            report_auth(state, "Signed in")
        }
        Commands::Register(args) => {
            let vm = AuthViewModel::new(ctx);
            let state = vm.register_doctor(&registration_from(args)).await;
            report_auth(state, "Registered")
        }
        Commands::Profile => show_profile(ctx).await,
        Commands::Appointments { status } => show_appointments(ctx, status).await,
        Commands::Prescribe {
            appointment,
            patient,
            medicines,
            notes,
        } => {
            let medicines = medicines
                .iter()
                .map(|m| m.parse::<Medicine>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| anyhow!(e))?;
            let prescription = NewPrescription {
                appointment_id: appointment,
                patient_id: patient,
                medicines,
                notes,
            };
            let vm = PrescriptionViewModel::new(ctx);
            match vm.submit(&prescription).await {
                UiState::Success(()) => {
                    println!("{} Prescription saved", "✓".green());
                    Ok(())
                }
                UiState::Error(msg) => Err(anyhow!(msg)),
                UiState::Loading => Ok(()),
            }
        }
        Commands::Logout => {
            sign_out(&ctx, Duration::from_secs(LOGOUT_GRACE_SECS)).await?;
            println!("Signed out");
            Ok(())
        }
        Commands::Theme { mode } => {
            if let Some(mode) = mode {
                let mode: ThemeMode = mode.parse().map_err(|e: String| anyhow!(e))?;
                ctx.set_theme_mode(mode)?;
            }
            println!("Theme: {}", ctx.theme_mode().to_string().cyan());
            Ok(())
        }
        Commands::Status => {
            show_status(&ctx);
            Ok(())
        }
    }
}

/// Clear the local session, then give the server call up to `grace` to land
///
/// Returns whether the server-side call finished in time. The process exits
/// right after, which would otherwise cancel the background request.
async fn sign_out(ctx: &SessionContext, grace: Duration) -> Result<bool> {
    let Some(pending) = ctx.logout()? else {
        return Ok(false);
    };
    match tokio::time::timeout(grace, pending).await {
        Ok(Ok(())) => Ok(true),
        Ok(Err(e)) => {
            warn!("Server-side logout task failed: {}", e);
            Ok(false)
        }
        Err(_) => {
            warn!("Server-side logout still pending after {:?}, giving up", grace);
            Ok(false)
        }
    }
}

fn registration_from(args: RegisterArgs) -> DoctorRegistration {
    DoctorRegistration {
        name: args.name,
        email: args.email,
        password: args.password,
        specialization: args.specialization,
        qualification: args.qualification,
        experience: args.experience,
        fee: args.fee,
        address: args.address,
        phone: args.phone,
    }
}

fn report_auth(state: UiState<Profile>, verb: &str) -> Result<()> {
    match state {
        UiState::Success(profile) => {
            println!("{} {} as {}", "✓".green(), verb, profile.display_name().bold());
            Ok(())
        }
        UiState::Error(msg) => Err(anyhow!(msg)),
        UiState::Loading => Ok(()),
    }
}

async fn show_profile(ctx: SessionContext) -> Result<()> {
    if !ctx.is_logged_in() {
        return Err(anyhow!("Not signed in. Run `clinicdesk login` first"));
    }

    let vm = ProfileViewModel::init(ctx).await;
    match vm.state() {
        UiState::Success(profile) => {
            print_profile(&profile);
            if let Some(err) = vm.last_error() {
                println!("{} showing cached profile ({})", "!".yellow(), err.dimmed());
            }
            Ok(())
        }
        UiState::Error(msg) => Err(anyhow!("{} (run the command again to retry)", msg)),
        UiState::Loading => Ok(()),
    }
}

async fn show_appointments(ctx: SessionContext, status: Option<String>) -> Result<()> {
    if !ctx.is_logged_in() {
        return Err(anyhow!("Not signed in. Run `clinicdesk login` first"));
    }

    let vm = AppointmentsViewModel::init(ctx).await;
    let list = match (vm.state(), status) {
        (UiState::Error(msg), _) => return Err(anyhow!(msg)),
        (UiState::Loading, _) => return Ok(()),
        (UiState::Success(_), Some(status)) => {
            vm.with_status(AppointmentStatus::from(status))
        }
        (UiState::Success(list), None) => list,
    };

    if list.is_empty() {
        println!("No appointments");
        return Ok(());
    }
    for appointment in &list {
        println!("{}", format_appointment(appointment));
    }
    Ok(())
}

fn show_status(ctx: &SessionContext) {
    let session = ctx.snapshot();
    println!("clinicdesk v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = ctx.store().path() {
        println!("  Store:   {}", path.display());
    }
    if session.is_logged_in() {
        println!("  Session: {}", "signed in".green());
    } else {
        println!("  Session: {}", "signed out".yellow());
    }
    match &session.cached_profile {
        Some(profile) => println!("  Profile: {}", profile.display_name()),
        None => println!("  Profile: {}", "not cached".dimmed()),
    }
    println!("  Theme:   {}", session.theme_mode);
}

fn print_profile(profile: &Profile) {
    println!("{}", profile.name.bold());
    println!("  Email:          {}", profile.email);
    let optional = [
        ("Specialization", profile.specialization.clone()),
        ("Qualification", profile.qualification.clone()),
        ("Experience", profile.experience.map(|y| format!("{} years", y))),
        ("Fee", profile.fee.map(|f| format!("{:.2}", f))),
        ("Address", profile.address.clone()),
        ("Bio", profile.bio.clone()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("  {:<15} {}", format!("{}:", label), value);
        }
    }
}

fn format_appointment(appointment: &Appointment) -> String {
    let status = match appointment.status {
        AppointmentStatus::Confirmed => appointment.status.to_string().green(),
        AppointmentStatus::Completed => appointment.status.to_string().blue(),
        AppointmentStatus::Cancelled => appointment.status.to_string().red(),
        AppointmentStatus::Pending => appointment.status.to_string().yellow(),
    };
    format!(
        "{} {:<8} {:<24} {:<10} {}",
        appointment.date,
        appointment.time_slot,
        appointment.patient_name,
        status,
        appointment.id.dimmed()
    )
}
