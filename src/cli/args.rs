use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clinicdesk")]
#[command(version)]
#[command(about = "Manage your doctor profile, appointments and prescriptions", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "CLINICDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the backend API root
    #[arg(long, env = "CLINICDESK_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init,
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "CLINICDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a doctor account
    Register(RegisterArgs),
    /// Show the cached profile and refresh it from the backend
    Profile,
    /// List appointments
    Appointments {
        /// Only show appointments with this status
        #[arg(long)]
        status: Option<String>,
    },
    /// Write a prescription for an appointment
    Prescribe {
        #[arg(long)]
        appointment: String,
        #[arg(long)]
        patient: String,
        /// name|dosage|frequency|duration (repeatable)
        #[arg(short, long = "medicine", required = true)]
        medicines: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Sign out and clear the cached profile
    Logout,
    /// Show or set the theme (light, dark, system)
    Theme { mode: Option<String> },
    /// Show the local session
    Status,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "CLINICDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub specialization: Option<String>,
    #[arg(long)]
    pub qualification: Option<String>,
    /// Years of experience
    #[arg(long)]
    pub experience: Option<u32>,
    /// Consultation fee
    #[arg(long)]
    pub fee: Option<f64>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prescribe_with_repeated_medicines() {
        let cli = Cli::try_parse_from([
            "clinicdesk",
            "prescribe",
            "--appointment",
            "apt-1",
            "--patient",
            "pat-1",
            "-m",
            "Paracetamol|500mg",
            "-m",
            "Cetirizine",
        ])
        .unwrap();

        match cli.command {
            Commands::Prescribe { medicines, .. } => assert_eq!(medicines.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_theme_mode_is_optional() {
        let cli = Cli::try_parse_from(["clinicdesk", "theme"]).unwrap();
        assert!(matches!(cli.command, Commands::Theme { mode: None }));
    }
}
