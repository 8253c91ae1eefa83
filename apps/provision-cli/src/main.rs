use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use db_infra::{
    orchestrate_provisioning, ProvisionError, ProvisionReport, ProvisionRequest, USAGE_EXIT_CODE,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "provision")]
#[command(about = "Create an isolated MongoDB database with reader and writer accounts")]
struct Args {
    /// Project name; derives <name>_db, <name>_reader and <name>_writer
    project_name: String,

    /// Drop and recreate the project's accounts if they already exist
    #[arg(short, long)]
    force: bool,

    /// Root configuration file (ROOT_NAME, ROOT_PASSWORD, PORT, HOST)
    #[arg(short, long, env = "PROVISION_CONFIG", default_value = ".env")]
    config: PathBuf,

    /// Directory for <name>.env and <name>.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

impl Args {
    fn into_request(self) -> ProvisionRequest {
        ProvisionRequest {
            project_name: self.project_name,
            force: self.force,
            config_path: self.config,
            output_dir: self.output_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mongodb=warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter(filter)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(USAGE_EXIT_CODE);
        }
    };

    match orchestrate_provisioning(&args.into_request()).await {
        Ok(report) => print_summary(&report),
        Err(e) => {
            error!("❌ {e}");
            let guidance = e.guidance();
            if !guidance.is_empty() {
                warn!("To resolve this, either:");
                for line in guidance {
                    warn!("  • {line}");
                }
            }
            if matches!(e, ProvisionError::Usage { .. }) {
                eprintln!("Usage: provision <PROJECT_NAME> [--force|-f]");
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn print_summary(report: &ProvisionReport) {
    let record = &report.record;
    if !report.replaced.is_empty() {
        info!("replaced existing accounts: {}", report.replaced.join(", "));
    }
    info!("✅ Project '{}' provisioned", report.project.name());

    println!("Database:      {}", record.database);
    println!(
        "Reader:        {} ({})",
        record.reader.username,
        db_infra::AccountRole::Read
    );
    println!(
        "Writer:        {} ({})",
        record.writer.username,
        db_infra::AccountRole::ReadWrite
    );
    println!("Env file:      {}", report.files.env_path.display());
    println!("JSON file:     {}", report.files.json_path.display());
    println!();
    print!("{}", record.to_env());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_is_required() {
        let err = Args::try_parse_from(["provision"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["provision", "alpha"]).unwrap();
        assert_eq!(args.project_name, "alpha");
        assert!(!args.force);
        assert_eq!(args.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_force_short_and_long() {
        for flag in ["-f", "--force"] {
            let args = Args::try_parse_from(["provision", "alpha", flag]).unwrap();
            assert!(args.force, "{flag}");
        }
        let args = Args::try_parse_from(["provision", "--force", "alpha"]).unwrap();
        assert!(args.force);
    }

    #[test]
    fn test_into_request_carries_paths() {
        let args = Args::try_parse_from([
            "provision",
            "alpha",
            "--config",
            "/etc/mongo/root.env",
            "-o",
            "/tmp/out",
        ])
        .unwrap();
        let request = args.into_request();
        assert_eq!(request.project_name, "alpha");
        assert_eq!(request.config_path, PathBuf::from("/etc/mongo/root.env"));
        assert_eq!(request.output_dir, PathBuf::from("/tmp/out"));
        assert!(!request.force);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = Args::try_parse_from(["provision", "alpha", "--drop-everything"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
