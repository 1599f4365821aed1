#![cfg(feature = "cli")]
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, LevelFilter};

use rskdm::dcp::{DcpCreator, DCPOMATIC_CLI};
use rskdm::kdm::{
    DkdmKdmRequest, DkdmRequest, KdmGenerator, KdmRequest, KdmType, DCPOMATIC_KDM_CLI,
};
use rskdm::runner::CliResult;
use rskdm::validity::{parse_datetime, ValidityWindow};

#[derive(Parser)]
#[command(
    name = "rskdm",
    version,
    disable_version_flag = true,
    about = "rskdm - wrapper for the DCP-o-matic CLI tools"
)]
struct Cli {
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue)]
    version: bool,

    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// DCP creation commands.
    #[command(subcommand)]
    Dcp(DcpCommands),
    /// KDM generation commands.
    #[command(subcommand)]
    Kdm(KdmCommands),
}

#[derive(Subcommand)]
enum DcpCommands {
    /// Create a DCP from a DCP-o-matic project.
    ///
    /// PROJECT is the path to a .dcp project file or project directory.
    Create {
        project: PathBuf,
        /// Output directory for the DCP.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        /// Encrypt the DCP.
        #[arg(short = 'e', long = "encrypt", action = ArgAction::SetTrue)]
        encrypt: bool,
        #[command(flatten)]
        binary: DcpBinary,
    },
    /// Show dcpomatic2_cli version.
    Version {
        #[command(flatten)]
        binary: DcpBinary,
    },
}

#[derive(Subcommand)]
enum KdmCommands {
    /// Generate a KDM for an encrypted DCP.
    ///
    /// DCP is the path to the encrypted DCP directory.
    Generate {
        dcp: PathBuf,
        /// Path to the target certificate (.pem).
        #[arg(short = 'c', long = "certificate")]
        certificate: PathBuf,
        #[command(flatten)]
        common: KdmArgs,
        /// Cinema name for the KDM.
        #[arg(long = "cinema-name")]
        cinema_name: Option<String>,
        /// Screen name for the KDM.
        #[arg(long = "screen-name")]
        screen_name: Option<String>,
        #[command(flatten)]
        binary: KdmBinary,
    },
    /// Generate a KDM from a DKDM (Distribution KDM).
    ///
    /// DKDM is the path to the DKDM file.
    GenerateDkdm {
        dkdm: PathBuf,
        /// Path to the target certificate (.pem).
        #[arg(short = 'c', long = "certificate")]
        certificate: PathBuf,
        #[command(flatten)]
        common: KdmArgs,
        #[command(flatten)]
        binary: KdmBinary,
    },
    /// Create a DKDM from a DCP-o-matic project.
    ///
    /// PROJECT is the project folder used to create the encrypted DCP. The
    /// certificate should be your own, so that KDMs for other recipients can
    /// later be derived from the DKDM.
    CreateDkdm {
        project: PathBuf,
        /// Path to your own certificate (.pem), the one matching your decryption key.
        #[arg(short = 'c', long = "certificate")]
        certificate: PathBuf,
        #[command(flatten)]
        common: KdmArgs,
        #[command(flatten)]
        binary: KdmBinary,
    },
    /// Show dcpomatic2_kdm_cli version.
    Version {
        #[command(flatten)]
        binary: KdmBinary,
    },
}

#[derive(Args)]
struct KdmArgs {
    /// Output path for the KDM file.
    #[arg(short = 'o', long = "output")]
    output: PathBuf,
    /// Start of validity period (YYYY-MM-DD or YYYY-MM-DD HH:MM).
    #[arg(short = 'f', long = "valid-from", value_parser = parse_datetime)]
    valid_from: NaiveDateTime,
    /// End of validity period (YYYY-MM-DD or YYYY-MM-DD HH:MM).
    #[arg(short = 't', long = "valid-to", value_parser = parse_datetime)]
    valid_to: NaiveDateTime,
    /// KDM output format type (modified-transitional-1, dci-any, dci-specific).
    #[arg(short = 'K', long = "kdm-type", default_value_t = KdmType::default())]
    kdm_type: KdmType,
}

impl KdmArgs {
    fn validity(&self) -> ValidityWindow {
        ValidityWindow::new(self.valid_from, self.valid_to)
    }
}

#[derive(Args)]
struct DcpBinary {
    /// Path to dcpomatic2_cli binary.
    #[arg(long = "bin-path", env = "DCPOMATIC_CLI")]
    bin_path: Option<PathBuf>,
}

#[derive(Args)]
struct KdmBinary {
    /// Path to dcpomatic2_kdm_cli binary.
    #[arg(long = "bin-path", env = "DCPOMATIC_KDM_CLI")]
    bin_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if cli.version {
        println!("rskdm {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match cli.command {
        Some(Commands::Dcp(DcpCommands::Create {
            project,
            output,
            encrypt,
            binary,
        })) => run_dcp_create(
            &project,
            output.as_deref(),
            encrypt,
            binary.bin_path.as_deref(),
        ),
        Some(Commands::Dcp(DcpCommands::Version { binary })) => {
            let creator = dcp_creator(binary.bin_path.as_deref())?;
            println!("{}", creator.version()?);
            Ok(())
        }
        Some(Commands::Kdm(KdmCommands::Generate {
            dcp,
            certificate,
            common,
            cinema_name,
            screen_name,
            binary,
        })) => {
            let request = KdmRequest {
                dcp,
                certificate,
                validity: common.validity(),
                output: common.output,
                kdm_type: common.kdm_type,
                cinema_name,
                screen_name,
            };
            let generator = kdm_generator(binary.bin_path.as_deref())?;
            report("KDM", &generator.generate(&request)?);
            Ok(())
        }
        Some(Commands::Kdm(KdmCommands::GenerateDkdm {
            dkdm,
            certificate,
            common,
            binary,
        })) => {
            let request = DkdmKdmRequest {
                dkdm,
                certificate,
                validity: common.validity(),
                output: common.output,
                kdm_type: common.kdm_type,
            };
            let generator = kdm_generator(binary.bin_path.as_deref())?;
            report("KDM", &generator.generate_from_dkdm(&request)?);
            Ok(())
        }
        Some(Commands::Kdm(KdmCommands::CreateDkdm {
            project,
            certificate,
            common,
            binary,
        })) => {
            let request = DkdmRequest {
                project,
                certificate,
                validity: common.validity(),
                output: common.output,
                kdm_type: common.kdm_type,
            };
            let generator = kdm_generator(binary.bin_path.as_deref())?;
            report("DKDM", &generator.create_dkdm(&request)?);
            Ok(())
        }
        Some(Commands::Kdm(KdmCommands::Version { binary })) => {
            let generator = kdm_generator(binary.bin_path.as_deref())?;
            println!("{}", generator.version()?);
            Ok(())
        }
        None => Ok(()),
    }
}

fn run_dcp_create(
    project: &Path,
    output: Option<&Path>,
    encrypt: bool,
    bin_path: Option<&Path>,
) -> anyhow::Result<()> {
    let creator = dcp_creator(bin_path)?;
    let result = creator.create(project, output, encrypt)?;
    report("DCP", &result);
    Ok(())
}

fn dcp_creator(bin_path: Option<&Path>) -> anyhow::Result<DcpCreator> {
    let creator = DcpCreator::new(bin_path)
        .with_context(|| format!("Failed to locate {}", DCPOMATIC_CLI))?;
    debug!("Using {}", creator.runner().binary_path().display());
    Ok(creator)
}

fn kdm_generator(bin_path: Option<&Path>) -> anyhow::Result<KdmGenerator> {
    let generator = KdmGenerator::new(bin_path)
        .with_context(|| format!("Failed to locate {}", DCPOMATIC_KDM_CLI))?;
    debug!("Using {}", generator.runner().binary_path().display());
    Ok(generator)
}

fn report(what: &str, result: &CliResult) {
    println!(
        "{} created successfully at: {}",
        what,
        result.output_path.display()
    );
    if !result.stdout.is_empty() {
        println!("{}", result.stdout);
    }
}
