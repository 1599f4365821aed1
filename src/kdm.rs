//! KDM module wrapping `dcpomatic2_kdm_cli`.
//!
//! Three operations share the same binary:
//! - [`KdmGenerator::generate`] issues a KDM for an encrypted DCP directory.
//! - [`KdmGenerator::generate_from_dkdm`] issues a KDM from a previously
//!   created DKDM, without the original DCP.
//! - [`KdmGenerator::create_dkdm`] issues a DKDM (a KDM targeted at the
//!   issuer's own certificate) from a DCP-o-matic project folder.
//!
//! Inputs are checked and the output's parent directory created before the
//! tool runs.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::runner::{CliResult, Runner, Spawn, SystemSpawner};
use crate::utils::{ensure_parent_dir, require_exists};
use crate::validity::ValidityWindow;

/// Name of the KDM issuing binary.
pub const DCPOMATIC_KDM_CLI: &str = "dcpomatic2_kdm_cli";

/// KDM output formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KdmType {
    #[default]
    ModifiedTransitional1,
    DciAny,
    DciSpecific,
}

impl KdmType {
    /// Every formulation, in the order the tool documents them.
    pub const ALL: [KdmType; 3] = [
        KdmType::ModifiedTransitional1,
        KdmType::DciAny,
        KdmType::DciSpecific,
    ];

    /// Token passed verbatim to the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            KdmType::ModifiedTransitional1 => "modified-transitional-1",
            KdmType::DciAny => "dci-any",
            KdmType::DciSpecific => "dci-specific",
        }
    }
}

impl fmt::Display for KdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KdmType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kdm_type| kdm_type.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidKdmType(s.to_string()))
    }
}

/// Request for a KDM against an encrypted DCP.
#[derive(Debug, Clone)]
pub struct KdmRequest {
    /// Encrypted DCP directory.
    pub dcp: PathBuf,
    /// Target (projector) certificate, PEM.
    pub certificate: PathBuf,
    /// KDM file to write.
    pub output: PathBuf,
    pub validity: ValidityWindow,
    pub kdm_type: KdmType,
    pub cinema_name: Option<String>,
    pub screen_name: Option<String>,
}

/// Request for a KDM derived from a DKDM.
#[derive(Debug, Clone)]
pub struct DkdmKdmRequest {
    /// DKDM file.
    pub dkdm: PathBuf,
    /// Target (projector) certificate, PEM.
    pub certificate: PathBuf,
    /// KDM file to write.
    pub output: PathBuf,
    pub validity: ValidityWindow,
    pub kdm_type: KdmType,
}

/// Request for a DKDM from a DCP-o-matic project.
#[derive(Debug, Clone)]
pub struct DkdmRequest {
    /// Project folder used to create the encrypted DCP.
    pub project: PathBuf,
    /// The issuer's own certificate, PEM.
    pub certificate: PathBuf,
    /// DKDM file to write.
    pub output: PathBuf,
    pub validity: ValidityWindow,
    pub kdm_type: KdmType,
}

/// Issues KDMs and DKDMs through `dcpomatic2_kdm_cli`.
#[derive(Debug, Clone)]
pub struct KdmGenerator<S = SystemSpawner> {
    runner: Runner<S>,
}

impl KdmGenerator {
    /// Locate `dcpomatic2_kdm_cli` at `binary_path`, or on `PATH` if `None`.
    pub fn new(binary_path: Option<&Path>) -> Result<Self> {
        Ok(Self::from_runner(Runner::new(DCPOMATIC_KDM_CLI, binary_path)?))
    }
}

impl<S: Spawn> KdmGenerator<S> {
    /// Wrap an already resolved runner.
    pub fn from_runner(runner: Runner<S>) -> Self {
        Self { runner }
    }

    /// Underlying runner.
    pub fn runner(&self) -> &Runner<S> {
        &self.runner
    }

    /// Generate a KDM for an encrypted DCP.
    pub fn generate(&self, request: &KdmRequest) -> Result<CliResult> {
        prepare("DCP", &request.dcp, &request.certificate, &request.output)?;

        let mut args = kdm_args(
            &request.output,
            ("-K", request.kdm_type),
            ("-S", &request.certificate),
            request.validity,
        );
        if let Some(cinema) = non_empty(&request.cinema_name) {
            args.push("-c".into());
            args.push(cinema.into());
        }
        if let Some(screen) = non_empty(&request.screen_name) {
            args.push("-s".into());
            args.push(screen.into());
        }
        args.push(request.dcp.as_os_str().to_os_string());

        info!("Generating {} KDM for {}", request.kdm_type, request.dcp.display());
        self.runner.run(args, &request.output, "KDM generation")
    }

    /// Generate a KDM from a DKDM.
    pub fn generate_from_dkdm(&self, request: &DkdmKdmRequest) -> Result<CliResult> {
        prepare("DKDM", &request.dkdm, &request.certificate, &request.output)?;

        let mut args = kdm_args(
            &request.output,
            ("-K", request.kdm_type),
            ("-S", &request.certificate),
            request.validity,
        );
        args.push("-D".into());
        args.push(request.dkdm.as_os_str().to_os_string());

        info!("Generating {} KDM from DKDM {}", request.kdm_type, request.dkdm.display());
        self.runner.run(args, &request.output, "KDM generation")
    }

    /// Create a DKDM from a DCP-o-matic project.
    ///
    /// The certificate should be the one matching the issuer's own
    /// decryption key, so that further KDMs can be derived later.
    pub fn create_dkdm(&self, request: &DkdmRequest) -> Result<CliResult> {
        prepare("Project", &request.project, &request.certificate, &request.output)?;

        let mut args = kdm_args(
            &request.output,
            ("-F", request.kdm_type),
            ("-C", &request.certificate),
            request.validity,
        );
        args.push(request.project.as_os_str().to_os_string());

        info!("Creating DKDM for {}", request.project.display());
        self.runner.run(args, &request.output, "DKDM creation")
    }

    /// Version reported by `dcpomatic2_kdm_cli`.
    pub fn version(&self) -> Result<String> {
        self.runner.version()
    }
}

fn prepare(what: &'static str, source: &Path, certificate: &Path, output: &Path) -> Result<()> {
    require_exists(what, source)?;
    require_exists("Certificate", certificate)?;
    ensure_parent_dir(output)
}

// -o <output> <type flag> <type> <cert flag> <cert> -f <from> -t <to>
fn kdm_args(
    output: &Path,
    (type_flag, kdm_type): (&str, KdmType),
    (cert_flag, certificate): (&str, &Path),
    validity: ValidityWindow,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-o".into(),
        output.into(),
        type_flag.into(),
        kdm_type.as_str().into(),
        cert_flag.into(),
        certificate.into(),
    ];
    args.extend(validity.to_args().into_iter().map(OsString::from));
    args
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
