use std::{
    fs, io,
    path::{Path, PathBuf},
};

use runner_run::CommandRunner;
use tempfile::NamedTempFile;

use crate::{
    Cli, CliInstaller,
    downloader::{Downloader, make_executable},
    error::{InstallError, Result},
    platform::Platform,
};

/// Bucket serving the official GitLab Runner binaries.
pub const DOWNLOAD_BASE: &str = "https://gitlab-runner-downloads.s3.amazonaws.com";

pub const DEFAULT_PATH: &str = "/usr/local/bin/gitlab-runner";

pub const DEFAULT_SUDO: &str = "sudo";

pub const LATEST: &str = "latest";

/// Maps a machine architecture token to the name GitLab uses for its binaries.
/// Anything not in the table is passed through untouched.
pub fn vendor_arch(arch: &str) -> String {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "armv7" | "armv7l" => "arm",
        other => other,
    }
    .to_string()
}

pub fn normalize_version(version: &str) -> String {
    if version.is_empty() {
        LATEST.to_string()
    } else if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}

pub fn download_url(base: &str, version: &str, arch: &str) -> String {
    format!(
        "{}/{}/binaries/gitlab-runner-linux-{}",
        base.trim_end_matches('/'),
        version,
        arch
    )
}

pub struct GitLabRunner;

impl GitLabRunner {
    pub fn new_installer(bin_path: impl Into<PathBuf>) -> GitLabRunnerInstaller {
        GitLabRunnerInstaller {
            version: LATEST.to_string(),
            arch: None,
            bin_path: bin_path.into(),
            progress: true,
            sudo: false,
            sudo_program: DEFAULT_SUDO.into(),
            base_url: DOWNLOAD_BASE.to_string(),
            platform: None,
        }
    }
}

pub struct GitLabRunnerInstaller {
    version: String,
    arch: Option<String>,
    bin_path: PathBuf,
    progress: bool,
    sudo: bool,
    sudo_program: PathBuf,
    base_url: String,
    platform: Option<Platform>,
}

impl GitLabRunnerInstaller {
    /// An empty version means the latest release.
    pub fn with_version(self, version: &str) -> Self {
        Self {
            version: normalize_version(version),
            ..self
        }
    }

    /// Overrides the detected machine architecture. Accepts either the
    /// machine token (`x86_64`) or GitLab's (`amd64`).
    pub fn with_arch(self, arch: Option<String>) -> Self {
        Self { arch, ..self }
    }

    pub fn with_progress(self, progress: bool) -> Self {
        Self { progress, ..self }
    }

    pub fn with_sudo(self, sudo: bool) -> Self {
        Self { sudo, ..self }
    }

    /// Program used to elevate when sudo is enabled.
    pub fn with_sudo_program(self, program: impl Into<PathBuf>) -> Self {
        Self {
            sudo_program: program.into(),
            ..self
        }
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Skips detection and installs for `platform`.
    pub fn with_platform(self, platform: Platform) -> Self {
        Self {
            platform: Some(platform),
            ..self
        }
    }

    /// Resolves the platform and rejects anything but Linux.
    pub fn resolve_platform(&self) -> Result<Platform> {
        let platform = self.platform.clone().unwrap_or_else(Platform::detect);
        if !platform.is_linux() {
            return Err(InstallError::UnsupportedPlatform(platform.os));
        }
        Ok(platform)
    }

    /// Architecture token as GitLab names it, after any override.
    pub fn target_arch(&self, platform: &Platform) -> String {
        vendor_arch(self.arch.as_deref().unwrap_or(&platform.arch))
    }

    fn runner(&self) -> CommandRunner {
        CommandRunner::new()
            .with_sudo(self.sudo)
            .with_sudo_program(&self.sudo_program)
    }

    /// Creates the directory holding the install path, through sudo when
    /// enabled. `install` only warns when this fails.
    pub fn create_parent_dir(&self) -> io::Result<()> {
        let Some(dir) = self.bin_path.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };
        if dir.is_dir() {
            return Ok(());
        }

        if self.sudo {
            self.runner()
                .run("mkdir", vec!["-p".to_string(), dir.display().to_string()])
        } else {
            fs::create_dir_all(dir)
        }
    }

    /// Downloads the binary. Without sudo it lands directly on the install
    /// path; with sudo it is staged in a temporary file owned by the invoking
    /// user and returned for [`Self::finalize`] to move into place.
    fn fetch(&self, downloader: &Downloader, url: &str) -> Result<Option<NamedTempFile>> {
        if !self.sudo {
            downloader.download(url, &self.bin_path)?;
            return Ok(None);
        }

        let staged = NamedTempFile::new().map_err(|source| InstallError::Write {
            path: std::env::temp_dir(),
            source,
        })?;
        downloader.download(url, staged.path())?;
        Ok(Some(staged))
    }

    /// Sets mode 755 on the binary, copying a staged download into place
    /// first. The staged file is deleted when it drops.
    fn finalize(&self, staged: Option<NamedTempFile>) -> Result<()> {
        let Some(staged) = staged else {
            return make_executable(&self.bin_path).map_err(|source| InstallError::Permission {
                path: self.bin_path.clone(),
                source,
            });
        };

        let runner = self.runner();
        let dest = self.bin_path.display().to_string();
        runner
            .run(
                "cp",
                vec![staged.path().display().to_string(), dest.clone()],
            )
            .map_err(|source| InstallError::Write {
                path: self.bin_path.clone(),
                source,
            })?;
        // Staged files are created 0600, so set the full mode rather than +x
        runner
            .run("chmod", vec!["755".to_string(), dest])
            .map_err(|source| InstallError::Permission {
                path: self.bin_path.clone(),
                source,
            })
    }
}

impl CliInstaller for GitLabRunnerInstaller {
    fn name(&self) -> &str {
        "gitlab-runner"
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn bin_path(&self) -> &Path {
        &self.bin_path
    }

    fn download_url(&self, arch: &str) -> String {
        download_url(&self.base_url, &self.version, arch)
    }

    fn install(self) -> Result<impl Cli> {
        let platform = self.resolve_platform()?;
        let arch = self.target_arch(&platform);
        println!("Installing version: {} for: {}", self.version, arch);

        let url = self.download_url(&arch);
        println!("Downloading from: {}", url);

        if let Err(e) = self.create_parent_dir() {
            let dir = self.bin_path.parent().unwrap_or(&self.bin_path);
            tracing::warn!(dir = %dir.display(), "failed to create directory: {e}");
            println!("Warning: unable to create {}: {}", dir.display(), e);
        }

        let downloader = Downloader::new(self.progress)?;
        let staged = self.fetch(&downloader, &url).inspect_err(|_| {
            println!("{}", self.bin_path.display());
            println!("{}", url);
        })?;
        let downloaded_to = staged.as_ref().map_or(self.bin_path.as_path(), |f| f.path());
        println!("Downloaded to: {}", downloaded_to.display());

        self.finalize(staged)?;

        tracing::info!(version = %self.version, %arch, path = %self.bin_path.display(), "installed");
        println!("GitLab Runner installation completed successfully!");

        Ok(GitLabRunnerCli(self))
    }
}

pub struct GitLabRunnerCli(GitLabRunnerInstaller);

impl Cli for GitLabRunnerCli {
    fn bin_path(&self) -> PathBuf {
        self.0.bin_path.clone()
    }
}
