use crate::{
    error::Result,
    gitlab_runner::{
        DEFAULT_PATH, DEFAULT_SUDO, DOWNLOAD_BASE, GitLabRunner, GitLabRunnerInstaller,
    },
    paths::expand_home,
};

/// Environment variable overriding the vendor storage base URL, for mirrors.
pub const DOWNLOAD_BASE_ENV: &str = "RUNNER_MAN_DOWNLOAD_BASE";

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "RUNNER_MAN_LOG";

/// What the user asked for, before any path expansion or platform detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub install_path: String,
    /// Empty means latest.
    pub version: String,
    pub arch: Option<String>,
    pub progress: bool,
    pub sudo: bool,
    pub sudo_program: String,
    pub base_url: String,
}

impl Default for InstallRequest {
    fn default() -> Self {
        Self {
            install_path: DEFAULT_PATH.to_string(),
            version: String::new(),
            arch: None,
            progress: true,
            sudo: false,
            sudo_program: DEFAULT_SUDO.to_string(),
            base_url: DOWNLOAD_BASE.to_string(),
        }
    }
}

impl InstallRequest {
    /// Expands home placeholders in the install path with `home` and builds the
    /// matching installer.
    pub fn installer(&self, home: Option<&str>) -> Result<GitLabRunnerInstaller> {
        let bin_path = expand_home(&self.install_path, home)?;
        tracing::debug!(path = %bin_path.display(), "resolved install path");

        Ok(GitLabRunner::new_installer(bin_path)
            .with_version(&self.version)
            .with_arch(self.arch.clone().filter(|arch| !arch.is_empty()))
            .with_progress(self.progress)
            .with_sudo(self.sudo)
            .with_sudo_program(&self.sudo_program)
            .with_base_url(&self.base_url))
    }
}
