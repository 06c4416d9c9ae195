pub mod config;
pub mod downloader;
pub mod error;
pub mod gitlab_runner;
pub mod paths;
pub mod platform;

use std::path::{Path, PathBuf};

pub use config::InstallRequest;
pub use error::{InstallError, Result};
pub use gitlab_runner::*;
pub use platform::Platform;

pub trait CliInstaller {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn bin_path(&self) -> &Path;
    /// URL of the release binary built for `arch`.
    fn download_url(&self, arch: &str) -> String;

    /// Downloads the binary to [`CliInstaller::bin_path`] and makes it executable,
    /// replacing any previous install at that path.
    fn install(self) -> Result<impl Cli>;
}

pub trait Cli {
    fn bin_path(&self) -> PathBuf;

    fn is_executable(&self) -> bool {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(self.bin_path())
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
}
