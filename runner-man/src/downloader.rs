use std::{
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::Path,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;

use crate::error::{InstallError, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct Downloader {
    client: Client,
    progress: bool,
}

impl Downloader {
    pub fn new(progress: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(InstallError::Client)?;
        Ok(Self { client, progress })
    }

    /// Bar sized to `len`, or a spinner when the server sent no length.
    /// Hidden when progress is disabled.
    pub fn progress_bar(&self, dest: &Path, len: Option<u64>) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let pb = match len {
            Some(len) => ProgressBar::new(len).with_style(
                ProgressStyle::default_bar()
                    .template(
                        "{prefix:.bold} [{elapsed}] {wide_bar:.green} {bytes}/{total_bytes} {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▇▆▅▄▃▂▁  "),
            ),
            None => {
                let pb = ProgressBar::new_spinner().with_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {prefix:.bold} [{elapsed}] {bytes} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb.enable_steady_tick(Duration::from_millis(120));
                pb
            }
        };
        if let Some(name) = dest.file_name() {
            pb.set_prefix(name.to_string_lossy().into_owned());
        }
        pb.set_message("downloading");
        pb
    }

    /// Streams `url` into `dest`, truncating whatever was there. Returns the
    /// number of bytes written.
    pub fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        tracing::debug!(%url, dest = %dest.display(), "starting download");

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|source| InstallError::Download {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(InstallError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let pb = self.progress_bar(dest, response.content_length());

        let written = write_stream(&mut response, dest, &pb).map_err(|source| {
            pb.abandon_with_message("failed");
            InstallError::Write {
                path: dest.to_path_buf(),
                source,
            }
        })?;
        pb.finish_with_message("downloaded");

        tracing::debug!(bytes = written, "download finished");
        Ok(written)
    }
}

/// Copies `reader` into a freshly created `dest`, advancing `pb` as bytes land.
pub fn write_stream(reader: &mut impl Read, dest: &Path, pb: &ProgressBar) -> io::Result<u64> {
    let mut writer = pb.wrap_write(BufWriter::new(File::create(dest)?));
    let written = io::copy(reader, &mut writer)?;
    writer.flush()?;
    Ok(written)
}

/// Sets mode `0o755` on `path`.
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}
