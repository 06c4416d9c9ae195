use runner_run::CommandRunner;

/// Operating system and CPU architecture as reported by the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Asks `uname` first, since it reports ARM variants such as `armv7l` that
    /// `std::env::consts::ARCH` folds into `arm`. Falls back to the compile-time
    /// values when `uname` can't be run.
    pub fn detect() -> Self {
        let runner = CommandRunner::new();

        let os = runner
            .output("uname", vec!["-s"])
            .inspect_err(|e| tracing::debug!("uname -s failed: {e}"))
            .unwrap_or_else(|_| std::env::consts::OS.to_string());
        let arch = runner
            .output("uname", vec!["-m"])
            .inspect_err(|e| tracing::debug!("uname -m failed: {e}"))
            .unwrap_or_else(|_| std::env::consts::ARCH.to_string());

        tracing::debug!(%os, %arch, "detected platform");
        Self { os, arch }
    }

    pub fn is_linux(&self) -> bool {
        self.os.eq_ignore_ascii_case("linux")
    }
}
