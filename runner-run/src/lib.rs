use std::{
    collections::HashMap,
    io::{self, BufReader, Read, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

fn forward_output(source: impl Read, mut sink: impl Write) -> io::Result<()> {
    let mut reader = BufReader::new(source);
    let mut buffer = [0; 1024];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        sink.write_all(&buffer[0..n])?;
        // Flush per chunk so progress output from the child shows up immediately
        sink.flush()?;
    }

    Ok(())
}

fn run_cmd_and_stream_output(cmd: &mut Command) -> Result<(), io::Error> {
    let mut child = cmd.spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stderr"))?;

    let stdout_thread = thread::spawn(move || forward_output(stdout, io::stdout()));
    let stderr_thread = thread::spawn(move || forward_output(stderr, io::stderr()));

    let status = child.wait()?;

    stdout_thread
        .join()
        .map_err(|_| io::Error::other("stdout forwarding thread panicked"))??;
    stderr_thread
        .join()
        .map_err(|_| io::Error::other("stderr forwarding thread panicked"))??;

    if !status.success() {
        return Err(io::Error::other(format!(
            "Command failed with exit code: {}",
            status
        )));
    }

    Ok(())
}

/// Builds and runs external commands, optionally elevated through `sudo`.
#[derive(Debug, Default, Clone)]
pub struct CommandRunner {
    cwd: Option<PathBuf>,
    extra_envs: HashMap<String, String>,
    sudo: bool,
    sudo_program: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new() -> CommandRunner {
        CommandRunner::default()
    }

    pub fn with_cwd(self, cwd: impl Into<PathBuf>) -> CommandRunner {
        CommandRunner {
            cwd: Some(cwd.into()),
            ..self
        }
    }

    pub fn with_extra_envs(self, extra_envs: HashMap<String, String>) -> CommandRunner {
        CommandRunner { extra_envs, ..self }
    }

    /// When enabled every command is executed as `sudo <cmd> <args..>`.
    pub fn with_sudo(self, sudo: bool) -> CommandRunner {
        CommandRunner { sudo, ..self }
    }

    /// Elevates through `program` instead of `sudo`, e.g. `doas`.
    pub fn with_sudo_program(self, program: impl Into<PathBuf>) -> CommandRunner {
        CommandRunner {
            sudo_program: Some(program.into()),
            ..self
        }
    }

    pub fn is_sudo(&self) -> bool {
        self.sudo
    }

    pub fn command(&self, cmd: impl Into<PathBuf>, args: Vec<impl Into<String>>) -> Command {
        let cmd = cmd.into();
        let mut command = if self.sudo {
            let mut command = Command::new(
                self.sudo_program
                    .as_deref()
                    .unwrap_or_else(|| Path::new("sudo")),
            );
            command.arg(cmd);
            command
        } else {
            Command::new(cmd)
        };
        command.args(args.into_iter().map(Into::into).collect::<Vec<String>>());
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command.envs(&self.extra_envs);
        command
    }

    /// Runs the command, forwarding its stdout and stderr to ours as it is produced.
    pub fn run(&self, cmd: impl Into<PathBuf>, args: Vec<impl Into<String>>) -> io::Result<()> {
        let mut command = self.command(cmd, args);
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        tracing::debug!(?command, "running command");
        run_cmd_and_stream_output(&mut command)
    }

    /// Runs the command and returns its trimmed stdout.
    pub fn output(
        &self,
        cmd: impl Into<PathBuf>,
        args: Vec<impl Into<String>>,
    ) -> io::Result<String> {
        let mut command = self.command(cmd, args);

        tracing::debug!(?command, "capturing command output");
        let output = command.output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!(
                "Command failed with exit code: {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
