use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use runner_man::{CliInstaller, InstallRequest, config, gitlab_runner, paths};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;

    dotenv::dotenv().ok();
    let env = std::env::var(config::LOG_ENV).unwrap_or_else(|_| "warn".into());
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(env))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    args.command.run()
}

#[derive(Subcommand)]
enum Commands {
    /// Install GitLab Runner for self-hosted CI
    #[command(
        name = "gitlab-runner",
        after_help = "Examples:\n  runner-man gitlab-runner\n  runner-man gitlab-runner --version <version>"
    )]
    GitLabRunner(GitLabRunnerArgs),
}

#[derive(clap::Args, Debug)]
struct GitLabRunnerArgs {
    /// The version or leave blank to determine the latest available version
    #[arg(short = 'v', long, default_value = "")]
    version: String,

    /// Installation path of the gitlab-runner binary, `$HOME` and `~` are expanded
    #[arg(long, default_value = gitlab_runner::DEFAULT_PATH)]
    path: String,

    /// Show download progress
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    progress: bool,

    /// CPU architecture i.e. amd64
    #[arg(long)]
    arch: Option<String>,

    /// Place the binary and set its permissions through sudo
    #[arg(long)]
    sudo: bool,

    /// Program used for --sudo, e.g. doas
    #[arg(long, default_value = gitlab_runner::DEFAULT_SUDO)]
    sudo_program: String,

    /// Base URL of the runner binary storage
    #[arg(long, env = config::DOWNLOAD_BASE_ENV, default_value = gitlab_runner::DOWNLOAD_BASE, hide = true)]
    base_url: String,
}

impl From<GitLabRunnerArgs> for InstallRequest {
    fn from(args: GitLabRunnerArgs) -> Self {
        InstallRequest {
            install_path: args.path,
            version: args.version,
            arch: args.arch,
            progress: args.progress,
            sudo: args.sudo,
            sudo_program: args.sudo_program,
            base_url: args.base_url,
        }
    }
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Self::GitLabRunner(args) => {
                let request = InstallRequest::from(args);
                println!("Installing GitLab Runner to {}", request.install_path);

                let home = paths::home_dir();
                request.installer(home.as_deref())?.install()?;
            }
        }
        Ok(())
    }
}
