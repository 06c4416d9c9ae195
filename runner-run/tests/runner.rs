use runner_run::CommandRunner;
use std::collections::HashMap;

#[test]
fn test_command_without_sudo() {
    let runner = CommandRunner::new();
    let command = runner.command("chmod", vec!["+x", "/tmp/gitlab-runner"]);

    assert_eq!(command.get_program(), "chmod");
    let args: Vec<_> = command.get_args().collect();
    assert_eq!(args, vec!["+x", "/tmp/gitlab-runner"]);
}

#[test]
fn test_command_with_sudo() {
    let runner = CommandRunner::new().with_sudo(true);
    assert!(runner.is_sudo());

    let command = runner.command("chmod", vec!["+x", "/usr/local/bin/gitlab-runner"]);

    assert_eq!(command.get_program(), "sudo");
    let args: Vec<_> = command.get_args().collect();
    assert_eq!(args, vec!["chmod", "+x", "/usr/local/bin/gitlab-runner"]);
}

#[test]
fn test_command_with_sudo_program() {
    let runner = CommandRunner::new()
        .with_sudo(true)
        .with_sudo_program("/usr/bin/doas");
    let command = runner.command("mkdir", vec!["-p", "/opt/runner"]);

    assert_eq!(command.get_program(), "/usr/bin/doas");
    let args: Vec<_> = command.get_args().collect();
    assert_eq!(args, vec!["mkdir", "-p", "/opt/runner"]);
}

#[test]
fn test_sudo_program_ignored_without_sudo() {
    let runner = CommandRunner::new().with_sudo_program("/usr/bin/doas");
    let command = runner.command("mkdir", vec!["-p", "/opt/runner"]);
    assert_eq!(command.get_program(), "mkdir");
}

#[test]
fn test_output_is_trimmed() {
    let output = CommandRunner::new()
        .output("echo", vec!["hello runner"])
        .unwrap();
    assert_eq!(output, "hello runner");
}

#[test]
fn test_output_uses_cwd_and_envs() {
    let dir = tempfile::tempdir().unwrap();
    let cwd = std::fs::canonicalize(dir.path()).unwrap();

    let runner = CommandRunner::new().with_cwd(&cwd);
    assert_eq!(
        runner.output("pwd", Vec::<String>::new()).unwrap(),
        cwd.to_str().unwrap()
    );

    let mut envs = HashMap::new();
    envs.insert("RUNNER_RUN_TEST".to_string(), "present".to_string());
    let runner = CommandRunner::new().with_extra_envs(envs);
    assert_eq!(
        runner
            .output("sh", vec!["-c", "echo $RUNNER_RUN_TEST"])
            .unwrap(),
        "present"
    );
}

#[test]
fn test_run_success_and_failure() {
    let runner = CommandRunner::new();
    assert!(runner.run("true", Vec::<String>::new()).is_ok());

    let err = runner.run("false", Vec::<String>::new()).unwrap_err();
    assert!(err.to_string().contains("Command failed"));
}

#[test]
fn test_output_failure_carries_stderr() {
    let err = CommandRunner::new()
        .output("sh", vec!["-c", "echo broken >&2; exit 3"])
        .unwrap_err();
    assert!(err.to_string().contains("broken"));
}

#[test]
fn test_missing_program() {
    let err = CommandRunner::new()
        .run("runner-run-no-such-program", Vec::<String>::new())
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
