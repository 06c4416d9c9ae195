use runner_man::{InstallError, paths::expand_home};
use std::path::PathBuf;

#[test]
fn test_home_variable_is_replaced() {
    assert_eq!(
        expand_home("$HOME/.local/bin/gitlab-runner", Some("/home/ci")).unwrap(),
        PathBuf::from("/home/ci/.local/bin/gitlab-runner")
    );
}

#[test]
fn test_every_home_variable_is_replaced() {
    assert_eq!(
        expand_home("$HOME/a/$HOME", Some("/h")).unwrap(),
        PathBuf::from("/h/a//h")
    );
}

#[test]
fn test_leading_tilde_is_replaced() {
    assert_eq!(
        expand_home("~/bin/gitlab-runner", Some("/home/ci/")).unwrap(),
        PathBuf::from("/home/ci/bin/gitlab-runner")
    );
    assert_eq!(expand_home("~", Some("/home/ci")).unwrap(), PathBuf::from("/home/ci"));
}

#[test]
fn test_tilde_elsewhere_is_kept() {
    assert_eq!(
        expand_home("/opt/~runner/bin", Some("/home/ci")).unwrap(),
        PathBuf::from("/opt/~runner/bin")
    );
    assert_eq!(
        expand_home("~other/bin", Some("/home/ci")).unwrap(),
        PathBuf::from("~other/bin")
    );
}

#[test]
fn test_absolute_path_untouched() {
    assert_eq!(
        expand_home("/usr/local/bin/gitlab-runner", Some("/home/ci")).unwrap(),
        PathBuf::from("/usr/local/bin/gitlab-runner")
    );
}

#[test]
fn test_without_home_fails_when_needed() {
    for path in ["$HOME/bin/gitlab-runner", "~/bin/gitlab-runner", "~"] {
        let err = expand_home(path, None).unwrap_err();
        assert!(matches!(err, InstallError::MissingHome(ref p) if p == path));
        assert!(err.to_string().contains("HOME is not set"));
    }
}

#[test]
fn test_without_home_plain_path() {
    assert_eq!(
        expand_home("/usr/local/bin/gitlab-runner", None).unwrap(),
        PathBuf::from("/usr/local/bin/gitlab-runner")
    );
    assert_eq!(
        expand_home("~other/bin", None).unwrap(),
        PathBuf::from("~other/bin")
    );
}
