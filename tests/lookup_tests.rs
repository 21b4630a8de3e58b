// Full lookup pipeline against a fake installer
// Unix only: the fake installer is a shell script

#![cfg(unix)]


use std::path::PathBuf;
use test_helpers::{MISSING_PACKAGE, TestEnvironment, sample_environment};
use uv_metadata::{LookupRequest, MetadataError, MetadataValue, get_metadata};

/// Environment folder recorded by the `venv` call
fn venv_path(calls: &[String]) -> PathBuf {
    let venv_call = calls
        .iter()
        .find(|call| call.starts_with("venv "))
        .expect("venv was not called");
    let args = venv_call.split(" | ").next().unwrap();
    PathBuf::from(args.split_whitespace().last().unwrap())
}

#[test]
fn test_lookup_runs_commands_in_order() {
    let env = sample_environment();
    let installer = env.fake_installer();

    let request = LookupRequest::new("uv-metadata", Some("3.12".to_string()));
    let fields = get_metadata(&installer, &request).unwrap();
    assert_eq!(fields["name"], MetadataValue::Scalar("uv-metadata".into()));

    let calls = env.calls();
    let commands: Vec<&str> = calls
        .iter()
        .map(|call| call.split(" | ").next().unwrap())
        .collect();
    assert_eq!(commands.len(), 4);
    assert!(commands[0].starts_with("venv -p3.12 "));
    assert_eq!(commands[1], "pip install --no-deps uv-metadata");
    assert_eq!(commands[2], "pip freeze");
    assert_eq!(commands[3], "pip show uv-metadata");
}

#[test]
fn test_lookup_without_python_lets_installer_choose() {
    let env = sample_environment();
    let installer = env.fake_installer();

    get_metadata(&installer, &LookupRequest::new("uv-metadata", None)).unwrap();

    let calls = env.calls();
    assert!(calls[0].starts_with("venv /"));
}

#[test]
fn test_children_see_isolated_environment() {
    let env = sample_environment();
    let installer = env.fake_installer();

    get_metadata(&installer, &LookupRequest::new("uv-metadata", None)).unwrap();

    let calls = env.calls();
    let venv = venv_path(&calls);

    // Inherited VIRTUAL_ENV is hidden while the environment is created
    assert!(calls[0].contains("VIRTUAL_ENV=unset"));
    for call in &calls {
        assert!(call.contains("UV_VENV_SEED=0"), "{call}");
    }
    for call in &calls[1..] {
        assert!(
            call.contains(&format!("VIRTUAL_ENV={}", venv.display())),
            "{call}"
        );
    }
}

#[test]
fn test_temporary_directory_is_removed() {
    let env = sample_environment();
    let installer = env.fake_installer();

    get_metadata(&installer, &LookupRequest::new("uv-metadata", None)).unwrap();

    let venv = venv_path(&env.calls());
    assert!(!venv.exists());
    assert!(!venv.parent().unwrap().exists());
}

#[test]
fn test_temporary_directory_is_removed_on_failure() {
    let env = sample_environment();
    let installer = env.fake_installer();

    let err = get_metadata(&installer, &LookupRequest::new(MISSING_PACKAGE, None)).unwrap_err();
    assert!(err.to_string().contains("failed with exit code 1"));
    assert!(err.to_string().contains("No solution found"));

    let venv = venv_path(&env.calls());
    assert!(!venv.parent().unwrap().exists());
}

#[test]
fn test_unexpected_freeze_output() {
    let env = sample_environment();
    env.set_installed("a==1.0\nb==2.0\n", "a", "1.0");
    let installer = env.fake_installer();

    let err = get_metadata(&installer, &LookupRequest::new("a", None)).unwrap_err();
    match err {
        MetadataError::UnexpectedFreezeOutput(output) => assert_eq!(output, "a==1.0\nb==2.0\n"),
        other => panic!("unexpected error: {other}"),
    }
    // Nothing past freeze is attempted
    assert_eq!(env.calls().len(), 3);
}

#[test]
fn test_direct_reference_install() {
    let env = sample_environment();
    env.set_installed(
        "uv-metadata @ git+https://github.com/zsimic/uv-metadata@0123abcd\n",
        "uv-metadata",
        "0.1.0",
    );
    let installer = env.fake_installer();

    let request = LookupRequest::new("git+https://github.com/zsimic/uv-metadata@main", None);
    let fields = get_metadata(&installer, &request).unwrap();
    assert_eq!(fields["version"], MetadataValue::Scalar("0.1.0".into()));
    assert!(env.calls().last().unwrap().starts_with("pip show uv-metadata |"));
}

#[test]
fn test_missing_dist_info() {
    let env = TestEnvironment::new();
    env.set_installed("ghost==1.0\n", "ghost", "1.0");
    let installer = env.fake_installer();

    let err = get_metadata(&installer, &LookupRequest::new("ghost", None)).unwrap_err();
    assert!(matches!(err, MetadataError::DistInfoNotFound { .. }));
}
