//! Unit tests for CLI commands

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

const FSM_YAML: &str = "\
alphabet_in: [DONE]
default_start_state: StartRound
final_states: [EndRound]
label: TinyAbciApp
start_states: [StartRound]
states: [StartRound, EndRound]
transition_func:
  (StartRound, DONE): EndRound
";

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

/// Run with a config path that does not exist so a local adev.toml never leaks in.
fn run_in(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let config = dir.join("missing.toml");
    let mut full = vec!["adev", "--config", config.to_str().unwrap()];
    full.extend_from_slice(args);
    let cli = Cli::try_parse_from(full).unwrap();
    let mut out = Vec::new();
    run(&cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_dao_defaults() {
    let cli = parse(&["adev", "dao"]);
    match cli.command {
        Commands::Dao { component, out } => {
            assert_eq!(component, PathBuf::from("component.yaml"));
            assert!(out.output.is_none());
            assert!(!out.force);
            assert!(!out.dry_run);
        }
        other => panic!("Expected Dao command, got {other:?}"),
    }
}

#[test]
fn test_handler_accepts_several_specs() {
    let cli = parse(&["adev", "handler", "--spec", "a.yaml", "b.yaml", "--use-daos", "-o", "out"]);
    match cli.command {
        Commands::Handler { spec, use_daos, out } => {
            assert_eq!(spec, [PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
            assert!(use_daos);
            assert_eq!(out.output, Some(PathBuf::from("out")));
        }
        other => panic!("Expected Handler command, got {other:?}"),
    }
}

#[test]
fn test_handler_requires_spec() {
    assert!(Cli::try_parse_from(["adev", "handler"]).is_err());
}

#[test]
fn test_fsm_from_file_formats() {
    let cli = parse(&["adev", "fsm", "from-file", "f.yaml", "--output", "mermaid"]);
    match cli.command {
        Commands::Fsm {
            sub: FsmCommand::FromFile { file, in_type, output },
        } => {
            assert_eq!(file, PathBuf::from("f.yaml"));
            assert_eq!(in_type, None);
            assert_eq!(output, FsmFormat::Mermaid);
        }
        other => panic!("Expected fsm from-file, got {other:?}"),
    }
    assert!(Cli::try_parse_from(["adev", "fsm", "from-file", "f", "--in-type", "xml"]).is_err());
}

#[test]
fn test_chain_needs_two_files() {
    assert!(Cli::try_parse_from(["adev", "fsm", "chain", "only.yaml"]).is_err());
    let cli = parse(&["adev", "fsm", "chain", "a.yaml", "b.mmd", "--label", "Both"]);
    assert!(matches!(
        cli.command,
        Commands::Fsm { sub: FsmCommand::Chain { ref label, .. } } if label == "Both"
    ));
}

#[test]
fn test_format_from_extension() {
    assert_eq!(FsmFormat::from_path(Path::new("x.mmd")), FsmFormat::Mermaid);
    assert_eq!(FsmFormat::from_path(Path::new("x.mermaid")), FsmFormat::Mermaid);
    assert_eq!(FsmFormat::from_path(Path::new("x.yaml")), FsmFormat::FsmSpec);
    assert_eq!(FsmFormat::from_path(Path::new("x")), FsmFormat::FsmSpec);
}

#[test]
fn test_from_file_prints_diagram() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("fsm.yaml");
    fs::write(&file, FSM_YAML).unwrap();
    let printed = run_in(dir.path(), &["fsm", "from-file", file.to_str().unwrap(), "--output", "mermaid"]).unwrap();
    assert_eq!(printed, "graph TD\n  StartRound\n  EndRound\n  StartRound -->|DONE| EndRound\n");
}

#[test]
fn test_mermaid_label_comes_from_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("tiny_flow.mmd");
    fs::write(&file, "graph TD\n  A -->|GO| B\n").unwrap();
    let model = load_fsm(&file, None).unwrap();
    assert_eq!(model.label, "TinyFlow");
}

#[test]
fn test_validate_fails_on_broken_document() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.yaml");
    let bad = dir.path().join("bad.yaml");
    fs::write(&good, FSM_YAML).unwrap();
    fs::write(&bad, FSM_YAML.replace("final_states: [EndRound]", "final_states: [Nowhere]")).unwrap();

    let printed = run_in(dir.path(), &["fsm", "validate", good.to_str().unwrap()]).unwrap();
    assert!(printed.ends_with("good.yaml: ok (0 warnings)\n"));

    let err = run_in(dir.path(), &["fsm", "validate", good.to_str().unwrap(), bad.to_str().unwrap()]).unwrap_err();
    assert_eq!(err.to_string(), "1 of 2 FSM documents are invalid");
}

#[test]
fn test_scaffold_dry_run_lists_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("fsm.yaml");
    fs::write(&file, FSM_YAML).unwrap();
    let out = dir.path().join("out");
    let printed = run_in(
        dir.path(),
        &["fsm", "scaffold", file.to_str().unwrap(), "-o", out.to_str().unwrap(), "--dry-run"],
    )
    .unwrap();
    assert_eq!(printed.lines().count(), 4);
    assert!(printed.contains("tiny_abci_app"));
    assert!(!out.exists());
}
