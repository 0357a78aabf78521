use std::fs;

use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, stderr};

#[test]
fn test_missing_api_key_fails_before_running() -> Result<()> {
    let test = CliTest::with_file("a.md", "Hello")?;

    let output = test
        .translate_command()
        .args(["--input", "a.md", "--output", "out/*"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--api-key"));
    assert!(!test.root().join("out").exists());

    Ok(())
}

#[test]
fn test_empty_input_is_successful_noop() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.translate_command();
    cmd.env("API_KEY", "sk-secret-9876").env("OUTPUT_FILES", "out/*");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Configuration
      Model:             gpt-4 (temperature 0.3)
      Refinement:        gpt-4 (temperature 0.3)
      Target language:   Simplified-Chinese
      Input:             (none)
      Output pattern:    out/*
      Base URL:          https://openrouter.ai/api/v1
      API key:           ********9876
      Publishing:        disabled

    No files to translate

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_publishing_noop_leaves_git_alone() -> Result<()> {
    let test = CliTest::new()?;
    // Neither git nor gh can be found.
    let empty_bin = test.root().join("bin");
    fs::create_dir_all(&empty_bin)?;

    let mut cmd = test.translate_command();
    cmd.env("GITHUB_ACTIONS", "true")
        .env("API_KEY", "sk-secret-9876")
        .env("OUTPUT_FILES", "out/*")
        .env("PATH", &empty_bin);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Configuration
      Model:             gpt-4 (temperature 0.3)
      Refinement:        gpt-4 (temperature 0.3)
      Target language:   Simplified-Chinese
      Input:             (none)
      Output pattern:    out/*
      Base URL:          https://openrouter.ai/api/v1
      API key:           ********9876
      Publishing:        (unknown) into main
      GitHub token:      (not set)

    No files to translate

    ----- stderr -----
    warning: no way to open a pull request: install `gh` or set GITHUB_TOKEN and GITHUB_REPOSITORY
    ");

    Ok(())
}

#[test]
fn test_invalid_temperature_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .translate_command()
        .args(["--api-key", "sk-test", "--output", "out/*"])
        .args(["--temperature", "5"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error: TEMPERATURE must be between 0.0 and 2.0"));

    Ok(())
}

#[test]
fn test_blank_api_key_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .translate_command()
        .env("API_KEY", "  ")
        .env("OUTPUT_FILES", "out/*")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("API_KEY environment variable is required"));

    Ok(())
}
