use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_plan_mirrors_directory_structure() -> Result<()> {
    let test = CliTest::with_file("docs/en/intro.md", "# Intro")?;
    test.write_file("docs/en/guide/setup.md", "# Setup")?;

    let mut cmd = test.plan_command();
    cmd.args(["--input", "docs/en", "--output", "docs/fr/**"])
        .args(["--target-lang", "French"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    docs/en/guide/setup.md  -> docs/fr/guide/setup.md
    docs/en/intro.md        -> docs/fr/intro.md
    ✓ 2 files would be translated to French

    ----- stderr -----
    ");

    // Nothing is written during a dry run.
    assert!(!test.root().join("docs/fr").exists());

    Ok(())
}

#[test]
fn test_plan_reads_environment() -> Result<()> {
    let test = CliTest::with_file("README.md", "Hello")?;

    let output = test
        .plan_command()
        .env("INPUT_FILES", "README.md")
        .env("OUTPUT_FILES", "i18n/{lang}/*")
        .env("TARGET_LANG", "Simplified-Chinese")
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("README.md  -> i18n/simplified_chinese/README.md"));

    Ok(())
}

#[test]
fn test_plan_explains_missing_input() -> Result<()> {
    let test = CliTest::with_file("docs/en/intro.md", "# Intro")?;

    let output = test
        .plan_command()
        .args(["--input", "docs/missing.md", "--output", "out/*"])
        .output()?;

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("warning: input not found: docs/missing.md"));
    assert!(stdout.contains("en (dir)"));
    assert!(stdout.contains("No files to translate"));

    Ok(())
}

#[test]
fn test_plan_requires_output_pattern() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.plan_command().args(["--input", "a.md"]).output()?;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("--output"));

    Ok(())
}
