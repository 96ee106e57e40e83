//! Tests for the `build` command (unix only: they rely on a fake `go` script)
#![cfg(unix)]

use crate::helpers::*;
use anyhow::Result;
use std::fs::File;
use std::io::Read;

fn zip_entries(path: &std::path::Path) -> Result<Vec<String>> {
  let mut archive = zip::ZipArchive::new(File::open(path)?)?;
  let mut names = Vec::new();
  for i in 0..archive.len() {
    names.push(archive.by_index(i)?.name().to_string());
  }
  Ok(names)
}

#[test]
fn test_build_zip_matrix_end_to_end() -> Result<()> {
  let project = TestProject::new("app")?;

  let args = [
    "build",
    "--version",
    "1.0.0",
    "--platform",
    "linux/amd64,windows/amd64",
    "--archive",
    "zip",
  ];
  let output = project.pts(&args)?;
  ensure_success(&output, &args)?;
  assert!(stdout(&output).trim_end().ends_with("Completed!"));

  assert_eq!(
    project.list("_releases")?,
    vec![
      "app-1.0.0-linux-amd64.zip",
      "app-1.0.0-linux-amd64.zip.sha256",
      "app-1.0.0-windows-amd64.zip",
      "app-1.0.0-windows-amd64.zip.sha256",
    ]
  );

  let releases = project.path.join("_releases");
  assert_eq!(zip_entries(&releases.join("app-1.0.0-linux-amd64.zip"))?, vec!["app"]);
  assert_eq!(zip_entries(&releases.join("app-1.0.0-windows-amd64.zip"))?, vec!["app.exe"]);

  let mut archive = zip::ZipArchive::new(File::open(releases.join("app-1.0.0-windows-amd64.zip"))?)?;
  let mut content = String::new();
  archive.by_index(0)?.read_to_string(&mut content)?;
  assert_eq!(content, "fake binary windows/amd64\n");

  let digest = project.read("_releases/app-1.0.0-linux-amd64.zip.sha256")?;
  assert_eq!(digest.len(), 64);
  assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

  Ok(())
}

#[test]
fn test_build_stamps_version_metadata() -> Result<()> {
  let project = TestProject::new("app")?;
  project.write("README.md", "second commit\n")?;
  project.commit("Second commit")?;
  project.tag("v1.0.0")?;

  let args = ["build", "--version", "1.0.0", "--platform", "linux/arm64"];
  ensure_success(&project.pts(&args)?, &args)?;

  let calls = project.go_invocations()?;
  assert_eq!(calls.len(), 1);
  let call = &calls[0];
  assert!(call.starts_with("linux/arm64 build -ldflags -s -w "));
  assert!(call.contains("-X 'main.buildVersion=1.0.0'"));
  assert!(call.contains("-X 'main.buildGitRev=2'"));
  assert!(call.contains("-X 'main.buildGitCommit=v1.0.0'"));
  assert!(call.contains("-X 'main.buildDate="));

  // No archive requested: the raw binary stays, with its checksum
  assert_eq!(
    project.list("_releases")?,
    vec!["app-1.0.0-linux-arm64", "app-1.0.0-linux-arm64.sha256"]
  );
  Ok(())
}

#[test]
fn test_build_from_config_file() -> Result<()> {
  let project = TestProject::new("suite")?;
  project.write(
    "pts.toml",
    r#"
[project]
name = "suite"
version = "0.3.0"

[build]
binaries = [{ name = "server", path = "./cmd/server" }, { name = "client", path = "./cmd/client" }]
platforms = ["linux/amd64", "darwin/arm64"]
archive = "tar.gz"
output_dir = "dist"
checksum = false
stamp_package = "github.com/acme/suite/version"
"#,
  )?;
  project.commit("Add config")?;

  let args = ["build"];
  ensure_success(&project.pts(&args)?, &args)?;

  assert_eq!(
    project.list("dist")?,
    vec![
      "client-0.3.0-darwin-arm64.tar.gz",
      "client-0.3.0-linux-amd64.tar.gz",
      "server-0.3.0-darwin-arm64.tar.gz",
      "server-0.3.0-linux-amd64.tar.gz",
    ]
  );

  // Row-major: every platform of `server` before `client`
  let calls = project.go_invocations()?;
  assert_eq!(calls.len(), 4);
  assert!(calls[0].starts_with("linux/amd64 ") && calls[0].ends_with("./cmd/server"));
  assert!(calls[1].starts_with("darwin/arm64 ") && calls[1].ends_with("./cmd/server"));
  assert!(calls[2].starts_with("linux/amd64 ") && calls[2].ends_with("./cmd/client"));
  assert!(calls[0].contains("-X 'github.com/acme/suite/version.buildVersion=0.3.0'"));
  Ok(())
}

#[test]
fn test_build_version_from_file() -> Result<()> {
  let project = TestProject::new("widget")?;
  project.write("VERSION", "2.1.0\n")?;
  project.commit("Add VERSION")?;

  let args = ["build", "--goos", "linux,windows", "--goarch", "386", "-o", "out"];
  ensure_success(&project.pts(&args)?, &args)?;

  assert_eq!(
    project.list("out")?,
    vec![
      "widget-2.1.0-linux-386",
      "widget-2.1.0-linux-386.sha256",
      "widget-2.1.0-windows-386.exe",
      "widget-2.1.0-windows-386.exe.sha256",
    ]
  );
  Ok(())
}

#[test]
fn test_build_stops_at_first_failure() -> Result<()> {
  let project = TestProject::new("app")?;

  let args = [
    "build",
    "--version",
    "1.0.0",
    "--platform",
    "linux/amd64,windows/amd64,darwin/amd64",
    "--archive",
    "zip",
  ];
  let output = project.pts_with_env(&args, &[("FAKE_GO_FAIL", "windows")])?;

  assert!(!output.status.success());
  assert!(!stdout(&output).contains("Completed!"));
  assert!(stderr(&output).contains("Build failed for app (windows/amd64)"));

  // Earlier artifacts stay; nothing after the failure is attempted
  assert_eq!(
    project.list("_releases")?,
    vec!["app-1.0.0-linux-amd64.zip", "app-1.0.0-linux-amd64.zip.sha256"]
  );
  assert_eq!(project.go_invocations()?.len(), 2);
  Ok(())
}

#[test]
fn test_build_rejects_bad_platform_before_compiling() -> Result<()> {
  let project = TestProject::new("app")?;

  let output = project.pts(&["build", "--version", "1.0.0", "--platform", "linux"])?;

  assert!(!output.status.success());
  assert!(stderr(&output).contains("invalid platform 'linux'"));
  assert!(project.go_invocations()?.is_empty());
  assert!(!project.path.join("_releases").exists());
  Ok(())
}
