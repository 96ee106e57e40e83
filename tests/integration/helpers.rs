//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A Go-style project directory under git, with a fake `go` on PATH
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
  pub bin_dir: PathBuf,
}

impl TestProject {
  /// Create `<tmp>/<name>` with a single commit
  pub fn new(name: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join(name);
    let bin_dir = root.path().join("bin");
    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(&bin_dir)?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      path.join("main.go"),
      "package main\n\nvar buildVersion string\n\nfunc main() { println(buildVersion) }\n",
    )?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;

    let project = Self {
      _root: root,
      path,
      bin_dir,
    };
    #[cfg(unix)]
    project.install_fake_go()?;
    Ok(project)
  }

  /// Write a file relative to the project root
  pub fn write(&self, file: &str, content: &str) -> Result<()> {
    let target = self.path.join(file);
    if let Some(parent) = target.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, content)?;
    Ok(())
  }

  /// Stage and commit everything
  pub fn commit(&self, message: &str) -> Result<()> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    Ok(())
  }

  /// Annotated tag on HEAD (what `git describe` looks for)
  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", "-a", name, "-m", name])?;
    Ok(())
  }

  /// Sorted file names directly inside `dir` (relative to the project)
  pub fn list(&self, dir: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(self.path.join(dir))? {
      names.push(entry?.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
  }

  /// Read a file relative to the project root
  pub fn read(&self, file: &str) -> Result<String> {
    std::fs::read_to_string(self.path.join(file)).with_context(|| format!("Failed to read {}", file))
  }

  /// Lines recorded by the fake `go`, one per invocation
  pub fn go_invocations(&self) -> Result<Vec<String>> {
    let log = self.bin_dir.join("go.log");
    if !log.exists() {
      return Ok(Vec::new());
    }
    Ok(std::fs::read_to_string(log)?.lines().map(String::from).collect())
  }

  /// PATH with the fake toolchain first
  pub fn path_env(&self) -> Result<OsString> {
    let mut paths = vec![self.bin_dir.clone()];
    if let Some(current) = std::env::var_os("PATH") {
      paths.extend(std::env::split_paths(&current));
    }
    Ok(std::env::join_paths(paths)?)
  }

  /// Run pts inside the project with the fake toolchain on PATH
  pub fn pts(&self, args: &[&str]) -> Result<Output> {
    self.pts_with_env(args, &[])
  }

  /// Same as [`TestProject::pts`] with extra environment variables
  pub fn pts_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
    let mut cmd = pts_command(&self.path, args);
    cmd.env("PATH", self.path_env()?);
    cmd.envs(envs.iter().copied());
    cmd.output().context("Failed to run pts")
  }

  /// Fake `go` that logs its environment and arguments, then writes `-o`
  #[cfg(unix)]
  fn install_fake_go(&self) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
log="$(dirname "$0")/go.log"
echo "$GOOS/$GOARCH $*" >> "$log"
if [ -n "$FAKE_GO_FAIL" ] && [ "$GOOS" = "$FAKE_GO_FAIL" ]; then
  echo "fake go: build failed for $GOOS" >&2
  exit 2
fi
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then
    out="$2"
    shift
  fi
  shift
done
printf 'fake binary %s/%s\n' "$GOOS" "$GOARCH" > "$out"
chmod 755 "$out"
"#;
    let go = self.bin_dir.join("go");
    std::fs::write(&go, script)?;
    std::fs::set_permissions(&go, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// `pts` command in `cwd` with the publishing environment cleared
pub fn pts_command(cwd: &Path, args: &[&str]) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_pts"));
  cmd.current_dir(cwd).args(args);
  for var in [
    "BINTRAY_SUBJECT",
    "BINTRAY_APIKEY",
    "BINTRAY_REPO",
    "BINTRAY_PACKAGE",
    "BINTRAY_VERSION",
    "GITHUB_TOKEN",
    "GITHUB_OWNER",
    "GITHUB_REPO",
    "PTS_LOG",
  ] {
    cmd.env_remove(var);
  }
  cmd
}

/// Run pts and return its output whatever the exit status
pub fn run_pts(cwd: &Path, args: &[&str]) -> Result<Output> {
  pts_command(cwd, args).output().context("Failed to run pts")
}

/// Run pts and fail unless it exits successfully
pub fn run_pts_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_pts(cwd, args)?;
  ensure_success(&output, args)?;
  Ok(output)
}

pub fn ensure_success(output: &Output, args: &[&str]) -> Result<()> {
  if !output.status.success() {
    anyhow::bail!(
      "pts command failed: pts {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
  }
  Ok(())
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
