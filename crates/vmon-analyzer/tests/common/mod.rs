//! Common test utilities for CLI integration tests

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const CATALOG: &str = r#"
services:
  lwsmd:
    description: Likewise Service Manager
    id: 1
    level: 0
    type: system-control
    profile: [ALL, HACore]
  vmafd:
    description: VMware Authentication Framework
    id: 2
    parent_id: 1
    level: 1
    type: vmon-control
    serviceprestart: /usr/lib/vmware-vmafd/vmafd-prestart.sh
    profile: [ALL, HACore]
    dp_service: [lwsmd]
  vpxd:
    description: VMware vCenter Server
    id: 12
    parent_id: 2
    level: 3
    type: vmon-control
    serviceprestart: /usr/lib/vmware-vpx/vpxd-prestart.sh
    profile: [ALL]
    dp_service: [vmafd, vmware-postgres]
  eam:
    description: ESX Agent Manager
    id: 20
    level: 4
    type: vmon-control
    profile: [ALL]
    dp_service: [vpxd]
"#;

pub const LOG: &str = "\
2024-02-25T15:00:00.000Z In(05) host-1 <unknown> Starting vMon with profile 'ALL'
2024-02-25T15:00:01.000Z In(05) host-1 <vmafd> Service pre-start command completed successfully.
2024-02-25T15:00:02.000Z In(05) host-1 <vmafd> Service STARTED successfully.
2024-02-25T15:00:03.000Z In(05) host-1 <vpxd> Client info Uid 0 Gid 0
2024-02-25T15:00:04.000Z Er(02) host-1 <vpxd> Service pre-start command failed with exit code 1.
2024-02-25T15:00:05.000Z Er(02) host-1 <vpxd> Service exited. Exit code 1
";

/// Scratch directory with helpers to write inputs and run the binary
pub struct CliTestContext {
    pub test_dir: TempDir,
}

impl CliTestContext {
    pub fn new() -> Self {
        Self {
            test_dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `content` to `filename` inside the test directory
    pub fn create_file(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.test_dir.path().join(filename);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write test file");
        path
    }

    pub fn output_dir(&self) -> PathBuf {
        self.test_dir.path().join("output")
    }

    pub fn path(&self) -> &Path {
        self.test_dir.path()
    }

    /// Run the CLI with `args` from inside the test directory
    pub fn run(&self, args: &[&str]) -> CliOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_vmon-analyzer"))
            .current_dir(self.test_dir.path())
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("run vmon-analyzer");

        CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code(),
        }
    }
}

#[derive(Debug)]
pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl CliOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.success {
            panic!(
                "Command failed with exit code {:?}\nSTDOUT:\n{}\nSTDERR:\n{}",
                self.exit_code, self.stdout, self.stderr
            );
        }
        self
    }

    pub fn assert_failure_code(&self, expected: i32) -> &Self {
        match self.exit_code {
            Some(code) if code == expected => self,
            Some(code) => panic!(
                "Expected exit code {} but got {}\nSTDOUT:\n{}\nSTDERR:\n{}",
                expected, code, self.stdout, self.stderr
            ),
            None => panic!(
                "Expected exit code {} but process was terminated\nSTDOUT:\n{}\nSTDERR:\n{}",
                expected, self.stdout, self.stderr
            ),
        }
    }

    pub fn assert_contains(&self, text: &str) -> &Self {
        if !self.stdout.contains(text) && !self.stderr.contains(text) {
            panic!(
                "Output does not contain '{}'\nSTDOUT:\n{}\nSTDERR:\n{}",
                text, self.stdout, self.stderr
            );
        }
        self
    }

    /// Path printed on the final `Output file:` line
    pub fn output_file(&self) -> PathBuf {
        self.stdout
            .lines()
            .find_map(|line| line.strip_prefix("Output file: "))
            .map(PathBuf::from)
            .unwrap_or_else(|| panic!("No output file reported\nSTDOUT:\n{}", self.stdout))
    }
}
