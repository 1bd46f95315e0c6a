//! External toolchain: import, compile and repack
//!
//! The binary config and archive formats are handled by external tools.
//! The editor only reaches them through the `Toolchain` trait; the shipped
//! implementation runs command templates from the config file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{error, info, warn};

use crate::config::ToolchainConfig;
use crate::error::{EditorError, Result};

/// Conversions between editable text and the game's binary formats
pub trait Toolchain {
    /// Convert a binary container into text lines
    fn import(&self, path: &Path) -> Result<Vec<String>>;

    /// Compile text lines for `output`; returns the produced artifact
    fn compile(&self, lines: &[String], output: &Path) -> Result<PathBuf>;

    /// Fold a compiled artifact into an archive
    fn repack(&self, intermediate: &Path, archive: &Path) -> Result<()>;

    /// Where to compile to when exporting into `archive`
    fn intermediate_path(&self, archive: &Path) -> PathBuf {
        archive.with_extension("bni")
    }
}

/// Compile into an intermediate, repack it into `archive`, then delete the
/// intermediate. A failed repack leaves the intermediate for inspection.
pub fn export_archive(toolchain: &dyn Toolchain, lines: &[String], archive: &Path) -> Result<()> {
    let mut target = toolchain.intermediate_path(archive);
    if target == archive {
        target.as_mut_os_string().push(".tmp");
    }

    let intermediate = toolchain.compile(lines, &target)?;
    toolchain.repack(&intermediate, archive)?;
    fs::remove_file(&intermediate)?;

    info!(
        archive = %archive.display(),
        intermediate = %intermediate.display(),
        "exported archive"
    );
    Ok(())
}

/// Runs the configured command templates through the platform shell
pub struct ExternalToolchain {
    config: ToolchainConfig,
}

impl ExternalToolchain {
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    /// Expand a template and run it, returning stdout
    fn run(
        &self,
        operation: &'static str,
        template: Option<&str>,
        vars: &[(&str, &Path)],
    ) -> Result<String> {
        let template = template.ok_or(EditorError::NotConfigured(operation))?;
        let command = expand_template(template, vars);
        info!(operation, %command, "running toolchain command");

        let output = shell(&command).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            error!(operation, %message, "toolchain command failed");
            return Err(EditorError::Toolchain { operation, message });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Toolchain for ExternalToolchain {
    fn import(&self, path: &Path) -> Result<Vec<String>> {
        let stdout = self.run("import", self.config.import.as_deref(), &[("input", path)])?;
        Ok(stdout
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect())
    }

    fn compile(&self, lines: &[String], output: &Path) -> Result<PathBuf> {
        let source = std::env::temp_dir().join(format!("ty2ini-edit-{}.txt", std::process::id()));
        fs::write(&source, lines.join("\n"))?;

        let result = self.run(
            "compile",
            self.config.compile.as_deref(),
            &[("input", source.as_path()), ("output", output)],
        );
        if let Err(e) = fs::remove_file(&source) {
            warn!(path = %source.display(), error = %e, "could not remove compile source");
        }
        let stdout = result?;

        // Tools may report where they actually wrote the artifact
        let reported = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .filter(|path| path.is_file());
        Ok(reported.unwrap_or_else(|| output.to_path_buf()))
    }

    fn repack(&self, intermediate: &Path, archive: &Path) -> Result<()> {
        self.run(
            "repack",
            self.config.repack.as_deref(),
            &[("input", intermediate), ("archive", archive)],
        )?;
        Ok(())
    }

    fn intermediate_path(&self, archive: &Path) -> PathBuf {
        archive.with_extension(&self.config.intermediate_extension)
    }
}

/// Replace `{name}` placeholders with shell-quoted paths
fn expand_template(template: &str, vars: &[(&str, &Path)]) -> String {
    vars.iter().fold(template.to_string(), |command, (name, path)| {
        command.replace(&format!("{{{name}}}"), &shell_quote(&path.to_string_lossy()))
    })
}

#[cfg(windows)]
fn shell_quote(arg: &str) -> String {
    format!("\"{}\"", arg.replace('"', "\\\""))
}

#[cfg(not(windows))]
fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records calls and writes real files so deletion can be checked
    #[derive(Default)]
    struct FakeToolchain {
        calls: RefCell<Vec<String>>,
        fail_repack: bool,
    }

    impl Toolchain for FakeToolchain {
        fn import(&self, _path: &Path) -> Result<Vec<String>> {
            Ok(vec!["name Unit".to_string()])
        }

        fn compile(&self, lines: &[String], output: &Path) -> Result<PathBuf> {
            fs::write(output, lines.join("\n"))?;
            self.calls.borrow_mut().push(format!("compile {}", output.display()));
            Ok(output.to_path_buf())
        }

        fn repack(&self, intermediate: &Path, archive: &Path) -> Result<()> {
            self.calls.borrow_mut().push(format!("repack {}", intermediate.display()));
            if self.fail_repack {
                return Err(EditorError::Toolchain {
                    operation: "repack",
                    message: "archive locked".to_string(),
                });
            }
            fs::copy(intermediate, archive)?;
            Ok(())
        }
    }

    #[test]
    fn test_export_archive_deletes_intermediate() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("Patch_PC.rkv");
        let toolchain = FakeToolchain::default();

        export_archive(&toolchain, &["Health 5".to_string()], &archive).unwrap();

        let intermediate = dir.path().join("Patch_PC.bni");
        assert!(!intermediate.exists());
        assert_eq!(fs::read_to_string(&archive).unwrap(), "Health 5");
        assert_eq!(toolchain.calls.borrow().len(), 2);
    }

    #[test]
    fn test_failed_repack_keeps_intermediate() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("Patch_PC.rkv");
        let toolchain = FakeToolchain {
            fail_repack: true,
            ..Default::default()
        };

        let err = export_archive(&toolchain, &["x".to_string()], &archive).unwrap_err();
        assert!(matches!(err, EditorError::Toolchain { operation: "repack", .. }));
        assert!(dir.path().join("Patch_PC.bni").exists());
        assert!(!archive.exists());
    }

    #[test]
    fn test_intermediate_never_overwrites_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("data.bni");
        let toolchain = FakeToolchain::default();

        export_archive(&toolchain, &["x".to_string()], &archive).unwrap();
        assert!(archive.exists());
        assert!(!dir.path().join("data.bni.tmp").exists());
    }

    #[test]
    fn test_expand_template_quotes_paths() {
        let command = expand_template(
            "tool {input} -o {output}",
            &[("input", Path::new("my file.txt")), ("output", Path::new("out.bni"))],
        );
        #[cfg(not(windows))]
        assert_eq!(command, "tool 'my file.txt' -o 'out.bni'");
        #[cfg(windows)]
        assert_eq!(command, "tool \"my file.txt\" -o \"out.bni\"");
    }

    #[test]
    fn test_unconfigured_operation() {
        let toolchain = ExternalToolchain::new(ToolchainConfig::default());
        let err = toolchain.import(Path::new("a.ini")).unwrap_err();
        assert!(matches!(err, EditorError::NotConfigured("import")));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_import_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("level.ini");
        fs::write(&input, "name Unit\r\nHealth 5\r\n").unwrap();

        let toolchain = ExternalToolchain::new(ToolchainConfig {
            import: Some("cat {input}".to_string()),
            repack: Some("echo locked >&2; exit 3".to_string()),
            ..Default::default()
        });

        assert_eq!(toolchain.import(&input).unwrap(), vec!["name Unit", "Health 5"]);

        let err = toolchain.repack(&input, &dir.path().join("a.rkv")).unwrap_err();
        match err {
            EditorError::Toolchain { operation, message } => {
                assert_eq!(operation, "repack");
                assert_eq!(message, "locked");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_external_compile_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("level.bni");
        let toolchain = ExternalToolchain::new(ToolchainConfig {
            compile: Some("cp {input} {output}".to_string()),
            ..Default::default()
        });

        let produced = toolchain
            .compile(&["name Unit".to_string(), "Health 5".to_string()], &output)
            .unwrap();
        assert_eq!(produced, output);
        assert_eq!(fs::read_to_string(&output).unwrap(), "name Unit\nHealth 5");
    }
}
