// src/compile/command.rs

//! External compiler process runner.

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{CompileError, CompileFuture, TemplateCompiler};
use crate::config::model::CompileSection;

/// Placeholder substituted with the template path in compiler arguments.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Runs an external compiler (the `pug` CLI by default) once per template.
///
/// The template path replaces every `{file}` in the arguments. With `stdin`
/// enabled the template text is piped in. Stdout is the compiled source; a
/// non-zero exit turns stderr into [`CompileError::Failed`].
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
    stdin: bool,
}

impl CommandCompiler {
    /// `argv` must be non-empty; config validation guarantees it.
    pub fn new(argv: &[String], stdin: bool) -> Self {
        let (program, args) = match argv.split_first() {
            Some((program, args)) => (program.clone(), args.to_vec()),
            None => (String::new(), Vec::new()),
        };
        Self {
            program,
            args,
            stdin,
        }
    }

    pub fn from_config(cfg: &CompileSection) -> Self {
        Self::new(&cfg.command, cfg.stdin)
    }

    fn args_for(&self, path: &Path) -> Vec<String> {
        let file = path.to_string_lossy();
        self.args
            .iter()
            .map(|a| a.replace(FILE_PLACEHOLDER, &file))
            .collect()
    }

    async fn run(&self, path: &Path) -> Result<String, CompileError> {
        let args = self.args_for(path);
        debug!(program = %self.program, ?args, "running template compiler");

        // Build a command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.program);
            c
        } else {
            Command::new(&self.program)
        };
        cmd.args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if self.stdin { Stdio::piped() } else { Stdio::null() })
            .kill_on_drop(true);

        let spawn_err = |source| CompileError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = cmd.spawn().map_err(spawn_err)?;

        if self.stdin {
            let text = tokio::fs::read(path)
                .await
                .map_err(|source| CompileError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(&text).await.map_err(spawn_err)?;
                // Dropping closes the pipe so the compiler sees EOF.
                drop(stdin);
            }
        }

        let output = child.wait_with_output().await.map_err(spawn_err)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("compiler exited with {}", output.status)
            } else {
                stderr
            };
            return Err(CompileError::Failed(message));
        }

        String::from_utf8(output.stdout).map_err(|_| CompileError::NonUtf8(path.to_path_buf()))
    }
}

impl TemplateCompiler for CommandCompiler {
    fn compile<'a>(&'a mut self, path: &'a Path) -> CompileFuture<'a> {
        Box::pin(self.run(path))
    }
}
