//! External editor integration for block content

use anyhow::{Context, Result};
use readmekit_core::config::EditorConfig;
use readmekit_core::outline;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Resolve the editor command from config or environment
pub fn resolve_editor_command(config_command: &str) -> String {
    if config_command == "$EDITOR" {
        std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| {
                // Fallback chain: nvim -> vim -> nano
                if which("nvim") {
                    "nvim".to_string()
                } else if which("vim") {
                    "vim".to_string()
                } else {
                    "nano".to_string()
                }
            })
    } else {
        config_command.to_string()
    }
}

/// Check if a command exists in PATH
fn which(command: &str) -> bool {
    Command::new("which")
        .arg(command)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Expand template variables in editor arguments
pub fn expand_template(template: &str, file_path: &Path, line: usize) -> String {
    let file_str = file_path.to_string_lossy();
    template
        .replace("{file}", &file_str)
        .replace("{line}", &line.to_string())
}

/// Launch an external editor with the given file
pub fn launch_editor(command: &str, args: &[String], file_path: &Path, line: usize) -> Result<()> {
    // The caller is responsible for suspending and restoring the terminal
    let expanded_args: Vec<String> = args
        .iter()
        .map(|arg| expand_template(arg, file_path, line))
        .collect();

    let status = Command::new(command)
        .args(&expanded_args)
        .status()
        .with_context(|| format!("Failed to launch editor: {}", command))?;

    if !status.success() {
        anyhow::bail!("Editor exited with status: {}", status);
    }

    Ok(())
}

/// One-based line the editor should open at: the block's first heading, if any
pub fn start_line(content: &str) -> usize {
    outline::extract_headings(content)
        .first()
        .map_or(1, |heading| heading.line + 1)
}

/// Edit `content` in the configured editor through a temporary file.
///
/// Returns `None` when the text came back unchanged.
pub fn edit_content(config: &EditorConfig, content: &str) -> Result<Option<String>> {
    let mut file = tempfile::Builder::new()
        .prefix("readmekit-")
        .suffix(".md")
        .tempfile()
        .context("Failed to create temporary file for editing")?;
    file.write_all(content.as_bytes())
        .context("Failed to write block to temporary file")?;
    file.flush()?;

    let command = resolve_editor_command(&config.command);
    launch_editor(&command, &config.args, file.path(), start_line(content))?;

    let edited = std::fs::read_to_string(file.path())
        .with_context(|| format!("Failed to read edited block: {}", file.path().display()))?;

    if edited == content {
        Ok(None)
    } else {
        Ok(Some(edited))
    }
}
