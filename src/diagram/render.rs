//! Rendering DOT source through Graphviz and opening the result.

use crate::error::DiagramError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use tracing::{debug, warn};

/// Graphviz layout program used for rendering
pub const GRAPHVIZ_PROGRAM: &str = "dot";

/// Output format passed to Graphviz as `-T<format>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    #[default]
    Svg,
    Png,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(RenderFormat::Svg),
            "png" => Ok(RenderFormat::Png),
            "pdf" => Ok(RenderFormat::Pdf),
            _ => Err(format!(
                "Unknown render format: {}. Valid options: svg, png, pdf",
                s
            )),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl RenderFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Svg => "svg",
            RenderFormat::Png => "png",
            RenderFormat::Pdf => "pdf",
        }
    }

    /// `<output_file>.<ext>`, appended rather than replacing any existing extension
    pub fn output_path(&self, output_file: &Path) -> PathBuf {
        let mut name = output_file.as_os_str().to_os_string();
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}

/// Run `program -T<format> -o <output> <source>` and wait for it
pub fn render_with_graphviz(
    program: &str,
    source: &Path,
    output: &Path,
    format: RenderFormat,
) -> Result<(), DiagramError> {
    let format_arg = format!("-T{}", format.extension());
    debug!(
        "running {} {} -o {} {}",
        program,
        format_arg,
        output.display(),
        source.display()
    );

    let result = Command::new(program)
        .arg(&format_arg)
        .arg("-o")
        .arg(output)
        .arg(source)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DiagramError::RendererNotFound {
                    program: program.to_string(),
                }
            } else {
                DiagramError::Io(e)
            }
        })?;

    if !result.status.success() {
        return Err(DiagramError::RendererFailed {
            program: program.to_string(),
            status: result.status,
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        });
    }

    Ok(())
}

/// Open `path` with the platform's default viewer without waiting for it.
/// Failures are logged, never returned.
pub fn open_in_viewer(path: &Path) {
    let mut command = viewer_command(path);
    debug!("opening {} with {:?}", path.display(), command.get_program());

    if let Err(e) = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        warn!("could not open {} in a viewer: {}", path.display(), e);
    }
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
