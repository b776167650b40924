//! Line plots rendered through matplotlib.

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Errors raised while rendering a figure.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Underlying process or filesystem I/O failure.
    #[error("plot I/O failure: {0}")]
    Io(#[from] std::io::Error),
    /// The python subprocess stdin was unavailable.
    #[error("failed to open stdin for python plotting process")]
    StdinUnavailable,
    /// The python subprocess exited unsuccessfully.
    #[error("python plotting script failed with status: {0}")]
    PythonExitFailure(ExitStatus),
    /// The figure could not be encoded for the plotting script.
    #[error("failed to encode figure: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One labeled curve.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    /// A matplotlib format string, such as `.-k`.
    pub style: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: style.into(),
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }
}

/// A set of curves sharing one pair of axes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub xlabel: String,
    pub ylabel: Option<String>,
    pub log_y: bool,
    /// Width and height, in inches.
    pub size: (f64, f64),
    pub series: Vec<Series>,
}

/// Renders figures.
pub trait Plotter {
    fn render(&self, figure: &Figure) -> Result<(), PlotError>;
}

/// Discards every figure.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullPlotter;

impl Plotter for NullPlotter {
    fn render(&self, _: &Figure) -> Result<(), PlotError> {
        Ok(())
    }
}

/// Pipes a matplotlib script into a python interpreter, which saves the figure as an image.
#[derive(Clone, Debug)]
pub struct PythonPlotter {
    output: PathBuf,
    python: String,
}

impl Default for PythonPlotter {
    fn default() -> Self {
        Self::new("target/plots/memory_comparison.png")
    }
}

impl PythonPlotter {
    /// Saves figures to `output`, using the `python` on the path.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            python: "python".into(),
        }
    }

    /// Uses another interpreter, such as `python3`.
    #[must_use]
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    fn script(&self, figure: &Figure) -> Result<String, PlotError> {
        let output = self.output.to_string_lossy().replace('\\', "\\\\");
        let figure = serde_json::to_string(figure)?;
        Ok(format!(
            r#"
import json
import matplotlib
matplotlib.use("Agg")
import matplotlib.pyplot as plt

figure = json.loads(r'''{figure}''')
fig, ax = plt.subplots(figsize=figure["size"])
for series in figure["series"]:
    ax.plot(series["x"], series["y"], series["style"], label=series["label"])
if figure["log_y"]:
    ax.set_yscale("log")
ax.set_title(figure["title"])
ax.set_xlabel(figure["xlabel"])
if figure["ylabel"] is not None:
    ax.set_ylabel(figure["ylabel"])
ax.legend()
fig.tight_layout()
fig.savefig(r"{output}", dpi=150)
plt.close(fig)
"#
        ))
    }
}

impl Plotter for PythonPlotter {
    fn render(&self, figure: &Figure) -> Result<(), PlotError> {
        if let Some(parent) = self.output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let script = self.script(figure)?;
        let mut python = Command::new(&self.python)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = python.stdin.take() {
            stdin.write_all(script.as_bytes())?;
        } else {
            return Err(PlotError::StdinUnavailable);
        }

        let status = python.wait()?;
        if !status.success() {
            return Err(PlotError::PythonExitFailure(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure() -> Figure {
        let mut series = Series::new("DFT", ".-k");
        series.push(100.0, 1e4);
        Figure {
            title: "Memory comparison".into(),
            xlabel: "Vector size".into(),
            ylabel: None,
            log_y: true,
            size: (6.0, 4.0),
            series: vec![series],
        }
    }

    #[test]
    fn script_embeds_figure() {
        let plotter = PythonPlotter::new("out/plot.png");
        let script = plotter.script(&figure()).unwrap();
        assert!(script.contains(r#""title":"Memory comparison""#));
        assert!(script.contains(r#"fig.savefig(r"out/plot.png""#));
        assert!(script.contains("matplotlib.use(\"Agg\")"));
    }

    #[test]
    fn missing_interpreter_is_io_error() {
        let dir = std::env::temp_dir().join("nufft-plot-test");
        let plotter =
            PythonPlotter::new(dir.join("plot.png")).with_python("nufft-no-such-python");
        assert!(matches!(plotter.render(&figure()), Err(PlotError::Io(_))));
    }

    #[test]
    fn null_plotter_accepts_anything() {
        NullPlotter.render(&figure()).unwrap();
    }
}
