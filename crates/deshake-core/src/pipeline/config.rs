use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::params::ProcessingParameters;

/// Where corrected frames go.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OutputTarget {
    /// A SER file with the source's header and layout.
    Ser(PathBuf),
    /// Bare frame bytes on standard output.
    Stdout,
}

impl OutputTarget {
    /// Interpret a command-line output argument; `stdout` selects the pipe.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "stdout" {
            Self::Stdout
        } else {
            Self::Ser(PathBuf::from(arg))
        }
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }
}

impl std::fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ser(path) => write!(f, "{}", path.display()),
            Self::Stdout => write!(f, "stdout"),
        }
    }
}

/// Save the intermediate line starts of one frame as PNG overlays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugCapture {
    pub frame_index: usize,
    pub dir: PathBuf,
}

/// A complete deshaking run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeshakeJob {
    pub input: PathBuf,
    pub output: OutputTarget,
    /// Output frame rate; estimated from the source timestamps when absent.
    pub frame_rate: Option<f64>,
    #[serde(default)]
    pub params: ProcessingParameters,
    pub debug: Option<DebugCapture>,
}
