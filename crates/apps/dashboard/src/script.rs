//! Gesture scripts replayed against the mounted views.
//!
//! A script is a JSON array of gestures:
//!
//! ```json
//! [
//!   { "op": "click", "view": "scatterplot", "record": 2 },
//!   { "op": "hover", "view": "circle_pack", "at": [410, 300] },
//!   { "op": "brush", "from": [100, 100], "to": [400, 500] },
//!   { "op": "clear_brush" },
//!   { "op": "wait", "seconds": 1.0 },
//!   { "op": "reload" }
//! ]
//! ```
//!
//! Points are surface pixels of the named view. A `record` target resolves to
//! the current on-screen position of that record's mark.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewName {
    Scatterplot,
    CirclePack,
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewName::Scatterplot => f.write_str("scatterplot"),
            ViewName::CirclePack => f.write_str("circle_pack"),
        }
    }
}

/// Where a pointer gesture lands.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Target {
    Point { x: f64, y: f64 },
    Record(u32),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Gesture {
    Click {
        view: ViewName,
        #[serde(default)]
        at: Option<[f64; 2]>,
        #[serde(default)]
        record: Option<u32>,
    },
    Hover {
        view: ViewName,
        #[serde(default)]
        at: Option<[f64; 2]>,
        #[serde(default)]
        record: Option<u32>,
    },
    Leave {
        view: ViewName,
    },
    /// Scatterplot brush between two corners.
    Brush {
        from: [f64; 2],
        to: [f64; 2],
    },
    ClearBrush,
    Wait {
        seconds: f64,
    },
    /// Re-delivers the dataset, optionally from another file.
    Reload {
        #[serde(default)]
        data: Option<PathBuf>,
    },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Click { .. } => "click",
            Gesture::Hover { .. } => "hover",
            Gesture::Leave { .. } => "leave",
            Gesture::Brush { .. } => "brush",
            Gesture::ClearBrush => "clear_brush",
            Gesture::Wait { .. } => "wait",
            Gesture::Reload { .. } => "reload",
        }
    }

    /// Pointer target of a click or hover. `record` wins over `at`.
    pub fn target(&self) -> Option<Target> {
        let (at, record) = match self {
            Gesture::Click { at, record, .. } | Gesture::Hover { at, record, .. } => (at, record),
            _ => return None,
        };
        match (record, at) {
            (Some(index), _) => Some(Target::Record(*index)),
            (None, Some([x, y])) => Some(Target::Point { x: *x, y: *y }),
            (None, None) => None,
        }
    }
}

#[derive(Debug)]
pub enum ScriptError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid { step: usize, reason: String },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io { path, source } => {
                write!(f, "failed to read script {}: {source}", path.display())
            }
            ScriptError::Parse(err) => write!(f, "script parse error: {err}"),
            ScriptError::Invalid { step, reason } => write!(f, "script step {step}: {reason}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Io { source, .. } => Some(source),
            ScriptError::Parse(err) => Some(err),
            ScriptError::Invalid { .. } => None,
        }
    }
}

pub fn parse(payload: &str) -> Result<Vec<Gesture>, ScriptError> {
    let gestures: Vec<Gesture> = serde_json::from_str(payload).map_err(ScriptError::Parse)?;
    for (step, gesture) in gestures.iter().enumerate() {
        validate(step, gesture)?;
    }
    Ok(gestures)
}

pub fn load(path: impl AsRef<Path>) -> Result<Vec<Gesture>, ScriptError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&payload)
}

fn validate(step: usize, gesture: &Gesture) -> Result<(), ScriptError> {
    let invalid = |reason: String| Err(ScriptError::Invalid { step, reason });
    match gesture {
        Gesture::Click { .. } | Gesture::Hover { .. } => match gesture.target() {
            None => invalid(format!("{} needs `at` or `record`", gesture.name())),
            Some(Target::Point { x, y }) if !x.is_finite() || !y.is_finite() => {
                invalid(format!("{} point must be finite", gesture.name()))
            }
            Some(_) => Ok(()),
        },
        Gesture::Brush { from, to } if from.iter().chain(to).any(|v| !v.is_finite()) => {
            invalid("brush corners must be finite".to_string())
        }
        Gesture::Wait { seconds } if !seconds.is_finite() || *seconds < 0.0 => {
            invalid(format!("wait needs a non-negative duration, got {seconds}"))
        }
        _ => Ok(()),
    }
}
