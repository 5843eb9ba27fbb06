// Operator command handlers
use crate::domain::telemetry::{ChartKind, SelectorParseError, TimeRange};
use crate::infrastructure::jsonl::write_jsonl;
use crate::infrastructure::runtime::EngineRuntime;
use crate::presentation::tracing_projector::TracingProjector;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "commands: pause | resume | refresh | record | stop | chart <line|area|bar> | \
range <15m|1h|6h|24h> | display <low> <high> | display auto | success <pct> | \
export <path> | status | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pause,
    Resume,
    Refresh,
    Record,
    StopRecording,
    Chart(ChartKind),
    Range(TimeRange),
    DisplayManual { low: f64, high: f64 },
    DisplayAuto,
    MissionSuccess(f64),
    Export(PathBuf),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command} expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error(transparent)]
    Selector(#[from] SelectorParseError),
}

fn number(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(CommandError::Unknown(String::new()));
        };

        let command = match (name.to_ascii_lowercase().as_str(), args) {
            ("pause", []) => Command::Pause,
            ("resume" | "live", []) => Command::Resume,
            ("refresh", []) => Command::Refresh,
            ("record", []) => Command::Record,
            ("stop", []) => Command::StopRecording,
            ("chart", [kind]) => Command::Chart(kind.parse()?),
            ("chart", _) => {
                return Err(CommandError::MissingArgument {
                    command: "chart",
                    expected: "line, area or bar",
                })
            }
            ("range", [range]) => Command::Range(range.parse()?),
            ("range", _) => {
                return Err(CommandError::MissingArgument {
                    command: "range",
                    expected: "15m, 1h, 6h or 24h",
                })
            }
            ("display", ["auto"]) => Command::DisplayAuto,
            ("display", [low, high]) => Command::DisplayManual {
                low: number(low)?,
                high: number(high)?,
            },
            ("display", _) => {
                return Err(CommandError::MissingArgument {
                    command: "display",
                    expected: "<low> <high> or auto",
                })
            }
            ("success", [pct]) => Command::MissionSuccess(number(pct)?),
            ("success", _) => {
                return Err(CommandError::MissingArgument {
                    command: "success",
                    expected: "a percentage",
                })
            }
            ("export", [path]) => Command::Export(PathBuf::from(path)),
            ("export", _) => {
                return Err(CommandError::MissingArgument {
                    command: "export",
                    expected: "a file path",
                })
            }
            ("status", []) => Command::Status,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };
        Ok(command)
    }
}

/// What the input loop should do after a command ran.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Message(String),
    Quit,
}

/// Apply one command to the running engine.
pub fn handle_command(runtime: &EngineRuntime, command: Command) -> anyhow::Result<Reply> {
    let message = match command {
        Command::Pause => {
            runtime.set_live(false);
            "live updates paused".to_string()
        }
        Command::Resume => {
            runtime.set_live(true);
            "live updates resumed".to_string()
        }
        Command::Refresh => {
            runtime.regenerate_now()?;
            "environmental window regenerated".to_string()
        }
        Command::Record => {
            runtime.start_recording();
            "recording".to_string()
        }
        Command::StopRecording => {
            runtime.stop_recording();
            "recording stopped".to_string()
        }
        Command::Chart(kind) => {
            runtime.set_chart_type(kind);
            format!("chart type {}", kind)
        }
        Command::Range(range) => {
            runtime.set_time_range(range);
            format!("time range {}", range)
        }
        Command::DisplayManual { low, high } => {
            runtime.set_manual_display_range(low, high);
            runtime.set_auto_display_range(false);
            let (low, high) = runtime.view().thermal_scale;
            format!("thermal scale {:.1}..{:.1} °C", low, high)
        }
        Command::DisplayAuto => {
            runtime.set_auto_display_range(true);
            "thermal scale follows the camera".to_string()
        }
        Command::MissionSuccess(pct) => {
            runtime.set_mission_success(pct);
            let success = runtime.read(|e| e.mission_stats().mission_success_pct);
            format!("mission success {:.1}%", success)
        }
        Command::Export(path) => {
            let series = runtime.read(|e| e.environmental_series());
            let file = File::create(&path)?;
            write_jsonl(BufWriter::new(file), &series)?;
            tracing::info!("Exported {} samples to {}", series.len(), path.display());
            format!("wrote {} samples to {}", series.len(), path.display())
        }
        Command::Status => TracingProjector::summarize(&runtime.view()),
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Reply::Quit),
    };
    Ok(Reply::Message(message))
}
