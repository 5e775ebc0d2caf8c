use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use eyegaze::{replay_trace, GazeModelConfig, PupilTrace, ReplayReport};
use tracing_subscriber::EnvFilter;

/// Replay a recorded pupil trace through the gaze estimator.
#[derive(Debug, Parser)]
#[command(author, version, about = "Offline gaze estimation from pupil traces")]
struct Args {
    /// Path to a JSON pupil trace (frame size plus per-frame pupil pixels).
    #[arg(long)]
    input: String,

    /// Optional path to a JSON gaze model config. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,

    /// Only print the summary, without per-frame gaze records.
    #[arg(long)]
    summary: bool,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_report_json(report: &ReplayReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn replay_from_files(input_path: &str, config_path: Option<&str>, summary: bool) -> Result<String> {
    let trace = PupilTrace::from_path(Path::new(input_path))?;

    let config = match config_path {
        Some(cfg_path) => load_json_file::<GazeModelConfig>(Path::new(cfg_path))?,
        None => GazeModelConfig::default(),
    };

    let mut report = replay_trace(&trace, &config)?;
    if summary {
        report.frames.clear();
    }
    write_report_json(&report)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    let json = replay_from_files(&args.input, args.config.as_deref(), args.summary)?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyegaze::{EyeballConfig, LinearModelConfig, PupilSample};
    use eyegaze_core::IntrinsicsParams;
    use std::{fs, path::Path};
    use tempfile::NamedTempFile;

    fn write_json<T: serde::Serialize>(value: &T, path: &Path) {
        serde_json::to_writer_pretty(fs::File::create(path).unwrap(), value).unwrap();
    }

    fn synthetic_trace() -> PupilTrace {
        let mut samples = Vec::new();
        for i in 0..30 {
            let t = i as f64 * 0.2;
            samples.push(PupilSample {
                pixel: Some([320.0 + 30.0 * t.sin(), 240.0 + 20.0 * t.cos()]),
                ellipse_axes: Some([18.0, 20.0]),
            });
        }
        samples.insert(10, PupilSample::default());
        PupilTrace {
            frame_width: 640,
            frame_height: 480,
            samples,
        }
    }

    #[test]
    fn replays_trace_with_default_config() {
        let input_file = NamedTempFile::new().unwrap();
        write_json(&synthetic_trace(), input_file.path());

        let json = replay_from_files(input_file.path().to_str().unwrap(), None, false)
            .expect("replay should succeed");
        let report: ReplayReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report.frames.len(), 31);
        assert_eq!(report.detections, 30);
        assert_eq!(report.misses, 0);
        assert!(report.frames[10].gaze.is_none());
        assert!(!report.converged);
        let center = report.final_center.expect("eyeball model keeps a center");
        assert!((center.z - 500.0).abs() < 5.0, "center={center:?}");
        match report.camera.map(|c| c.intrinsics) {
            Some(IntrinsicsParams::Pinhole { params }) => {
                assert!((params.f - 4882.3).abs() < 0.5, "f={}", params.f)
            }
            other => panic!("unexpected camera {other:?}"),
        }
    }

    #[test]
    fn honours_config_file() {
        let input_file = NamedTempFile::new().unwrap();
        let config_file = NamedTempFile::new().unwrap();
        write_json(&synthetic_trace(), input_file.path());
        write_json(
            &GazeModelConfig::Linear(LinearModelConfig::default()),
            config_file.path(),
        );

        let json = replay_from_files(
            input_file.path().to_str().unwrap(),
            Some(config_file.path().to_str().unwrap()),
            true,
        )
        .expect("replay should succeed");
        let report: ReplayReport = serde_json::from_str(&json).unwrap();

        assert!(report.frames.is_empty());
        assert_eq!(report.observation_count, 30);
        assert!(report.final_center.is_none());
        assert!(report.camera.is_none());
    }

    #[test]
    fn invalid_config_is_reported() {
        let input_file = NamedTempFile::new().unwrap();
        let config_file = NamedTempFile::new().unwrap();
        write_json(&synthetic_trace(), input_file.path());
        write_json(
            &GazeModelConfig::Eyeball(EyeballConfig {
                eye_radius_mm: 12.0,
                init_depth_mm: 5.0,
                ..EyeballConfig::default()
            }),
            config_file.path(),
        );

        let err = replay_from_files(
            input_file.path().to_str().unwrap(),
            Some(config_file.path().to_str().unwrap()),
            false,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("depth"), "{err:#}");
    }

    #[test]
    fn missing_input_names_the_file() {
        let err = replay_from_files("/nonexistent/trace.json", None, false).unwrap_err();
        assert!(format!("{err:#}").contains("trace.json"), "{err:#}");
    }
}
