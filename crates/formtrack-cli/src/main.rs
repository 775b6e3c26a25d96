//! FormTrack CLI - exercise form analysis from pose landmarks
//!
//! The `formtrack` command scores recorded pose sequences.
//!
//! ## Commands
//!
//! - `analyze`: Segment reps and score form for a frame file
//! - `verify`: Check a stored analysis artifact against its digest
//! - `config`: Print the default analysis configuration

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use formtrack_core::{
    frames_from_samples, read_analysis_artifact, write_analysis_artifact, write_analysis_md,
    AnalysisArtifact, AnalysisConfig, Exercise, Frame, PoseSample,
};

const DEFAULT_ARTIFACTS_DIR: &str = ".formtrack/runs";

#[derive(Parser)]
#[command(name = "formtrack")]
#[command(author = "FormTrack Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Exercise form analysis from pose landmarks", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recorded pose sequence
    Analyze(AnalyzeArgs),

    /// Verify a stored analysis artifact and print it
    Verify {
        /// Run ID of the stored artifact
        #[arg(long)]
        run: String,

        /// Directory holding run artifacts (default: .formtrack/runs)
        #[arg(long)]
        artifacts_dir: Option<PathBuf>,
    },

    /// Print the default analysis configuration
    Config {
        /// Output format
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// JSON file with the frame sequence
    #[arg(long)]
    frames: PathBuf,

    /// Exercise name, e.g. "Barbell Back Squat"
    #[arg(long, default_value = "squat")]
    exercise: String,

    /// Layout of the frame file
    #[arg(long, value_enum, default_value_t = FrameFormat::Named)]
    format: FrameFormat,

    /// Analysis config (TOML or JSON); defaults apply when omitted
    #[arg(long, env = "FORMTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Write the analysis JSON here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Record a digest-verified artifact under this directory
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Write a Markdown summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// Frame file layouts accepted by `analyze`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FrameFormat {
    /// Array of `{timestamp, landmarks: {left_knee: {x, y}, ...}}`
    Named,
    /// Array of `{timestamp, landmarks: {"25": [x, y, visibility], ...} | null}`
    Mediapipe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ConfigFormat {
    Toml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    formtrack_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Analyze(args) => cmd_analyze(&args),
        Commands::Verify { run, artifacts_dir } => cmd_verify(&run, artifacts_dir.as_deref()),
        Commands::Config { format } => {
            println!("{}", cmd_config(format)?);
            Ok(())
        }
    }
}

/// Run the analysis pipeline over a frame file.
fn cmd_analyze(args: &AnalyzeArgs) -> Result<()> {
    let exercise = Exercise::from_name(&args.exercise)?;

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load analysis config: {:?}", path))?,
        None => AnalysisConfig::default(),
    };

    let frames = load_frames(&args.frames, args.format)?;
    let analysis = exercise.analyze(&frames, &config);
    let json = serde_json::to_string_pretty(&analysis)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write analysis to {:?}", path))?;
            info!(path = %path.display(), score = analysis.score, "analysis written");
        }
        None => println!("{}", json),
    }

    if args.artifacts_dir.is_none() && args.summary.is_none() {
        return Ok(());
    }

    let artifact = AnalysisArtifact::new(exercise, frames.len(), analysis);
    if let Some(dir) = &args.artifacts_dir {
        write_analysis_artifact(&artifact, dir)
            .with_context(|| format!("Failed to record artifact under {:?}", dir))?;
        eprintln!("Recorded run {}", artifact.run_id);
    }
    if let Some(path) = &args.summary {
        write_analysis_md(path, &artifact)
            .with_context(|| format!("Failed to write summary to {:?}", path))?;
    }
    Ok(())
}

fn load_frames(path: &Path, format: FrameFormat) -> Result<Vec<Frame>> {
    match format {
        FrameFormat::Named => read_json_file(path),
        FrameFormat::Mediapipe => {
            let samples: Vec<PoseSample> = read_json_file(path)?;
            frames_from_samples(&samples)
                .with_context(|| format!("Failed to convert pose samples in {:?}", path))
        }
    }
}

/// Read and digest-verify a stored artifact, then print it.
fn cmd_verify(run_id: &str, artifacts_dir: Option<&Path>) -> Result<()> {
    let root = artifacts_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR));

    let artifact = read_analysis_artifact(run_id, &root)
        .with_context(|| format!("Failed to verify run {} under {:?}", run_id, root))?;

    println!("{}", serde_json::to_string_pretty(&artifact)?);
    eprintln!("Digest verified for run {}", run_id);
    Ok(())
}

fn cmd_config(format: ConfigFormat) -> Result<String> {
    let config = AnalysisConfig::default();
    Ok(match format {
        ConfigFormat::Toml => config.to_toml_string()?,
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
    })
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formtrack_core::{FormAnalysis, Joint};
    use std::collections::BTreeMap;

    fn standing_pose() -> BTreeMap<usize, [f64; 3]> {
        let xy = |joint: Joint| match joint {
            Joint::LeftShoulder => (0.42, 0.2),
            Joint::RightShoulder => (0.58, 0.2),
            Joint::LeftHip => (0.45, 0.5),
            Joint::RightHip => (0.55, 0.5),
            Joint::LeftKnee => (0.45, 0.7),
            Joint::RightKnee => (0.55, 0.7),
            Joint::LeftAnkle => (0.45, 0.9),
            Joint::RightAnkle => (0.55, 0.9),
            Joint::LeftFootIndex => (0.43, 0.93),
            Joint::RightFootIndex => (0.57, 0.93),
        };
        Joint::ALL
            .iter()
            .map(|j| {
                let (x, y) = xy(*j);
                (j.mediapipe_index(), [x, y, 0.98])
            })
            .collect()
    }

    fn write_named_frames(dir: &Path) -> PathBuf {
        let frames: Vec<Frame> = (0..5)
            .map(|i| Frame::from_indexed(i as f64 * 0.1, &standing_pose()).unwrap())
            .collect();
        let path = dir.join("frames.json");
        std::fs::write(&path, serde_json::to_vec(&frames).unwrap()).unwrap();
        path
    }

    fn analyze_args(frames: PathBuf) -> AnalyzeArgs {
        AnalyzeArgs {
            frames,
            exercise: "squat".to_string(),
            format: FrameFormat::Named,
            config: None,
            output: None,
            artifacts_dir: None,
            summary: None,
        }
    }

    #[test]
    fn test_cli_parses_analyze_defaults() {
        let cli = Cli::try_parse_from(["formtrack", "analyze", "--frames", "f.json"]).unwrap();
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.frames, PathBuf::from("f.json"));
                assert_eq!(args.exercise, "squat");
                assert_eq!(args.format, FrameFormat::Named);
                assert!(args.artifacts_dir.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "formtrack",
            "verify",
            "--run",
            "abc",
            "--verbose",
            "--json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.json);
    }

    #[test]
    fn test_cli_rejects_unknown_frame_format() {
        let result = Cli::try_parse_from([
            "formtrack",
            "analyze",
            "--frames",
            "f.json",
            "--format",
            "openpose",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_analyze_writes_output_artifact_and_summary() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("analysis.json");
        let runs = temp_dir.path().join("runs");
        let summary = temp_dir.path().join("summary.md");

        let mut args = analyze_args(write_named_frames(temp_dir.path()));
        args.output = Some(output.clone());
        args.artifacts_dir = Some(runs.clone());
        args.summary = Some(summary.clone());
        cmd_analyze(&args).unwrap();

        let analysis: FormAnalysis =
            serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(analysis, FormAnalysis::no_reps());

        let run_ids: Vec<String> = std::fs::read_dir(&runs)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(run_ids.len(), 1);
        assert!(cmd_verify(&run_ids[0], Some(runs.as_path())).is_ok());

        let md = std::fs::read_to_string(&summary).unwrap();
        assert!(md.contains("**0/100**"));
    }

    #[test]
    fn test_analyze_rejects_unsupported_exercise() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut args = analyze_args(write_named_frames(temp_dir.path()));
        args.exercise = "Bench Press".to_string();

        let msg = format!("{:#}", cmd_analyze(&args).unwrap_err());
        assert!(msg.contains("Currently supported: squats."), "{msg}");
    }

    #[test]
    fn test_analyze_mediapipe_without_pose_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("samples.json");
        std::fs::write(
            &path,
            r#"[{"timestamp": 0.0, "landmarks": null}, {"timestamp": 0.1}]"#,
        )
        .unwrap();

        let mut args = analyze_args(path);
        args.format = FrameFormat::Mediapipe;
        let msg = format!("{:#}", cmd_analyze(&args).unwrap_err());
        assert!(msg.contains("Failed to convert pose samples"), "{msg}");
    }

    #[test]
    fn test_load_mediapipe_frames() {
        let temp_dir = tempfile::tempdir().unwrap();
        let samples = vec![
            PoseSample {
                timestamp: 0.0,
                landmarks: None,
            },
            PoseSample {
                timestamp: 0.1,
                landmarks: Some(standing_pose()),
            },
        ];
        let path = temp_dir.path().join("samples.json");
        std::fs::write(&path, serde_json::to_vec(&samples).unwrap()).unwrap();

        let frames = load_frames(&path, FrameFormat::Mediapipe).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].timestamp, 0.1);
    }

    #[test]
    fn test_verify_missing_run_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let msg = format!(
            "{:#}",
            cmd_verify("run-missing", Some(temp_dir.path())).unwrap_err()
        );
        assert!(msg.contains("Failed to verify run run-missing"), "{msg}");
    }

    #[test]
    fn test_config_output_round_trips() {
        let toml_text = cmd_config(ConfigFormat::Toml).unwrap();
        assert_eq!(
            AnalysisConfig::from_toml_str(&toml_text).unwrap(),
            AnalysisConfig::default()
        );

        let json_text = cmd_config(ConfigFormat::Json).unwrap();
        assert_eq!(
            AnalysisConfig::from_json_str(&json_text).unwrap(),
            AnalysisConfig::default()
        );
    }
}
