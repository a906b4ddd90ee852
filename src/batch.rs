use crate::background::{self, FillStats};
use crate::config::Config;
use crate::error::RemovalError;
use crate::files::codec;
use crate::files::discovery::{self, DiscoveryOptions};
use crate::files::naming;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Timing information for a single step of one file
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Why a file could not be processed
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub code: String,
    pub message: String,
}

/// Outcome for one input file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<FillStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FileFailure>,
    pub steps: Vec<StepTiming>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a whole run, in discovery order
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub tolerance: u8,
    pub processed: usize,
    pub failed: usize,
    pub removed_pixels: usize,
    pub total_time_ms: u64,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<(), RemovalError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RemovalError::Report(format!("Failed to serialize report: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)
            .map_err(|e| RemovalError::Report(format!("{}: {}", path.display(), e)))
    }
}

/// Remove the background of every PNG under the configured input directory.
///
/// Per-file failures are recorded in the report and do not stop the batch;
/// only discovery and report-writing errors are returned.
pub fn run(config: &Config) -> Result<BatchReport, RemovalError> {
    let start = Instant::now();

    let options = DiscoveryOptions {
        recursive: config.recursive,
        exclude: Some(config.output_dir.clone()),
    };
    let inputs = discovery::discover_pngs(&config.input_dir, &options)?;
    let files = process_all(inputs, config)?;

    let processed = files.iter().filter(|f| f.is_success()).count();
    let removed_pixels = files
        .iter()
        .filter_map(|f| f.stats.map(|s| s.removed))
        .sum();

    let report = BatchReport {
        input_dir: config.input_dir.clone(),
        output_dir: config.output_dir.clone(),
        tolerance: config.tolerance,
        processed,
        failed: files.len() - processed,
        removed_pixels,
        total_time_ms: start.elapsed().as_millis() as u64,
        files,
    };

    if report.files.is_empty() {
        tracing::info!("No PNG files found in {}", config.input_dir.display());
    } else {
        tracing::info!(
            "Batch completed in {}ms: {} processed, {} failed, {} pixels cleared",
            report.total_time_ms,
            report.processed,
            report.failed,
            report.removed_pixels
        );
    }

    if let Some(path) = &config.report {
        report.write_json(path)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(report)
}

/// One discovered input and where its result goes
struct Job {
    input: PathBuf,
    output: Result<PathBuf, RemovalError>,
}

/// Resolve every output path before any file is touched.
///
/// An output that would overwrite one of the inputs, or that an earlier input
/// already claimed, becomes an `OutputCollision` for that file.
fn plan_jobs(inputs: impl Iterator<Item = PathBuf>, config: &Config) -> Vec<Job> {
    let inputs: Vec<PathBuf> = inputs.collect();
    let input_keys: HashSet<PathBuf> = inputs
        .iter()
        .map(|p| discovery::absolute_lexical(p))
        .collect();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    inputs
        .into_iter()
        .map(|input| {
            let output = output_path(&input, config).and_then(|output| {
                let key = discovery::absolute_lexical(&output);
                if input_keys.contains(&key) {
                    return Err(RemovalError::OutputCollision {
                        output: output.display().to_string(),
                        claimed_by: format!("input {}", output.display()),
                    });
                }
                match claimed.entry(key) {
                    Entry::Occupied(owner) => Err(RemovalError::OutputCollision {
                        output: output.display().to_string(),
                        claimed_by: format!("output of {}", owner.get().display()),
                    }),
                    Entry::Vacant(slot) => {
                        slot.insert(input.clone());
                        Ok(output)
                    }
                }
            });
            Job { input, output }
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn process_all(
    inputs: impl Iterator<Item = PathBuf>,
    config: &Config,
) -> Result<Vec<FileReport>, RemovalError> {
    let planned = plan_jobs(inputs, config);
    let work = || -> Vec<FileReport> {
        planned
            .into_par_iter()
            .map(|job| process_job(job, config))
            .collect()
    };

    match config.jobs {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| RemovalError::Io(std::io::Error::other(e.to_string())))?;
            Ok(pool.install(work))
        }
        None => Ok(work()),
    }
}

#[cfg(not(feature = "parallel"))]
fn process_all(
    inputs: impl Iterator<Item = PathBuf>,
    config: &Config,
) -> Result<Vec<FileReport>, RemovalError> {
    if config.jobs.is_some() {
        tracing::warn!("--jobs has no effect without the parallel feature");
    }
    Ok(plan_jobs(inputs, config)
        .into_iter()
        .map(|job| process_job(job, config))
        .collect())
}

fn process_job(job: Job, config: &Config) -> FileReport {
    let Job { input, output } = job;
    let mut steps = Vec::new();

    let result = output.and_then(|output| {
        run_file(&input, &output, config.tolerance, &mut steps).map(|stats| (output, stats))
    });

    match result {
        Ok((output, stats)) => {
            tracing::debug!(
                "{} -> {}: cleared {} of {} visited pixels ({})",
                input.display(),
                output.display(),
                stats.removed,
                stats.visited,
                format_steps(&steps)
            );
            FileReport {
                input,
                output: Some(output),
                stats: Some(stats),
                error: None,
                steps,
            }
        }
        Err(e) => {
            tracing::warn!("Failed to process {}: {}", input.display(), e);
            FileReport {
                input,
                output: None,
                stats: None,
                error: Some(FileFailure {
                    code: e.code().to_string(),
                    message: e.to_string(),
                }),
                steps,
            }
        }
    }
}

fn run_file(
    input: &Path,
    output: &Path,
    tolerance: u8,
    steps: &mut Vec<StepTiming>,
) -> Result<FillStats, RemovalError> {
    let mut image = run_step("decode", steps, || codec::decode(input))?;
    let stats = run_step("remove_background", steps, || {
        background::remove_background_in_place(&mut image, tolerance)
    })?;
    run_step("encode", steps, || codec::encode(&image, output))?;

    Ok(stats)
}

/// Mirror the input's subdirectory under the output directory
fn output_path(input: &Path, config: &Config) -> Result<PathBuf, RemovalError> {
    let file_name = naming::output_file_name(input, &config.separator)?;
    let subdir = input
        .strip_prefix(&config.input_dir)
        .ok()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));

    Ok(config.output_dir.join(subdir).join(file_name))
}

fn run_step<T, F>(
    name: &str,
    timings: &mut Vec<StepTiming>,
    step_fn: F,
) -> Result<T, RemovalError>
where
    F: FnOnce() -> Result<T, RemovalError>,
{
    let step_start = Instant::now();
    let result = step_fn()?;
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms: step_start.elapsed().as_millis() as u64,
    });
    Ok(result)
}

fn format_steps(steps: &[StepTiming]) -> String {
    steps
        .iter()
        .map(|s| format!("{} {}ms", s.name, s.time_ms))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn config_for(input: &Path) -> Config {
        Config {
            input_dir: input.to_path_buf(),
            output_dir: input.join("transparent"),
            tolerance: 0,
            separator: "_".to_string(),
            recursive: false,
            jobs: Some(2),
            report: None,
        }
    }

    fn framed_image() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(5, 5, Rgba([255, 255, 255, 255]));
        img.put_pixel(2, 2, Rgba([0, 0, 0, 255]));
        img
    }

    #[test]
    fn test_processes_directory_and_renames_outputs() {
        let dir = tempfile::tempdir().unwrap();
        codec::encode(&framed_image(), &dir.path().join("icon1.png")).unwrap();
        codec::encode(&framed_image(), &dir.path().join("77.PNG")).unwrap();

        let report = run(&config_for(dir.path())).unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.removed_pixels, 48);

        let out = codec::decode(&dir.path().join("transparent/icon_1.png")).unwrap();
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(*out.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert!(dir.path().join("transparent/_77.PNG").exists());
    }

    #[test]
    fn test_failed_file_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_corrupt.png"), b"not an image").unwrap();
        codec::encode(&framed_image(), &dir.path().join("b2.png")).unwrap();

        let report = run(&config_for(dir.path())).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);

        let corrupt = &report.files[0];
        assert!(corrupt.input.ends_with("a_corrupt.png"));
        assert_eq!(corrupt.error.as_ref().unwrap().code, "DECODE_ERROR");
        assert!(corrupt.steps.is_empty());

        let good = &report.files[1];
        assert!(good.is_success());
        let names: Vec<&str> = good.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["decode", "remove_background", "encode"]);
        assert!(dir.path().join("transparent/b_2.png").exists());
    }

    #[test]
    fn test_recursive_run_mirrors_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        codec::encode(&framed_image(), &dir.path().join("set/a1.png")).unwrap();

        let mut config = config_for(dir.path());
        config.recursive = true;
        let report = run(&config).unwrap();
        assert_eq!(report.processed, 1);
        assert!(dir.path().join("transparent/set/a_1.png").exists());

        // Outputs from the first run are not picked up again
        let again = run(&config).unwrap();
        assert_eq!(again.files.len(), 1);
    }

    #[test]
    fn test_report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.png"), b"nope").unwrap();

        let mut config = config_for(dir.path());
        config.report = Some(dir.path().join("reports/run.json"));
        run(&config).unwrap();

        let raw = fs::read_to_string(dir.path().join("reports/run.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["failed"], 1);
        assert_eq!(json["tolerance"], 0);
        assert_eq!(json["files"][0]["error"]["code"], "DECODE_ERROR");
        assert!(json["files"][0].get("output").is_none());
    }

    #[test]
    fn test_extension_case_keeps_outputs_apart() {
        let dir = tempfile::tempdir().unwrap();
        let mut dark = RgbaImage::from_pixel(5, 5, Rgba([0, 0, 0, 255]));
        dark.put_pixel(2, 2, Rgba([255, 255, 255, 255]));
        codec::encode(&framed_image(), &dir.path().join("a1.png")).unwrap();
        codec::encode(&dark, &dir.path().join("a1.PNG")).unwrap();

        let report = run(&config_for(dir.path())).unwrap();

        assert_eq!(report.processed, 2);
        let lower = codec::decode(&dir.path().join("transparent/a_1.png")).unwrap();
        let upper = codec::decode(&dir.path().join("transparent/a_1.PNG")).unwrap();
        assert_eq!(*lower.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(*upper.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_output_overwriting_an_input_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        codec::encode(&framed_image(), &dir.path().join("a1.png")).unwrap();
        codec::encode(&framed_image(), &dir.path().join("a_1.png")).unwrap();
        let before = fs::read(dir.path().join("a_1.png")).unwrap();

        let mut config = config_for(dir.path());
        config.output_dir = dir.path().to_path_buf();
        let report = run(&config).unwrap();

        // a1.png would write a_1.png, which is itself an input
        let blocked = report
            .files
            .iter()
            .find(|f| f.input.ends_with("a1.png"))
            .unwrap();
        assert_eq!(blocked.error.as_ref().unwrap().code, "OUTPUT_COLLISION");
        assert!(blocked.steps.is_empty());

        assert_eq!(report.processed, 1);
        assert!(dir.path().join("a__1.png").exists());
        assert_eq!(fs::read(dir.path().join("a_1.png")).unwrap(), before);
    }

    #[test]
    fn test_second_claim_on_an_output_is_a_collision() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let first = dir.path().join("x1.png");
        let inputs = vec![first.clone(), first.clone(), dir.path().join("y2.png")];

        let planned = plan_jobs(inputs.into_iter(), &config);

        assert_eq!(
            planned[0].output.as_ref().unwrap(),
            &dir.path().join("transparent/x_1.png")
        );
        let err = planned[1].output.as_ref().unwrap_err();
        assert_eq!(err.code(), "OUTPUT_COLLISION");
        assert!(err.to_string().contains("output of"));
        assert!(planned[2].output.is_ok());
    }

    #[test]
    fn test_missing_input_directory_fails_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("absent"));

        let err = run(&config).unwrap_err();
        assert_eq!(err.code(), "DISCOVERY_ERROR");
    }
}
