//! Still and frame-sequence processing sessions
//!
//! The session owns everything the engine deliberately does not: the seed
//! sequence, the parameter snapshot, frame discovery and ordering, and image
//! file I/O. Results are published strictly in source-frame order; a frame
//! the pipeline cannot convert is dropped with a warning rather than
//! reordered or retried.

use std::path::{Path, PathBuf};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{FilmLookError, Result, SessionError},
    params::EffectParameters,
    pipeline::Pipeline,
    raster::RasterImage,
};

/// The caller-owned seed scalar and its update rule
///
/// The seed advances by a uniform random step in [0.1, 0.3] exactly once per
/// processed frame and once per parameter change. The step size is random
/// but the update points are not, so seed evolution is deterministic with
/// respect to call order for a fixed generator seed.
#[derive(Debug)]
pub struct SeedSequence {
    value: f64,
    rng: SmallRng,
}

impl SeedSequence {
    /// Start from entropy
    pub fn new() -> Self {
        Self {
            value: 0.0,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Start from a fixed generator seed (reproducible runs)
    pub fn from_seed(seed: u64) -> Self {
        Self {
            value: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The current seed value
    pub fn current(&self) -> f64 {
        self.value
    }

    /// Advance by one step and return the new value
    pub fn advance(&mut self) -> f64 {
        self.value += self.rng.gen_range(0.1..=0.3);
        self.value
    }
}

impl Default for SeedSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// A numbered source frame discovered in a sequence directory
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// Path to the image file
    pub path: PathBuf,

    /// Sequence number (from filenames like "01_intro.png")
    pub sequence_number: u32,

    /// Name/identifier for the frame
    pub name: String,
}

impl SourceFrame {
    /// Parse sequence number and name from a filename like "01_intro.png"
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Option<Self> {
        let path = path.into();
        let filename = path.file_stem()?.to_str()?;

        let parts: Vec<&str> = filename.splitn(2, '_').collect();
        if parts.len() != 2 {
            return None;
        }

        let sequence_number = parts[0].parse().ok()?;
        let name = parts[1].to_string();

        Some(Self {
            path,
            sequence_number,
            name,
        })
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        self.path.extension()?.to_str()
    }

    /// Check if this is a supported image format
    pub fn is_supported(&self) -> bool {
        matches!(
            self.extension().map(|e| e.to_ascii_lowercase()).as_deref(),
            Some("png") | Some("jpg") | Some("jpeg")
        )
    }
}

/// Outcome of a sequence run
#[derive(Debug, Clone, Default)]
pub struct SequenceReport {
    /// Frames processed and written
    pub processed: usize,
    /// Frames dropped because the pipeline produced no output
    pub dropped: usize,
}

/// A processing session: one parameter snapshot, one seed sequence
pub struct Session {
    params: EffectParameters,
    seeds: SeedSequence,
}

impl Session {
    /// Build a session from configuration
    ///
    /// Clamps the configured sliders, seeds the sequence, and sizes the
    /// global worker pool.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        // The global pool can only be built once per process; later sessions
        // keep whatever size the first one chose.
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(config.session.processing_threads)
            .build_global();

        let seeds = match config.session.seed {
            Some(seed) => SeedSequence::from_seed(seed),
            None => SeedSequence::new(),
        };

        Ok(Self {
            params: config.effective_params(),
            seeds,
        })
    }

    /// Current parameter snapshot
    pub fn params(&self) -> &EffectParameters {
        &self.params
    }

    /// Replace the parameter snapshot
    ///
    /// Advances the seed once, mirroring the one-step-per-parameter-change
    /// rule; callers may invoke this on every micro-change.
    pub fn update_params(&mut self, params: EffectParameters) {
        self.params = params.clamped();
        self.seeds.advance();
        debug!(seed = self.seeds.current(), "parameters updated");
    }

    /// Process a single still image file
    pub fn process_still<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input: P,
        output: Q,
    ) -> Result<()> {
        let input = input.as_ref();
        let output = output.as_ref();

        let raster = load_raster(input)?;
        let seed = self.seeds.advance();
        info!(input = %input.display(), seed, "processing still");

        let processed = Pipeline::process(&raster, &self.params, seed)?;
        processed
            .save(output)
            .map_err(|e| SessionError::SaveFailed {
                path: output.display().to_string(),
                reason: e.to_string(),
            })?;

        info!(output = %output.display(), "still saved");
        Ok(())
    }

    /// Process every numbered frame in a directory, in sequence order
    ///
    /// Outputs are written in source-frame order; a frame that yields no
    /// pipeline output is dropped (never reordered) and counted in the
    /// report.
    pub fn process_sequence<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<SequenceReport> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();

        let frames = discover_frames(input_dir)?;
        info!(
            count = frames.len(),
            input = %input_dir.display(),
            "processing frame sequence"
        );
        std::fs::create_dir_all(output_dir)?;

        let mut report = SequenceReport::default();
        for frame in &frames {
            let raster = load_raster(&frame.path)?;
            let seed = self.seeds.advance();

            match Pipeline::process(&raster, &self.params, seed) {
                Ok(processed) => {
                    let out_path = output_dir
                        .join(format!("{:02}_{}.png", frame.sequence_number, frame.name));
                    processed
                        .save(&out_path)
                        .map_err(|e| SessionError::SaveFailed {
                            path: out_path.display().to_string(),
                            reason: e.to_string(),
                        })?;
                    debug!(frame = frame.sequence_number, "frame written");
                    report.processed += 1;
                }
                Err(e) => {
                    warn!(frame = frame.sequence_number, error = %e, "frame dropped");
                    report.dropped += 1;
                }
            }
        }

        info!(
            processed = report.processed,
            dropped = report.dropped,
            "sequence complete"
        );
        Ok(report)
    }
}

/// Discover the numbered frames of a sequence directory, sorted by number
fn discover_frames(dir: &Path) -> Result<Vec<SourceFrame>> {
    let mut frames: Vec<SourceFrame> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| SourceFrame::from_path(entry.path()))
        .filter(|frame| frame.is_supported())
        .collect();

    if frames.is_empty() {
        return Err(SessionError::NoFramesFound {
            path: dir.display().to_string(),
        }
        .into());
    }

    frames.sort_by_key(|frame| frame.sequence_number);
    Ok(frames)
}

/// Load an image file into the working format
fn load_raster(path: &Path) -> Result<RasterImage> {
    let buffer = image::open(path)
        .map_err(|_| {
            FilmLookError::from(SessionError::LoadFailed {
                path: path.display().to_string(),
            })
        })?
        .to_rgba8();
    Ok(RasterImage::from_rgba8(&buffer))
}
