//! External plugin execution.
//!
//! Native plugins are not loaded into this process. An [`ExternalBackend`]
//! turns `(plugin path, params, buffer)` into a new buffer however it likes;
//! the bundled [`CommandBackend`] shells out to a host executable and
//! exchanges float WAV files with it.

use std::path::{Path, PathBuf};
use std::process::Command;

use ambiance_core::{Buffer, ParamMap};
use serde_json::Value;

use crate::error::{RackError, RackResult};

/// Environment variable naming the plugin host executable.
pub const PLUGIN_HOST_ENV: &str = "AMBIANCE_PLUGIN_HOST";

/// Something that can run a native plugin over a buffer.
///
/// Backends that wrap a non-reentrant resource must serialize access
/// themselves; the host calls `process` from whichever thread renders.
pub trait ExternalBackend: Send + Sync {
    /// Short human-readable backend name.
    fn name(&self) -> &str;

    /// Whether the backend can run plugins at all right now.
    fn is_available(&self) -> bool;

    /// Run the plugin at `plugin` over `input`.
    fn process(
        &self,
        plugin: &Path,
        params: &ParamMap,
        input: &[f32],
        sample_rate: u32,
    ) -> RackResult<Buffer>;
}

/// Backend that runs one host process per slot.
///
/// The host is invoked as
/// `HOST --plugin P --input IN.wav --output OUT.wav --sample-rate SR [--param k=v]...`
/// and must write a mono 32-bit float WAV to `OUT.wav`. Every call uses its
/// own temporary directory and process, so concurrent calls are safe.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    executable: PathBuf,
}

impl CommandBackend {
    /// Backend running `executable`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Backend configured by [`PLUGIN_HOST_ENV`], if set and non-empty.
    pub fn from_env() -> Option<Self> {
        std::env::var_os(PLUGIN_HOST_ENV)
            .filter(|v| !v.is_empty())
            .map(Self::new)
    }

    /// Path of the host executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn slug_for(plugin: &Path) -> String {
        plugin
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| plugin.display().to_string())
    }
}

impl ExternalBackend for CommandBackend {
    fn name(&self) -> &str {
        "command"
    }

    fn is_available(&self) -> bool {
        self.executable.is_file()
    }

    fn process(
        &self,
        plugin: &Path,
        params: &ParamMap,
        input: &[f32],
        sample_rate: u32,
    ) -> RackResult<Buffer> {
        if !self.is_available() {
            return Err(RackError::Unavailable(format!(
                "plugin host '{}' not found",
                self.executable.display()
            )));
        }

        let scratch = tempfile::tempdir().map_err(|e| RackError::create_dir("<tempdir>", e))?;
        let input_path = scratch.path().join("input.wav");
        let output_path = scratch.path().join("output.wav");
        write_float_wav(&input_path, input, sample_rate)?;

        let mut command = Command::new(&self.executable);
        command
            .arg("--plugin")
            .arg(plugin)
            .arg("--input")
            .arg(&input_path)
            .arg("--output")
            .arg(&output_path)
            .arg("--sample-rate")
            .arg(sample_rate.to_string());
        for (key, value) in params {
            command.arg("--param").arg(format!("{key}={}", param_arg(value)));
        }

        tracing::debug!(plugin = %plugin.display(), host = %self.executable.display(), "running external plugin");
        let output = command
            .output()
            .map_err(|e| RackError::external(Self::slug_for(plugin), e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RackError::external(
                Self::slug_for(plugin),
                format!("host exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let (samples, rate) = read_float_wav(&output_path)?;
        if rate != sample_rate {
            return Err(RackError::InvalidOutput {
                slug: Self::slug_for(plugin),
                reason: format!("sample rate {rate} Hz, expected {sample_rate} Hz"),
            });
        }
        Ok(samples)
    }
}

fn param_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write `samples` as a mono 32-bit float WAV.
pub fn write_float_wav(path: &Path, samples: &[f32], sample_rate: u32) -> RackResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let to_io = |e: hound::Error| RackError::write_file(path, std::io::Error::other(e));
    let mut writer = hound::WavWriter::create(path, spec).map_err(to_io)?;
    for &sample in samples {
        writer.write_sample(sample).map_err(to_io)?;
    }
    writer.finalize().map_err(to_io)
}

/// Read a WAV file as mono `f32`, averaging channels and scaling integer
/// samples to `[-1, 1]`. Returns the samples and the file's sample rate.
pub fn read_float_wav(path: &Path) -> RackResult<(Buffer, u32)> {
    let to_io = |e: hound::Error| RackError::read_file(path, std::io::Error::other(e));
    let reader = hound::WavReader::open(path).map_err(to_io)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(to_io)?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(to_io)?
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };
    Ok((samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_executable_is_unavailable() {
        let backend = CommandBackend::new("/no/such/host-binary");
        assert!(!backend.is_available());
        let err = backend
            .process(Path::new("/p/x.vst3"), &ParamMap::new(), &[0.0; 4], 44100)
            .unwrap_err();
        assert!(matches!(err, RackError::Unavailable(_)));
    }

    #[test]
    fn float_wav_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("buf.wav");
        let samples = vec![0.0, 0.25, -0.5, 0.999];
        write_float_wav(&path, &samples, 22050).unwrap();
        assert_eq!(read_float_wav(&path).unwrap(), (samples, 22050));
    }

    /// Host script that ignores its input and copies `fixture` to `--output`.
    #[cfg(unix)]
    fn copying_host(dir: &Path, fixture: &Path) -> CommandBackend {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("host.sh");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = --output ]; then out=\"$2\"; fi\n  shift\ndone\ncp '{}' \"$out\"\n",
                fixture.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        CommandBackend::new(script)
    }

    #[cfg(unix)]
    #[test]
    fn output_at_another_sample_rate_is_rejected() {
        let dir = TempDir::new().unwrap();
        let fixture = dir.path().join("fixture.wav");
        write_float_wav(&fixture, &[0.1, 0.2, 0.3, 0.4], 22050).unwrap();
        let backend = copying_host(dir.path(), &fixture);
        let plugin = Path::new("/p/Shift.vst3");

        let err = backend
            .process(plugin, &ParamMap::new(), &[0.0; 4], 44100)
            .unwrap_err();
        assert!(matches!(err, RackError::InvalidOutput { .. }), "{err}");

        let out = backend
            .process(plugin, &ParamMap::new(), &[0.0; 4], 22050)
            .unwrap();
        assert_eq!(out, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn params_render_as_plain_text() {
        assert_eq!(param_arg(&Value::from(6.5)), "6.5");
        assert_eq!(param_arg(&Value::from("-3dB")), "-3dB");
        assert_eq!(param_arg(&Value::Bool(true)), "true");
    }
}
