use crate::catalog::{InputFile, NATIVE_FORMAT};
use crate::registry::Registry;
use crate::transform::Transform;
use indexmap::IndexMap;
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Derived measurements for one (format, compressor) cell.
#[derive(Serialize, Clone, Debug)]
pub struct CompressionMetrics {
    pub bytes: u64,
    pub human: String,
    pub ratio: f64,
    pub savings: f64,
}

/// Measurements for one serialization format of an input: the raw artifact
/// size plus one cell per compressor that ran against it.
#[derive(Serialize, Clone)]
pub struct FormatMetrics {
    pub bytes: u64,
    pub human: String,
    pub compressors: IndexMap<String, CompressionMetrics>,
}

/// One benchmarked input with every format observed for it.
#[derive(Serialize, Clone)]
pub struct InputResult {
    pub input: String,
    pub formats: IndexMap<String, FormatMetrics>,
}

/// Formats a byte count as a binary-prefixed human-readable size with one
/// decimal place.
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"] {
        if size < 1024.0 {
            return format!("{:.1}{}B", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1}YiB", size)
}

/// Removes any artifacts left by a previous run and recreates the output
/// directory, so no run observes stale artifacts.
pub fn prepare_output_dir(output_dir: &Path) -> Result<(), Box<dyn Error>> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}

/// Runs every registered transformation against every input in registry
/// order, measuring artifact sizes and deriving the per-pair metrics.
///
/// Direct compressor entries fill the native format's group. Each
/// format-conversion entry materializes the alternate artifact whose size
/// anchors that format's group, and the composed convert-then-compress
/// entries fill it. Any failing invocation aborts the run.
pub fn run_benchmark(
    inputs: &[InputFile],
    registry: &Registry,
    output_dir: &Path,
) -> Result<Vec<InputResult>, Box<dyn Error>> {
    let mut results = Vec::with_capacity(inputs.len());

    for input in inputs {
        let mut formats: IndexMap<String, FormatMetrics> = IndexMap::new();

        let native_bytes = file_size(&input.path)?;
        let mut native_group = FormatMetrics {
            bytes: native_bytes,
            human: human_size(native_bytes),
            compressors: IndexMap::new(),
        };
        for compressor_name in registry.compressors() {
            let Some(transform) = registry.get(compressor_name) else {
                continue;
            };
            let compressed_bytes = measure(transform, input, output_dir)?;
            let metrics = derive_metrics(&input.name, compressor_name, native_bytes, compressed_bytes)?;
            native_group.compressors.insert(compressor_name.clone(), metrics);
        }
        formats.insert(NATIVE_FORMAT.to_string(), native_group);

        for format_name in registry.formats() {
            let Some(converter) = registry.get(format_name) else {
                continue;
            };
            println!("converting {} to {}", input.path.display(), format_name);
            let converted_path = converter.apply(&input.path, output_dir)?;
            let converted_bytes = file_size(&converted_path)?;
            let mut format_group = FormatMetrics {
                bytes: converted_bytes,
                human: human_size(converted_bytes),
                compressors: IndexMap::new(),
            };

            for compressor_name in registry.compressors() {
                let chain_name = format!("{} {}", format_name, compressor_name);
                let Some(chain) = registry.get(&chain_name) else {
                    continue;
                };
                let compressed_bytes = measure(chain, input, output_dir)?;
                let metrics = derive_metrics(&input.name, &chain_name, converted_bytes, compressed_bytes)?;
                format_group.compressors.insert(compressor_name.clone(), metrics);
            }
            formats.insert(format_name.clone(), format_group);
        }

        results.push(InputResult {
            input: input.name.clone(),
            formats,
        });
    }

    Ok(results)
}

/// Applies one transformation to an input's original artifact and measures
/// the resulting file.
fn measure(
    transform: &dyn Transform,
    input: &InputFile,
    output_dir: &Path,
) -> Result<u64, Box<dyn Error>> {
    println!("compressing {} with {}", input.path.display(), transform.name());
    let artifact_path = transform.apply(&input.path, output_dir)?;
    let compressed_bytes = file_size(&artifact_path)?;
    println!(
        "compressed {} with {} to {}: {} bytes",
        input.path.display(),
        transform.name(),
        artifact_path.display(),
        compressed_bytes
    );
    Ok(compressed_bytes)
}

/// Computes compression ratio and space savings for one measured pair.
/// A zero-byte measurement on either side is rejected rather than being
/// propagated as an infinity or NaN.
fn derive_metrics(
    input_name: &str,
    transform_name: &str,
    raw_bytes: u64,
    compressed_bytes: u64,
) -> Result<CompressionMetrics, Box<dyn Error>> {
    if raw_bytes == 0 {
        return Err(format!(
            "cannot compute metrics for '{}' with '{}': raw size is zero",
            input_name, transform_name
        )
        .into());
    }
    if compressed_bytes == 0 {
        return Err(format!(
            "cannot compute metrics for '{}' with '{}': compressed size is zero",
            input_name, transform_name
        )
        .into());
    }
    Ok(CompressionMetrics {
        bytes: compressed_bytes,
        human: human_size(compressed_bytes),
        ratio: raw_bytes as f64 / compressed_bytes as f64,
        savings: 1.0 - compressed_bytes as f64 / raw_bytes as f64,
    })
}

fn file_size(path: &Path) -> Result<u64, Box<dyn Error>> {
    Ok(fs::metadata(path)?.len())
}
