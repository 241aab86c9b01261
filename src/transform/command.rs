use crate::transform::Transform;
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// An external compression tool invoked as a subprocess at its maximum
/// compression level. The input file is preserved and the compressed stream
/// is captured from the tool's standard output into
/// `<input file name>.<extension>` inside the output directory.
pub struct CommandCompressor {
    tool: &'static str,
    args: &'static [&'static str],
    extension: &'static str,
}

impl CommandCompressor {
    /// Returns the compressor for a known tool name, if there is one.
    pub fn for_tool(tool: &str) -> Option<Self> {
        match tool {
            "brotli" => Some(CommandCompressor {
                tool: "brotli",
                args: &["--keep", "-q", "11", "--stdout"],
                extension: "br",
            }),
            "bzip2" => Some(CommandCompressor {
                tool: "bzip2",
                args: &["-9", "--keep", "--stdout"],
                extension: "bz2",
            }),
            "gzip" => Some(CommandCompressor {
                tool: "gzip",
                args: &["-9", "--keep", "--stdout"],
                extension: "gz",
            }),
            "xz" => Some(CommandCompressor {
                tool: "xz",
                args: &["-9", "--keep", "--stdout"],
                extension: "xz",
            }),
            "zstd" => Some(CommandCompressor {
                tool: "zstd",
                args: &["-19", "--keep", "--stdout"],
                extension: "zst",
            }),
            _ => None,
        }
    }
}

impl Transform for CommandCompressor {
    fn apply(&self, input_path: &Path, output_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
        let file_name = input_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| format!("input path {} has no file name", input_path.display()))?;
        let output_path = output_dir.join(format!("{}.{}", file_name, self.extension));
        let output_file = File::create(&output_path)
            .map_err(|e| format!("failed to create {}: {}", output_path.display(), e))?;

        let status = Command::new(self.tool)
            .args(self.args)
            .arg(input_path)
            .stdout(Stdio::from(output_file))
            .status()
            .map_err(|e| format!("failed to start {}: {}", self.tool, e))?;
        if !status.success() {
            return Err(format!(
                "{} exited with {} while compressing {}",
                self.tool,
                status,
                input_path.display()
            )
            .into());
        }

        Ok(output_path)
    }

    fn name(&self) -> &str {
        self.tool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tools_are_constructible() {
        for tool in ["brotli", "bzip2", "gzip", "xz", "zstd"] {
            let compressor = CommandCompressor::for_tool(tool).expect("known tool");
            assert_eq!(compressor.name(), tool);
        }
        assert!(CommandCompressor::for_tool("lzma").is_none());
    }
}
