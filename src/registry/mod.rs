use crate::transform::command::CommandCompressor;
use crate::transform::rapper::SyntaxConverter;
use crate::transform::{Chained, Transform};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use std::env;
use std::path::Path;

/// Compression tools the registry knows how to drive, in registration order.
pub const COMPRESSION_TOOLS: [&str; 5] = ["brotli", "bzip2", "gzip", "xz", "zstd"];

/// The serialization conversion tool.
pub const CONVERSION_TOOL: &str = "rapper";

/// The set of external tools found on the executable search path. Probed
/// once per run and injected into registry construction, so tests can
/// substitute a fixed tool set.
pub struct Capabilities {
    available: FxHashSet<String>,
}

impl Capabilities {
    /// Probes the search path for every known tool.
    pub fn probe() -> Self {
        let mut available = FxHashSet::default();
        for tool in COMPRESSION_TOOLS.iter().copied().chain(std::iter::once(CONVERSION_TOOL)) {
            if find_in_path(tool) {
                available.insert(tool.to_string());
            }
        }
        Capabilities { available }
    }

    /// Builds a fixed capability set, bypassing the search-path probe.
    pub fn from_tools<I, S>(tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Capabilities {
            available: tools.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has(&self, tool: &str) -> bool {
        self.available.contains(tool)
    }
}

fn find_in_path(tool: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| is_executable(&dir.join(tool)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && path
            .metadata()
            .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// The transformations exercised by one run, keyed by unique name.
/// Insertion order fixes report column order; the registry is read-only once
/// built.
pub struct Registry {
    entries: IndexMap<String, Box<dyn Transform>>,
    compressors: Vec<String>,
    formats: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            entries: IndexMap::new(),
            compressors: Vec::new(),
            formats: Vec::new(),
        }
    }

    /// Builds the registry offered by the probed tool set: one direct entry
    /// per available compression tool, and, when the conversion tool is
    /// present, a format entry plus one composed convert-then-compress entry
    /// per registered compressor. Absent tools are omitted; an empty
    /// registry is valid and yields a raw-sizes-only report.
    pub fn from_capabilities(capabilities: &Capabilities, prefixes: &IndexMap<String, String>) -> Self {
        let mut registry = Registry::new();

        for tool in COMPRESSION_TOOLS {
            if !capabilities.has(tool) {
                continue;
            }
            if let Some(compressor) = CommandCompressor::for_tool(tool) {
                registry.register_compressor(Box::new(compressor));
            }
        }

        if capabilities.has(CONVERSION_TOOL) {
            registry.register_format(Box::new(SyntaxConverter::turtle(prefixes.clone())));
            for tool in registry.compressors.clone() {
                let Some(compressor) = CommandCompressor::for_tool(&tool) else {
                    continue;
                };
                let converter = SyntaxConverter::turtle(prefixes.clone());
                let chain_name = format!("{} {}", converter.name(), tool);
                registry.register_chain(Box::new(Chained::new(
                    chain_name,
                    Box::new(converter),
                    Box::new(compressor),
                )));
            }
        }

        registry
    }

    /// Registers a direct compression transformation under its own name.
    pub fn register_compressor(&mut self, transform: Box<dyn Transform>) {
        let name = transform.name().to_string();
        self.compressors.push(name.clone());
        self.entries.insert(name, transform);
    }

    /// Registers a serialization-format transformation under the format name.
    pub fn register_format(&mut self, transform: Box<dyn Transform>) {
        let name = transform.name().to_string();
        self.formats.push(name.clone());
        self.entries.insert(name, transform);
    }

    /// Registers a composed transformation under its combined name.
    pub fn register_chain(&mut self, transform: Box<dyn Transform>) {
        self.entries.insert(transform.name().to_string(), transform);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Transform> {
        self.entries.get(name).map(|transform| transform.as_ref())
    }

    /// Names of the direct compression entries, in registration order.
    pub fn compressors(&self) -> &[String] {
        &self.compressors
    }

    /// Names of the serialization-format entries, in registration order.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::rapper::default_prefixes;

    #[test]
    fn registry_from_no_tools_is_empty() {
        let capabilities = Capabilities::from_tools(Vec::<String>::new());
        let registry = Registry::from_capabilities(&capabilities, &default_prefixes());
        assert!(registry.is_empty());
        assert!(registry.compressors().is_empty());
        assert!(registry.formats().is_empty());
    }

    #[test]
    fn compressors_alone_register_direct_entries_only() {
        let capabilities = Capabilities::from_tools(["gzip", "bzip2"]);
        let registry = Registry::from_capabilities(&capabilities, &default_prefixes());

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["bzip2", "gzip"]);
        let compressors: Vec<&str> = registry.compressors().iter().map(String::as_str).collect();
        assert_eq!(compressors, ["bzip2", "gzip"]);
        assert!(registry.formats().is_empty());
    }

    #[test]
    fn converter_adds_format_and_composed_entries() {
        let capabilities = Capabilities::from_tools(["gzip", "bzip2", "rapper"]);
        let registry = Registry::from_capabilities(&capabilities, &default_prefixes());

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            ["bzip2", "gzip", "Turtle", "Turtle bzip2", "Turtle gzip"]
        );
        let formats: Vec<&str> = registry.formats().iter().map(String::as_str).collect();
        assert_eq!(formats, ["Turtle"]);
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn converter_without_compressors_registers_the_format_alone() {
        let capabilities = Capabilities::from_tools(["rapper"]);
        let registry = Registry::from_capabilities(&capabilities, &default_prefixes());

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["Turtle"]);
        assert!(registry.compressors().is_empty());
    }
}
