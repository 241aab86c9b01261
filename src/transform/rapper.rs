use crate::transform::Transform;
use indexmap::IndexMap;
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Re-serializes an RDF file by invoking rapper, capturing the converted
/// stream from its standard output into `<input stem>.<extension>`.
pub struct SyntaxConverter {
    format_name: &'static str,
    input_syntax: &'static str,
    output_syntax: &'static str,
    extension: &'static str,
    prefixes: IndexMap<String, String>,
}

impl SyntaxConverter {
    /// N-Triples to Turtle. Turtle output needs the namespace prefixes it
    /// may abbreviate with, passed as `-f xmlns:...` declarations.
    pub fn turtle(prefixes: IndexMap<String, String>) -> Self {
        SyntaxConverter {
            format_name: "Turtle",
            input_syntax: "ntriples",
            output_syntax: "turtle",
            extension: "ttl",
            prefixes,
        }
    }
}

impl Transform for SyntaxConverter {
    fn apply(&self, input_path: &Path, output_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
        let stem = input_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format!("input path {} has no file stem", input_path.display()))?;
        let output_path = output_dir.join(format!("{}.{}", stem, self.extension));
        let output_file = File::create(&output_path)
            .map_err(|e| format!("failed to create {}: {}", output_path.display(), e))?;

        let mut command = Command::new("rapper");
        command
            .arg("-i")
            .arg(self.input_syntax)
            .arg("-o")
            .arg(self.output_syntax);
        for (prefix, uri) in &self.prefixes {
            command.arg("-f").arg(format!("xmlns:{}=\"{}\"", prefix, uri));
        }
        let status = command
            .arg(input_path)
            .stdout(Stdio::from(output_file))
            .status()
            .map_err(|e| format!("failed to start rapper: {}", e))?;
        if !status.success() {
            return Err(format!(
                "rapper exited with {} while converting {} to {}",
                status,
                input_path.display(),
                self.format_name
            )
            .into());
        }

        Ok(output_path)
    }

    fn name(&self) -> &str {
        self.format_name
    }
}

/// Namespace prefixes declared on every Turtle conversion by default,
/// covering the vocabularies common in thesaurus-style datasets.
pub fn default_prefixes() -> IndexMap<String, String> {
    [
        ("dcat", "http://www.w3.org/ns/dcat#"),
        ("dct", "http://purl.org/dc/terms/"),
        ("owl", "http://www.w3.org/2002/07/owl#"),
        ("meshv", "http://id.nlm.nih.gov/mesh/vocab#"),
        ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
        ("skos", "http://www.w3.org/2004/02/skos/core#"),
        ("skos-thes", "http://purl.org/iso25964/skos-thes#"),
        ("skos-xl", "http://www.w3.org/2008/05/skos-xl#"),
        ("xkos", "http://rdf-vocabulary.ddialliance.org/xkos#"),
        ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ]
    .into_iter()
    .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
    .collect()
}

/// Loads a prefix-to-namespace map from a JSON object file.
pub fn load_prefixes<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, String>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    let prefixes: IndexMap<String, String> = serde_json::from_str(&content)?;
    Ok(prefixes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_file_round_trips_in_declaration_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("prefixes.json");
        fs::write(
            &path,
            r#"{"skos": "http://www.w3.org/2004/02/skos/core#", "dct": "http://purl.org/dc/terms/"}"#,
        )
        .expect("write prefix file");

        let prefixes = load_prefixes(&path).expect("load prefixes");
        let keys: Vec<&str> = prefixes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["skos", "dct"]);
        assert_eq!(prefixes["dct"], "http://purl.org/dc/terms/");
    }
}
