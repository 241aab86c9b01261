pub mod command;
pub mod rapper;

use std::error::Error;
use std::path::{Path, PathBuf};

/// Represents a trait for transformations that turn one file into another.
pub trait Transform {
    /// Applies the transformation to `input_path`, writing a new file into
    /// `output_dir` and returning its path. The input file is never modified
    /// or deleted; a failing tool invocation is propagated as an error.
    fn apply(&self, input_path: &Path, output_dir: &Path) -> Result<PathBuf, Box<dyn Error>>;

    /// Returns the name of the transformation.
    fn name(&self) -> &str;
}

/// Two transformations chained into one: the first stage's output file
/// becomes the second stage's input. Chains of any depth are built by
/// nesting. Order is meaningful: convert-then-compress is not the same
/// artifact as compress-then-convert.
pub struct Chained {
    name: String,
    first: Box<dyn Transform>,
    second: Box<dyn Transform>,
}

impl Chained {
    pub fn new(name: impl Into<String>, first: Box<dyn Transform>, second: Box<dyn Transform>) -> Self {
        Chained {
            name: name.into(),
            first,
            second,
        }
    }
}

impl Transform for Chained {
    fn apply(&self, input_path: &Path, output_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
        let intermediate_path = self.first.apply(input_path, output_dir)?;
        self.second.apply(&intermediate_path, output_dir)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Appends a fixed tag to the input bytes, standing in for a real tool.
    struct Tagger {
        tag: &'static str,
    }

    impl Transform for Tagger {
        fn apply(&self, input_path: &Path, output_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
            let file_name = input_path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or("input path has no file name")?;
            let output_path = output_dir.join(format!("{}.{}", file_name, self.tag));
            let mut bytes = fs::read(input_path)?;
            bytes.extend_from_slice(self.tag.as_bytes());
            fs::write(&output_path, bytes)?;
            Ok(output_path)
        }

        fn name(&self) -> &str {
            self.tag
        }
    }

    #[test]
    fn chained_matches_sequential_application() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input_path = temp.path().join("data.nt");
        fs::write(&input_path, b"<a> <b> <c> .").expect("write input");

        let chained = Chained::new(
            "one two",
            Box::new(Tagger { tag: "one" }),
            Box::new(Tagger { tag: "two" }),
        );
        let chained_dir = temp.path().join("chained");
        fs::create_dir_all(&chained_dir).expect("create output dir");
        let chained_output = chained.apply(&input_path, &chained_dir).expect("apply chain");

        let manual_dir = temp.path().join("manual");
        fs::create_dir_all(&manual_dir).expect("create output dir");
        let first = Tagger { tag: "one" };
        let second = Tagger { tag: "two" };
        let intermediate = first.apply(&input_path, &manual_dir).expect("apply first");
        let manual_output = second.apply(&intermediate, &manual_dir).expect("apply second");

        let chained_bytes = fs::read(&chained_output).expect("read chained output");
        let manual_bytes = fs::read(&manual_output).expect("read manual output");
        assert_eq!(chained_bytes, manual_bytes);
        assert_eq!(chained.name(), "one two");
    }

    #[test]
    fn chaining_order_changes_the_artifact() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input_path = temp.path().join("data.nt");
        fs::write(&input_path, b"<a> <b> <c> .").expect("write input");

        let forward = Chained::new(
            "one two",
            Box::new(Tagger { tag: "one" }),
            Box::new(Tagger { tag: "two" }),
        );
        let reversed = Chained::new(
            "two one",
            Box::new(Tagger { tag: "two" }),
            Box::new(Tagger { tag: "one" }),
        );

        let forward_dir = temp.path().join("forward");
        fs::create_dir_all(&forward_dir).expect("create output dir");
        let reversed_dir = temp.path().join("reversed");
        fs::create_dir_all(&reversed_dir).expect("create output dir");

        let forward_output = forward.apply(&input_path, &forward_dir).expect("apply forward");
        let reversed_output = reversed.apply(&input_path, &reversed_dir).expect("apply reversed");

        let forward_bytes = fs::read(&forward_output).expect("read forward output");
        let reversed_bytes = fs::read(&reversed_output).expect("read reversed output");
        assert_ne!(forward_bytes, reversed_bytes);
    }

    #[test]
    fn applying_a_transformation_leaves_the_input_untouched() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input_path = temp.path().join("data.nt");
        fs::write(&input_path, b"<a> <b> <c> .").expect("write input");

        let tagger = Tagger { tag: "one" };
        tagger.apply(&input_path, temp.path()).expect("apply");

        let input_bytes = fs::read(&input_path).expect("read input");
        assert_eq!(input_bytes, b"<a> <b> <c> .");
    }
}
