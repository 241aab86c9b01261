use rdf_compression_benchmark::benchmark::{prepare_output_dir, run_benchmark};
use rdf_compression_benchmark::catalog::discover_inputs;
use rdf_compression_benchmark::registry::{Capabilities, Registry};
use rdf_compression_benchmark::report::{print_results, write_csv_report, write_json_report};
use rdf_compression_benchmark::transform::rapper::{default_prefixes, load_prefixes};
use std::env;
use std::path::Path;
use std::process;

fn main() {
    // Get the command-line arguments
    let args: Vec<String> = env::args().collect();

    // Check if a root directory argument is provided
    if args.len() < 2 {
        eprintln!("Usage: {} <root-directory> [prefixes.json]", args[0]);
        eprintln!("  <root-directory>  - Directory containing an input/ tree of .nt files");
        eprintln!("  [prefixes.json]   - Optional JSON object of namespace prefixes for Turtle output");
        process::exit(1);
    }

    // Check if the path is a valid directory
    let root = Path::new(&args[1]);
    if !root.is_dir() {
        eprintln!("Error: {} is not a valid directory.", args[1]);
        process::exit(1);
    }

    let prefixes = match args.get(2) {
        Some(path) => load_prefixes(path).unwrap_or_else(|e| {
            eprintln!("Error: failed to load prefixes from '{}': {}", path, e);
            process::exit(1);
        }),
        None => default_prefixes(),
    };

    // Probe the host once and build the transformation set for this run
    let capabilities = Capabilities::probe();
    let registry = Registry::from_capabilities(&capabilities, &prefixes);
    if registry.is_empty() {
        println!("No compression or conversion tools found; reporting raw sizes only.");
    } else {
        let names: Vec<&str> = registry.names().collect();
        println!("Registered transformations: {}", names.join(", "));
    }

    // Clear artifacts from any previous run
    let output_dir = root.join("output");
    if let Err(e) = prepare_output_dir(&output_dir) {
        eprintln!("Error: failed to prepare {}: {}", output_dir.display(), e);
        process::exit(1);
    }

    let inputs = discover_inputs(&root.join("input")).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    println!("Discovered {} input file(s)", inputs.len());

    let results = run_benchmark(&inputs, &registry, &output_dir).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let csv_path = root.join("results.csv");
    if let Err(e) = write_csv_report(&csv_path, &results, &registry) {
        eprintln!("Error: failed to write {}: {}", csv_path.display(), e);
        process::exit(1);
    }
    let json_path = root.join("results.json");
    if let Err(e) = write_json_report(&json_path, &results) {
        eprintln!("Error: failed to write {}: {}", json_path.display(), e);
        process::exit(1);
    }

    print_results(&results, &registry);
}
