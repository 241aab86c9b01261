use crate::benchmark::InputResult;
use crate::registry::Registry;
use prettytable::{Cell, Row, Table};
use std::error::Error;
use std::fs;
use std::path::Path;

/// Collects the serialization formats observed across all results, in
/// first-discovered order. The column set is the union over every input so
/// the table stays rectangular.
fn observed_formats(results: &[InputResult]) -> Vec<String> {
    let mut formats: Vec<String> = Vec::new();
    for result in results {
        for format in result.formats.keys() {
            if !formats.iter().any(|known| known == format) {
                formats.push(format.clone());
            }
        }
    }
    formats
}

/// Builds the full header before any row is written: one raw-size column
/// pair per format, then four derived columns per (format, compressor) pair.
fn csv_header(formats: &[String], compressors: &[String]) -> Vec<String> {
    let mut header = vec!["Input".to_string()];
    for format in formats {
        header.push(format!("{} bytes", format));
        header.push(format!("{} human", format));
        for compressor in compressors {
            header.push(format!("{} {} bytes", format, compressor));
            header.push(format!("{} {} human", format, compressor));
            header.push(format!("{} {} compression ratio", format, compressor));
            header.push(format!("{} {} space savings", format, compressor));
        }
    }
    header
}

/// Writes the tabular report from scratch, one row per input in catalog
/// order. Cells for a format an input lacks are left blank.
pub fn write_csv_report(
    path: &Path,
    results: &[InputResult],
    registry: &Registry,
) -> Result<(), Box<dyn Error>> {
    let formats = observed_formats(results);
    let compressors = registry.compressors();

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| format!("failed to create {}: {}", path.display(), e))?;
    writer.write_record(&csv_header(&formats, compressors))?;

    for result in results {
        let mut record = vec![result.input.clone()];
        for format in &formats {
            match result.formats.get(format) {
                Some(group) => {
                    record.push(group.bytes.to_string());
                    record.push(group.human.clone());
                    for compressor in compressors {
                        match group.compressors.get(compressor) {
                            Some(cell) => {
                                record.push(cell.bytes.to_string());
                                record.push(cell.human.clone());
                                record.push(format!("{:.2}", cell.ratio));
                                record.push(format!("{:.2}", cell.savings));
                            }
                            None => record.extend(std::iter::repeat(String::new()).take(4)),
                        }
                    }
                }
                None => {
                    let blank_cells = 2 + compressors.len() * 4;
                    record.extend(std::iter::repeat(String::new()).take(blank_cells));
                }
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Dumps the raw results as JSON next to the tabular report.
pub fn write_json_report(path: &Path, results: &[InputResult]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json)?;
    Ok(())
}

/// Prints a per-format summary table to stdout.
pub fn print_results(results: &[InputResult], registry: &Registry) {
    let compressors = registry.compressors();

    for format in observed_formats(results) {
        let mut table = Table::new();
        let mut header_cells = vec![Cell::new("Input"), Cell::new("Raw")];
        for compressor in compressors {
            header_cells.push(Cell::new(compressor));
            header_cells.push(Cell::new(&format!("{} ratio", compressor)));
        }
        table.add_row(Row::new(header_cells));

        for result in results {
            let Some(group) = result.formats.get(&format) else {
                continue;
            };
            let mut cells = vec![Cell::new(&result.input), Cell::new(&group.human)];
            for compressor in compressors {
                match group.compressors.get(compressor) {
                    Some(cell) => {
                        cells.push(Cell::new(&cell.human));
                        cells.push(Cell::new(&format!("{:.2}", cell.ratio)));
                    }
                    None => {
                        cells.push(Cell::new(""));
                        cells.push(Cell::new(""));
                    }
                }
            }
            table.add_row(Row::new(cells));
        }

        println!("\nResults for format: {}", format);
        table.printstd();
    }
}
