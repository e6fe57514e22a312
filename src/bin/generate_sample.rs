//! Writes a synthetic launch table as `spacex_launch_dash.csv` and
//! `spacex_launch_dash.parquet` into the given directory (default `.`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const FLIGHTS: i64 = 56;

#[derive(Debug, Parser)]
#[command(author, version, about = "Write a synthetic SpaceX launch table")]
struct Args {
    /// Directory to write the CSV and Parquet files into
    #[arg(default_value = ".")]
    out_dir: PathBuf,
}

/// Booster generations in flight order: (category, version prefix,
/// success probability, mean payload kg, payload std-dev kg).
const ERAS: [(&str, &str, f64, f64, f64); 5] = [
    ("v1.0", "F9 v1.0", 0.2, 400.0, 300.0),
    ("v1.1", "F9 v1.1", 0.3, 2500.0, 1200.0),
    ("FT", "F9 FT", 0.7, 4500.0, 1800.0),
    ("B4", "F9 B4", 0.6, 5000.0, 2000.0),
    ("B5", "F9 B5", 0.9, 7000.0, 2500.0),
];

const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let per_era = FLIGHTS as usize / ERAS.len() + 1;
    (1..=FLIGHTS)
        .map(|flight_number| {
            let era = ((flight_number as usize - 1) / per_era).min(ERAS.len() - 1);
            let (category, prefix, p_success, mean, std_dev) = ERAS[era];
            // Early flights only flew from the Cape.
            let site = if era == 0 { SITES[0] } else { rng.pick(&SITES) };
            let payload = rng.gauss(mean, std_dev).clamp(0.0, 9600.0).round();
            let class = i64::from(rng.next_f64() < p_success);

            Row {
                flight_number,
                launch_site: site.to_string(),
                class,
                payload_mass_kg: payload,
                booster_version: format!("{prefix} B{}", 1000 + flight_number),
                booster_category: category.to_string(),
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.flight_number))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.launch_site.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.class))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.booster_version.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.booster_category.as_str()))),
        ],
    )
    .context("creating RecordBatch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let Args { out_dir } = Args::parse();
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let csv_path = out_dir.join("spacex_launch_dash.csv");
    write_csv(&rows, &csv_path)?;
    let parquet_path = out_dir.join("spacex_launch_dash.parquet");
    write_parquet(&rows, &parquet_path)?;

    let successes = rows.iter().filter(|r| r.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_dir_defaults_to_current_directory() {
        let args = Args::parse_from(["generate_sample"]);
        assert_eq!(args.out_dir, PathBuf::from("."));
    }

    #[test]
    fn out_dir_is_positional() {
        let args = Args::parse_from(["generate_sample", "data/launches"]);
        assert_eq!(args.out_dir, PathBuf::from("data/launches"));
        assert!(Args::try_parse_from(["generate_sample", "a", "b"]).is_err());
    }

    #[test]
    fn rows_are_deterministic_and_valid() {
        let rows = generate_rows(&mut SimpleRng::new(42));
        let again = generate_rows(&mut SimpleRng::new(42));
        assert_eq!(rows.len(), FLIGHTS as usize);
        assert!(rows.iter().all(|r| (0.0..=9600.0).contains(&r.payload_mass_kg)));
        assert!(rows.iter().all(|r| r.class == 0 || r.class == 1));
        let masses: Vec<f64> = rows.iter().map(|r| r.payload_mass_kg).collect();
        let masses_again: Vec<f64> = again.iter().map(|r| r.payload_mass_kg).collect();
        assert_eq!(masses, masses_again);
    }
}
