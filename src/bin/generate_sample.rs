use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};

use sheet_select::config::{DEFAULT_INDEX_COLUMN, DEFAULT_MEASUREMENTS_FILE, DEFAULT_TRENDLINES_FILE};
use sheet_select::data::model::{CellValue, Dataset};
use sheet_select::export::write_workbook;

/// Write the default workbooks for both tools.
#[derive(Parser, Debug)]
struct Args {
    /// Directory to write into.
    #[arg(default_value = ".", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,
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
}

fn round(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (v * scale).round() / scale
}

/// Three noisy sensor traces against a shared time axis.
fn measurements(rng: &mut SimpleRng) -> Dataset {
    let sensors = [("Sensor A", 0.8, 2.0), ("Sensor B", -0.3, 12.0), ("Sensor C", 0.1, 6.0)];

    let mut names = vec![DEFAULT_INDEX_COLUMN.to_string()];
    names.extend(sensors.iter().map(|(name, _, _)| name.to_string()));

    let rows = (0..50)
        .map(|t| {
            let t = t as f64;
            let mut row = vec![CellValue::Number(t)];
            row.extend(sensors.iter().map(|&(_, slope, offset)| {
                CellValue::Number(round(offset + slope * t + rng.gauss(0.0, 1.0), 3))
            }));
            row
        })
        .collect();
    Dataset::new(names, rows)
}

/// Replicate runs of several measurements, one column per (run, measurement).
fn trendlines(rng: &mut SimpleRng) -> Dataset {
    let runs = ["Run A", "Run B", "Run C", "Run D"];
    let measurements = ["Titer", "pH", "Viability"];

    let mut names = vec![DEFAULT_INDEX_COLUMN.to_string()];
    for run in &runs {
        names.extend(measurements.iter().map(|m| format!("{run} {m}")));
    }

    let rows = (0..15)
        .map(|d| {
            let t = d as f64;
            let mut row = vec![CellValue::Number(t)];
            for i in 0..runs.len() {
                let vigour = 1.0 + 0.08 * i as f64;
                let titer = 5.0 * vigour / (1.0 + (-(t - 7.0) / 1.5).exp());
                let ph = 7.2 - 0.03 * t;
                let viability = 98.0 - 0.04 * t * t;
                row.push(CellValue::Number(round(titer + rng.gauss(0.0, 0.1), 3)));
                row.push(CellValue::Number(round(ph + rng.gauss(0.0, 0.02), 2)));
                row.push(CellValue::Number(round((viability + rng.gauss(0.0, 0.5)).min(100.0), 1)));
            }
            row
        })
        .collect();
    Dataset::new(names, rows)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    for (filename, dataset) in [
        (DEFAULT_MEASUREMENTS_FILE, measurements(&mut rng)),
        (DEFAULT_TRENDLINES_FILE, trendlines(&mut rng)),
    ] {
        let path = args.out_dir.join(filename);
        let bytes = write_workbook(&dataset, "Sheet1").context("building workbook")?;
        std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        println!(
            "Wrote {} rows x {} columns to {}",
            dataset.len(),
            dataset.width(),
            path.display()
        );
    }
    Ok(())
}
