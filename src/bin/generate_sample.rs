//! Write a synthetic 1 Hz heating log and a matching report template.
//!
//! ```text
//! cargo run --bin generate_sample [OUT_DIR]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

/// Labels of the 16 report rows, top to bottom.
const TEMPLATE_LABELS: [&str; 16] = [
    "Evaluation date",
    "Sample",
    "Areal weight [g/m²]",
    "Thickness [mm]",
    "Density [kg/m³]",
    "Heat setting",
    "Pressure",
    "Time to 100 °C [s]",
    "Time to 150 °C [s]",
    "Time to 180 °C [s]",
    "Time to 200 °C [s]",
    "Temp. at 60 s [°C]",
    "Temp. at 120 s [°C]",
    "Temp. at 300 s [°C]",
    "Temp. at 600 s [°C]",
    "Remarks",
];

/// Samples in the generated log (15 minutes at 1 Hz).
const LOG_SECONDS: u32 = 900;

/// Minimal deterministic PRNG (xorshift64*).
struct SimpleRng(u64);

impl SimpleRng {
    fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let bits = self.0.wrapping_mul(0x2545_f491_4f6c_dd1d);
        (bits >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform noise in `[-amplitude, amplitude)`.
    fn noise(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// First-order heating towards 240 °C with a 15 s dead time.
fn heating_curve(t: f64) -> f64 {
    let ambient = 24.0;
    let plateau = 240.0;
    let elapsed = (t - 15.0).max(0.0);
    ambient + (plateau - ambient) * (1.0 - (-elapsed / 220.0).exp())
}

fn write_log(path: &Path) -> Result<()> {
    let mut rng = SimpleRng(0x9e37_79b9_7f4a_7c15);
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name("Log")?;

    ws.write_string(0, 0, "No.")?;
    ws.write_string(0, 1, "Elapsed [s]")?;
    ws.write_string(0, 2, "Channel")?;
    ws.write_string(0, 3, "Temperature [°C]")?;

    for i in 0..LOG_SECONDS {
        let row = i + 1;
        let temp = heating_curve(i as f64) + rng.noise(0.4);
        ws.write_number(row, 0, i + 1)?;
        ws.write_number(row, 1, i)?;
        ws.write_string(row, 2, "CH1")?;
        ws.write_number(row, 3, (temp * 10.0).round() / 10.0)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn write_template(path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let report = workbook.add_worksheet();
    report.set_name("Report")?;
    for (row, label) in (0u32..).zip(TEMPLATE_LABELS) {
        report.write_string(row, 0, label)?;
    }
    report.write_string(20, 0, "Footer: results are appended to the right")?;

    let notes = workbook.add_worksheet();
    notes.set_name("Notes")?;
    notes.write_string(0, 0, "Instrument")?;
    notes.write_string(0, 1, "Hot plate HP-2")?;

    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let log_path = out_dir.join("sample_log.xlsx");
    write_log(&log_path)?;
    log::info!("Wrote {LOG_SECONDS} readings to {}", log_path.display());

    let template_path = out_dir.join("sample_template.xlsx");
    write_template(&template_path)?;
    log::info!("Wrote template to {}", template_path.display());

    println!(
        "Generated {} and {}",
        log_path.display(),
        template_path.display()
    );
    Ok(())
}
