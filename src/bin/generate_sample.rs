//! Write a synthetic listings file for trying out the dashboard.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]`. The format follows the output
//! extension (`.csv` or `.parquet`). See `--help`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (location, base rent)
const LOCATIONS: [(&str, f64); 8] = [
    ("Kuala Lumpur - Mont Kiara", 3200.0),
    ("Kuala Lumpur - KLCC", 3500.0),
    ("Kuala Lumpur - Cheras", 1500.0),
    ("Kuala Lumpur - Setapak", 1300.0),
    ("Selangor - Petaling Jaya", 1900.0),
    ("Selangor - Subang Jaya", 1700.0),
    ("Selangor - Puchong", 1200.0),
    ("Selangor - Shah Alam", 1100.0),
];

/// (property type, rent multiplier)
const PROPERTY_TYPES: [(&str, f64); 5] = [
    ("Condominium", 1.2),
    ("Apartment", 0.8),
    ("Service Residence", 1.3),
    ("Flat", 0.6),
    ("Duplex", 1.6),
];

const FURNISHING: [&str; 3] = ["Fully Furnished", "Partially Furnished", "Not Furnished"];

struct Columns {
    ads_id: Vec<i64>,
    location: Vec<String>,
    property_type: Vec<String>,
    furnished: Vec<String>,
    monthly_rent: Vec<Option<f64>>,
    near_transit: Vec<bool>,
    completion_year: Vec<Option<i64>>,
    rooms: Vec<i64>,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns {
        ads_id: Vec::with_capacity(rows),
        location: Vec::with_capacity(rows),
        property_type: Vec::with_capacity(rows),
        furnished: Vec::with_capacity(rows),
        monthly_rent: Vec::with_capacity(rows),
        near_transit: Vec::with_capacity(rows),
        completion_year: Vec::with_capacity(rows),
        rooms: Vec::with_capacity(rows),
    };

    for i in 0..rows {
        let (location, base) = LOCATIONS[(rng.next_u64() % LOCATIONS.len() as u64) as usize];
        let (ptype, mult) = PROPERTY_TYPES[(rng.next_u64() % PROPERTY_TYPES.len() as u64) as usize];
        let furnished = rng.pick(&FURNISHING);
        let furnish_mult = match furnished {
            "Fully Furnished" => 1.15,
            "Partially Furnished" => 1.0,
            _ => 0.9,
        };
        // A few listings come without a price, as in scraped data.
        let rent = if rng.next_f64() < 0.01 {
            None
        } else {
            let r = rng.gauss(base * mult * furnish_mult, base * 0.2).max(300.0);
            Some((r / 50.0).round() * 50.0)
        };
        let year = if rng.next_f64() < 0.1 {
            None
        } else {
            Some(1995 + (rng.next_u64() % 30) as i64)
        };

        cols.ads_id.push(100_000_000 + i as i64);
        cols.location.push(location.to_string());
        cols.property_type.push(ptype.to_string());
        cols.furnished.push(furnished.to_string());
        cols.monthly_rent.push(rent);
        cols.near_transit.push(rng.next_f64() < 0.35);
        cols.completion_year.push(year);
        cols.rooms.push(1 + (rng.next_u64() % 4) as i64);
    }
    cols
}

const HEADER: [&str; 8] = [
    "ads_id",
    "location",
    "property_type",
    "furnished",
    "monthly_rent",
    "near ktm/lrt",
    "completion_year",
    "rooms",
];

fn write_csv(path: &Path, cols: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADER)?;
    for i in 0..cols.ads_id.len() {
        writer.write_record([
            cols.ads_id[i].to_string(),
            cols.location[i].clone(),
            cols.property_type[i].clone(),
            cols.furnished[i].clone(),
            cols.monthly_rent[i].map(|r| r.to_string()).unwrap_or_default(),
            if cols.near_transit[i] { "True" } else { "False" }.to_string(),
            cols.completion_year[i].map(|y| y.to_string()).unwrap_or_default(),
            cols.rooms[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, cols: Columns) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADER[0], DataType::Int64, false),
        Field::new(HEADER[1], DataType::Utf8, false),
        Field::new(HEADER[2], DataType::Utf8, false),
        Field::new(HEADER[3], DataType::Utf8, false),
        Field::new(HEADER[4], DataType::Float64, true),
        Field::new(HEADER[5], DataType::Boolean, false),
        Field::new(HEADER[6], DataType::Int64, true),
        Field::new(HEADER[7], DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(cols.ads_id)),
            Arc::new(StringArray::from(cols.location)),
            Arc::new(StringArray::from(cols.property_type)),
            Arc::new(StringArray::from(cols.furnished)),
            Arc::new(Float64Array::from(cols.monthly_rent)),
            Arc::new(BooleanArray::from(cols.near_transit)),
            Arc::new(Int64Array::from(cols.completion_year)),
            Arc::new(Int64Array::from(cols.rooms)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "generate_sample", about = "Write a synthetic rental listings file")]
struct Cli {
    /// Output file; `.csv` or `.parquet`
    #[arg(default_value = "cleaned_data_fixed.csv")]
    output: PathBuf,
    /// Number of listings to generate
    #[arg(default_value_t = 2000)]
    rows: usize,
}

fn main() -> Result<()> {
    let Cli { output, rows } = Cli::parse();

    let mut rng = SimpleRng::new(42);
    let cols = generate(rows, &mut rng);

    let ext = output.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "csv" => write_csv(&output, &cols)?,
        "parquet" | "pq" => write_parquet(&output, cols)?,
        other => bail!("unsupported output extension: .{other}"),
    }

    println!("Wrote {rows} listings to {}", output.display());
    Ok(())
}
