//! Writes a synthetic `woningdata` snapshot (CSV + Parquet) for working
//! offline. Open either file via Bestand → Lokaal bestand openen.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Name, latitude, longitude, base income, base WOZ, base population.
const MUNICIPALITIES: &[(&str, f64, f64, f64, f64, f64)] = &[
    ("Amsterdam", 52.3676, 4.9041, 45000.0, 350000.0, 900000.0),
    ("Rotterdam", 51.9244, 4.4777, 40000.0, 280000.0, 650000.0),
    ("'s-Gravenhage", 52.0705, 4.3007, 41000.0, 300000.0, 550000.0),
    ("Utrecht", 52.0907, 5.1214, 43000.0, 360000.0, 361000.0),
    ("Eindhoven", 51.4416, 5.4697, 39000.0, 290000.0, 238000.0),
    ("Groningen", 53.2194, 6.5665, 35000.0, 240000.0, 233000.0),
    ("Tilburg", 51.5555, 5.0913, 36000.0, 260000.0, 224000.0),
    ("Almere", 52.3508, 5.2647, 38000.0, 270000.0, 218000.0),
    ("Breda", 51.5719, 4.7683, 40000.0, 310000.0, 184000.0),
    ("Nijmegen", 51.8126, 5.8372, 37000.0, 275000.0, 179000.0),
    ("Maastricht", 50.8514, 5.6910, 34000.0, 250000.0, 121000.0),
    ("Zwolle", 52.5168, 6.0830, 39500.0, 295000.0, 131000.0),
];

const YEARS: [i64; 3] = [2021, 2022, 2023];

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

    /// Multiplicative jitter in `[1 - spread, 1 + spread)`.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + (self.next_f64() * 2.0 - 1.0) * spread
    }
}

struct Row {
    municipality: String,
    year: i64,
    income: f64,
    woz: f64,
    population: i64,
    latitude: f64,
    longitude: f64,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::with_capacity(MUNICIPALITIES.len() * YEARS.len());
    for &(name, lat, lon, income, woz, population) in MUNICIPALITIES {
        for (i, &year) in YEARS.iter().enumerate() {
            // Roughly 4% income and 7% WOZ growth per year, plus noise.
            let growth_income = 1.04f64.powi(i as i32);
            let growth_woz = 1.07f64.powi(i as i32);
            rows.push(Row {
                municipality: name.to_string(),
                year,
                income: (income * growth_income * rng.jitter(0.02)).round(),
                woz: (woz * growth_woz * rng.jitter(0.03)).round(),
                population: (population * rng.jitter(0.01)).round() as i64,
                latitude: lat,
                longitude: lon,
            });
        }
    }
    rows
}

const HEADERS: [&str; 7] = [
    "gemeente",
    "jaar",
    "gemiddeld_inkomen",
    "gemiddelde_woz",
    "totaal_inwoners",
    "latitude",
    "longitude",
];

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.municipality.clone(),
            r.year.to_string(),
            r.income.to_string(),
            r.woz.to_string(),
            r.population.to_string(),
            r.latitude.to_string(),
            r.longitude.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Utf8, false),
        Field::new(HEADERS[1], DataType::Int64, false),
        Field::new(HEADERS[2], DataType::Float64, true),
        Field::new(HEADERS[3], DataType::Float64, true),
        Field::new(HEADERS[4], DataType::Int64, true),
        Field::new(HEADERS[5], DataType::Float64, true),
        Field::new(HEADERS[6], DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.municipality.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.income).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.woz).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.population).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.latitude).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.longitude).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let csv_path = "sample_woningdata.csv";
    let parquet_path = "sample_woningdata.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!(
        "Wrote {} rows ({} municipalities × {} years) to {csv_path} and {parquet_path}",
        rows.len(),
        MUNICIPALITIES.len(),
        YEARS.len()
    );
    Ok(())
}
