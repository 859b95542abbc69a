use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;

const CITIES: [&str; 6] = ["Barishal", "Chattogram", "Dhaka", "Khulna", "Rajshahi", "Sylhet"];

/// Item name and unit price range.
const ITEMS: [(&str, f64, f64); 6] = [
    ("Shirt", 450.0, 1200.0),
    ("Pant", 700.0, 1800.0),
    ("Saree", 1500.0, 6500.0),
    ("Panjabi", 900.0, 3200.0),
    ("T-Shirt", 250.0, 650.0),
    ("Kurti", 600.0, 2200.0),
];

const PAYMENTS: [&str; 3] = ["Cash", "Card", "bKash"];

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

    /// Uniform index in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

struct Row {
    invoice_id: String,
    date: NaiveDate,
    city: &'static str,
    item: &'static str,
    quantity: i64,
    total_price: f64,
    payment: &'static str,
}

fn generate(rng: &mut SimpleRng, invoices: usize) -> Vec<Row> {
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid literal date");
    let mut rows = Vec::new();

    for n in 0..invoices {
        let invoice_id = format!("INV-{:05}", n + 1);
        let date = first_day + Days::new(rng.below(366) as u64);
        let city = *rng.pick(&CITIES);
        let payment = *rng.pick(&PAYMENTS);

        // One to three line items per invoice.
        for _ in 0..=rng.below(3) {
            let (item, lo, hi) = *rng.pick(&ITEMS);
            let quantity = 1 + rng.below(4) as i64;
            let unit = (lo + rng.next_f64() * (hi - lo)).round();
            rows.push(Row {
                invoice_id: invoice_id.clone(),
                date,
                city,
                item,
                quantity,
                total_price: unit * quantity as f64,
                payment,
            });
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "Invoice_ID",
        "Date",
        "City",
        "Item",
        "Quantity",
        "Total_Price",
        "Payment_Method",
    ])?;
    for r in rows {
        writer.write_record([
            r.invoice_id.clone(),
            r.date.format("%Y-%m-%d").to_string(),
            r.city.to_string(),
            r.item.to_string(),
            r.quantity.to_string(),
            r.total_price.to_string(),
            r.payment.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid literal date");

    let schema = Arc::new(Schema::new(vec![
        Field::new("Invoice_ID", DataType::Utf8, false),
        Field::new("Date", DataType::Date32, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("Item", DataType::Utf8, false),
        Field::new("Quantity", DataType::Int64, false),
        Field::new("Total_Price", DataType::Float64, false),
        Field::new("Payment_Method", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.invoice_id.as_str()))),
            Arc::new(Date32Array::from_iter_values(
                rows.iter().map(|r| (r.date - epoch).num_days() as i32),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.city))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.item))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.quantity))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.total_price))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.payment))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 1200);

    let dir = Path::new("data");
    std::fs::create_dir_all(dir).context("creating data directory")?;

    let csv_path = dir.join("cloth_shop_data.csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = dir.join("cloth_shop_data.parquet");
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} line items to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
