use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

const BRANCHES: [(&str, &str); 3] = [("A", "Yangon"), ("B", "Mandalay"), ("C", "Naypyitaw")];
const CUSTOMER_TYPES: [&str; 2] = ["Member", "Normal"];
const GENDERS: [&str; 2] = ["Female", "Male"];
const PRODUCT_LINES: [&str; 6] = [
    "Electronic accessories",
    "Fashion accessories",
    "Food and beverages",
    "Health and beauty",
    "Home and lifestyle",
    "Sports and travel",
];
const PAYMENTS: [&str; 3] = ["Ewallet", "Cash", "Credit card"];
const HEADER: [&str; 16] = [
    "Invoice ID",
    "Branch",
    "City",
    "Customer type",
    "Gender",
    "Product line",
    "Unit price",
    "Quantity",
    "Tax 5%",
    "Total",
    "Date",
    "Time",
    "Payment",
    "cogs",
    "gross income",
    "Rating",
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_sales.csv".to_string());
    let rows = 1000;

    let mut rng = SimpleRng::new(42);
    let first_day = NaiveDate::from_ymd_opt(2019, 1, 1).context("invalid start date")?;

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    for _ in 0..rows {
        let (branch, city) = BRANCHES[rng.below(BRANCHES.len())];
        let invoice_id = format!(
            "{:03}-{:02}-{:04}",
            100 + rng.below(900),
            10 + rng.below(90),
            1000 + rng.below(9000)
        );
        let unit_price = round_to(rng.uniform(10.0, 100.0), 2);
        let quantity = 1 + rng.below(10);
        let cogs = round_to(unit_price * quantity as f64, 2);
        let tax = round_to(cogs * 0.05, 4);
        let total = round_to(cogs + tax, 4);
        let date = first_day + Duration::days(rng.below(90) as i64);
        let time = format!("{:02}:{:02}", 10 + rng.below(11), rng.below(60));
        let rating = round_to(rng.uniform(4.0, 10.0), 1);

        writer.write_record([
            invoice_id,
            branch.to_string(),
            city.to_string(),
            rng.pick(&CUSTOMER_TYPES).to_string(),
            rng.pick(&GENDERS).to_string(),
            rng.pick(&PRODUCT_LINES).to_string(),
            unit_price.to_string(),
            quantity.to_string(),
            tax.to_string(),
            total.to_string(),
            date.format("%-m/%-d/%Y").to_string(),
            time,
            rng.pick(&PAYMENTS).to_string(),
            cogs.to_string(),
            tax.to_string(),
            rating.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    log::info!("Wrote {rows} sales records to {output_path}");
    println!("Wrote {rows} sales records to {output_path}");
    Ok(())
}
