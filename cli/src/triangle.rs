use anyhow::{Result, bail};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "triangle",
    version,
    about = "Print a right triangle of `*` with the given height and base"
)]
struct Args {
    /// Number of rows (M)
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    height: i64,

    /// Stars on the last row (N)
    #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
    base: i64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    for line in render(args.height, args.base)? {
        println!("{}", line);
    }
    Ok(())
}

/// Star count per row: `round(i * base / height)` clamped to `[1, base]`, with the
/// first row pinned to one star whenever there is more than one row.
fn row_widths(height: i64, base: i64) -> Result<Vec<i64>> {
    if height <= 0 || base <= 0 {
        bail!("M and N must be positive integers (got height={height}, base={base})");
    }

    let widths = (1..=height)
        .map(|i| {
            // round half up, in i128 so `2 * i * base` cannot overflow
            let (i, wide_base, wide_height) = (i128::from(i), i128::from(base), i128::from(height));
            let stars = (2 * i * wide_base + wide_height) / (2 * wide_height);
            let stars = if i == 1 && height > 1 { 1 } else { stars };
            // clamped to [1, base], so it fits back into i64
            stars.clamp(1, wide_base) as i64
        })
        .collect();
    Ok(widths)
}

fn render(height: i64, base: i64) -> Result<Vec<String>> {
    Ok(row_widths(height, base)?
        .into_iter()
        .map(|w| "*".repeat(w as usize))
        .collect())
}
