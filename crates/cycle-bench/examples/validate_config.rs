use cycle_bench::config::Config;
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("crates/cycle-bench/configs/copy.toml")
    };

    println!("Validating config file: {}", config_path.display());

    let config = Config::from_file(&config_path)?;

    println!("\n✓ Successfully parsed configuration!");
    println!("\nCapacity: {}", config.bench.capacity);
    println!("Denominator: {}", config.bench.denominator);
    println!("Max bins: {}", config.bench.max_bins);
    println!("Outlier mode: {}", config.outlier_mode());

    match config.time_unit()? {
        Some(unit) => println!("Unit: {} ({} cycles)", unit.name(), unit.cycles_per_unit()),
        None => println!("Unit: cycles"),
    }

    println!("\n✓ All validations passed!");

    Ok(())
}
