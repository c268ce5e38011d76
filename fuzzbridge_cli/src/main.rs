use fuzzbridge_core::config::{HarnessConfig, default_max_trials};
use fuzzbridge_core::harness::FuzzHarness;

use clap::Parser;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(short, long, value_parser)]
    config_file: Option<PathBuf>,
    /// Dictionary file or directory; overrides the config value.
    #[clap(long)]
    dictionary: Option<String>,
    /// Seed-corpus file or directory; overrides the config value.
    #[clap(long)]
    corpus: Option<String>,
    #[clap(short, long)]
    trials: Option<u64>,
    #[clap(long)]
    rng_seed: Option<u64>,
}

fn demo_target(data: &[u8]) {
    if data.len() > 2 && data[0] == b'B' && data[1] == b'A' && data[2] == b'D' {
        panic!("BAD input detected by target!");
    }
    if data.len() > 3 && data[0] == b'C' && data[1] == b'R' && data[2] == b'A' && data[3] == b'S' {
        panic!("CRASH input detected by target!");
    }
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let mut config = match cli.config_file {
        Some(config_path) => {
            println!("Loading configuration from specified path: {config_path:?}",);
            HarnessConfig::load_from_file(&config_path)?
        }
        None => {
            // No config file specified via CLI, load default
            let default_config_path = PathBuf::from("config.toml");
            if default_config_path.exists() {
                println!(
                    "No config file specified via CLI, loading default: {default_config_path:?}",
                );
                HarnessConfig::load_from_file(&default_config_path)?
            } else {
                println!(
                    "No config file specified and default 'config.toml' not found, using built-in defaults."
                );
                HarnessConfig::default()
            }
        }
    };

    if let Some(dictionary_path) = cli.dictionary {
        config.inputs.dictionary_path = dictionary_path;
    }
    if let Some(corpus_path) = cli.corpus {
        config.inputs.corpus_path = corpus_path;
    }
    if let Some(trials) = cli.trials {
        config.trials.get_or_insert_with(Default::default).max_trials = trials;
    }
    if let Some(rng_seed) = cli.rng_seed {
        config.trials.get_or_insert_with(Default::default).rng_seed = rng_seed;
    }

    println!("Effective configuration: {config:#?}");

    let trial_settings = config.trials.clone().unwrap_or_default();
    let mut chacha_seed = [0u8; 32];
    chacha_seed[..8].copy_from_slice(&trial_settings.rng_seed.to_le_bytes());
    let mut rng = ChaCha8Rng::from_seed(chacha_seed);

    let harness = FuzzHarness::from_config(&config, demo_target)?;
    println!(
        "Harness ready: {} dictionary tokens, {} seed inputs, max input length {}.",
        harness.adapter().dictionary().len(),
        harness.adapter().seed_inputs().len(),
        harness.adapter().max_len()
    );

    let max_trials = config
        .trials
        .as_ref()
        .map_or(default_max_trials(), |t| t.max_trials);

    println!("Starting trial loop for {max_trials} trials...");
    let start_time = Instant::now();
    let mut executions: u64 = 0;

    for i in 0..max_trials {
        harness.run_one(&mut rng)?;
        executions += 1;

        if i > 0 && i % (max_trials / 100).max(1) == 0 {
            let elapsed = start_time.elapsed().as_secs_f32();
            let exec_per_sec = if elapsed > 0.0 {
                executions as f32 / elapsed
            } else {
                0.0
            };
            print!(
                "\rTrial: {}/{}, Execs/sec: {:.2}   ",
                i, max_trials, exec_per_sec
            );
            use std::io::Write;
            std::io::stdout().flush()?;
        }
    }

    let elapsed_total = start_time.elapsed();
    println!("\nTrial loop finished in {elapsed_total:.2?}.");
    println!("Total Executions: {executions}");

    Ok(())
}
