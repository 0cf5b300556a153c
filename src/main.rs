use std::process;
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};

use polygon_ratio::{harness, logging, partition, Args, Config, Job, SystemAffinity, Topology};

fn parse_config() -> Config {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version are not errors
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    match Config::try_from(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

fn run(config: &Config) -> polygon_ratio::Result<()> {
    let topology = Topology::discover();
    if config.verbose {
        println!("{}", topology.summary());
        topology.print_mapping();
    }
    if !topology.is_known() {
        warn!(
            online = topology.num_logical_cpus_online(),
            "CPU topology unknown, sizing by online CPUs and skipping pinning"
        );
    }

    let threads = partition::clamp_thread_count(config.max_threads, topology.cores_to_use());
    if threads.adjusted() {
        warn!(
            "Number of threads adjusted from {} to {} for optimal performance",
            threads.requested, threads.effective
        );
    }

    let partitions = partition::plan(config.trials, threads.effective, topology.map());
    if config.verbose {
        let (base, remainder) = partition::shares(&partitions);
        println!(
            "Will use {} threads to run {} simulations with {} runs per thread and {} runs adjustment",
            partitions.len(),
            config.trials,
            base,
            remainder
        );
        for p in &partitions {
            match p.cpu {
                Some(cpu) => println!("Worker {}: {} runs on CPU {}", p.ordinal, p.trial_count, cpu),
                None => println!("Worker {}: {} runs, unpinned", p.ordinal, p.trial_count),
            }
        }
    }

    println!("Using simulation: {}", config.strategy);

    let job = Job {
        strategy: config.strategy,
        ngon: config.ngon,
        seed: config.seed,
    };
    let start = Instant::now();
    let estimate = harness::estimate(&partitions, job, SystemAffinity)?;
    let elapsed = start.elapsed();

    info!(
        trials = estimate.total_trials,
        threads = partitions.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "run complete"
    );
    println!("Average ratio: {}", estimate.average());
    if config.verbose {
        println!("Time taken [total]: {}", elapsed.as_secs_f64());
    }
    Ok(())
}

fn main() {
    let config = parse_config();
    logging::init(config.verbose);

    if let Err(err) = run(&config) {
        eprintln!("Error: {}", err);
        process::exit(err.exit_code());
    }
}
