use std::path::PathBuf;
use std::time::Instant;
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use cachelib::config::{CacheConfig, MalformedLinePolicy, ReplacementPolicyConfig};
use cachelib::io::open_trace;
use cachelib::simulator::Simulator;
use cachelib::trace::read_trace;

#[derive(Parser, Debug)]
#[command(about = String::from("Set-associative cache simulator, replays a trace of R/W accesses and reports hits and misses"))]
struct Args {
    /// Trace file, one `R: 0x<address>` or `W: 0x<address>` per line
    trace: PathBuf,

    /// JSON cache configuration, the options below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total memory size in bytes
    #[arg(long)]
    memory_size: Option<u64>,

    /// Block size in bytes, a power of two
    #[arg(long)]
    block_size: Option<u64>,

    /// Ways per set
    #[arg(long)]
    associativity: Option<u64>,

    /// Prefetch the following block on every miss
    #[arg(long, conflicts_with = "no_prefetch")]
    prefetch: bool,

    #[arg(long)]
    no_prefetch: bool,

    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// What to do with a trace line that can't be parsed
    #[arg(long, value_enum)]
    on_malformed: Option<MalformedArg>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long)]
    debug: bool,

    /// Log more to stderr, repeat for more detail. RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Evict the block filled earliest, hits don't count
    Fifo,
    /// Evict the block used least recently
    Lru,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MalformedArg {
    /// Stop reading and simulate what was read so far
    Truncate,
    /// Ignore the line
    Skip,
    /// Fail without simulating
    Error,
}

impl From<PolicyArg> for ReplacementPolicyConfig {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Fifo => ReplacementPolicyConfig::Fifo,
            PolicyArg::Lru => ReplacementPolicyConfig::Lru,
        }
    }
}

impl From<MalformedArg> for MalformedLinePolicy {
    fn from(value: MalformedArg) -> Self {
        match value {
            MalformedArg::Truncate => MalformedLinePolicy::Truncate,
            MalformedArg::Skip => MalformedLinePolicy::Skip,
            MalformedArg::Error => MalformedLinePolicy::Error,
        }
    }
}

impl Args {
    /// Layers the command line options over a configuration
    fn apply(&self, config: &mut CacheConfig) {
        if let Some(memory_size) = self.memory_size {
            config.memory_size = memory_size;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(associativity) = self.associativity {
            config.associativity = associativity;
        }
        if self.prefetch {
            config.prefetch = true;
        }
        if self.no_prefetch {
            config.prefetch = false;
        }
        if let Some(policy) = self.policy {
            config.replacement_policy = policy.into();
        }
        if let Some(on_malformed) = self.on_malformed {
            config.on_malformed = on_malformed.into();
        }
    }

    fn load_config(&self) -> Result<CacheConfig, String> {
        let mut config = match &self.config {
            Some(path) => CacheConfig::from_file(path)
                .map_err(|e| format!("Couldn't load the config file at path {}: {e}", path.display()))?,
            None => CacheConfig::default(),
        };
        self.apply(&mut config);
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    init_logging(args.verbose);
    let config = args.load_config()?;
    let mut simulator = Simulator::new(&config).map_err(|e| format!("Invalid cache configuration: {e}"))?;
    let trace_reader = open_trace(&args.trace)
        .map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace.display()))?;
    let accesses = read_trace(trace_reader, config.on_malformed)
        .map_err(|e| format!("Couldn't read the trace file at path {}: {e}", args.trace.display()))?;
    tracing::info!(path = %args.trace.display(), accesses = accesses.len(), "read trace file");
    let result = *simulator.simulate(accesses);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    } else {
        println!("{result}");
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes trace parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary. If benchmarking, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        println!("Valid cache lines: {}", simulator.get_valid_line_count());
        println!("Uninitialised cache lines: {}", simulator.get_uninitialised_line_count());
    }
    Ok(())
}
