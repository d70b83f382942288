use biodivine_algo_basins::analysis::{
    AnalysisConfig, DEFAULT_CACHE_DIR, DEFAULT_MARKERS, DEFAULT_PHENOTYPE_THRESHOLD,
    analyze_attractors, attractor_basin, is_cell_division_phenotype, knockouts, open_cache,
};
use biodivine_algo_basins::basin::{DEFAULT_NUM_SAMPLES, NodeTag};
use biodivine_algo_basins::model::NetworkModel;
use biodivine_algo_basins::simulation::DEFAULT_MAX_STEPS;
use biodivine_algo_basins::solver::{ModelFixedPoints, SymbolicFixedPoints};
use biodivine_lib_param_bn::BooleanNetwork;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "biodivine_basins")]
#[command(about = "Catalog fixed-point attractors of a Boolean network and sample their basins")]
struct Args {
    /// Path to a Boolean network file (.aeon, .bnet, etc.)
    #[arg(value_name = "FILE")]
    file: String,

    /// Sample the basin of the attractor with this id (as listed in the summary table)
    #[arg(long, require_equals = true)]
    attractor: Option<usize>,

    /// Do not read or write the attractor cache
    #[arg(long)]
    no_cache: bool,

    /// Directory of the attractor cache
    #[arg(long, default_value = DEFAULT_CACHE_DIR, require_equals = true)]
    cache_dir: PathBuf,

    /// Number of sampled trajectories
    #[arg(long, default_value_t = DEFAULT_NUM_SAMPLES, require_equals = true)]
    max_states: usize,

    /// Maximal number of steps of each sampled trajectory
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS, require_equals = true)]
    max_steps: usize,

    /// Knock out this variable and compare its stable states with the wild type (repeatable)
    #[arg(long, value_name = "VARIABLE", require_equals = true)]
    knockout: Vec<String>,

    /// Comma separated marker variables of the knockout report
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_MARKERS.map(String::from),
        require_equals = true
    )]
    markers: Vec<String>,

    /// Seed of the random initial states (random if not given)
    #[arg(long, require_equals = true)]
    seed: Option<u64>,

    /// Logging verbosity (use -v for info, or -v=LEVEL for a specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
        }
    }
}

impl From<&Args> for AnalysisConfig {
    fn from(args: &Args) -> Self {
        let config = AnalysisConfig::new()
            .with_cache_dir(args.cache_dir.clone())
            .with_max_states(args.max_states)
            .with_max_steps(args.max_steps);
        if args.no_cache {
            config.without_cache()
        } else {
            config
        }
    }
}

fn main() {
    let args = Args::parse();

    // None = not specified, Some(None) = `-v` without value, Some(Some(level)) = `-v=level`
    let log_level = match args.verbose.clone() {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(level)) => level.into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let config = AnalysisConfig::from(&args);

    let bn = BooleanNetwork::try_from_file(&args.file).unwrap_or_else(|e| {
        eprintln!("Failed to load BN file {}: {}", args.file, e);
        std::process::exit(1);
    });

    println!("Loaded BN with {} variables.", bn.num_vars());

    let model = Arc::new(NetworkModel::from(&bn));
    let cache = open_cache(&config);
    let catalog = analyze_attractors(&model, &SymbolicFixedPoints::from(bn), &cache);

    if catalog.is_empty() {
        println!("No stable states found.");
    } else {
        println!(
            "Found {} attractors ({} fixed points, {} cycles).",
            catalog.count(),
            catalog.fixed_point_count(),
            catalog.cycle_count()
        );
        println!("{:>4}  {:<12}  {:>7}", "id", "kind", "active");
        for row in catalog.summary_table() {
            println!("{row}");
        }
    }

    if !args.knockout.is_empty() {
        let genes: Vec<&str> = args.knockout.iter().map(|it| it.as_str()).collect();
        let markers: Vec<&str> = args.markers.iter().map(|it| it.as_str()).collect();
        let solver_for = |model: &NetworkModel| ModelFixedPoints::new(model.clone());
        let report = knockouts(&model, &genes, &markers, solver_for).unwrap_or_else(|e| {
            eprintln!("Knockout analysis failed: {}", e);
            std::process::exit(1);
        });
        println!("{:<16}  {:>6}  {:>7}", "knockout", "states", "markers");
        for row in report.rows() {
            println!("{row}");
        }
    }

    let Some(id) = args.attractor else {
        return;
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let graph = attractor_basin(model, &catalog, id, &config, &mut rng).unwrap_or_else(|e| {
        eprintln!("Cannot sample basin: {}", e);
        std::process::exit(1);
    });

    if let Ok(record) = catalog.get(id) {
        let dividing =
            is_cell_division_phenotype(record.representative(), DEFAULT_PHENOTYPE_THRESHOLD);
        println!(
            "Attractor #{} {} a cell division phenotype.",
            id,
            if dividing { "is" } else { "is not" }
        );
    }

    let stats = graph.statistics();
    println!(
        "Basin of attractor #{}: {} nodes, {} edges ({} reached, {} cycled, {} exhausted).",
        id,
        graph.node_count(),
        graph.edge_count(),
        stats.reached,
        stats.cycled,
        stats.exhausted
    );
    for (key, tag) in graph.nodes() {
        let tag = match tag {
            NodeTag::Target => "target",
            NodeTag::Cyclic => "cyclic",
            NodeTag::Transient => "transient",
        };
        println!("{:<10} {}", tag, key);
    }
    for cycle in graph.cycles() {
        println!("Cycle of length {} starting at {}", cycle.len(), cycle[0]);
    }
}
