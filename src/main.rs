use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use paper_cluster_analyzer::{cluster, data, graph, storage, validate};
use paper_cluster_analyzer::{ClusterConfig, ClusterLabel, Partition, ValidationConfig};

#[derive(Parser, Debug)]
#[clap(
    name = "paper-cluster-analyzer",
    about = "Entity-based clustering of paper corpora with citation cross-validation"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, global = true, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster a paper corpus by shared entities
    Cluster {
        /// Path to papers JSON file
        input: PathBuf,

        /// Output directory for results
        #[clap(long, default_value = "cluster_results")]
        output_dir: String,

        /// Leiden resolution (higher = more, smaller clusters)
        #[clap(long, default_value = "1.0")]
        resolution: f64,

        /// Random seed
        #[clap(long, default_value = "42")]
        seed: u64,

        /// Entities reported per cluster summary
        #[clap(long, default_value = "10")]
        top_entities: usize,
    },

    /// Sub-cluster one cluster of a previous run
    Subcluster {
        /// Path to papers JSON file
        input: PathBuf,

        /// Path to a previously saved partition.json
        #[clap(long)]
        clusters_from: PathBuf,

        /// Cluster label to sub-divide (e.g. "3" or "3.1")
        #[clap(long)]
        cluster: String,

        /// Output directory for results
        #[clap(long, default_value = "cluster_results")]
        output_dir: String,

        #[clap(long, default_value = "1.0")]
        resolution: f64,

        #[clap(long, default_value = "42")]
        seed: u64,

        #[clap(long, default_value = "10")]
        top_entities: usize,
    },

    /// Validate entity clusters against the corpus citation graph
    Validate {
        /// Path to papers JSON file
        input: PathBuf,

        /// Path to a previously saved partition.json
        #[clap(long)]
        clusters_from: PathBuf,

        /// Output directory for the report
        #[clap(long, default_value = "cluster_results")]
        output_dir: String,

        /// Resolution for the citation-graph partition
        #[clap(long, default_value = "1.0")]
        resolution: f64,

        #[clap(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    match args.command {
        Command::Cluster {
            input,
            output_dir,
            resolution,
            seed,
            top_entities,
        } => {
            let papers = data::load_papers(&input)?;
            let config = ClusterConfig {
                resolution,
                seed,
                top_entities,
            };

            let similarity = graph::build_graph(&papers)?;
            log::info!(
                "Similarity graph: {} nodes, {} edges",
                similarity.node_count(),
                similarity.edge_count()
            );

            let partition = cluster::partition(&similarity, config.resolution, config.seed)?;
            let summaries = cluster::summarize(&papers, &partition, config.top_entities);

            log::info!(
                "Found {} clusters across {} papers",
                summaries.len(),
                partition.len()
            );

            storage::save_clustering(&partition, &summaries, &output_dir)?;
        }

        Command::Subcluster {
            input,
            clusters_from,
            cluster: label,
            output_dir,
            resolution,
            seed,
            top_entities,
        } => {
            let papers = data::load_papers(&input)?;
            let previous = load_partition(&clusters_from)?;
            let label = ClusterLabel::from(label.as_str());

            let partition = cluster::subcluster(&papers, &label, &previous, resolution, seed)?;
            let summaries = cluster::summarize(&papers, &partition, top_entities);

            log::info!(
                "Cluster {}: {} papers -> {} sub-clusters",
                label,
                partition.len(),
                summaries.len()
            );

            storage::save_clustering(&partition, &summaries, &output_dir)?;
        }

        Command::Validate {
            input,
            clusters_from,
            output_dir,
            resolution,
            seed,
        } => {
            let papers = data::load_papers(&input)?;
            let entity_partition = load_partition(&clusters_from)?;

            let config = ValidationConfig {
                resolution,
                seed,
                ..ValidationConfig::default()
            };

            let report = validate::validate(&papers, &entity_partition, &config)?;

            log::info!(
                "ARI {:.3}, NMI {:.3} over {} papers: {}",
                report.ari,
                report.nmi,
                report.num_papers,
                report.interpretation
            );

            storage::save_validation(&report, &output_dir)?;
        }
    }

    log::info!("Done");

    Ok(())
}

fn load_partition(path: &PathBuf) -> Result<Partition> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
