use clap::Parser;
use colored::Colorize;
use rusty_dtree::data::dataset::Dataset;
use rusty_dtree::data::reader::read_csv_path;
use rusty_dtree::metrics::confusion::ClassificationMetrics;
use rusty_dtree::preprocessing::discretizer::KMeansDiscretizer;
use rusty_dtree::preprocessing::params::DiscretizerParams;
use rusty_dtree::trees::{DecisionTreeClassifier, PredictionTally};
use std::error::Error;
use std::path::PathBuf;
use std::process;

/// Grows a Gini decision tree from a labeled CSV file and reports how well it classifies
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "dtree")]
#[command(version)]
struct Args {
    /// CSV file whose last column is the class label
    #[arg(value_name = "CSV")]
    path: PathBuf,

    /// Treat the first row as data instead of column names
    #[arg(long)]
    no_header: bool,

    /// Numeric feature columns to bin with k-means, by index (e.g. 0,4)
    #[arg(short, long, value_delimiter = ',')]
    discretize: Vec<usize>,

    /// Number of bins per discretized column
    #[arg(short, long, default_value_t = 3, value_parser = parse_bins)]
    bins: usize,

    /// Random seed for the train/test shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Share of rows used for training; the rest is held out for testing
    #[arg(short, long, value_parser = parse_ratio)]
    train_ratio: Option<f64>,

    /// Print every split and leaf while growing
    #[arg(short, long)]
    verbose: bool,
}

fn parse_bins(value: &str) -> Result<usize, String> {
    let bins: usize = value.parse().map_err(|err| format!("{}", err))?;
    if bins < 2 {
        return Err(format!("need at least 2 bins, got {}", bins));
    }
    Ok(bins)
}

fn parse_ratio(value: &str) -> Result<f64, String> {
    let ratio: f64 = value.parse().map_err(|err| format!("{}", err))?;
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(format!("train ratio must lie strictly between 0 and 1, got {}", ratio));
    }
    Ok(ratio)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let table = read_csv_path(&args.path, !args.no_header)?;
    println!(
        "Loaded {} rows with {} features",
        table.dataset.nrows(),
        table.feature_names.len()
    );

    let mut params = DiscretizerParams::new();
    params.set_n_bins(args.bins)?;

    let mut dataset = table.dataset;
    for &axis in &args.discretize {
        let mut discretizer = KMeansDiscretizer::with_params(params.clone());
        dataset = discretizer.discretize_column(&dataset, axis)?;
        println!(
            "{}    {}",
            format!("[binned {}]", table.feature_names[axis]).bold().green(),
            format!("[CENTROIDS {:.3?}]", discretizer.centroids()).bold(),
        );
    }

    let (train, test) = match args.train_ratio {
        Some(ratio) => dataset.train_test_split(ratio, args.seed)?,
        None => (dataset.clone(), dataset),
    };

    let mut classifier = DecisionTreeClassifier::with_verbose(args.verbose);
    let tree = classifier.fit(&train, &table.feature_names)?;
    println!("{}", tree);
    println!(
        "depth {}, {} leaves, {} nodes",
        tree.depth(),
        tree.n_leaves(),
        tree.n_nodes()
    );

    report(&classifier, "TRAIN", &train)?;
    if args.train_ratio.is_some() {
        report(&classifier, "TEST", &test)?;
    }
    Ok(())
}

fn report(
    classifier: &DecisionTreeClassifier<String>,
    name: &str,
    dataset: &Dataset<String>,
) -> Result<(), Box<dyn Error>> {
    let predictions = classifier.predict_all(dataset)?;
    let truth: Vec<String> = dataset.labels().cloned().collect();
    let tally = PredictionTally::from_predictions(&truth, &predictions)?;

    println!(
        "{}    {}    {}",
        format!("[{:>5}]", name).bold().red(),
        format!("[MATCHED {}]", tally).bold().green(),
        format!("[ACCURACY {:.2}%]", tally.accuracy() * 100.0).bold().yellow(),
    );
    println!(
        "Confusion matrix over {:?}:{}",
        classifier.classes(&truth, &predictions),
        classifier.confusion_matrix(&truth, &predictions)?
    );
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("{} {}", "error:".bold().red(), err);
        process::exit(1);
    }
}
