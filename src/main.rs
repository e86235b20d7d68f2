use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use nnmix::classifiers::Describe;
use nnmix::classifiers::lazy::{NeighborClassifier, NeighborParameters};
use nnmix::core::instances::Dataset;
use nnmix::evaluation::Snapshot;
use nnmix::streams::arff::ArffFileStream;
use nnmix::tasks::{HoldoutEvaluator, PrequentialEvaluator};
use nnmix::ui::cli::args::{Cli, Command, HoldoutArgs, PrequentialArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let params = match &cli.command {
        Command::Holdout(args) => args.learner.parameters()?,
        Command::Prequential(args) => args.learner.parameters()?,
        Command::Info => NeighborParameters::default(),
    };

    let mut log_level = Level::from(cli.log_level);
    if params.debug {
        log_level = log_level.max(Level::DEBUG);
    }
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")?;

    match cli.command {
        Command::Holdout(args) => holdout(args, params),
        Command::Prequential(args) => prequential(args, params),
        Command::Info => {
            describe(&NeighborClassifier::new());
            Ok(())
        }
    }
}

fn holdout(args: HoldoutArgs, params: NeighborParameters) -> Result<()> {
    let class_index = args.learner.class_index();

    let mut train_stream = ArffFileStream::new(args.train.clone(), class_index)
        .with_context(|| format!("failed to open training data {}", args.train.display()))?;
    let train = Dataset::from_stream(&mut train_stream);
    info!(path = %args.train.display(), instances = train.len(), "loaded training data");

    let test = ArffFileStream::new(args.test.clone(), class_index)
        .with_context(|| format!("failed to open test data {}", args.test.display()))?;

    let learner = NeighborClassifier::with_parameters(params);
    let mut task = HoldoutEvaluator::new(Box::new(learner), train, Box::new(test))
        .context("failed to set up holdout evaluation")?;
    let snapshot = task.run().context("holdout evaluation failed")?;

    report(&snapshot, args.learner.json)
}

fn prequential(args: PrequentialArgs, params: NeighborParameters) -> Result<()> {
    let stream = ArffFileStream::new(args.stream.clone(), args.learner.class_index())
        .with_context(|| format!("failed to open stream {}", args.stream.display()))?;

    let learner = NeighborClassifier::with_parameters(params);
    let mut task = PrequentialEvaluator::new(
        Box::new(learner),
        Box::new(stream),
        args.max_instances,
        args.sample_frequency,
    )
    .context("failed to set up prequential evaluation")?;
    task.run().context("prequential evaluation failed")?;

    if !args.learner.json {
        for point in task.curve() {
            info!(%point, "learning curve");
        }
    }
    let snapshot = task
        .latest()
        .context("prequential evaluation produced no snapshot")?;
    report(snapshot, args.learner.json)
}

fn report(snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        let rendered = snapshot
            .to_json()
            .context("failed to serialize the snapshot")?;
        println!("{rendered}");
    } else {
        println!("{snapshot}");
    }
    Ok(())
}

fn describe(learner: &dyn Describe) {
    let info = learner.technical_information();
    println!("{}\n", learner.name());
    println!("{}\n", learner.global_info());
    println!("{info}\n");
    println!("{}", info.to_bibtex());
}
