use clap::Parser;

/// This is a simulation program measuring the voter satisfaction efficiency of election methods.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the simulation. The command line options
    /// override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) A reference file containing the results of a previous run in JSON format.
    /// If provided, vsesim will check that the output matches the reference. This is only
    /// meaningful with a fixed seed.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the results of all the iterations will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default 100) The number of voters in each electorate.
    #[clap(long, value_parser)]
    pub voters: Option<usize>,

    /// (default 4) The number of candidates.
    #[clap(long, value_parser)]
    pub candidates: Option<usize>,

    /// (default 100) The number of electorates to simulate.
    #[clap(long, value_parser)]
    pub iterations: Option<usize>,

    /// (default polya) The electorate model: random, reverse, quality or polya. Each model uses its
    /// default parameters. Use a configuration file to set them.
    #[clap(long, value_parser)]
    pub model: Option<String>,

    /// (default: all) The methods to compare: score, mav, mj, bucklin. Can be repeated.
    #[clap(long, value_parser)]
    pub method: Option<Vec<String>>,

    /// (optional) The seed of the random generator. Runs with the same seed produce the same results.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// If passed as an argument, voters drawn at random found a new cluster and receive a personality.
    #[clap(long, takes_value = false)]
    pub personality: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
