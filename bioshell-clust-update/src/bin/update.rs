use std::env;

use clap::Parser;
use log::{error, info};

use bioshell_clust_update::orchestrator::{run, Config};
use bioshell_clust_update::similarity::SubstitutionMatrixChoice;
use bioshell_clust_update::ClustUpdateError;

#[derive(Parser, Debug)]
#[clap(name = "update", version, author)]
#[clap(about = "Incrementally updates a clustering of a sequence database to a new database version", long_about = None)]
struct Args {
    /// previous version of the sequence database
    old_db: String,
    /// current version of the sequence database
    new_db: String,
    /// clustering of `old_db`
    old_db_clustering: String,
    /// where to write the updated clustering
    out_db: String,
    /// scratch directory for intermediate search/clustering results
    tmp_dir: String,

    /// substitution matrix used to score alignments (blosum45, blosum62, blosum80, pam30, pam70, pam120, pam250)
    #[clap(long, default_value = "blosum62")]
    sub_mat: String,
    /// maximum number of hits kept per query in a similarity search
    #[clap(long, default_value = "20")]
    max_seqs: usize,
    /// sequences longer than this are skipped by the search and clustering steps
    #[clap(long, default_value = "32000")]
    max_seq_len: usize,
    /// minimum sequence identity for a hit to count as a match
    #[clap(long, default_value = "0.3")]
    min_seq_id: f32,
    /// be more verbose and log program actions on the screen
    #[clap(short, long)]
    verbose: bool,
}

pub fn main() -> Result<(), ClustUpdateError> {
    let args = Args::parse();
    unsafe {
        if env::var("RUST_LOG").is_err() { env::set_var("RUST_LOG", "info") }
        if args.verbose { env::set_var("RUST_LOG", "debug"); }
    }
    env_logger::init();

    let sub_mat: SubstitutionMatrixChoice = args.sub_mat.parse().unwrap_or_else(|e| {
        error!("{e}, falling back to blosum62");
        SubstitutionMatrixChoice::Blosum62
    });
    let config = Config {
        sub_mat,
        max_seqs: args.max_seqs,
        max_seq_len: args.max_seq_len,
        min_seq_id: args.min_seq_id,
    };

    std::fs::create_dir_all(&args.tmp_dir)?;

    let stats = run(&args.old_db, &args.new_db, &args.old_db_clustering, &args.out_db, &args.tmp_dir, &config)?;
    info!("{}", stats.report());

    Ok(())
}
