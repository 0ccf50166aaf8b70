//! mktor command line interface.
//!
//! Parses the mktorrent-compatible option surface, drives the pipeline
//! (scan, plan, hash, write), and owns output placement: the metainfo file
//! is created before hashing starts and removed again if anything fails, so
//! a non-zero exit never leaves a usable-looking partial file behind.

use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use mktor::constants::{
    FALLBACK_HASH_WORKERS, MAX_HASH_WORKERS, MAX_PIECE_LENGTH_EXP, MIN_PIECE_LENGTH_EXP,
};
use mktor::hasher::hash_pieces;
use mktor::metainfo::{ExtraFields, FileManifest, Metafile, MetainfoError, PiecePlan};
use mktor::walk::scan_tree;

/// Create BitTorrent metainfo files.
#[derive(Parser, Debug)]
#[command(name = "mktor", version, about, long_about = None)]
struct Args {
    /// Announce URLs, comma separated; repeat the flag to add backup tiers
    #[arg(short, long, value_name = "URL[,URL]*")]
    announce: Vec<String>,

    /// Add a comment to the metainfo
    #[arg(short, long)]
    comment: Option<String>,

    /// Don't write the creation date
    #[arg(short = 'd', long)]
    no_date: bool,

    /// Extra info dictionary field as key:value; the value may be a
    /// bencoded integer such as i87e
    #[arg(short, long, value_name = "KEY:VALUE")]
    extra: Vec<String>,

    /// Overwrite an existing metainfo file
    #[arg(short, long)]
    force: bool,

    /// Use pieces of 2^N bytes (default: chosen from the total size)
    #[arg(
        short = 'l',
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u32)
            .range(MIN_PIECE_LENGTH_EXP as i64..=MAX_PIECE_LENGTH_EXP as i64)
    )]
    piece_length: Option<u32>,

    /// Name of the torrent (default: basename of the target)
    #[arg(short, long)]
    name: Option<String>,

    /// Path of the created metainfo file (default: <name>.torrent)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Set the private flag
    #[arg(short, long)]
    private: bool,

    /// Hashing threads (default: number of CPU cores)
    #[arg(
        short,
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..=MAX_HASH_WORKERS as i64)
    )]
    threads: Option<u32>,

    /// Be verbose
    #[arg(short, long)]
    verbose: bool,

    /// Web seed URLs, comma separated; repeat the flag to add more
    #[arg(short = 'w', long, value_name = "URL[,URL]*")]
    web_seed: Vec<String>,

    /// The file or directory to create the torrent from
    target: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    run(args)
}

fn run(args: Args) -> anyhow::Result<()> {
    let announce: Vec<Vec<String>> = args.announce.iter().map(|tier| split_list(tier)).collect();
    let web_seeds: Vec<String> = args.web_seed.iter().flat_map(|urls| split_list(urls)).collect();

    if args.private && announce.is_empty() {
        return Err(MetainfoError::PrivateWithoutAnnounce.into());
    }

    let mut extra = ExtraFields::default();
    for spec in &args.extra {
        extra.insert(spec)?;
    }

    let threads = args
        .threads
        .map(|n| n as usize)
        .unwrap_or_else(default_workers);

    let target = &args.target;
    let name = match &args.name {
        Some(name) => name.clone(),
        None => target
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "cannot derive a torrent name from '{}', use --name",
                    target.display()
                )
            })?,
    };

    let meta = std::fs::metadata(target)
        .with_context(|| format!("stat'ing '{}'", target.display()))?;
    let (target_is_directory, manifest, content_base) = if meta.is_dir() {
        let manifest = scan_tree(target)
            .with_context(|| format!("scanning '{}'", target.display()))?;
        (true, manifest, target.clone())
    } else if meta.is_file() {
        let file_name = target
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("'{}' has no usable file name", target.display()))?;
        let base = target.parent().map(Path::to_path_buf).unwrap_or_default();
        (false, FileManifest::single_file(file_name, meta.len()), base)
    } else {
        bail!(
            "'{}' is neither a directory nor a regular file",
            target.display()
        );
    };

    let plan = PiecePlan::from_total_size(manifest.total_size(), args.piece_length);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.torrent", name)));

    let metafile = Metafile {
        name,
        announce,
        comment: args.comment.clone(),
        no_creation_date: args.no_date,
        private: args.private,
        web_seeds,
        extra,
        target_is_directory,
        manifest,
        plan,
    };
    metafile.validate()?;

    if args.verbose {
        dump_options(&metafile, &output, threads, args.force);
    }

    let file = open_output(&output, args.force)?;
    if let Err(err) = hash_and_write(metafile, &content_base, threads, file) {
        // nothing partial survives a failed run
        let _ = std::fs::remove_file(&output);
        return Err(err);
    }

    println!("Wrote {}", output.display());
    Ok(())
}

/// Splits a comma-separated option value into its parts.
fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(str::to_string).collect()
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().min(MAX_HASH_WORKERS))
        .unwrap_or(FALLBACK_HASH_WORKERS)
}

fn open_output(path: &Path, force: bool) -> anyhow::Result<File> {
    let result = if force {
        File::create(path)
    } else {
        OpenOptions::new().write(true).create_new(true).open(path)
    };
    match result {
        Ok(file) => Ok(file),
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            bail!("'{}' already exists, use --force to overwrite", path.display())
        }
        Err(err) => {
            Err(err).with_context(|| format!("creating '{}'", path.display()))
        }
    }
}

fn hash_and_write(
    metafile: Metafile,
    content_base: &Path,
    threads: usize,
    file: File,
) -> anyhow::Result<()> {
    let digests = hash_pieces(content_base, &metafile.manifest, &metafile.plan, threads)
        .context("hashing content")?;
    metafile
        .write_to(&digests, BufWriter::new(file))
        .context("writing metainfo")?;
    Ok(())
}

fn dump_options(metafile: &Metafile, output: &Path, threads: usize, force: bool) {
    if metafile.announce.is_empty() {
        info!("announce: none");
    }
    for (n, tier) in metafile.announce.iter().enumerate() {
        info!("announce tier {}: {}", n + 1, tier.join(", "));
    }
    info!("torrent name: {}", metafile.name);
    info!("metainfo file: {}", output.display());
    info!("overwrite: {}", force);
    info!("private: {}", metafile.private);
    info!("write date: {}", !metafile.no_creation_date);
    info!("threads: {}", threads);
    if let Some(comment) = &metafile.comment {
        info!("comment: \"{}\"", comment);
    }
    for url in &metafile.web_seeds {
        info!("web seed: {}", url);
    }
    for field in metafile.extra.iter() {
        info!("extra field: \"{}\" -> \"{}\"", field.key, field.value);
    }
    info!(
        "{} bytes in all, {} pieces of {} bytes each",
        metafile.manifest.total_size(),
        metafile.plan.piece_count,
        metafile.plan.piece_length
    );
}
