use clap::{Parser, Subcommand, ValueEnum};
use skat_hands::deck::Deck;
use skat_hands::hand::Hand;
use skat_hands::record::{render_record, ParseOptions, Seat};
use skat_hands::report::{
    extract, read_rows, Delimiter, ExtractOptions, ExtractSummary, OnError, RowKind, RowWriter,
};
use skat_hands::scorer::evaluate;
use skat_hands::sessions::{scores_for_position, write_player_sessions, SessionTable};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skat-hands", version)]
#[command(about = "Score dealt Skat hands from server game records")]
struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every seat of every record in the input files
    Extract {
        /// Raw record files, one game per line
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Append to the output file instead of truncating it
        #[arg(long)]
        append: bool,

        #[arg(long, value_enum, default_value = "csv")]
        format: Format,

        /// Write a header row first
        #[arg(long)]
        header: bool,

        /// Write sorted hands next to the scores instead of session rows
        #[arg(long)]
        hands: bool,

        /// Reject records whose deal is not the full 32-card deck
        #[arg(long)]
        strict: bool,

        /// Stop at the first malformed record instead of skipping it
        #[arg(long)]
        abort_on_error: bool,
    },
    /// Score a single hand, e.g. `HQ,HA,H7,CT,ST,SK,SA,HJ,CJ,CK`
    Score {
        hand: String,

        /// Print the valuation breakdown
        #[arg(long)]
        explain: bool,
    },
    /// Group one player's scores by session
    Sessions {
        /// Score file written by `extract` (csv)
        scores: PathBuf,

        #[arg(short, long)]
        player: String,

        /// Output file; defaults to `<scores>_<player>.csv`
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// The score file starts with a header row
        #[arg(long)]
        header: bool,
    },
    /// List every score of one seat
    Position {
        scores: PathBuf,

        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
        seat: u8,

        #[arg(long, value_enum, default_value = "csv")]
        format: Format,

        #[arg(long)]
        header: bool,
    },
    /// Print synthetic records from seeded shuffles
    Deal {
        #[arg(long, default_value = "0")]
        seed: u64,

        #[arg(short, long, default_value = "1")]
        count: u32,

        #[arg(long, num_args = 3, default_values = ["ann", "bo", "cy"])]
        players: Vec<String>,

        #[arg(long, default_value = "2021-01-01")]
        date: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Tsv,
}

impl From<Format> for Delimiter {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => Delimiter::Csv,
            Format::Tsv => Delimiter::Tsv,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match args.command {
        Command::Extract {
            inputs,
            output,
            append,
            format,
            header,
            hands,
            strict,
            abort_on_error,
        } => {
            let options = ExtractOptions {
                delimiter: format.into(),
                header,
                on_error: if abort_on_error { OnError::Abort } else { OnError::Skip },
                parse: ParseOptions { strict_deck: strict },
            };
            let kind = if hands { RowKind::Hands } else { RowKind::Scores };
            let (sink, header): (Box<dyn Write>, bool) = match &output {
                Some(path) => {
                    let file = open_output(path, append)?;
                    let header = header_wanted(&file, options.header, append)?;
                    (Box::new(BufWriter::new(file)), header)
                }
                None => (Box::new(io::stdout().lock()), options.header),
            };
            let mut out = RowWriter::new(sink, options.delimiter, header);
            let mut total = ExtractSummary::default();
            for path in &inputs {
                info!(file = %path.display(), "extracting");
                let input = BufReader::new(File::open(path)?);
                total.merge(extract(input, &mut out, kind, &options)?);
            }
            out.into_inner()?.flush()?;
            if total.skipped > 0 {
                warn!(skipped = total.skipped, "some records could not be parsed");
            }
            eprintln!(
                "{} records, {} rows written, {} skipped",
                total.records, total.rows, total.skipped
            );
        }
        Command::Score { hand, explain } => {
            let hand: Hand = hand.parse()?;
            let v = evaluate(&hand)?;
            if explain {
                println!("trump:        {}", v.trump);
                println!("base:         {}", v.base);
                println!("jack bonus:   {}", v.jack_bonus);
                println!("missing:      {}", v.missing_suits);
                println!("suit path:    {}", v.suit_path);
                println!("grand path:   {:.3}", v.grand_path);
            }
            println!("{:?}", v.score);
        }
        Command::Sessions { scores, player, output, header } => {
            let rows = read_rows(BufReader::new(File::open(&scores)?), Delimiter::Csv, header)?;
            let table = SessionTable::from_rows(&rows);
            let path = output.unwrap_or_else(|| default_sessions_path(&scores, &player));
            let file = BufWriter::new(File::create(&path)?);
            let lines = write_player_sessions(&table, &player, file)?;
            info!(player = %player, sessions = lines, file = %path.display(), "sessions written");
            if lines == 0 {
                warn!(player = %player, "player not found in score file");
            }
        }
        Command::Position { scores, seat, format, header } => {
            let seat = Seat::try_from(seat)?;
            let rows = read_rows(BufReader::new(File::open(&scores)?), format.into(), header)?;
            let mut stdout = io::stdout().lock();
            for score in scores_for_position(&rows, seat) {
                writeln!(stdout, "{score:?}")?;
            }
        }
        Command::Deal { seed, count, players, date } => {
            let names = [players[0].as_str(), players[1].as_str(), players[2].as_str()];
            let mut stdout = io::stdout().lock();
            for n in 0..count {
                let mut deck = Deck::skat();
                deck.shuffle_seeded(seed.wrapping_add(u64::from(n)));
                let deal = deck.deal()?;
                let minute = n % 60;
                let hour = (n / 60) % 24;
                let timestamp = format!("{date}/{hour:02}:{minute:02}:00/UTC");
                let id = (seed.wrapping_add(u64::from(n))).to_string();
                writeln!(stdout, "{}", render_record(&id, &timestamp, names, &deal))?;
            }
        }
    }
    Ok(())
}

fn open_output(path: &Path, append: bool) -> io::Result<File> {
    OpenOptions::new().create(true).write(true).append(append).truncate(!append).open(path)
}

/// An appended file that already has rows keeps its original header.
fn header_wanted(file: &File, header: bool, append: bool) -> io::Result<bool> {
    Ok(header && !(append && file.metadata()?.len() > 0))
}

/// `scores.csv` + `zoot` -> `scores_zoot.csv`
fn default_sessions_path(scores: &Path, player: &str) -> PathBuf {
    let stem = scores.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    scores.with_file_name(format!("{stem}_{player}.csv"))
}
