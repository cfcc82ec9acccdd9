use crate::hand::InvalidHand;
use crate::record::{GameRecord, MalformedRecord, ParseOptions, RecordParser, Seat};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use tracing::{debug, info, warn};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ReportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    Record { line: usize, source: MalformedRecord },
    #[error("record {id}: {source}")]
    Score { id: String, source: InvalidHand },
    #[error("line {line}: bad field '{value}'")]
    Field { line: usize, value: String },
}

/// Field separator of the tabular output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Csv,
    Tsv,
}

impl Delimiter {
    pub const fn byte(self) -> u8 {
        match self {
            Delimiter::Csv => b',',
            Delimiter::Tsv => b'\t',
        }
    }
}

/// What to do with a line that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnError {
    /// Log it and carry on.
    #[default]
    Skip,
    /// Stop the batch with the error.
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub delimiter: Delimiter,
    pub header: bool,
    pub on_error: OnError,
    pub parse: ParseOptions,
}

/// One seat of one game: `id, session, player, position, score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub id: String,
    pub session: String,
    pub player: String,
    pub position: u8,
    pub score: f64,
}

/// A seat's hand listed out, sorted, next to its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandRow {
    pub id: String,
    pub player: String,
    pub position: u8,
    pub hand: String,
    pub score: f64,
}

/// The three score rows of a record, seat order.
pub fn score_rows(record: &GameRecord) -> Result<[ScoreRow; 3], InvalidHand> {
    let session = record.session();
    let row = |seat: Seat| -> Result<ScoreRow, InvalidHand> {
        Ok(ScoreRow {
            id: record.id().to_string(),
            session: session.clone(),
            player: record.player(seat).to_string(),
            position: seat.position(),
            score: record.score(seat)?,
        })
    };
    Ok([row(Seat::One)?, row(Seat::Two)?, row(Seat::Three)?])
}

/// The three hand rows of a record, seat order.
pub fn hand_rows(record: &GameRecord) -> Result<[HandRow; 3], InvalidHand> {
    let row = |seat: Seat| -> Result<HandRow, InvalidHand> {
        Ok(HandRow {
            id: record.id().to_string(),
            player: record.player(seat).to_string(),
            position: seat.position(),
            hand: record.hand(seat).sorted().to_string(),
            score: record.score(seat)?,
        })
    };
    Ok([row(Seat::One)?, row(Seat::Two)?, row(Seat::Three)?])
}

/// Delimited writer for [`ScoreRow`]s or [`HandRow`]s. The header, when enabled, is taken
/// from the row's field names and written before the first row.
pub struct RowWriter<W: io::Write> {
    inner: csv::Writer<W>,
}

impl<W: io::Write> RowWriter<W> {
    pub fn new(writer: W, delimiter: Delimiter, header: bool) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(delimiter.byte())
            .has_headers(header)
            .from_writer(writer);
        Self { inner }
    }

    pub fn write<T: Serialize>(&mut self, row: &T) -> Result<(), ReportError> {
        self.inner.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ReportError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, ReportError> {
        self.inner
            .into_inner()
            .map_err(|e| ReportError::Io(io::Error::new(e.error().kind(), e.to_string())))
    }
}

/// Counters from one [`extract`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub records: usize,
    pub rows: usize,
    pub skipped: usize,
}

impl ExtractSummary {
    pub fn merge(&mut self, other: ExtractSummary) {
        self.records += other.records;
        self.rows += other.rows;
        self.skipped += other.skipped;
    }
}

/// Which rows [`extract`] produces per record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowKind {
    #[default]
    Scores,
    Hands,
}

/// Batch scoring: parse every non-blank line of `input` and write one delimited row per
/// seat, three per record.
///
/// ```
/// use skat_hands::report::{extract, ExtractOptions, RowKind, RowWriter};
///
/// let input = "(;GM[Skat]SE[1]ID[42]DT[2021-04-30/01:07:29/UTC]P0[ann]P1[bo]P2[cy]MV[w \
///     HQ.HA.H7.CT.ST.SK.SA.HJ.CJ.CK.C8.DQ.S9.SQ.D9.C7.HK.DT.HT.CA.\
///     CQ.D7.DK.H9.SJ.DJ.H8.S7.D8.S8.DA.C9 1 p]R[] ;)\n";
/// let opts = ExtractOptions::default();
/// let mut out = RowWriter::new(Vec::new(), opts.delimiter, opts.header);
/// let summary = extract(input.as_bytes(), &mut out, RowKind::Scores, &opts).unwrap();
/// assert_eq!(summary.rows, 3);
/// let text = String::from_utf8(out.into_inner().unwrap()).unwrap();
/// assert!(text.starts_with("42_2021-04-30/01:07:29/UTC,2021-04-30-ann-bo-cy,ann,1,11.5\n"));
/// ```
pub fn extract<R, W>(
    input: R,
    out: &mut RowWriter<W>,
    kind: RowKind,
    options: &ExtractOptions,
) -> Result<ExtractSummary, ReportError>
where
    R: BufRead,
    W: io::Write,
{
    let parser = RecordParser::new(options.parse);
    let mut summary = ExtractSummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let record = match parser.parse(&line) {
            Ok(record) => record,
            Err(source) if options.on_error == OnError::Skip => {
                warn!(line = line_no, error = %source, "skipping malformed record");
                summary.skipped += 1;
                continue;
            }
            Err(source) => return Err(ReportError::Record { line: line_no, source }),
        };
        let scored =
            |source: InvalidHand| ReportError::Score { id: record.id().to_string(), source };
        match kind {
            RowKind::Scores => {
                for row in score_rows(&record).map_err(scored)? {
                    out.write(&row)?;
                }
            }
            RowKind::Hands => {
                for row in hand_rows(&record).map_err(scored)? {
                    out.write(&row)?;
                }
            }
        }
        debug!(line = line_no, id = record.id(), "scored record");
        summary.records += 1;
        summary.rows += 3;
    }
    out.flush()?;
    info!(
        records = summary.records,
        rows = summary.rows,
        skipped = summary.skipped,
        "extraction finished"
    );
    Ok(summary)
}

/// Load score rows written by [`extract`].
pub fn read_rows<R: io::Read>(
    input: R,
    delimiter: Delimiter,
    header: bool,
) -> Result<Vec<ScoreRow>, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(header)
        .from_reader(input);
    let rows = reader.deserialize().collect::<Result<Vec<ScoreRow>, csv::Error>>()?;
    Ok(rows)
}
