use crate::record::Seat;
use crate::report::{ReportError, ScoreRow};
use std::collections::HashMap;
use std::io;

/// All scores one player was dealt during one session, in game order.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionScores {
    pub player: String,
    pub session: String,
    pub scores: Vec<f64>,
}

/// Per-player, per-session score lists, a session being one day with the same three
/// players. Entries keep first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    entries: Vec<SessionScores>,
    index: HashMap<(String, String), usize>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a ScoreRow>,
    {
        let mut table = Self::new();
        for row in rows {
            table.push(&row.player, &row.session, row.score);
        }
        table
    }

    pub fn push(&mut self, player: &str, session: &str, score: f64) {
        let key = (player.to_string(), session.to_string());
        let slot = *self.index.entry(key).or_insert_with(|| {
            self.entries.push(SessionScores {
                player: player.to_string(),
                session: session.to_string(),
                scores: Vec::new(),
            });
            self.entries.len() - 1
        });
        self.entries[slot].scores.push(score);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionScores> {
        self.entries.iter()
    }

    /// Sessions of one player, matched by exact name.
    pub fn for_player<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a SessionScores> {
        self.entries.iter().filter(move |e| e.player == player)
    }

    pub fn get(&self, player: &str, session: &str) -> Option<&[f64]> {
        self.index
            .get(&(player.to_string(), session.to_string()))
            .map(|&i| self.entries[i].scores.as_slice())
    }
}

/// Every score of the given seat, in row order.
pub fn scores_for_position(rows: &[ScoreRow], seat: Seat) -> Vec<f64> {
    rows.iter().filter(|r| r.position == seat.position()).map(|r| r.score).collect()
}

/// Write `player,session,score,...` lines for one player. Returns the number of lines.
pub fn write_player_sessions<W: io::Write>(
    table: &SessionTable,
    player: &str,
    out: W,
) -> Result<usize, ReportError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).has_headers(false).from_writer(out);
    let mut lines = 0;
    for entry in table.for_player(player) {
        let mut record = vec![entry.player.clone(), entry.session.clone()];
        // Debug keeps the trailing `.0` on whole numbers.
        record.extend(entry.scores.iter().map(|s| format!("{s:?}")));
        writer.write_record(&record)?;
        lines += 1;
    }
    writer.flush()?;
    Ok(lines)
}

/// Read lines written by [`write_player_sessions`] back into a table.
pub fn read_sessions<R: io::Read>(input: R) -> Result<SessionTable, ReportError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).has_headers(false).from_reader(input);
    let mut table = SessionTable::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let (Some(player), Some(session)) = (record.get(0), record.get(1)) else {
            return Err(ReportError::Field { line: idx + 1, value: record.as_slice().to_string() });
        };
        for value in record.iter().skip(2) {
            let score = value
                .trim()
                .parse::<f64>()
                .map_err(|_| ReportError::Field { line: idx + 1, value: value.to_string() })?;
            table.push(player, session, score);
        }
    }
    Ok(table)
}
