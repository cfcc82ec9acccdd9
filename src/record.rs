use crate::deck::{Deal, DeckError};
use crate::hand::{split_cards, Hand, InvalidHand, PLAYER_HAND_LEN, SKAT_LEN};
use crate::scorer;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Characters before the first card of the move list.
pub const MOVE_LIST_LEAD: usize = 2;
/// Width of one dealt card: two-character code plus its `.` separator.
pub const CARD_WIDTH: usize = 3;
/// Width of one seat's hand in the move list.
pub const SEAT_STRIDE: usize = PLAYER_HAND_LEN * CARD_WIDTH;

const CARD_SEPARATOR: char = '.';
const DATE_END: char = '/';
const VALUE_END: char = ']';

/// A seat at the table, numbered 1 to 3 as in the output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Seat {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Seat {
    pub const ALL: [Seat; 3] = [Seat::One, Seat::Two, Seat::Three];

    /// One-based position.
    pub const fn position(self) -> u8 {
        self as u8
    }

    /// Zero-based slot, also the digit of the seat's `P` tag.
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("seat must be 1, 2 or 3, got {0}")]
pub struct InvalidSeat(pub u8);

impl TryFrom<u8> for Seat {
    type Error = InvalidSeat;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Seat::One),
            2 => Ok(Seat::Two),
            3 => Ok(Seat::Three),
            _ => Err(InvalidSeat(v)),
        }
    }
}

/// A block of the dealt cards: one seat's hand or the skat (position 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Seat(Seat),
    Skat,
}

impl Slot {
    pub const ALL: [Slot; 4] =
        [Slot::Seat(Seat::One), Slot::Seat(Seat::Two), Slot::Seat(Seat::Three), Slot::Skat];

    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position.checked_sub(1)?).copied()
    }

    /// One-based position: seats 1 to 3, the skat 4.
    pub const fn position(self) -> usize {
        match self {
            Slot::Seat(seat) => seat.position() as usize,
            Slot::Skat => 4,
        }
    }

    /// Cards in this block.
    pub const fn card_count(self) -> usize {
        match self {
            Slot::Seat(_) => PLAYER_HAND_LEN,
            Slot::Skat => SKAT_LEN,
        }
    }

    /// Character range of this block inside the move list: `start = 2 + (p - 1) * 30`,
    /// `end = start + len * 3 - 1`. The last card's separator is not part of the range.
    ///
    /// ```
    /// use skat_hands::record::{Seat, Slot};
    ///
    /// assert_eq!(Slot::Seat(Seat::One).span(), 2..31);
    /// assert_eq!(Slot::Seat(Seat::Three).span(), 62..91);
    /// assert_eq!(Slot::Skat.span(), 92..97);
    /// ```
    pub const fn span(self) -> Range<usize> {
        let start = MOVE_LIST_LEAD + (self.position() - 1) * SEAT_STRIDE;
        start..start + self.card_count() * CARD_WIDTH - 1
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Seat(seat) => write!(f, "hand {seat}"),
            Slot::Skat => f.write_str("skat"),
        }
    }
}

/// Fields read out of a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Id,
    Date,
    Player(Seat),
    MoveList,
}

impl Tag {
    pub const fn marker(self) -> &'static str {
        match self {
            Tag::Id => "]ID[",
            Tag::Date => "]DT[",
            Tag::Player(Seat::One) => "]P0[",
            Tag::Player(Seat::Two) => "]P1[",
            Tag::Player(Seat::Three) => "]P2[",
            Tag::MoveList => "]MV[",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedRecord {
    #[error("missing tag {0}")]
    MissingTag(Tag),
    #[error("value of tag {0} is not terminated")]
    Unterminated(Tag),
    /// The `DT` value has no `/` between the date and the time.
    #[error("timestamp {0:?} has no '/' after the date")]
    Timestamp(String),
    #[error("move list too short: need {needed} characters, found {found}")]
    MoveListTooShort { needed: usize, found: usize },
    /// A block of the deal holds a token that is not a card. This covers the skat too, even
    /// though it is never scored: the record is rejected rather than read with a gap.
    #[error("bad cards in {slot}: {source}")]
    Deal { slot: Slot, source: InvalidHand },
    #[error("deal is not a full deck: {0}")]
    Deck(#[from] DeckError),
}

/// Parser settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Also require the 32 dealt cards to be the full deck with no repeats.
    pub strict_deck: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self { strict_deck: true }
    }
}

/// Turns raw record lines into [`GameRecord`]s.
///
/// A record is a run of `KEY[value]` segments. Fields are found by searching for the marker
/// `]KEY[` and reading up to the next `]`:
///
/// ```text
/// (;GM[Skat]...SE[24072]ID[6997010]DT[2021-04-30/01:07:29/UTC]P0[theCount]P1[blkkjk]P2[zoot]
///   ...MV[w HQ.HA.H7....DA.C9 1 p 2 18 ...]R[...] ;)
/// ```
///
/// The move list opens with the deal: a two-character lead (`w `) followed by the 32 dealt
/// cards joined by `.`, ten per seat and then the skat. Every card takes three characters, so
/// each block sits at a fixed offset (see [`Slot::span`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser {
    options: ParseOptions,
}

impl RecordParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parse one raw line. Fails on the first missing or truncated field; nothing is
    /// returned for a partly readable line.
    pub fn parse(&self, line: &str) -> Result<GameRecord, MalformedRecord> {
        let game_id = tagged(line, Tag::Id, VALUE_END)?;
        let timestamp = tagged(line, Tag::Date, VALUE_END)?;
        let (date, _) = timestamp
            .split_once(DATE_END)
            .ok_or_else(|| MalformedRecord::Timestamp(timestamp.to_string()))?;
        let players = [
            tagged(line, Tag::Player(Seat::One), VALUE_END)?.to_string(),
            tagged(line, Tag::Player(Seat::Two), VALUE_END)?.to_string(),
            tagged(line, Tag::Player(Seat::Three), VALUE_END)?.to_string(),
        ];

        let moves = move_list(line)?;
        let hands = [
            read_block(moves, Slot::Seat(Seat::One))?,
            read_block(moves, Slot::Seat(Seat::Two))?,
            read_block(moves, Slot::Seat(Seat::Three))?,
        ];
        let skat = read_block(moves, Slot::Skat)?;
        let deal = Deal { hands, skat };
        if self.options.strict_deck {
            deal.validate()?;
        }

        Ok(GameRecord {
            id: format!("{game_id}_{timestamp}"),
            game_id: game_id.to_string(),
            timestamp: timestamp.to_string(),
            date: date.to_string(),
            players,
            deal,
        })
    }
}

/// Parse one raw line with default options.
///
/// ```
/// use skat_hands::record::{parse, Seat};
///
/// let line = "(;GM[Skat]SE[1]ID[42]DT[2021-04-30/01:07:29/UTC]P0[ann]P1[bo]P2[cy]MV[w \
///     HQ.HA.H7.CT.ST.SK.SA.HJ.CJ.CK.C8.DQ.S9.SQ.D9.C7.HK.DT.HT.CA.\
///     CQ.D7.DK.H9.SJ.DJ.H8.S7.D8.S8.DA.C9 1 p]R[] ;)";
/// let record = parse(line).unwrap();
/// assert_eq!(record.id(), "42_2021-04-30/01:07:29/UTC");
/// assert_eq!(record.session(), "2021-04-30-ann-bo-cy");
/// assert_eq!(record.score(Seat::One).unwrap(), 11.5);
/// ```
pub fn parse(line: &str) -> Result<GameRecord, MalformedRecord> {
    RecordParser::default().parse(line)
}

/// Value following `tag`, up to the first `end`.
fn tagged(line: &str, tag: Tag, end: char) -> Result<&str, MalformedRecord> {
    let marker = tag.marker();
    let at = line.find(marker).ok_or(MalformedRecord::MissingTag(tag))?;
    let rest = &line[at + marker.len()..];
    let len = rest.find(end).ok_or(MalformedRecord::Unterminated(tag))?;
    Ok(&rest[..len])
}

/// Everything after the move-list marker, up to any repeat of the marker.
fn move_list(line: &str) -> Result<&str, MalformedRecord> {
    let marker = Tag::MoveList.marker();
    let at = line.find(marker).ok_or(MalformedRecord::MissingTag(Tag::MoveList))?;
    let rest = &line[at + marker.len()..];
    Ok(rest.split(marker).next().unwrap_or(rest))
}

fn read_block(moves: &str, slot: Slot) -> Result<Hand, MalformedRecord> {
    let span = slot.span();
    let text = char_slice(moves, span.clone()).ok_or_else(|| {
        MalformedRecord::MoveListTooShort { needed: span.end, found: moves.chars().count() }
    })?;
    let cards = split_cards(text, CARD_SEPARATOR)
        .map_err(|source| MalformedRecord::Deal { slot, source })?;
    let hand = match slot {
        Slot::Seat(_) => Hand::player(cards),
        Slot::Skat => Hand::skat(cards),
    };
    hand.map_err(|source| MalformedRecord::Deal { slot, source })
}

/// Slice by character offsets; `None` when `s` is shorter than `span.end`.
fn char_slice(s: &str, span: Range<usize>) -> Option<&str> {
    let mut bounds = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let start = bounds.nth(span.start)?;
    let end = if span.is_empty() { start } else { bounds.nth(span.len() - 1)? };
    Some(&s[start..end])
}

/// One parsed game: who sat where and what they were dealt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    id: String,
    game_id: String,
    timestamp: String,
    date: String,
    players: [String; 3],
    deal: Deal,
}

impl GameRecord {
    /// `<game id>_<timestamp>`, unique per record.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The server's game number alone.
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Full `DT` value, e.g. `2021-04-30/01:07:29/UTC`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Calendar date part of the timestamp.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Date plus the three player names in sorted order, so the key does not depend on
    /// seating: `2021-04-30-blkkjk-theCount-zoot`.
    pub fn session(&self) -> String {
        let mut names: Vec<&str> = self.players.iter().map(String::as_str).collect();
        names.sort_unstable();
        let mut key = self.date.clone();
        for name in names {
            key.push('-');
            key.push_str(name);
        }
        key
    }

    pub fn player(&self, seat: Seat) -> &str {
        &self.players[seat.index()]
    }

    pub fn players(&self) -> &[String; 3] {
        &self.players
    }

    /// Seat of the named player, if they played in this game.
    pub fn seat_of(&self, name: &str) -> Option<Seat> {
        Seat::ALL.into_iter().find(|&seat| self.player(seat) == name)
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.deal.hands[seat.index()]
    }

    pub fn skat(&self) -> &Hand {
        &self.deal.skat
    }

    /// Hand at a block position, the skat being position 4.
    pub fn slot(&self, slot: Slot) -> &Hand {
        match slot {
            Slot::Seat(seat) => self.hand(seat),
            Slot::Skat => self.skat(),
        }
    }

    /// Hand dealt to the named player.
    pub fn hand_of(&self, name: &str) -> Option<&Hand> {
        self.seat_of(name).map(|seat| self.hand(seat))
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    /// Bidding value of the hand at `seat`.
    pub fn score(&self, seat: Seat) -> Result<f64, InvalidHand> {
        scorer::score(self.hand(seat))
    }
}

impl FromStr for GameRecord {
    type Err = MalformedRecord;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Write a record line that [`parse`] reads back to the same fields.
pub fn render_record(game_id: &str, timestamp: &str, players: [&str; 3], deal: &Deal) -> String {
    let [p0, p1, p2] = players;
    let [h1, h2, h3] = &deal.hands;
    format!(
        "(;GM[Skat]PC[International Skat Server]CO[]SE[0]ID[{game_id}]DT[{timestamp}]\
         P0[{p0}]P1[{p1}]P2[{p2}]R0[]R1[]R2[]MV[w {h1}.{h2}.{h3}.{skat}]R[] ;)",
        skat = deal.skat,
    )
}
