use skat_hands::record::{
    parse, GameRecord, MalformedRecord, ParseOptions, RecordParser, Seat, Slot, Tag,
};

const GAMES: &str = include_str!("data/games.sgf");

fn record(n: usize) -> GameRecord {
    parse(GAMES.lines().nth(n).unwrap()).unwrap()
}

#[test]
fn every_fixture_line_parses_strictly() {
    let parser = RecordParser::new(ParseOptions::strict());
    for line in GAMES.lines() {
        let r = parser.parse(line).unwrap();
        for slot in Slot::ALL {
            assert_eq!(r.slot(slot).len(), slot.card_count());
        }
    }
}

#[test]
fn first_game_fields() {
    let r = record(0);
    assert_eq!(r.id(), "6997010_2021-04-30/01:07:29/UTC");
    assert_eq!(r.date(), "2021-04-30");
    assert_eq!(r.players(), &["theCount", "blkkjk", "zoot"].map(String::from));
    assert_eq!(r.hand(Seat::One).to_string(), "HQ.HA.H7.CT.ST.SK.SA.HJ.CJ.CK");
    assert_eq!(r.skat().to_string(), "DA.C9");
}

#[test]
fn second_game_fields() {
    let r = record(1);
    assert_eq!(r.id(), "6997011_2021-04-30/01:12:24/UTC");
    assert_eq!(r.hand(Seat::One).to_string(), "ST.D9.SQ.CQ.S9.DA.C8.SJ.CK.HK");
    assert_eq!(r.hand(Seat::Two).to_string(), "D8.CJ.S8.H9.DT.C7.HQ.H8.HT.D7");
    assert_eq!(r.hand(Seat::Three).to_string(), "HA.DK.S7.DJ.H7.HJ.CA.SA.C9.CT");
    assert_eq!(r.skat().to_string(), "DQ.SK");
}

#[test]
fn third_game_has_its_own_session() {
    let r = record(2);
    assert_eq!(r.id(), "110012_2016-08-24/18:14:31/UTC");
    assert_eq!(r.session(), "2016-08-24-@9WScnU3-Alice-bob");
}

#[test]
fn reseated_players_share_a_session() {
    let (a, b) = (record(0), record(1));
    assert_ne!(a.player(Seat::One), b.player(Seat::One));
    assert_eq!(a.session(), b.session());
}

#[test]
fn scores_per_seat() {
    let expected = [[11.5, 6.0, 7.0], [7.0, 8.0, 11.0], [14.0, 6.0, 7.5]];
    for (n, want) in expected.iter().enumerate() {
        let r = record(n);
        let got: Vec<f64> = Seat::ALL.iter().map(|&s| r.score(s).unwrap()).collect();
        assert_eq!(&got, want, "game {n}");
    }
}

#[test]
fn missing_id_fails_without_partial_record() {
    let line = GAMES.lines().next().unwrap().replace("]ID[6997010", "]XX[6997010");
    assert_eq!(parse(&line), Err(MalformedRecord::MissingTag(Tag::Id)));
    assert_eq!(line.parse::<GameRecord>(), Err(MalformedRecord::MissingTag(Tag::Id)));
}

#[test]
fn truncated_line_fails() {
    let line = GAMES.lines().next().unwrap();
    let cut = &line[..line.find("MV[w ").unwrap() + 40];
    assert!(matches!(parse(cut), Err(MalformedRecord::MoveListTooShort { needed: 61, .. })));
}
