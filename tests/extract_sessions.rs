use skat_hands::record::Seat;
use skat_hands::report::{
    extract, read_rows, Delimiter, ExtractOptions, OnError, ReportError, RowKind, RowWriter,
};
use skat_hands::sessions::{
    read_sessions, scores_for_position, write_player_sessions, SessionTable,
};

const GAMES: &str = include_str!("data/games.sgf");

fn extract_to_string(input: &str, kind: RowKind, options: &ExtractOptions) -> String {
    let mut out = RowWriter::new(Vec::new(), options.delimiter, options.header);
    extract(input.as_bytes(), &mut out, kind, options).unwrap();
    String::from_utf8(out.into_inner().unwrap()).unwrap()
}

#[test]
fn three_rows_per_game() {
    let text = extract_to_string(GAMES, RowKind::Scores, &ExtractOptions::default());
    assert_eq!(text.lines().count(), 3 * GAMES.lines().count());
    assert_eq!(
        text.lines().next(),
        Some("6997010_2021-04-30/01:07:29/UTC,2021-04-30-blkkjk-theCount-zoot,theCount,1,11.5")
    );
}

#[test]
fn position_lists_follow_file_order() {
    let text = extract_to_string(GAMES, RowKind::Scores, &ExtractOptions::default());
    let rows = read_rows(text.as_bytes(), Delimiter::Csv, false).unwrap();
    assert_eq!(scores_for_position(&rows, Seat::One), [11.5, 7.0, 14.0]);
    assert_eq!(scores_for_position(&rows, Seat::Two), [6.0, 8.0, 6.0]);
    assert_eq!(scores_for_position(&rows, Seat::Three), [7.0, 11.0, 7.5]);
}

#[test]
fn player_sessions_collect_scores_across_seats() {
    let text = extract_to_string(GAMES, RowKind::Scores, &ExtractOptions::default());
    let rows = read_rows(text.as_bytes(), Delimiter::Csv, false).unwrap();
    let table = SessionTable::from_rows(&rows);

    let mut out = Vec::new();
    assert_eq!(write_player_sessions(&table, "zoot", &mut out).unwrap(), 1);
    let line = String::from_utf8(out).unwrap();
    assert_eq!(line, "zoot,2021-04-30-blkkjk-theCount-zoot,7.0,8.0\n");

    let back = read_sessions(line.as_bytes()).unwrap();
    assert_eq!(back.get("zoot", "2021-04-30-blkkjk-theCount-zoot"), Some(&[7.0, 8.0][..]));
}

#[test]
fn hand_listing_as_tsv() {
    let opts = ExtractOptions { delimiter: Delimiter::Tsv, header: true, ..Default::default() };
    let text = extract_to_string(GAMES, RowKind::Hands, &opts);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("id\tplayer\tposition\thand\tscore"));
    assert_eq!(
        lines.next(),
        Some("6997010_2021-04-30/01:07:29/UTC\ttheCount\t1\tCJ.CK.CT.H7.HA.HJ.HQ.SA.SK.ST\t11.5")
    );
}

#[test]
fn strict_abort_stops_on_a_bad_deal() {
    let bad = GAMES.lines().next().unwrap().replacen("DA.C9", "DA.HQ", 1);
    let input = format!("{GAMES}{bad}\n");

    let lenient = extract_to_string(&input, RowKind::Scores, &ExtractOptions::default());
    assert_eq!(lenient.lines().count(), 12);

    let opts = ExtractOptions {
        on_error: OnError::Abort,
        parse: skat_hands::record::ParseOptions::strict(),
        ..Default::default()
    };
    let mut out = RowWriter::new(Vec::new(), opts.delimiter, opts.header);
    let err = extract(input.as_bytes(), &mut out, RowKind::Scores, &opts).unwrap_err();
    assert!(matches!(err, ReportError::Record { line: 4, .. }));
}
