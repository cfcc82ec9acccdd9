//! skat-hands: Skat game-record parser and hand scorer
//!
//! Goals:
//! - Read the server's tagged one-line game records into typed fields
//! - Value each dealt hand for bidding with the Stegen model
//! - No panics for invalid input; use `Result` and fail loudly on malformed data
//!
//! ## Quick start: score a record
//! ```
//! use skat_hands::record::{parse, Seat};
//!
//! let line = "(;GM[Skat]SE[1]ID[6997010]DT[2021-04-30/01:07:29/UTC]\
//!     P0[theCount]P1[blkkjk]P2[zoot]MV[w \
//!     HQ.HA.H7.CT.ST.SK.SA.HJ.CJ.CK.C8.DQ.S9.SQ.D9.C7.HK.DT.HT.CA.\
//!     CQ.D7.DK.H9.SJ.DJ.H8.S7.D8.S8.DA.C9 1 p]R[] ;)";
//! let record = parse(line).unwrap();
//! assert_eq!(record.session(), "2021-04-30-blkkjk-theCount-zoot");
//! assert_eq!(record.score(Seat::One).unwrap(), 11.5);
//! assert_eq!(record.score(Seat::Three).unwrap(), 7.0);
//! ```
//!
//! ## Quick start: score a hand
//! ```
//! use skat_hands::scorer::score_str;
//!
//! assert_eq!(score_str("C8,CK,CQ,D9,DA,HK,S9,SJ,SQ,ST").unwrap(), 7.0);
//! ```
//!
//! ## CLI
//! Score whole record files with:
//! ```sh
//! cargo run --bin skat-hands -- extract games.sgf -o scores.csv
//! ```

pub mod cards;
pub mod deck;
pub mod hand;
pub mod record;
pub mod report;
pub mod scorer;
pub mod sessions;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
