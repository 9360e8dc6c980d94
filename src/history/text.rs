//! Plain-text save format.
//!
//! One `key=value` pair per line. Scalars use the snapshot field names;
//! each card is a `card=id,value,isFaceUp,isMatched` line and each history
//! entry a `move=card1Id,card2Id` line, both in order. Blank lines and
//! lines starting with `#` are ignored.

use std::fmt::Write as _;
use std::str::FromStr;

use im::Vector;
use rustc_hash::FxHashMap;

use super::error::{HistoryError, Result};
use crate::core::{Card, CardId, Difficulty, GameState, Move};

const SCALARS: [&str; 14] = [
    "difficulty",
    "moves",
    "matchedPairs",
    "score",
    "matchStreak",
    "gameCompleted",
    "elapsedTimeInSeconds",
    "isTimerRunning",
    "isMultiplayer",
    "isHost",
    "isMyTurn",
    "opponentScore",
    "myPairs",
    "opponentPairs",
];

pub(crate) fn to_text(state: &GameState) -> String {
    let mut out = String::new();
    let scalars: [(&str, &dyn std::fmt::Display); 14] = [
        ("difficulty", &state.difficulty),
        ("moves", &state.moves),
        ("matchedPairs", &state.matched_pairs),
        ("score", &state.score),
        ("matchStreak", &state.match_streak),
        ("gameCompleted", &state.game_completed),
        ("elapsedTimeInSeconds", &state.elapsed_time_in_seconds),
        ("isTimerRunning", &state.is_timer_running),
        ("isMultiplayer", &state.is_multiplayer),
        ("isHost", &state.is_host),
        ("isMyTurn", &state.is_my_turn),
        ("opponentScore", &state.opponent_score),
        ("myPairs", &state.my_pairs),
        ("opponentPairs", &state.opponent_pairs),
    ];

    // Writing to a String cannot fail.
    for (key, value) in scalars {
        let _ = writeln!(out, "{}={}", key, value);
    }
    for card in &state.cards {
        let _ = writeln!(
            out,
            "card={},{},{},{}",
            card.id.0, card.value, card.is_face_up, card.is_matched
        );
    }
    for mv in &state.move_history {
        let _ = writeln!(out, "move={},{}", mv.card1_id.0, mv.card2_id.0);
    }
    out
}

/// A scalar line, kept raw until its type is known.
struct Scalar<'a> {
    line: usize,
    raw: &'a str,
}

struct Scalars<'a> {
    values: FxHashMap<&'a str, Scalar<'a>>,
    /// Reported for missing keys.
    end: usize,
}

impl Scalars<'_> {
    fn get<T: FromStr>(&self, key: &str) -> Result<T> {
        let scalar = self
            .values
            .get(key)
            .ok_or_else(|| error(self.end, format!("missing key {}", key)))?;
        parse(scalar.line, key, scalar.raw)
    }
}

pub(crate) fn from_text(input: &str) -> Result<GameState> {
    let mut scalars: FxHashMap<&str, Scalar<'_>> = FxHashMap::default();
    let mut cards = Vector::new();
    let mut move_history = Vector::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, raw) = line
            .split_once('=')
            .ok_or_else(|| error(line_no, "expected key=value"))?;
        let (key, raw) = (key.trim(), raw.trim());

        match key {
            "card" => {
                let [id, value, face_up, matched] = fields::<4>(line_no, raw)?;
                let mut card = Card::new(
                    CardId::new(parse(line_no, "card id", id)?),
                    parse(line_no, "card value", value)?,
                );
                card.is_face_up = parse(line_no, "isFaceUp", face_up)?;
                card.is_matched = parse(line_no, "isMatched", matched)?;
                cards.push_back(card);
            }
            "move" => {
                let [first, second] = fields::<2>(line_no, raw)?;
                move_history.push_back(Move::new(
                    CardId::new(parse(line_no, "card1Id", first)?),
                    CardId::new(parse(line_no, "card2Id", second)?),
                ));
            }
            _ if SCALARS.contains(&key) => {
                if scalars.insert(key, Scalar { line: line_no, raw }).is_some() {
                    return Err(error(line_no, format!("duplicate key {}", key)));
                }
            }
            _ => return Err(error(line_no, format!("unknown key {:?}", key))),
        }
    }

    let scalars = Scalars {
        values: scalars,
        end: input.lines().count() + 1,
    };

    Ok(GameState {
        difficulty: scalars.get::<Difficulty>("difficulty")?,
        cards,
        moves: scalars.get("moves")?,
        matched_pairs: scalars.get("matchedPairs")?,
        score: scalars.get("score")?,
        match_streak: scalars.get("matchStreak")?,
        move_history,
        game_completed: scalars.get("gameCompleted")?,
        elapsed_time_in_seconds: scalars.get("elapsedTimeInSeconds")?,
        is_timer_running: scalars.get("isTimerRunning")?,
        is_multiplayer: scalars.get("isMultiplayer")?,
        is_host: scalars.get("isHost")?,
        is_my_turn: scalars.get("isMyTurn")?,
        opponent_score: scalars.get("opponentScore")?,
        my_pairs: scalars.get("myPairs")?,
        opponent_pairs: scalars.get("opponentPairs")?,
    })
}

fn error(line: usize, message: impl Into<String>) -> HistoryError {
    HistoryError::Text {
        line,
        message: message.into(),
    }
}

fn fields<const N: usize>(line: usize, raw: &str) -> Result<[&str; N]> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    parts
        .try_into()
        .map_err(|parts: Vec<&str>| error(line, format!("expected {} fields, found {}", N, parts.len())))
}

fn parse<T: FromStr>(line: usize, what: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| error(line, format!("invalid {}: {:?}", what, raw)))
}
