//! XML save format.
//!
//! ```xml
//! <gameState difficulty="EASY" moves="1" ...>
//!   <cards>
//!     <card id="0" value="4" isFaceUp="false" isMatched="false"/>
//!   </cards>
//!   <moveHistory>
//!     <move card1Id="0" card2Id="7"/>
//!   </moveHistory>
//! </gameState>
//! ```

use std::str::FromStr;

use im::Vector;
use roxmltree::{Document, Node};
use xmlwriter::{Options, XmlWriter};

use super::error::{HistoryError, Result};
use crate::core::{Card, CardId, Difficulty, GameState, Move};

const ROOT: &str = "gameState";

pub(crate) fn to_xml(state: &GameState) -> String {
    let mut w = XmlWriter::new(Options::default());
    w.write_declaration();

    w.start_element(ROOT);
    w.write_attribute("difficulty", state.difficulty.name());
    w.write_attribute("moves", &state.moves);
    w.write_attribute("matchedPairs", &state.matched_pairs);
    w.write_attribute("score", &state.score);
    w.write_attribute("matchStreak", &state.match_streak);
    w.write_attribute("gameCompleted", &state.game_completed);
    w.write_attribute("elapsedTimeInSeconds", &state.elapsed_time_in_seconds);
    w.write_attribute("isTimerRunning", &state.is_timer_running);
    w.write_attribute("isMultiplayer", &state.is_multiplayer);
    w.write_attribute("isHost", &state.is_host);
    w.write_attribute("isMyTurn", &state.is_my_turn);
    w.write_attribute("opponentScore", &state.opponent_score);
    w.write_attribute("myPairs", &state.my_pairs);
    w.write_attribute("opponentPairs", &state.opponent_pairs);

    w.start_element("cards");
    for card in &state.cards {
        w.start_element("card");
        w.write_attribute("id", &card.id.0);
        w.write_attribute("value", &card.value);
        w.write_attribute("isFaceUp", &card.is_face_up);
        w.write_attribute("isMatched", &card.is_matched);
        w.end_element();
    }
    w.end_element();

    w.start_element("moveHistory");
    for mv in &state.move_history {
        w.start_element("move");
        w.write_attribute("card1Id", &mv.card1_id.0);
        w.write_attribute("card2Id", &mv.card2_id.0);
        w.end_element();
    }
    w.end_element();

    w.end_document()
}

pub(crate) fn from_xml(input: &str) -> Result<GameState> {
    let doc = Document::parse(input)?;
    let root = doc.root_element();
    if root.tag_name().name() != ROOT {
        return Err(schema(format!(
            "root element is <{}>, expected <{}>",
            root.tag_name().name(),
            ROOT
        )));
    }

    let mut cards = Vector::new();
    for node in elements(child(root, "cards")?, "card")? {
        let mut card = Card::new(CardId::new(attr(node, "id")?), attr(node, "value")?);
        card.is_face_up = attr(node, "isFaceUp")?;
        card.is_matched = attr(node, "isMatched")?;
        cards.push_back(card);
    }

    let mut move_history = Vector::new();
    for node in elements(child(root, "moveHistory")?, "move")? {
        move_history.push_back(Move::new(
            CardId::new(attr(node, "card1Id")?),
            CardId::new(attr(node, "card2Id")?),
        ));
    }

    Ok(GameState {
        difficulty: attr::<Difficulty>(root, "difficulty")?,
        cards,
        moves: attr(root, "moves")?,
        matched_pairs: attr(root, "matchedPairs")?,
        score: attr(root, "score")?,
        match_streak: attr(root, "matchStreak")?,
        move_history,
        game_completed: attr(root, "gameCompleted")?,
        elapsed_time_in_seconds: attr(root, "elapsedTimeInSeconds")?,
        is_timer_running: attr(root, "isTimerRunning")?,
        is_multiplayer: attr(root, "isMultiplayer")?,
        is_host: attr(root, "isHost")?,
        is_my_turn: attr(root, "isMyTurn")?,
        opponent_score: attr(root, "opponentScore")?,
        my_pairs: attr(root, "myPairs")?,
        opponent_pairs: attr(root, "opponentPairs")?,
    })
}

fn schema(message: impl Into<String>) -> HistoryError {
    HistoryError::XmlSchema(message.into())
}

fn attr<T: FromStr>(node: Node<'_, '_>, name: &str) -> Result<T> {
    let raw = node.attribute(name).ok_or_else(|| {
        schema(format!("<{}> is missing {}", node.tag_name().name(), name))
    })?;
    raw.parse().map_err(|_| {
        schema(format!(
            "<{}> has an invalid {}: {:?}",
            node.tag_name().name(),
            name,
            raw
        ))
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .ok_or_else(|| schema(format!("<{}> is missing <{}>", node.tag_name().name(), name)))
}

/// Element children of `node`, all of which must be `<name>`.
fn elements<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Vec<Node<'a, 'input>>> {
    node.children()
        .filter(Node::is_element)
        .map(|n| {
            if n.has_tag_name(name) {
                Ok(n)
            } else {
                Err(schema(format!(
                    "unexpected <{}> inside <{}>",
                    n.tag_name().name(),
                    node.tag_name().name()
                )))
            }
        })
        .collect()
}
