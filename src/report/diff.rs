//! Ordering diff between two runs.
//!
//! Walks the previous ordering index by index and reports every identifier
//! whose slot changed. An identifier missing from the new ordering counts as
//! maximally worsened; one missing from the previous ordering is maximally
//! improved and reported after the walk.

use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Improved,
    Worsened,
}

impl Movement {
    pub fn marker(&self) -> &'static str {
        match self {
            Movement::Improved => "🔺",
            Movement::Worsened => "🔻",
        }
    }
}

/// One identifier that changed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub identifier: String,
    pub movement: Movement,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.identifier, self.movement.marker())
    }
}

/// Identifiers whose index differs between `previous` and `current`.
pub fn movements(previous: &[String], current: &[String]) -> Vec<Move> {
    let new_index: HashMap<&str, usize> = current
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut moves: Vec<Move> = previous
        .iter()
        .enumerate()
        .filter(|(i, id)| current.get(*i) != Some(*id))
        .map(|(i, id)| {
            let movement = match new_index.get(id.as_str()) {
                Some(&n) if n < i => Movement::Improved,
                _ => Movement::Worsened,
            };
            Move {
                identifier: id.clone(),
                movement,
            }
        })
        .collect();

    let known: HashSet<&str> = previous.iter().map(String::as_str).collect();
    moves.extend(
        current
            .iter()
            .filter(|id| !known.contains(id.as_str()))
            .map(|id| Move {
                identifier: id.clone(),
                movement: Movement::Improved,
            }),
    );
    moves
}

/// Change-log message: moves joined with `", "`; empty when nothing moved.
pub fn diff_message(previous: &[String], current: &[String]) -> String {
    movements(previous, current)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
