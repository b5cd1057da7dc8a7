//! A local arena pitting two engines against each other through the same
//! [`GameDriver`] seam the match-service client uses. Mostly a testing and
//! tuning harness: no network, the "service" is a shared board that
//! validates submissions itself.

use crate::chess::core::{Move, Player};
use crate::chess::position::Position;
use crate::chess::validation::{validate_move, MoveValidity};
use crate::engine::{Engine, GameDriver};

/// Why a local match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerdictReason {
    /// An engine submitted a move the arena's validator rejected.
    PlayedIllegalMove,
    /// An engine resigned (including "no legal moves left").
    Resigned,
    /// The ply cap was reached with no decision.
    Drawn,
}

/// The result of a local match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchVerdict {
    #[allow(missing_docs)]
    pub reason: VerdictReason,
    /// The winning player; `None` for a draw.
    pub winner: Option<Player>,
}

/// Shared state of a game running inside the local arena.
struct LocalGameState {
    position: Position,
    illegal_move_played: bool,
    resigned: bool,
}

/// Driver handed to one engine for one turn of a local game.
struct LocalGameDriver<'a> {
    state: &'a mut LocalGameState,
    color: Player,
}

impl GameDriver for LocalGameDriver<'_> {
    fn position(&self) -> Position {
        self.state.position.clone()
    }

    fn my_color(&self) -> Player {
        self.color
    }

    fn submit_move(&mut self, next_move: Move) -> bool {
        // Unlike the remote service, the arena accepts every submission and
        // settles validity itself: an illegal move loses the game on the
        // spot.
        if validate_move(&self.state.position, &next_move, self.color) == MoveValidity::Valid {
            self.state.position.make_move(&next_move);
        } else {
            self.state.illegal_move_played = true;
        }
        true
    }

    fn resign(&mut self) {
        self.state.resigned = true;
    }

    fn offer_draw(&mut self) -> bool {
        false
    }

    fn game_name(&self) -> String {
        "local".to_string()
    }
}

/// Plays a standard match between two engines from the starting position.
/// See [`play_match_from`] for the rules.
pub fn play_match(white: &mut Engine, black: &mut Engine, max_plies: u16) -> MatchVerdict {
    play_match_from(Position::starting(), white, black, max_plies)
}

/// Plays out a match between two engines from an arbitrary position: each
/// engine in turn gets a driver onto the shared board and plays through it.
/// An illegal submission or a resignation ends the match in favor of the
/// opponent; `max_plies` half-moves without a decision is a draw.
pub fn play_match_from(
    position: Position,
    white: &mut Engine,
    black: &mut Engine,
    max_plies: u16,
) -> MatchVerdict {
    let mut state = LocalGameState {
        position,
        illegal_move_played: false,
        resigned: false,
    };
    for _ in 0..max_plies {
        let to_move = state.position.us();
        let engine = match to_move {
            Player::White => &mut *white,
            Player::Black => &mut *black,
        };
        let mut driver = LocalGameDriver {
            state: &mut state,
            color: to_move,
        };
        let _ = engine.take_turn(&mut driver);
        if state.illegal_move_played {
            return MatchVerdict {
                reason: VerdictReason::PlayedIllegalMove,
                winner: Some(!to_move),
            };
        }
        if state.resigned {
            return MatchVerdict {
                reason: VerdictReason::Resigned,
                winner: Some(!to_move),
            };
        }
    }
    MatchVerdict {
        reason: VerdictReason::Drawn,
        winner: None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{play_match_from, MatchVerdict, VerdictReason};
    use crate::chess::core::Player;
    use crate::chess::position::Position;
    use crate::engine::Engine;
    use crate::search::SearchParams;

    #[test]
    fn mate_in_one_wins_the_match() {
        // White mates immediately; Black finds no moves and resigns.
        let position = Position::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        )
        .expect("parsing legal position");
        let mut white = Engine::new(SearchParams::default());
        let mut black = Engine::new(SearchParams::default());
        assert_eq!(
            play_match_from(position, &mut white, &mut black, 8),
            MatchVerdict {
                reason: VerdictReason::Resigned,
                winner: Some(Player::White),
            }
        );
    }

    #[test]
    fn ply_cap_draws_the_match() {
        // A zero-ply cap ends the match before anyone moves: no winner.
        let position =
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("parsing legal position");
        let mut white = Engine::new(SearchParams::default());
        let mut black = Engine::new(SearchParams::default());
        assert_eq!(
            play_match_from(position, &mut white, &mut black, 0),
            MatchVerdict {
                reason: VerdictReason::Drawn,
                winner: None,
            }
        );
    }
}
