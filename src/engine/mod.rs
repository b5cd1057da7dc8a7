//! Bridges the search core to the external turn driver: the match-service
//! client (or a local arena) implements [`GameDriver`], feeds positions in
//! and carries the chosen [`Outcome`] back out.
//!
//! The engine owns no I/O. Command-line flags, HTTP clients and event
//! streams all live on the driver's side of this seam.

pub mod arena;

use crate::chess::core::{Move, Player};
use crate::chess::position::Position;
use crate::search::{select_move, SearchParams};

/// What the engine decided to do with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Play this move.
    Move(Move),
    /// Give up the game.
    Resign,
    /// Propose a draw to the opponent.
    OfferDraw,
}

/// The narrow interface the engine consumes from its external collaborator.
///
/// Implementations wrap whatever transport the match service speaks; the
/// engine only ever sees these six operations.
pub trait GameDriver {
    /// The current position of the game.
    fn position(&self) -> Position;

    /// The color the engine plays as.
    fn my_color(&self) -> Player;

    /// Submits a move for the engine's turn. `false` means the remote side
    /// rejected it, which the engine treats as a hard failure.
    fn submit_move(&mut self, next_move: Move) -> bool;

    /// Resigns the game.
    fn resign(&mut self);

    /// Offers a draw; returns whether the opponent accepted.
    fn offer_draw(&mut self) -> bool;

    /// Name of the game, for diagnostics. Defaults to an empty string.
    fn game_name(&self) -> String {
        String::new()
    }
}

/// The turn-playing adaptor: stores the current position, runs the search
/// when asked for a move and maps search failures to resignation.
pub struct Engine {
    params: SearchParams,
    position: Option<Position>,
    /// Latched when the driver rejects a submitted move; every turn after
    /// that resigns instead of searching again.
    driver_failed: bool,
}

impl Engine {
    /// Creates an engine with the given search parameters and no position
    /// yet.
    #[must_use]
    pub const fn new(params: SearchParams) -> Self {
        Self {
            params,
            position: None,
            driver_failed: false,
        }
    }

    /// Stores the position the next [`Engine::play_turn`] will search from.
    pub fn on_position(&mut self, position: Position) {
        self.position = Some(position);
    }

    /// Decides what to do with the current turn: the searched best move,
    /// or resignation when there is no legal move, no known position, or a
    /// previous submission was rejected.
    #[must_use]
    pub fn play_turn(&mut self) -> Outcome {
        if self.driver_failed {
            return Outcome::Resign;
        }
        let Some(position) = &self.position else {
            log::warn!("asked to play a turn before any position arrived");
            return Outcome::Resign;
        };
        match select_move(position, &self.params) {
            Some(next_move) => Outcome::Move(next_move),
            None => Outcome::Resign,
        }
    }

    /// Plays one full turn against the driver: fetches the position, runs
    /// the search and delivers the outcome. A rejected submission resigns
    /// the game and latches the failure; the engine never retries another
    /// candidate move.
    pub fn take_turn(&mut self, driver: &mut dyn GameDriver) -> Outcome {
        let game = driver.game_name();
        self.on_position(driver.position());
        let outcome = self.play_turn();
        match outcome {
            Outcome::Move(next_move) => {
                log::info!("game {game}: playing {next_move}");
                if driver.submit_move(next_move) {
                    outcome
                } else {
                    log::warn!("game {game}: driver rejected {next_move}, resigning");
                    self.driver_failed = true;
                    driver.resign();
                    Outcome::Resign
                }
            },
            Outcome::Resign => {
                log::info!("game {game}: resigning");
                driver.resign();
                outcome
            },
            Outcome::OfferDraw => {
                let accepted = driver.offer_draw();
                log::info!("game {game}: draw offer accepted: {accepted}");
                outcome
            },
        }
    }
}
