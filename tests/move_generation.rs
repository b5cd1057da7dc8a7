use itertools::Itertools;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};
use strum::IntoEnumIterator;
use tarrasch::chess::core::{Move, PieceKind, Player, Promotion, Square};
use tarrasch::chess::position::Position;
use tarrasch::chess::validation::{validate_move, MoveValidity};

fn setup(fen: &str) -> Position {
    Position::from_fen(fen).expect("parsing legal position")
}

fn sorted_moves(position: &Position) -> Vec<String> {
    position
        .generate_moves()
        .iter()
        .map(|m| m.to_string())
        .sorted()
        .collect()
}

#[test]
fn starting_position_has_twenty_moves() {
    assert_eq!(Position::starting().generate_moves().len(), 20);
}

#[test]
fn lone_rook_boundary_count() {
    // A rook anywhere on an empty board reaches its full file and rank.
    assert_eq!(setup("8/8/8/8/8/8/8/R7 w - - 0 1").generate_moves().len(), 14);
    assert_eq!(setup("8/8/8/4R3/8/8/8/8 w - - 0 1").generate_moves().len(), 14);
}

#[test]
fn lone_knight_boundary_count() {
    assert_eq!(setup("8/8/8/8/3N4/8/8/8 w - - 0 1").generate_moves().len(), 8);
}

#[test]
fn forced_single_reply() {
    // The White king is in check with exactly one way out.
    let position = setup("4k3/8/8/8/8/8/5PP1/4r1K1 w - - 0 1");
    assert_eq!(sorted_moves(&position), vec!["g1h2".to_string()]);
}

#[test]
fn generation_agrees_with_validation() {
    // A move is generated iff the validator accepts it: check the
    // equivalence over every conceivable candidate.
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "rnbqkbnr/4p1p1/p1p5/1pPp1p1p/3PP3/1QN5/PP1BNPPP/1R2KB1R w Kkq d6 0 11",
        "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
        "8/P6k/8/8/8/8/8/K7 w - - 0 1",
        "4k3/8/8/8/8/8/5PP1/4r1K1 w - - 0 1",
    ] {
        let position = setup(fen);
        let mover = position.us();
        let mut accepted: Vec<String> = Vec::new();
        for from in Square::iter() {
            for to in Square::iter() {
                let mut candidates = vec![Move::new(from, to)];
                for promotion in [
                    Promotion::Queen,
                    Promotion::Rook,
                    Promotion::Bishop,
                    Promotion::Knight,
                ] {
                    candidates.push(Move::promoting(from, to, promotion));
                }
                for candidate in candidates {
                    if validate_move(&position, &candidate, mover) == MoveValidity::Valid {
                        accepted.push(candidate.to_string());
                    }
                }
            }
        }
        assert_eq!(
            accepted.iter().sorted().collect::<Vec<_>>(),
            sorted_moves(&position).iter().collect::<Vec<_>>(),
            "validator and generator disagree on {fen}"
        );
    }
}

#[test]
fn counts_match_the_reference_implementation() {
    // shakmaty is the trusted baseline for legal move counts.
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
        "rnbqkbnr/4p1p1/p1p5/1pPp1p1p/3PP3/1QN5/PP1BNPPP/1R2KB1R w Kkq d6 0 11",
        "4k3/8/8/8/8/8/5PP1/4r1K1 w - - 0 1",
        "6qk/8/8/3Pp3/8/8/K7/8 w - e6 0 1",
        "4k3/1R6/5Bp1/2QB3p/6P1/8/7P/5K2 b - - 4 35",
    ] {
        let ours = setup(fen).generate_moves().len();
        let reference: Chess = fen
            .parse::<shakmaty::fen::Fen>()
            .expect("reference parses the FEN")
            .into_position(CastlingMode::Standard)
            .expect("reference accepts the position");
        assert_eq!(
            ours,
            reference.legal_moves().len(),
            "move count mismatch on {fen}"
        );
    }
}

#[test]
fn perft_counts() {
    use tarrasch::chess::movegen::perft;

    let starting = Position::starting();
    assert_eq!(perft(&starting, 0), 1);
    assert_eq!(perft(&starting, 1), 20);
    assert_eq!(perft(&starting, 2), 400);
    assert_eq!(perft(&starting, 3), 8902);

    // "Kiwipete": heavy on castling, pins and en passant.
    let kiwipete =
        setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    assert_eq!(perft(&kiwipete, 1), 48);
    assert_eq!(perft(&kiwipete, 2), 2039);

    // An endgame with promotions and en passant edge cases.
    let endgame = setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&endgame, 1), 14);
    assert_eq!(perft(&endgame, 2), 191);
    assert_eq!(perft(&endgame, 3), 2812);
}

#[test]
fn every_reachable_position_keeps_one_king_per_side() {
    let mut position = Position::starting();
    let moves = "c2c4 g8f6 d1a4 e7e6 a4b5 b7b6 h2h4 f8c5 b5c5 b6c5 b1c3 d7d6 \
                 e2e4 h7h5 e1e2 e8g8 a2a4 f6g4 c3d1 g7g6 g1f3 c8a6 e2e1 b8c6";
    for text in moves.split_whitespace() {
        position.make_move(&Move::from_text(text).unwrap());
        for player in [Player::White, Player::Black] {
            let kings = Square::iter()
                .filter(|square| {
                    position.at(*square).map(|piece| (piece.player, piece.kind))
                        == Some((player, PieceKind::King))
                })
                .count();
            assert_eq!(kings, 1, "after {text}");
        }
    }
}

#[test]
fn threat_detection_is_color_symmetric() {
    use tarrasch::chess::attacks::is_attacked;

    // Mirroring the board vertically and swapping colors must preserve
    // every attack relationship (with the attacked square mirrored too).
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let position = setup(fen);
    let mirrored = setup(&mirror_fen(fen));
    for square in Square::iter() {
        let flipped = Square::new(square.file(), mirror_rank(square.rank()));
        for player in [Player::White, Player::Black] {
            assert_eq!(
                is_attacked(&position, square, player),
                is_attacked(&mirrored, flipped, !player),
                "asymmetry at {square} for {player:?}"
            );
        }
    }
}

fn mirror_rank(rank: tarrasch::chess::core::Rank) -> tarrasch::chess::core::Rank {
    tarrasch::chess::core::Rank::try_from(7 - rank as u8).unwrap()
}

fn mirror_fen(fen: &str) -> String {
    let mut fields = fen.split(' ');
    let placement = fields.next().unwrap();
    let side = fields.next().unwrap();
    let mirrored_placement = placement
        .split('/')
        .rev()
        .map(|rank| {
            rank.chars()
                .map(|symbol| {
                    if symbol.is_ascii_alphabetic() {
                        if symbol.is_ascii_uppercase() {
                            symbol.to_ascii_lowercase()
                        } else {
                            symbol.to_ascii_uppercase()
                        }
                    } else {
                        symbol
                    }
                })
                .collect::<String>()
        })
        .join("/");
    let mirrored_side = if side == "w" { "b" } else { "w" };
    // Castling rights and the en passant target do not matter for attack
    // queries; neutralize them to keep the mirrored record well-formed.
    format!("{mirrored_placement} {mirrored_side} - - 0 1")
}
