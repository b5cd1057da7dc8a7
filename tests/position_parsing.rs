use pretty_assertions::assert_eq;
use tarrasch::chess::position::Position;

fn expect_fixed_point(fen: &str) {
    let position = Position::from_fen(fen).expect("parsing legal position");
    assert_eq!(position.to_string(), fen);
}

#[test]
fn rendering_is_a_fixed_point_of_parsing() {
    expect_fixed_point("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    expect_fixed_point("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
    expect_fixed_point("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
    expect_fixed_point("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
    expect_fixed_point("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
    expect_fixed_point("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1");
    expect_fixed_point("rnbq1rk1/pp4pp/1b1ppn2/2p2p2/2PP4/1P2PN2/PB2BPPP/RN1Q1RK1 w - c6 0 9");
    expect_fixed_point("4k3/1R6/5Bp1/2QB3p/6P1/8/7P/5K2 b - - 4 35");
}

#[test]
fn standard_round_trip_matches_the_starting_array() {
    let parsed = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .expect("parsing the starting position");
    let emitted = parsed.to_string();
    let reparsed = Position::from_fen(&emitted).expect("parsing emitted FEN");
    assert_eq!(reparsed, parsed);
    assert_eq!(reparsed, Position::starting());
}

#[test]
fn surrounding_whitespace_is_cleaned_up() {
    let position =
        Position::try_from("  rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\n")
            .expect("trimmed parse");
    assert_eq!(position, Position::starting());
}

#[test]
fn malformed_records_are_rejected() {
    for fen in [
        "",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR ? KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e0 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
    ] {
        assert!(Position::from_fen(fen).is_err(), "accepted: '{fen}'");
    }
}

#[test]
fn parse_errors_carry_byte_offsets() {
    let error = Position::from_fen("8/8/8/8/8/8/8/8 w KQkq - zz 1").unwrap_err();
    let rendered = format!("{error:#}");
    assert!(rendered.contains("at byte 25"), "{rendered}");
}

#[test]
fn parser_is_permissive_about_invariants() {
    // Kingless and otherwise unreachable positions parse fine: invariant
    // checking is not the codec's job.
    assert!(Position::from_fen("8/8/8/8/8/8/8/R7 w - - 0 1").is_ok());
    assert!(Position::from_fen("kkkkkkkk/8/8/8/8/8/8/KKKKKKKK w - - 0 1").is_ok());
}
