use klotski_catalog::{query, Catalog, RecordProblem};
use klotski_core::{IssueKind, ParseError, PieceId, ScanError, Severity};

const MIXED: &str = "\
# hand-made catalog with one fault of every kind
@ ** @

<Good>
@@a tiny level@@
@#####@
@#** #@
@#** #@
@#--##@
@ ..  @

<Empty>

<Bad symbol>
@ **? @
@ ..  @

<Split>
@a**a@
@ ..  @

<Also good>
@**..@
";

#[test]
fn bundled_catalog_accepts_twenty_four_levels() {
    let load = Catalog::bundled();
    let names: Vec<_> = load.boards().iter().map(|board| board.name()).collect();

    assert_eq!(names.len(), 24);
    assert_eq!(names.first(), Some(&"Easy"));
    assert_eq!(names.last(), Some(&"Transeuropea"));
    assert!(names.contains(&"Forget me not (ane rouge)"));
}

#[test]
fn bundled_catalog_rejects_levels_reusing_symbols() {
    let load = Catalog::bundled();
    let failures = load.failures();

    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].name.as_deref(), Some("Splash"));
    assert_eq!(failures[0].line, 23);
    assert_eq!(failures[1].name.as_deref(), Some("SunShine"));
    assert_eq!(failures[1].line, 337);

    for failure in failures {
        let RecordProblem::Rejected(issues) = &failure.problem else {
            panic!("{:?} should be rejected by validation", failure.name);
        };
        assert!(issues
            .iter()
            .any(|issue| issue.kind() == &IssueKind::DisconnectedPiece(PieceId::Symbol('a'))));
    }
}

#[test]
fn bundled_boards_only_carry_warnings() {
    let load = Catalog::bundled();

    for board in load.boards() {
        assert!(
            board
                .issues()
                .iter()
                .all(|issue| issue.severity() == Severity::Warning),
            "{} carries a fatal issue",
            board.name()
        );
    }
    assert_eq!(query::warning_count(&load), 24);
}

#[test]
fn easy_level_matches_the_shipped_layout() {
    let load = Catalog::bundled();
    let easy = query::board_named(&load, "Easy").expect("Easy is bundled");

    assert_eq!(easy.width(), 10);
    assert_eq!(easy.height(), 11);
    assert_eq!(easy.all_pieces().count(), 15);
    assert_eq!(easy.destinations().len(), 4);
    assert_eq!(easy.heart_piece().len(), 4);
}

#[test]
fn parallel_load_matches_sequential_load() {
    assert_eq!(
        Catalog::load_parallel(klotski_catalog::BUNDLED_CATALOG),
        Catalog::bundled()
    );
    assert_eq!(Catalog::load_parallel(MIXED), Catalog::load(MIXED));
}

#[test]
fn faulty_records_do_not_stop_the_load() {
    let load = Catalog::load(MIXED);
    let names: Vec<_> = load.boards().iter().map(|board| board.name()).collect();

    assert_eq!(names, vec!["Good", "Also good"]);
    assert_eq!(load.boards()[0].description(), "a tiny level");
    assert!(!load.is_clean());

    let failures = load.failures();
    assert_eq!(failures.len(), 4);

    assert_eq!(failures[0].name, None);
    assert_eq!(failures[0].line, 2);
    assert_eq!(
        failures[0].problem,
        RecordProblem::Scan(ScanError::OrphanRow { line: 2 })
    );

    assert_eq!(failures[1].name.as_deref(), Some("Empty"));
    assert_eq!(
        failures[1].problem,
        RecordProblem::Scan(ScanError::EmptyLevel {
            name: "Empty".to_owned(),
            line: 12,
        })
    );

    assert_eq!(failures[2].name.as_deref(), Some("Bad symbol"));
    assert_eq!(failures[2].line, 14);
    assert!(matches!(
        failures[2].problem,
        RecordProblem::Parse(ParseError::UnknownSymbol { symbol: '?', .. })
    ));

    assert_eq!(failures[3].name.as_deref(), Some("Split"));
    assert_eq!(failures[3].line, 18);
    assert!(matches!(failures[3].problem, RecordProblem::Rejected(_)));
}

#[test]
fn queries_find_boards_and_failures_by_name() {
    let load = Catalog::load(MIXED);

    assert!(query::board_named(&load, "Good").is_some());
    assert!(query::board_named(&load, "Split").is_none());
    assert_eq!(
        query::failure_named(&load, "Split").map(|failure| failure.line),
        Some(18)
    );
}

#[test]
fn failures_serialize_to_json() {
    let load = Catalog::load(MIXED);
    let json = serde_json::to_string(load.failures()).expect("failures serialize");

    assert!(json.contains("\"EmptyLevel\""));
    assert!(json.contains("\"Split\""));
}
