//! Building fixtures into tests: statement boundaries, positions and
//! directive handling.

use sqltest::{
    action::{AssertAction, ExceptAction, ExecAction},
    Action, BuildError, ParseConfig, Position, SyntaxError, Test,
};

fn build(src: &str) -> Result<Test, BuildError> {
    Test::parse(src.as_bytes(), &ParseConfig::default())
}

fn build_bytes(src: &[u8]) -> Result<Test, BuildError> {
    Test::parse(src, &ParseConfig::default())
}

fn spans(test: &Test) -> Vec<(Position, Position)> {
    test.statements()
        .iter()
        .map(|s| (s.left(), s.right()))
        .collect()
}

#[test]
fn single_statement_without_terminator() {
    let test = build("SELECT 1").unwrap();
    assert_eq!(spans(&test), vec![(Position::new(0, 0), Position::new(0, 8))]);
    assert_eq!(
        test.statements()[0].action(),
        &Action::Exec(ExecAction::new("SELECT 1"))
    );
    assert!(test.context().is_empty());
}

#[test]
fn second_statement_positions() {
    let test = build("SELECT 1;\nSELECT 2").unwrap();
    assert_eq!(
        spans(&test),
        vec![
            (Position::new(0, 0), Position::new(0, 8)),
            (Position::new(1, 10), Position::new(1, 18)),
        ]
    );
    assert_eq!(test.statements()[1].source(), b"SELECT 2");
}

#[test]
fn blank_lines_and_bare_terminators_are_skipped() {
    let test = build("SELECT 1;\n \t;\n").unwrap();
    assert_eq!(test.statements().len(), 1);

    let test = build("SELECT 1;\n \t;\nSELECT 2").unwrap();
    assert_eq!(
        spans(&test)[1],
        (Position::new(2, 14), Position::new(2, 22))
    );
}

#[test]
fn multi_line_statement_counts_lines() {
    let test = build("SELECT\n  1;\nSELECT 2").unwrap();
    assert_eq!(test.statements()[0].source_text(), "SELECT\n  1");
    assert_eq!(
        spans(&test),
        vec![
            (Position::new(0, 0), Position::new(1, 10)),
            (Position::new(2, 12), Position::new(2, 20)),
        ]
    );
}

#[test]
fn define_then_assert() {
    let test = build("define TEST\nSELECT 1;\n\nassert TEST [1]").unwrap();
    assert_eq!(spans(&test), vec![(Position::new(3, 23), Position::new(3, 38))]);
    assert_eq!(
        test.statements()[0].action(),
        &Action::Assert(AssertAction {
            key: "TEST".into(),
            query: "SELECT 1".into(),
            expected: "[1]".into(),
        })
    );
    assert_eq!(test.context().get("TEST"), Some("SELECT 1"));
    assert_eq!(test.context().len(), 1);
}

#[test]
fn except_statement() {
    let test = build("CREATE TABLE t (id INT);\nexcept duplicate key\nINSERT INTO t VALUES (1);").unwrap();
    assert_eq!(test.statements().len(), 2);
    assert_eq!(
        test.statements()[1].action(),
        &Action::Except(ExceptAction {
            query: "INSERT INTO t VALUES (1)".into(),
            substring: "duplicate key".into(),
        })
    );
    assert_eq!(
        test.statements()[1].source_text(),
        "except duplicate key\nINSERT INTO t VALUES (1)"
    );
}

#[test]
fn leading_comment_stays_in_exec_source() {
    let test = build("-- setup\nCREATE TABLE t (id INT);\nSELECT 1").unwrap();
    let first = &test.statements()[0];
    assert_eq!(first.source_text(), "-- setup\nCREATE TABLE t (id INT)");
    assert_eq!(
        first.action(),
        &Action::Exec(ExecAction::new("-- setup\nCREATE TABLE t (id INT)"))
    );
    assert_eq!(first.right(), Position::new(1, 32));
}

#[test]
fn comments_before_directives_are_ignored() {
    let test = build("/* counts */\n-- rows\ndefine K\nSELECT 1;\nassert K 1").unwrap();
    assert_eq!(test.context().get("K"), Some("SELECT 1"));
    assert_eq!(test.statements().len(), 1);
    assert_eq!(test.statements()[0].action().kind(), "assert");
}

#[test]
fn comment_only_statements_are_dropped() {
    let test = build("-- header\n;\nSELECT 1;\n/* trailer */").unwrap();
    assert_eq!(test.statements().len(), 1);
    assert_eq!(test.statements()[0].source(), b"SELECT 1");
}

#[test]
fn fixtures_without_statements_are_empty() {
    for src in ["", "  \n\t;\n", "-- nothing\n", "/* a */\n-- b", "define K\nSELECT 1"] {
        let err = build(src).unwrap_err();
        assert!(
            matches!(err, BuildError::Empty { .. }),
            "{src:?} gave {err:?}"
        );
    }
}

#[test]
fn duplicate_define_is_a_syntax_error() {
    let err = build("define A\nSELECT 1;\ndefine A\nSELECT 2;\nassert A 1").unwrap_err();
    assert_eq!(
        err.syntax(),
        Some(&SyntaxError::DefineDuplicate { key: "A".into() })
    );
    let BuildError::Syntax { left, right, .. } = err else {
        panic!("expected a syntax error");
    };
    assert_eq!(left, Position::new(2, 19));
    assert_eq!(right, Position::new(3, 36));
    assert!(!BuildError::Empty { name: "x".into() }.is_internal());
}

#[test]
fn undefined_assert_is_a_syntax_error() {
    let err = build("SELECT 1;\nassert MISSING 1").unwrap_err();
    assert_eq!(
        err.syntax(),
        Some(&SyntaxError::AssertUndefined { key: "MISSING".into() })
    );
    assert!(err.to_string().contains("statement on lines 2:2 is invalid"));
}

#[test]
fn directive_keywords_need_a_following_space() {
    let test = build("defined\nSELECT 1;\nasserting;\nexception").unwrap();
    let kinds: Vec<_> = test.statements().iter().map(|s| s.action().kind()).collect();
    assert_eq!(kinds, vec!["exec", "exec", "exec"]);
}

#[test]
fn building_is_deterministic() {
    let src = b"define A\nSELECT 1;\nassert A 1;\nexcept boom\nSELECT x;\nSELECT 2";
    let config = ParseConfig::default();
    let one = Test::parse(src, &config).unwrap();
    let two = Test::parse(src, &config).unwrap();
    assert_eq!(one.statements(), two.statements());
    assert_eq!(one.context(), two.context());
}

#[test]
fn named_builds_carry_the_name() {
    let test = Test::parse_named("fixtures/a.sql", b"SELECT 1", &ParseConfig::default()).unwrap();
    assert_eq!(test.name(), "fixtures/a.sql");
    assert_eq!(build("SELECT 1").unwrap().name(), "<fixture>");

    let err = Test::parse_named("fixtures/b.sql", b"", &ParseConfig::default()).unwrap_err();
    assert!(err.to_string().contains("fixtures/b.sql"));
}

#[test]
fn from_reader_matches_parse() {
    let src = "SELECT 1;\nSELECT 2";
    let config = ParseConfig::default();
    let read = Test::from_reader(src.as_bytes(), &config).unwrap();
    let parsed = Test::parse(src.as_bytes(), &config).unwrap();
    assert_eq!(read.statements(), parsed.statements());
}

#[test]
fn failing_reader_is_an_io_error() {
    struct Broken;
    impl std::io::Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
        }
    }
    let err = Test::from_reader(Broken, &ParseConfig::default()).unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }));
}

#[test]
fn iteration_limit_is_internal() {
    let config = ParseConfig::default().with_limit(2);
    let err = Test::parse(b"SELECT 1;\nSELECT 2;\nSELECT 3", &config).unwrap_err();
    assert!(err.is_internal());
    assert!(matches!(err, BuildError::IterationLimit { limit: 2, .. }));

    let config = ParseConfig::default().with_limit(3);
    assert!(Test::parse(b"SELECT 1;\nSELECT 2;\nSELECT 3", &config).is_ok());
    assert!(Test::parse(b"SELECT 1;\nSELECT 2;\nSELECT 3;\n", &config).is_ok());
}

#[test]
fn trailing_terminator_fits_a_tight_limit() {
    let config = ParseConfig::default().with_limit(1);
    let test = Test::parse(b"SELECT 1;\n", &config).unwrap();
    assert_eq!(test.statements().len(), 1);
}

#[test]
fn invalid_utf8_fails_the_build() {
    let err = build_bytes(b"define \xfe\nSELECT 1;\ndefine \xff\nSELECT 2;\nSELECT 3").unwrap_err();
    assert_eq!(err.syntax(), Some(&SyntaxError::InvalidUtf8 { offset: 7 }));
    let BuildError::Syntax { left, right, .. } = err else {
        panic!("expected a syntax error");
    };
    assert_eq!(left, Position::new(0, 0));
    assert_eq!(right, Position::new(1, 17));

    let err = build_bytes(b"SELECT 1;\n-- caf\xe9\nSELECT 2").unwrap_err();
    assert_eq!(err.syntax(), Some(&SyntaxError::InvalidUtf8 { offset: 6 }));
}

#[test]
fn multibyte_text_is_kept_as_written() {
    let test = build("define NAME\nSELECT 'caf\u{e9}';\nassert NAME caf\u{e9}").unwrap();
    assert_eq!(test.context().get("NAME"), Some("SELECT 'caf\u{e9}'"));
    let Action::Assert(action) = test.statements()[0].action() else {
        panic!("expected an assert");
    };
    assert_eq!(action.expected, "caf\u{e9}");
}
