use std::fs;

use tempfile::TempDir;

use linequery::{BindingMode, Config, InvertedIndex, LineQueryError, LineStore, Session};

fn write_source(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("source.txt");
    fs::write(
        &path,
        "the fox jumps\nthe dog sleeps\r\nthe fox sleeps\n",
    )
    .unwrap();
    path
}

#[test]
fn test_open_file_and_query() -> linequery::Result<()> {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir);

    let mut session = Session::new(&Config::default());
    let index = session.open(&path)?;
    assert_eq!(index.line_count(), 3);

    let result = session.query("fox & ~jumps")?;
    assert_eq!(result.sought(), "(fox & ~(jumps))");
    assert_eq!(
        result.render(),
        "(fox & ~(jumps)) occurs 1 times\n\t(line 3) the fox sleeps\n"
    );
    Ok(())
}

#[test]
fn test_source_unavailable() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");

    assert!(matches!(
        InvertedIndex::open(&missing),
        Err(LineQueryError::Io { .. })
    ));
    assert!(matches!(
        LineStore::open(&missing),
        Err(LineQueryError::Io { .. })
    ));
}

#[test]
fn test_representation_binding_quirk() -> linequery::Result<()> {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(&Config::default());
    session.open(write_source(&dir))?;

    session.bind("f", "fox")?;
    session.bind("fs", "fox & sleeps")?;

    // A bound word behaves like the word.
    assert_eq!(session.query("f")?.lines().as_slice(), &[0, 2]);

    // A bound compound comes back as one opaque word.
    let recalled = session.query("fs")?;
    assert_eq!(recalled.sought(), "(fox & sleeps)");
    assert!(recalled.is_empty());

    // The same text typed directly is parsed as an expression.
    assert_eq!(session.query("(fox & sleeps)")?.lines().as_slice(), &[2]);
    Ok(())
}

#[test]
fn test_expression_binding_from_config() -> linequery::Result<()> {
    let dir = TempDir::new().unwrap();
    let config = Config::from_toml_str("[variables]\nbinding = \"expression\"\n")?;
    let mut session = Session::new(&config);
    session.open(write_source(&dir))?;
    assert_eq!(session.variables().mode(), BindingMode::Expression);

    session.bind("fs", "fox & sleeps")?;
    let result = session.query("~fs")?;
    assert_eq!(result.sought(), "~((fox & sleeps))");
    assert_eq!(result.lines().as_slice(), &[0, 1]);
    Ok(())
}

#[test]
fn test_memoized_session_matches_plain() -> linequery::Result<()> {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir);

    let mut plain = Session::new(&Config::default());
    plain.open(&path)?;
    let memo_config = Config::from_toml_str("[evaluator]\nmemoize_shared = true\n")?;
    let mut memo = Session::new(&memo_config);
    memo.open(&path)?;

    for text in ["fox", "~fox | dog", "(the & fox) | ~(the & fox)", "~~sleeps & the"] {
        let a = plain.query(text)?;
        let b = memo.query(text)?;
        assert_eq!(a.lines(), b.lines(), "{text}");
        assert_eq!(a.render(), b.render());
    }
    Ok(())
}

#[test]
fn test_overly_nested_query_is_rejected() -> linequery::Result<()> {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(&Config::default());
    session.open(write_source(&dir))?;

    let deep = format!("{}fox", "~".repeat(20_000));
    assert!(matches!(session.query(&deep), Err(LineQueryError::Parse(_))));
    let groups = format!("{}fox{}", "(".repeat(20_000), ")".repeat(20_000));
    assert!(matches!(session.query(&groups), Err(LineQueryError::Parse(_))));

    // The session stays usable.
    assert_eq!(session.query("~~fox")?.lines().as_slice(), &[0, 2]);
    Ok(())
}
