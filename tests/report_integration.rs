//! Integration tests for the query log

use tempfile::tempdir;

use chartjudge::report::QueryLog;

#[test]
fn records_accumulate_across_log_handles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queries.csv");

    // Separate handles over the same file, as separate process runs would be
    let first = QueryLog::new(&path).append("q1", "bm25", 0.91, "answer 1").unwrap();
    let second = QueryLog::new(&path).append("q2", "clip", 1.0, "answer 2").unwrap();

    assert_eq!(first.sl, 1);
    assert_eq!(second.sl, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "header plus two records");
    assert!(lines[0].starts_with("sl,query,top_method"));
    assert!(lines[1].contains("bm25"));
    assert!(lines[2].contains("clip"));
}

#[test]
fn answers_with_commas_and_newlines_survive_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queries.csv");
    let log = QueryLog::new(&path);

    let answer = "First paragraph, with commas.\nSecond paragraph.";
    log.append("tricky query", "mistral", 0.5, answer).unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .unwrap();
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(record.get(4), Some(answer));
    assert_eq!(log.count_records().unwrap(), 1);
}
