use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};

use anyhow::{anyhow, Result};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use ipl_dashboard::data::aggregate::View;
use ipl_dashboard::data::fetch::{FetchResult, Fetcher};
use ipl_dashboard::data::loader::{decode_table, load_with, LoadError, TextEncoding};
use ipl_dashboard::data::model::Value;
use ipl_dashboard::data::source::SourceDescriptor;
use ipl_dashboard::session::Session;

/// Serves canned responses and records which URLs were requested.
#[derive(Default)]
struct StubFetcher {
    responses: HashMap<String, FetchResult>,
    requested: RefCell<Vec<String>>,
}

impl StubFetcher {
    fn serve(mut self, url: &str, status: u16, bytes: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchResult {
                status,
                bytes: bytes.into(),
            },
        );
        self
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResult> {
        self.requested.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("dns error: failed to lookup address for {url}"))
    }
}

fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .expect("add directory");
        } else {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(body.as_bytes()).expect("write entry");
        }
    }
    writer.finish().expect("finish zip").into_inner()
}

const MATCHES: &str = "http://host/matches.csv";
const DELIVERIES: &str = "http://host/deliveries.zip";

#[test]
fn raw_csv_round_trip() {
    let fetcher = StubFetcher::default().serve(MATCHES, 200, "a,b\n1,2\n");
    let table = load_with(&fetcher, &SourceDescriptor::raw(MATCHES)).expect("loads");
    assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
    assert_eq!(table.rows(), &[vec![Value::Integer(1), Value::Integer(2)]]);
}

#[test]
fn html_page_is_rejected_for_any_container() {
    let page = "<!DOCTYPE html>\n<HTML><head><title>Google Drive - Virus scan warning</title>";
    for descriptor in [SourceDescriptor::raw(MATCHES), SourceDescriptor::zip(MATCHES)] {
        let fetcher = StubFetcher::default().serve(MATCHES, 200, page);
        let err = load_with(&fetcher, &descriptor).expect_err("html page");
        assert!(matches!(err, LoadError::UpstreamRejected { .. }), "{err}");
        assert!(err.to_string().contains("file too large or permission denied"));
    }
}

#[test]
fn non_success_status_is_fetch_failure() {
    let fetcher = StubFetcher::default().serve(MATCHES, 404, "a,b\n1,2\n");
    let err = load_with(&fetcher, &SourceDescriptor::raw(MATCHES)).expect_err("404");
    match err {
        LoadError::FetchFailed { url, reason } => {
            assert_eq!(url, MATCHES);
            assert!(reason.contains("404"), "{reason}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn transport_error_is_fetch_failure() {
    let fetcher = StubFetcher::default();
    let err = load_with(&fetcher, &SourceDescriptor::raw(MATCHES)).expect_err("unreachable");
    assert!(matches!(err, LoadError::FetchFailed { .. }));
    assert_eq!(fetcher.requested.borrow().len(), 1, "no retries");
}

#[test]
fn short_row_loads_with_missing_cell() {
    let fetcher = StubFetcher::default().serve(MATCHES, 200, "id,winner,venue\n1,A,X\n2,B\n");
    let table = load_with(&fetcher, &SourceDescriptor::raw(MATCHES)).expect("short row loads");
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1][1], Value::Text("B".into()));
    assert_eq!(table.rows()[1][2], Value::Null);
}

#[test]
fn long_row_still_fails_every_encoding() {
    let fetcher = StubFetcher::default().serve(MATCHES, 200, "id,winner\n1,A,X\n");
    let err = load_with(&fetcher, &SourceDescriptor::raw(MATCHES)).expect_err("long row");
    assert!(matches!(err, LoadError::UndecodableText { .. }), "{err}");
}

#[test]
fn na_dismissal_is_not_a_wicket() {
    let deliveries = zip_of(&[(
        "deliveries.csv",
        "batsman,batsman_runs,bowler,player_dismissed\nKohli,4,Malinga,NA\nKohli,0,Narine,Kohli\n",
    )]);
    let fetcher = StubFetcher::default().serve(DELIVERIES, 200, deliveries);
    let table = load_with(&fetcher, &SourceDescriptor::zip(DELIVERIES)).expect("loads");
    let bowlers = View::TopBowlers
        .compute(&table, &table)
        .expect("aggregates")
        .expect("ranking");
    assert_eq!(bowlers.entries, vec![("Narine".to_string(), 1.0)]);
}

#[test]
fn zip_picks_first_csv_in_listing_order() {
    let archive = zip_of(&[
        ("README.txt", "not data"),
        ("data/", ""),
        ("second.csv", "batsman\nKohli\n"),
        ("first.csv", "batsman\nDhoni\n"),
    ]);
    let fetcher = StubFetcher::default().serve(DELIVERIES, 200, archive);
    let table = load_with(&fetcher, &SourceDescriptor::zip(DELIVERIES)).expect("loads");
    assert_eq!(table.rows()[0][0], Value::Text("Kohli".into()));
}

#[test]
fn zip_honours_explicit_member() {
    let archive = zip_of(&[
        ("a.csv", "batsman\nKohli\n"),
        ("b.csv", "batsman\nDhoni\n"),
    ]);
    let fetcher = StubFetcher::default().serve(DELIVERIES, 200, archive);
    let descriptor = SourceDescriptor::zip(DELIVERIES).with_inner_file("b.csv");
    let table = load_with(&fetcher, &descriptor).expect("loads");
    assert_eq!(table.rows()[0][0], Value::Text("Dhoni".into()));

    let missing = SourceDescriptor::zip(DELIVERIES).with_inner_file("c.csv");
    let err = load_with(&fetcher, &missing).expect_err("no such member");
    assert!(matches!(err, LoadError::NoCsvInArchive { member: Some(_) }));
}

#[test]
fn zip_without_csv() {
    let archive = zip_of(&[("notes.txt", "hello"), ("deliveries.CSV.bak", "x")]);
    let fetcher = StubFetcher::default().serve(DELIVERIES, 200, archive);
    let err = load_with(&fetcher, &SourceDescriptor::zip(DELIVERIES)).expect_err("no csv");
    assert!(matches!(err, LoadError::NoCsvInArchive { member: None }));
}

#[test]
fn raw_bytes_declared_as_zip_are_a_bad_archive() {
    let fetcher = StubFetcher::default().serve(DELIVERIES, 200, "batsman\nKohli\n");
    let err = load_with(&fetcher, &SourceDescriptor::zip(DELIVERIES)).expect_err("not zip");
    assert!(matches!(err, LoadError::BadArchive { .. }));
}

#[test]
fn latin1_is_tried_before_cp1252() {
    // Valid cp1252 (0x92 = right single quote), invalid utf-8.
    let payload = b"venue,city\nSt George\x92s Park,Port Elizabeth\n";
    let (table, encoding) = decode_table(payload).expect("decodable");
    assert_eq!(encoding, TextEncoding::Latin1);
    assert_eq!(
        table.rows()[0][0],
        Value::Text("St George\u{92}s Park".into()),
        "latin-1 keeps 0x92 as a control character"
    );
    assert_ne!(
        table.rows()[0][0],
        Value::Text("St George\u{2019}s Park".into())
    );
}

#[test]
fn every_failed_attempt_is_reported() {
    let err = decode_table(b"a,b\n1,2,3\n").expect_err("ragged everywhere");
    let msg = err.to_string();
    for name in ["utf-8", "latin-1", "cp1252"] {
        assert!(msg.contains(name), "{msg}");
    }
}

#[test]
fn session_loads_both_and_ranks_teams() {
    let matches = "id,winner,venue\n1,A,X\n2,A,Y\n3,B,X\n4,C,X\n5,A,Z\n6,D,Y\n7,E,X\n8,B,Y\n";
    let deliveries = zip_of(&[(
        "deliveries.csv",
        "batsman,batsman_runs,bowler,player_dismissed\nKohli,4,Malinga,\nKohli,6,Malinga,Kohli\n",
    )]);
    let fetcher = StubFetcher::default()
        .serve(MATCHES, 200, matches)
        .serve(DELIVERIES, 200, deliveries);

    let session = Session::load_from(
        &fetcher,
        &SourceDescriptor::raw(MATCHES),
        &SourceDescriptor::zip(DELIVERIES),
    )
    .expect("both load");

    let teams = View::TopTeams
        .compute(&session.matches, &session.deliveries)
        .expect("aggregates")
        .expect("ranking");
    let expected: Vec<(String, f64)> = [("A", 3.0), ("B", 2.0), ("C", 1.0), ("D", 1.0), ("E", 1.0)]
        .iter()
        .map(|(l, v)| (l.to_string(), *v))
        .collect();
    assert_eq!(teams.entries, expected);

    let bowlers = View::TopBowlers
        .compute(&session.matches, &session.deliveries)
        .expect("aggregates")
        .expect("ranking");
    assert_eq!(bowlers.entries, vec![("Malinga".to_string(), 1.0)]);
}

#[test]
fn session_halts_on_first_failure() {
    let fetcher = StubFetcher::default()
        .serve(MATCHES, 503, "")
        .serve(DELIVERIES, 200, zip_of(&[("d.csv", "a\n1\n")]));

    let err = Session::load_from(
        &fetcher,
        &SourceDescriptor::raw(MATCHES),
        &SourceDescriptor::zip(DELIVERIES),
    )
    .expect_err("matches fails");
    assert!(matches!(err, LoadError::FetchFailed { .. }));
    assert_eq!(*fetcher.requested.borrow(), vec![MATCHES.to_string()]);
}
