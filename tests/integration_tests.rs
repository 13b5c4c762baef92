// Integration tests for Oaza Congestion

use oaza_congestion::config::{LoaderSettings, Settings};
use oaza_congestion::core::{bounding_box, is_within_window, CandidateGrid, CongestionFinder};
use oaza_congestion::models::{OazaRecord, Position};
use oaza_congestion::services::RecordLoader;
use oaza_congestion::{run, AppError, LoaderError};

fn create_test_record(name: &str, group: &str, lat: f64, long: f64) -> OazaRecord {
    OazaRecord::new(name, group, Position::new(lat, long))
}

/// Fixed pseudo-random scatter around Tokyo Bay
fn create_scattered_records(count: usize) -> Vec<OazaRecord> {
    (0..count)
        .map(|i| {
            let lat = 35.0 + ((i * 7919) % 401) as f64 * 0.0005;
            let long = 139.0 + ((i * 104729) % 397) as f64 * 0.0005;
            create_test_record(&format!("oaza{}", i), &format!("city{}", i % 7), lat, long)
        })
        .collect()
}

fn shift_jis_csv(rows: &[(&str, &str, &str, &str)]) -> Vec<u8> {
    let mut text = String::from("コード,都道府県,市区町村コード,市区町村,大字コード,大字,緯度,経度\n");
    for (city, oaza, lat, long) in rows {
        text.push_str(&format!("1,北海道,1100,{},110001,{},{},{}\n", city, oaza, lat, long));
    }
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(&text);
    assert!(!had_errors);
    bytes.into_owned()
}

#[test]
fn test_integration_end_to_end_scenario() {
    let records = vec![
        create_test_record("A", "X", 10.0, 10.0),
        create_test_record("B", "X", 10.005, 10.005),
        create_test_record("C", "Y", 50.0, 50.0),
    ];
    let bbox = bounding_box(&records).unwrap();
    assert_eq!(bbox.min, Position::new(10.0, 10.0));
    assert_eq!(bbox.max, Position::new(50.0, 50.0));

    let finder = CongestionFinder::new(0.01, 0.01).unwrap();
    let result = finder.search(&records, &bbox);

    assert_eq!(result.count(), 2);
    assert_eq!(result.center, Position::new(10.0, 10.0));
    let covered: Vec<(&str, &str)> = result
        .covered
        .iter()
        .map(|r| (r.name.as_str(), r.group.as_str()))
        .collect();
    assert_eq!(covered, vec![("A", "X"), ("B", "X")]);
}

#[test]
fn test_integration_search_is_exhaustive() {
    let records = create_scattered_records(300);
    let bbox = bounding_box(&records).unwrap();
    let finder = CongestionFinder::new(0.01, 0.01).unwrap();

    let result = finder.search(&records, &bbox);

    // Recount every candidate independently
    let grid = CandidateGrid::new(bbox, finder.window()).unwrap();
    let counts: Vec<(Position, usize)> = grid
        .iter()
        .map(|center| {
            let count = records
                .iter()
                .filter(|r| is_within_window(&r.position, &center, &finder.window()))
                .count();
            (center, count)
        })
        .collect();

    let max = counts.iter().map(|(_, c)| *c).max().unwrap();
    let first_best = counts.iter().find(|(_, c)| *c == max).unwrap();

    assert_eq!(result.count(), max);
    assert_eq!(result.center, first_best.0);
    assert_eq!(result.candidates_evaluated, counts.len());
}

#[test]
fn test_integration_tie_break_sequential_and_parallel() {
    // Two identical clusters; the lower latitude is visited first
    let records = vec![
        create_test_record("n1", "north", 2.0, 0.0),
        create_test_record("n2", "north", 2.0, 0.1),
        create_test_record("s1", "south", 0.0, 0.0),
        create_test_record("s2", "south", 0.0, 0.1),
    ];
    let bbox = bounding_box(&records).unwrap();
    let finder = CongestionFinder::new(0.25, 0.25).unwrap();

    let sequential = finder.search(&records, &bbox);
    let parallel = finder.search_parallel(&records, &bbox);

    assert_eq!(sequential.center, Position::new(0.0, 0.0));
    assert_eq!(sequential.covered[0].group, "south");
    assert_eq!(sequential, parallel);
}

#[test]
fn test_integration_deterministic() {
    let records = create_scattered_records(500);
    let bbox = bounding_box(&records).unwrap();
    let finder = CongestionFinder::new(0.005, 0.0075).unwrap();

    let first = finder.search(&records, &bbox);
    let second = finder.search(&records, &bbox);
    let parallel = finder.search_parallel(&records, &bbox);

    assert_eq!(first, second);
    assert_eq!(first, parallel);
}

#[test]
fn test_integration_loader_to_report() {
    let input = shift_jis_csv(&[
        ("札幌市中央区", "大通西", "43.0600", "141.3500"),
        ("札幌市中央区", "南一条西", "43.0580", "141.3520"),
        ("札幌市北区", "北七条西", "43.0640", "141.3460"),
        ("利尻町", "沓形", "45.1800", "141.1300"),
    ]);
    let mut settings = Settings::default();
    // Row 4 onwards is the island block
    settings.loader.max_rows = Some(4);

    let report = run(&settings, &input[..]).unwrap();

    assert_eq!(report.count, 3);
    assert!(report.records.iter().all(|r| r.group.starts_with("札幌市")));

    let text = report.to_string();
    assert!(text.starts_with("latitude 43.058, longitude 141.346, oaza count 3\n"));
    assert!(text.contains("札幌市中央区, 大通西 (43.06, 141.35)"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_integration_bad_row_aborts_run() {
    let input = shift_jis_csv(&[
        ("札幌市中央区", "大通西", "43.0600", "141.3500"),
        ("札幌市北区", "北七条西", "不明", "141.3400"),
    ]);

    let err = run(&Settings::default(), &input[..]).unwrap_err();

    assert!(matches!(err, AppError::Loader(LoaderError::Parse { row: 2, column: 6, .. })));
}

#[test]
fn test_integration_loader_respects_columns() {
    let input = "lat;long;name;city\n35.5;139.5;Nishi;Yokohama\n";
    let loader = RecordLoader::new(LoaderSettings {
        encoding: "utf-8".to_string(),
        delimiter: b';',
        latitude_column: 0,
        longitude_column: 1,
        name_column: 2,
        group_column: 3,
        ..LoaderSettings::default()
    });

    let records = loader.load(input.as_bytes()).unwrap();

    assert_eq!(records, vec![create_test_record("Nishi", "Yokohama", 35.5, 139.5)]);
}

#[test]
fn test_integration_infinite_coordinate_aborts_run() {
    let input = shift_jis_csv(&[
        ("札幌市中央区", "大通西", "43.0600", "141.3500"),
        ("札幌市北区", "北七条西", "inf", "141.3400"),
    ]);

    let err = run(&Settings::default(), &input[..]).unwrap_err();

    assert!(matches!(err, AppError::Loader(LoaderError::NonFinite { row: 2, column: 6, .. })));
}
