//! Integration tests for ECG recovery from report files.

mod common;

use common::{assert_close, millivolts, seconds, BEAT_TIMES, TRACE_TIMES, TRACE_VALUES};
use ecgpdf::ecg::{self, recording_uri, BEAT_EVENT_TYPE, DEFAULT_REPOSITORY};
use ecgpdf::render::{to_json, write_beats_csv, write_samples_csv};
use ecgpdf::{Document, EcgOptions, Error, JsonFormat, Recording, ReportSummary};

#[test]
fn test_extract_from_document() {
    let doc = Document::from_bytes(&common::report_pdf()).unwrap();
    let ecg = ecg::extract_ecg_from_document(&doc, &EcgOptions::default()).unwrap();

    let times: Vec<f64> = TRACE_TIMES.iter().map(|&t| seconds(t)).collect();
    let values: Vec<f64> = TRACE_VALUES.iter().map(|&v| millivolts(v)).collect();
    let beats: Vec<f64> = BEAT_TIMES.iter().map(|&t| seconds(t)).collect();

    assert_close(&ecg.times, &times);
    assert_close(&ecg.samples, &values);
    assert_close(&ecg.beats, &beats);

    assert_eq!(ecg.layout.plot_left, Some(50.0));
    assert_eq!(ecg.layout.plot_width, Some(100.0));
    assert_eq!(ecg.layout.trace_origins.len(), 2);
    assert_eq!(ecg.layout.beat_origins.len(), 2);

    // 200pt at 25 mm/s is a little under three seconds.
    assert_eq!(ecg.duration(), 3.0);
}

#[test]
fn test_custom_chart_scales() {
    let (_dir, path) = common::report_file("report.pdf");
    let options = EcgOptions::new().with_time_scale(50.0).with_voltage_scale(20.0);
    let ecg = ecg::extract_ecg(&path, &options).unwrap();

    let last = *ecg.times.last().unwrap();
    assert!((last - seconds(200.0) / 2.0).abs() < 1e-9);
    assert!((ecg.samples[1] - millivolts(10.0) / 2.0).abs() < 1e-9);
}

#[test]
fn test_missing_page() {
    let doc = Document::from_bytes(&common::report_pdf()).unwrap();
    let result = ecg::extract_ecg_from_document(&doc, &EcgOptions::new().with_page(2));
    assert!(matches!(result, Err(Error::PageOutOfRange(2, 1))));
}

#[test]
fn test_recording_export() {
    let (_dir, path) = common::report_file("jane.pdf");
    let recording =
        ecgpdf::to_recording(&path, DEFAULT_REPOSITORY, &EcgOptions::default()).unwrap();

    assert_eq!(recording.uri, "http://demo.biosignalml.org/AliveCor/jane");
    assert_eq!(recording.uri, recording_uri(DEFAULT_REPOSITORY, &path));
    assert_eq!(recording.duration, 3.0);

    let signal = recording.signal("ECG").unwrap();
    assert_eq!(signal.units, "mV");
    assert_eq!(signal.clock.uri, "http://demo.biosignalml.org/AliveCor/jane/ecgclock");
    assert_eq!(signal.data.len(), TRACE_VALUES.len());

    assert_eq!(recording.events.len(), 2);
    assert_eq!(recording.events[1].uri, "http://demo.biosignalml.org/AliveCor/jane/beat/1");
    assert_eq!(recording.events[1].event_type, BEAT_EVENT_TYPE);

    let json = to_json(&recording, JsonFormat::Pretty).unwrap();
    let back: Recording = serde_json::from_str(&json).unwrap();
    assert_eq!(back, recording);
}

#[test]
fn test_csv_export() {
    let doc = Document::from_bytes(&common::report_pdf()).unwrap();
    let ecg = ecg::extract_ecg_from_document(&doc, &EcgOptions::default()).unwrap();

    let mut samples = Vec::new();
    write_samples_csv(&ecg, &mut samples).unwrap();
    let samples = String::from_utf8(samples).unwrap();
    assert!(samples.starts_with("time_s,voltage_mv\n0.0,0.0\n"));
    assert_eq!(samples.lines().count(), TRACE_TIMES.len() + 1);

    let mut beats = Vec::new();
    write_beats_csv(&ecg, &mut beats).unwrap();
    let beats = String::from_utf8(beats).unwrap();
    assert!(beats.starts_with("beat,time_s\n0,"));
    assert_eq!(beats.lines().count(), BEAT_TIMES.len() + 1);
}

#[test]
fn test_batch_keeps_order_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("first.pdf");
    let bad = dir.path().join("broken.pdf");
    let other = dir.path().join("second.pdf");
    std::fs::write(&good, common::report_pdf()).unwrap();
    std::fs::write(&bad, b"not a report").unwrap();
    std::fs::write(&other, common::report_pdf()).unwrap();

    let paths = vec![good.clone(), bad.clone(), other.clone()];
    let results = ecg::extract_ecg_batch(&paths, &EcgOptions::default());

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, good);
    assert_eq!(results[1].0, bad);
    assert_eq!(results[2].0, other);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(Error::UnknownFormat)));
    assert_eq!(
        results[2].1.as_ref().unwrap().sample_count(),
        TRACE_TIMES.len()
    );
}

#[test]
fn test_report_summary_from_page_text() {
    let doc = Document::from_bytes(&common::report_pdf()).unwrap();
    let text = doc.page(0).unwrap().extract_text().unwrap();
    let summary = ReportSummary::from_text(&text);

    assert_eq!(summary.lines.len(), common::TEXT_LINES.len());
    assert_eq!(summary.heart_rate_bpm, Some(72));
    assert_eq!(summary.field("Device"), Some("iPhone 4S"));
}
