//! Synthetic AliveCor-style report used by the integration tests.
//!
//! The page is laid out the way the device's reports are: an empty first
//! group, a chart group that also carries the header text, and a data group
//! with the calibration pulse, two trace rows and their beat markers. The
//! drawing flips the y axis with `cm`, so trace values are measured upward
//! from each row's grid line.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream};
use tempfile::TempDir;

pub const CONTENT: &str = "q Q q /Perceptual ri
BT /F1 12 Tf 40 800 Td (Jane Citizen) Tj 0 -16 Td (Recorded: 14 May 2013 09:30:00) Tj 0 -16 Td (Heart Rate: 72 BPM) Tj 0 -16 Td (Device: iPhone 4S) Tj ET
0.4 w
q 1 0 0 -1 0 841.89 cm 50 300 m 150 300 l 150 600 l 50 600 l h S Q
q 1 0 0 -1 0 841.89 cm 50 395 m 150 395 l 50 495 m 150 495 l S Q
0.3 w
q 1 0 0 -1 0 841.89 cm 60 300 m 60 600 l S Q
q 1 0 0 -1 0 841.89 cm 50 400 m 150 400 l 50 500 m 150 500 l S Q
Q
q
1.5 w
q 1 0 0 -1 0 841.89 cm 40 400 m 40 390 l S Q
0.4 w
q 1 0 0 -1 0 841.89 cm 50 400 m 100 390 l 150 400 l S Q
0.6 w
q 1 0 0 -1 0 841.89 cm 75 395 m 75 392 l S Q
0.4 w
q 1 0 0 -1 0 841.89 cm 50 500 m 150 510 l S Q
0.6 w
q 1 0 0 -1 0 841.89 cm 100 495 m 100 492 l S Q
Q
";

pub const TEXT_LINES: [&str; 4] = [
    "Jane Citizen",
    "Recorded: 14 May 2013 09:30:00",
    "Heart Rate: 72 BPM",
    "Device: iPhone 4S",
];

/// Sample times of the two trace rows, in points from the strip start.
pub const TRACE_TIMES: [f64; 5] = [0.0, 50.0, 100.0, 100.0, 200.0];

/// Sample heights above each row's grid line, in points.
pub const TRACE_VALUES: [f64; 5] = [0.0, 10.0, 0.0, 0.0, -10.0];

/// Beat marker times, in points from the strip start.
pub const BEAT_TIMES: [f64; 2] = [25.0, 150.0];

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Build the report in memory.
pub fn report_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });
    let content_id = doc.add_object(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        deflate(CONTENT.as_bytes()),
    ));

    let page_id = doc.add_object(dictionary! {
        "Parent" => pages_id,
        "Contents" => content_id,
        "Type" => "Page",
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(595.276), Object::Real(841.89)],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("AliveCor ECG"),
        "Producer" => Object::string_literal("AliveCor"),
        "CreationDate" => Object::string_literal("D:20130514093000Z"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Content parts of the first page of [`tree_pdf`], stored uncompressed.
pub const SPLIT_CONTENT: [&str; 2] = ["q BT (Hello) Tj ET", "BT (World) Tj ET Q"];

/// A two-page document that leans on the page tree.
///
/// The `/Pages` node carries the media box. The first page has its own
/// crop box and a `/Contents` array of two streams. The second page's
/// `/Contents` points at an integer, so its text cannot be extracted.
pub fn tree_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let parts: Vec<Object> = SPLIT_CONTENT
        .iter()
        .map(|part| {
            doc.add_object(Stream::new(dictionary! {}, part.as_bytes().to_vec()))
                .into()
        })
        .collect();
    let first = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "CropBox" => vec![10.into(), 10.into(), 100.into(), 100.into()],
        "Contents" => parts,
    });

    let not_a_stream = doc.add_object(Object::Integer(42));
    let second = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => not_a_stream,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![first.into(), second.into()],
            "Count" => 2,
            "MediaBox" => vec![0.into(), 0.into(), 200.into(), 300.into()],
        }),
    );
    finish(doc, pages_id)
}

/// A one-page document whose `/Pages` node names the page as its parent.
pub fn cyclic_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Parent" => page_id,
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    finish(doc, pages_id)
}

/// A one-page document locked with the user password `user`.
pub fn encrypted_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, b"BT (secret) Tj ET".to_vec()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), 200.into(), 300.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![7u8; 16]),
            Object::string_literal(vec![9u8; 16]),
        ],
    );

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password: "user",
        key_length: 128,
        permissions: Permissions::all(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

fn finish(mut doc: Document, pages_id: lopdf::ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Write the report into a fresh temporary directory under `name`.
pub fn report_file(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, report_pdf()).unwrap();
    (dir, path)
}

/// Seconds per point at the default 25 mm/s.
pub fn seconds(points: f64) -> f64 {
    points * 25.4 / 72.0 / 25.0
}

/// Millivolts per point at the default 10 mm/mV.
pub fn millivolts(points: f64) -> f64 {
    points * 25.4 / 72.0 / 10.0
}

pub fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "{:?} vs {:?}", actual, expected);
    }
}
