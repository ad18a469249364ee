//! Content stream walker that recovers the rhythm strip.
//!
//! An AliveCor report page is drawn in three top-level `q ... Q` groups
//! ("stages"). Stage 2 draws the chart: a plot border with line width 0.4
//! followed by the beat-marker grid, then at width 0.3 the vertical grid
//! followed by the horizontal trace grid. Stage 3 draws the data: a
//! calibration pulse at width 1.5, and for every trace row a polyline at
//! width 0.4 followed by beat markers at width 0.6.
//!
//! Each line group is wrapped in its own `q ... Q`, so the element being
//! drawn is tracked by the line width that announced it and by how many
//! groups have closed since.

use crate::error::{Error, Result};
use crate::parser::ContentOp;

use super::graphics::GraphicsMap;
use super::options::EcgOptions;
use super::recording::{EcgRecording, PlotLayout};

/// The chart element the current path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    None,
    Border,
    BeatGrid,
    VerticalGrid,
    TraceGrid,
    Calibration,
    Trace,
    BeatMarker,
    Other,
}

impl Element {
    /// Element drawn by the group that follows a closed one.
    fn after_group(self) -> Self {
        match self {
            Element::None => Element::None,
            Element::Border => Element::BeatGrid,
            Element::VerticalGrid => Element::TraceGrid,
            Element::Trace | Element::BeatMarker => Element::BeatMarker,
            Element::BeatGrid | Element::TraceGrid | Element::Calibration | Element::Other => {
                Element::Other
            }
        }
    }
}

fn same_width(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-4
}

/// Walks content operations and collects trace samples and beat times in
/// page units, converting to seconds and millivolts at the end.
pub struct EcgScanner {
    options: EcgOptions,
    stage: u32,
    level: u32,
    transform: GraphicsMap,
    saved: Vec<GraphicsMap>,
    element: Element,
    plot_left: Option<f64>,
    plot_width: Option<f64>,
    time_origin: Option<f64>,
    row: Option<usize>,
    trace_origins: Vec<f64>,
    beat_origins: Vec<f64>,
    times: Vec<f64>,
    values: Vec<f64>,
    beats: Vec<f64>,
}

impl EcgScanner {
    pub fn new(options: &EcgOptions) -> Self {
        Self {
            options: options.clone(),
            stage: 0,
            level: 0,
            transform: GraphicsMap::identity(),
            saved: Vec::new(),
            element: Element::None,
            plot_left: None,
            plot_width: None,
            time_origin: None,
            row: None,
            trace_origins: Vec::new(),
            beat_origins: Vec::new(),
            times: Vec::new(),
            values: Vec::new(),
            beats: Vec::new(),
        }
    }

    /// Scan a page's operations and return the recording.
    pub fn scan(mut self, ops: &[ContentOp]) -> Result<EcgRecording> {
        for (index, op) in ops.iter().enumerate() {
            self.step(index, op)?;
        }

        if self.times.is_empty() {
            return Err(Error::ecg(ops.len(), "no ECG trace found on page"));
        }
        log::debug!(
            "Recovered {} samples in {} rows and {} beats",
            self.times.len(),
            self.row.map_or(0, |r| r + 1),
            self.beats.len()
        );
        Ok(self.finish())
    }

    fn step(&mut self, index: usize, op: &ContentOp) -> Result<()> {
        match op.operator.as_str() {
            "q" => {
                self.saved.push(self.transform);
                self.transform = GraphicsMap::identity();
                if self.level == 0 {
                    self.stage += 1;
                    log::trace!("Stage {} starts at operator {}", self.stage, index);
                }
                self.level += 1;
            }
            "Q" => {
                self.transform = self
                    .saved
                    .pop()
                    .ok_or_else(|| Error::ecg(index, "Q without matching q"))?;
                self.element = self.element.after_group();
                self.level -= 1;
            }
            "cm" => {
                self.transform = GraphicsMap::from_cm(&op.numbers(), index)?;
            }
            "w" => {
                let width = Self::operands::<1>(op, index)?[0];
                self.set_line_width(width);
            }
            "m" => {
                let [x, y] = Self::operands::<2>(op, index)?;
                let (x, y) = self.transform.map(x, y);
                self.move_to(index, x, y)?;
            }
            "l" => {
                let [x, y] = Self::operands::<2>(op, index)?;
                let (x, y) = self.transform.map(x, y);
                self.line_to(index, x, y)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn operands<const N: usize>(op: &ContentOp, index: usize) -> Result<[f64; N]> {
        let numbers = op.numbers();
        <[f64; N]>::try_from(numbers.as_slice()).map_err(|_| {
            Error::ecg(
                index,
                format!(
                    "{} expects {} operands, got {}",
                    op.operator,
                    N,
                    numbers.len()
                ),
            )
        })
    }

    fn set_line_width(&mut self, width: f64) {
        match self.stage {
            2 if same_width(width, 0.4) => self.element = Element::Border,
            2 if same_width(width, 0.3) => self.element = Element::VerticalGrid,
            3 if same_width(width, 1.5) => self.element = Element::Calibration,
            3 if same_width(width, 0.4) => {
                self.row = Some(self.row.map_or(0, |r| r + 1));
                self.element = Element::Trace;
            }
            3 if same_width(width, 0.6) => self.element = Element::BeatMarker,
            _ => {}
        }
    }

    fn row_origin(&self, index: usize) -> Result<f64> {
        let row = self
            .row
            .ok_or_else(|| Error::ecg(index, "trace drawn before any trace row started"))?;
        self.trace_origins.get(row).copied().ok_or_else(|| {
            Error::ecg(
                index,
                format!(
                    "trace row {} has no grid line ({} found)",
                    row,
                    self.trace_origins.len()
                ),
            )
        })
    }

    fn move_to(&mut self, index: usize, x: f64, y: f64) -> Result<()> {
        match self.element {
            Element::Border => self.plot_left = Some(x),
            Element::BeatGrid => self.beat_origins.push(y),
            Element::TraceGrid => self.trace_origins.push(y),
            Element::Trace => {
                let origin = self.row_origin(index)?;
                let time_origin = match self.time_origin {
                    None => x,
                    // A new row continues where the previous one ended.
                    Some(t) => {
                        let width = self.plot_width.ok_or_else(|| {
                            Error::ecg(index, "trace row starts before the plot width is known")
                        })?;
                        t - width
                    }
                };
                self.time_origin = Some(time_origin);
                self.times.push(x - time_origin);
                self.values.push(y - origin);
            }
            Element::BeatMarker => {
                let time_origin = self
                    .time_origin
                    .ok_or_else(|| Error::ecg(index, "beat marker drawn before any trace"))?;
                self.beats.push(x - time_origin);
            }
            _ => {}
        }
        Ok(())
    }

    fn line_to(&mut self, index: usize, x: f64, y: f64) -> Result<()> {
        match self.element {
            Element::Border => {
                if self.plot_width.is_none() {
                    if let Some(left) = self.plot_left {
                        self.plot_width = Some(x - left);
                    }
                }
            }
            Element::Trace => {
                let origin = self.row_origin(index)?;
                let time_origin = self
                    .time_origin
                    .ok_or_else(|| Error::ecg(index, "trace line without a starting point"))?;
                self.times.push(x - time_origin);
                self.values.push(y - origin);
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> EcgRecording {
        let seconds = self.options.seconds_per_point();
        let millivolts = self.options.millivolts_per_point();
        EcgRecording {
            times: self.times.iter().map(|t| t * seconds).collect(),
            samples: self.values.iter().map(|v| v * millivolts).collect(),
            beats: self.beats.iter().map(|t| t * seconds).collect(),
            layout: PlotLayout {
                plot_left: self.plot_left,
                plot_width: self.plot_width,
                trace_origins: self.trace_origins,
                beat_origins: self.beat_origins,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PdfValue;

    /// Parse a whitespace separated operator listing without a PDF engine.
    fn ops(listing: &str) -> Vec<ContentOp> {
        let mut out = Vec::new();
        let mut operands = Vec::new();
        for token in listing.split_whitespace() {
            if let Ok(n) = token.parse::<i64>() {
                operands.push(PdfValue::Integer(n));
            } else if let Ok(r) = token.parse::<f32>() {
                operands.push(PdfValue::Real(r));
            } else if let Some(name) = token.strip_prefix('/') {
                operands.push(PdfValue::Name(name.to_string()));
            } else {
                out.push(ContentOp {
                    operator: token.to_string(),
                    operands: std::mem::take(&mut operands),
                });
            }
        }
        out
    }

    /// Chart with a 100pt wide plot starting at x=50 and two trace rows at
    /// y=100 and y=200 (after the vertical flip).
    const CHART: &str = "
        q Q
        q
          0.4 w
          q 1 0 0 -1 0 0 cm 50 10 m 150 10 l 150 300 l 50 300 l h S Q
          q 1 0 0 -1 0 0 cm 50 95 m 150 95 l 50 195 m 150 195 l S Q
          0.3 w
          q 1 0 0 -1 0 0 cm 60 10 m 60 300 l S Q
          q 1 0 0 -1 0 0 cm 50 100 m 150 100 l 50 200 m 150 200 l S Q
        Q
    ";

    fn scan(listing: &str) -> Result<EcgRecording> {
        let options = EcgOptions::default();
        EcgScanner::new(&options).scan(&ops(&format!("{} {}", CHART, listing)))
    }

    #[test]
    fn test_two_rows_are_joined_in_time() {
        let recording = scan(
            "q
               1.5 w
               q 1 0 0 -1 0 0 cm 40 100 m 40 90 l S Q
               0.4 w
               q 1 0 0 -1 0 0 cm 50 100 m 100 90 l 150 100 l S Q
               0.6 w
               q 1 0 0 -1 0 0 cm 75 95 m 75 92 l S Q
               0.4 w
               q 1 0 0 -1 0 0 cm 50 200 m 150 210 l S Q
               0.6 w
               q 1 0 0 -1 0 0 cm 100 195 m 100 192 l S Q
             Q",
        )
        .unwrap();

        let s = EcgOptions::default().seconds_per_point();
        let mv = EcgOptions::default().millivolts_per_point();

        let expected_times = [0.0, 50.0, 100.0, 100.0, 200.0];
        assert_eq!(recording.times.len(), expected_times.len());
        for (t, e) in recording.times.iter().zip(expected_times) {
            assert!((t - e * s).abs() < 1e-9, "{} != {}", t, e * s);
        }

        // The y axis is flipped by cm, so drawn y=90 maps to -90.
        let expected_values = [0.0, 10.0, 0.0, 0.0, -10.0];
        for (v, e) in recording.samples.iter().zip(expected_values) {
            assert!((v - e * mv).abs() < 1e-9, "{} != {}", v, e * mv);
        }

        assert_eq!(recording.beats.len(), 2);
        assert!((recording.beats[0] - 25.0 * s).abs() < 1e-9);
        assert!((recording.beats[1] - 150.0 * s).abs() < 1e-9);

        assert_eq!(recording.layout.plot_left, Some(50.0));
        assert_eq!(recording.layout.plot_width, Some(100.0));
        assert_eq!(recording.layout.trace_origins, vec![-100.0, -200.0]);
        assert_eq!(recording.layout.beat_origins, vec![-95.0, -195.0]);
    }

    #[test]
    fn test_page_without_trace_is_an_error() {
        let result = scan("");
        assert!(matches!(result, Err(Error::Ecg { .. })));
    }

    #[test]
    fn test_trace_without_grid_row_is_an_error() {
        let result = scan(
            "q
               0.4 w q 50 100 m 60 100 l S Q
               0.4 w q 50 200 m 60 200 l S Q
               0.4 w q 50 300 m 60 300 l S Q
             Q",
        );
        match result {
            Err(Error::Ecg { message, .. }) => assert!(message.contains("trace row 2")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_sheared_matrix_is_an_error() {
        let result = scan("q 0.4 w q 1 0.5 0 1 0 0 cm 50 100 m S Q Q");
        assert!(matches!(result, Err(Error::Ecg { .. })));
    }

    #[test]
    fn test_unbalanced_restore_is_an_error() {
        let result = EcgScanner::new(&EcgOptions::default()).scan(&ops("Q"));
        assert!(matches!(result, Err(Error::Ecg { index: 0, .. })));
    }

    #[test]
    fn test_beat_marker_before_trace_is_an_error() {
        let result = scan("q 0.6 w q 70 100 m 70 90 l S Q Q");
        assert!(matches!(result, Err(Error::Ecg { .. })));
    }
}
