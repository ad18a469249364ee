//! Recovered ECG data and its export description.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Repository used for recording URIs when none is configured.
pub const DEFAULT_REPOSITORY: &str = "http://demo.biosignalml.org";

/// Event type attached to every beat annotation.
pub const BEAT_EVENT_TYPE: &str = "http://biosignalml.org/AliveCor#beat";

/// Chart geometry found while scanning, in page units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    /// Left edge of the plot border
    pub plot_left: Option<f64>,
    /// Width of one trace row
    pub plot_width: Option<f64>,
    /// Baseline of each trace row
    pub trace_origins: Vec<f64>,
    /// Baseline of each beat-marker row
    pub beat_origins: Vec<f64>,
}

/// A single-lead ECG recovered from a report page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcgRecording {
    /// Sample times in seconds from the start of the strip
    pub times: Vec<f64>,
    /// Sample values in millivolts
    pub samples: Vec<f64>,
    /// Beat marker times in seconds
    pub beats: Vec<f64>,
    pub layout: PlotLayout,
}

impl EcgRecording {
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn beat_count(&self) -> usize {
        self.beats.len()
    }

    /// Whole seconds covered by the strip, rounded up.
    pub fn duration(&self) -> f64 {
        self.times.last().map_or(0.0, |t| t.ceil())
    }

    /// Intervals between consecutive beats, in seconds.
    pub fn rr_intervals(&self) -> Vec<f64> {
        self.beats.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Mean heart rate in beats per minute from the beat markers.
    pub fn mean_heart_rate(&self) -> Option<f64> {
        let intervals = self.rr_intervals();
        if intervals.is_empty() {
            return None;
        }
        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        (mean > 0.0).then(|| 60.0 / mean)
    }
}

/// A time base for a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    pub uri: String,
    pub label: String,
    pub units: String,
    pub times: Vec<f64>,
}

/// A signal sampled on a clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub uri: String,
    pub label: String,
    pub units: String,
    pub clock: Clock,
    pub data: Vec<f64>,
}

/// A point annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uri: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub time: f64,
    pub label: String,
}

/// A recording ready to be written out: signals, clocks and beat events
/// under one URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub uri: String,
    /// Whole seconds, rounded up
    pub duration: f64,
    pub signals: Vec<Signal>,
    pub events: Vec<Event>,
}

impl Recording {
    /// Describe an ECG under the given recording URI.
    pub fn from_ecg(ecg: &EcgRecording, uri: impl Into<String>) -> Self {
        let uri = uri.into();

        let ecg_signal = Signal {
            uri: format!("{}/ecg", uri),
            label: "ECG".to_string(),
            units: "mV".to_string(),
            clock: Clock {
                uri: format!("{}/ecgclock", uri),
                label: "ECG clock".to_string(),
                units: "seconds".to_string(),
                times: ecg.times.clone(),
            },
            data: ecg.samples.clone(),
        };

        let beat_signal = Signal {
            uri: format!("{}/beats", uri),
            label: "Beats".to_string(),
            units: "annotation".to_string(),
            clock: Clock {
                uri: format!("{}/beatclock", uri),
                label: "Beat times".to_string(),
                units: "seconds".to_string(),
                times: ecg.beats.clone(),
            },
            data: vec![1.0; ecg.beats.len()],
        };

        let events = ecg
            .beats
            .iter()
            .enumerate()
            .map(|(n, &time)| Event {
                uri: format!("{}/beat/{}", uri, n),
                event_type: BEAT_EVENT_TYPE.to_string(),
                time,
                label: format!("Beat {}", n),
            })
            .collect();

        Self {
            duration: ecg.duration(),
            uri,
            signals: vec![ecg_signal, beat_signal],
            events,
        }
    }

    pub fn signal(&self, label: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.label == label)
    }
}

/// Name a recording after its report file's stem.
pub fn recording_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "recording".to_string())
}

/// Recording URI for a report file: `{repository}/AliveCor/{recording name}`.
pub fn recording_uri(repository: &str, path: &Path) -> String {
    format!(
        "{}/AliveCor/{}",
        repository.trim_end_matches('/'),
        recording_name(path)
    )
}
