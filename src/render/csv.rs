//! CSV export of recovered samples and beats.

use std::io::Write;

use crate::ecg::EcgRecording;
use crate::error::Result;

/// Write `time_s,voltage_mv` rows.
pub fn write_samples_csv<W: Write>(ecg: &EcgRecording, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["time_s", "voltage_mv"])?;
    for (time, value) in ecg.times.iter().zip(&ecg.samples) {
        wtr.serialize((time, value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `beat,time_s` rows.
pub fn write_beats_csv<W: Write>(ecg: &EcgRecording, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["beat", "time_s"])?;
    for (n, time) in ecg.beats.iter().enumerate() {
        wtr.serialize((n, time))?;
    }
    wtr.flush()?;
    Ok(())
}
