use std::io::{BufRead, Write};

use idrive_decoder::idrive::{DecoderEvent, Frame, IDriveDecoder};
use tracing::{debug, warn};

use crate::candump::{self, CanRecord};
use crate::config::ReplayConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines: usize,
    pub frames: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub events: usize,
}

/// Feeds recorded controller traffic through an [`IDriveDecoder`] and
/// writes one line per reported event.
pub struct ReplaySession {
    decoder: IDriveDecoder,
    config: ReplayConfig,
    show_hex: bool,
    stats: ReplayStats,
}

impl ReplaySession {
    pub fn new(config: ReplayConfig, show_hex: bool) -> Self {
        Self {
            decoder: IDriveDecoder::new(),
            config,
            show_hex,
            stats: ReplayStats::default(),
        }
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Replay every line of `input`. Malformed lines are logged and skipped;
    /// only I/O errors abort the run.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> std::io::Result<()> {
        for (number, line) in input.lines().enumerate() {
            let line = line?;
            self.stats.lines += 1;

            match candump::parse_line(&line) {
                Ok(Some(record)) => self.handle_record(&record, out)?,
                Ok(None) => {}
                Err(err) => {
                    self.stats.malformed += 1;
                    warn!("line {}: {}", number + 1, err);
                }
            }
        }
        out.flush()
    }

    fn accepts(&self, record: &CanRecord) -> bool {
        if let Some(id) = self.config.can_id {
            if record.id != id {
                return false;
            }
        }
        if let Some(interface) = &self.config.interface {
            if &record.interface != interface {
                return false;
            }
        }
        true
    }

    fn handle_record<W: Write>(&mut self, record: &CanRecord, out: &mut W) -> std::io::Result<()> {
        if !self.accepts(record) {
            self.stats.skipped += 1;
            return Ok(());
        }

        let frame = match Frame::try_from(record.data.as_slice()) {
            Ok(frame) => frame,
            Err(err) => {
                debug!(id = record.id, "skipping record: {}", err);
                self.stats.skipped += 1;
                return Ok(());
            }
        };
        self.stats.frames += 1;

        for event in self.decoder.decode_events(&frame) {
            let shown = match event {
                DecoderEvent::Switch(switch) => !self.config.is_ignored(switch.channel()),
                DecoderEvent::Rotary(_) => self.config.rotary,
            };
            if !shown {
                continue;
            }
            self.stats.events += 1;

            if let Some(timestamp) = record.timestamp {
                write!(out, "{timestamp:.6} ")?;
            }
            if self.show_hex {
                write!(out, "{:03X}#", record.id)?;
                for byte in frame.as_bytes() {
                    write!(out, "{byte:02X}")?;
                }
                write!(out, " ")?;
            }
            writeln!(out, "{event}")?;
        }
        Ok(())
    }
}
