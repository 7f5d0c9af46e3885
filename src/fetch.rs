use std::io::{self, BufRead};

use nmea::{Nmea, SentenceType};

use crate::position::Position;

/// Read NMEA sentences and collect position fixes, at most one per
/// `interval_secs` of fix time.
///
/// Only GGA, RMC and GLL sentences are sampled; satellite sentences (GSA,
/// GSV) leave the merged position untouched and are skipped. Lines that fail
/// to parse are logged and skipped. Sentences without a fix time are sampled every time they carry a position. A fix time earlier than
/// the last sample (midnight rollover) always starts a new sample.
pub fn collect_fixes<R: BufRead>(reader: R, interval_secs: u64) -> io::Result<Vec<Position>> {
    let mut nmea = Nmea::default();
    let mut fixes = Vec::new();
    let mut last_sample = None;

    for line in reader.lines() {
        let content = line?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            continue;
        }

        match nmea.parse(trimmed) {
            Ok(SentenceType::GGA | SentenceType::RMC | SentenceType::GLL) => {}
            Ok(_) => continue,
            Err(e) => {
                log::warn!("Skipping '{}': {}", trimmed, e);
                continue;
            }
        }

        let (Some(lat), Some(lon)) = (nmea.latitude, nmea.longitude) else {
            continue;
        };

        match nmea.fix_time {
            Some(fix_time) => {
                let due = match last_sample {
                    None => true,
                    Some(previous) => {
                        let elapsed = fix_time.signed_duration_since(previous).num_seconds();
                        elapsed < 0 || elapsed as u64 >= interval_secs
                    }
                };
                if !due {
                    continue;
                }
                last_sample = Some(fix_time);
                log::debug!("Fix at {}", fix_time.format("%H:%M:%S"));
            }
            None => log::debug!("Fix without time"),
        }

        let position = Position::new(lat, lon);
        log::info!("Sampled {}", position);
        fixes.push(position);
    }

    Ok(fixes)
}
