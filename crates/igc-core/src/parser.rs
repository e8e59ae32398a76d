//! Parser for the IGC flight recorder file format.
//!
//! IGC files are line based and the leading letter of each line selects the
//! record layout: `A` names the recorder manufacturer, `H` lines carry flight
//! headers, `C` lines declare a task and `B` lines are position fixes. Record
//! types the track model has no use for (`G` signatures, `I`/`J` extension
//! tables, `L` log lines and the rest) are skipped.

use chrono::{NaiveDate, NaiveTime};

use crate::track::{Fix, Point, Task, Track};

/// Error raised while parsing an IGC document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A record line does not follow its declared layout.
    #[error("line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
    /// The file never carried an HFDTE date header.
    #[error("missing HFDTE date header")]
    MissingDate,
    /// The C declaration header and the C point lines disagree.
    #[error("task declares {expected} points but {found} were given")]
    TaskPointCount { expected: usize, found: usize },
}

/// Parse a complete IGC document.
pub fn parse(source: &str) -> Result<Track, ParseError> {
    let mut builder = TrackBuilder::default();
    for (index, line) in source.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        builder.record(index + 1, line)?;
    }
    builder.finish()
}

#[derive(Default)]
struct TrackBuilder {
    date: Option<NaiveDate>,
    pilot: String,
    glider_type: String,
    glider_id: String,
    manufacturer: String,
    declared_turnpoints: Option<usize>,
    task_points: Vec<Point>,
    fixes: Vec<Fix>,
}

impl TrackBuilder {
    fn record(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        match line.bytes().next() {
            Some(b'A') => self.a_record(line_no, line),
            Some(b'H') => self.h_record(line_no, line),
            Some(b'C') => self.c_record(line_no, line),
            Some(b'B') => self.b_record(line_no, line),
            _ => Ok(()),
        }
    }

    /// `A` + three-letter manufacturer code + recorder id.
    fn a_record(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        self.manufacturer = field(line, line_no, 1, 4, "manufacturer code")?.to_string();
        Ok(())
    }

    /// `H` + source letter + three-letter mnemonic + value.
    ///
    /// The value is whatever follows the first colon. Date headers written in
    /// the old colon-free form (`HFDTE250818`) fall back to the remainder of
    /// the line.
    fn h_record(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let mnemonic = field(line, line_no, 2, 5, "header mnemonic")?;
        let rest = field(line, line_no, 5, line.len(), "header value")?;
        let value = match rest.split_once(':') {
            Some((_, after_colon)) => after_colon.trim(),
            None => rest.trim(),
        };

        match mnemonic {
            "DTE" => self.date = Some(parse_date(value, line_no)?),
            "PLT" => self.pilot = value.to_string(),
            "GTY" => self.glider_type = value.to_string(),
            "GID" => self.glider_id = value.to_string(),
            _ => {}
        }
        Ok(())
    }

    /// C records: the first one is the task declaration header, every
    /// following one is a task point.
    ///
    /// The declaration runs `C` + declaration date (6) + declaration time (6)
    /// + flight date (6) + task number (4) + turnpoint count (2). The point
    /// lines then follow in order: takeoff, start, the declared turnpoints,
    /// finish, landing.
    fn c_record(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        if self.declared_turnpoints.is_none() {
            let count: u32 = num(line, line_no, 23, 25, "turnpoint count")?;
            self.declared_turnpoints = Some(count as usize);
            return Ok(());
        }

        let lat = parse_lat(field(line, line_no, 1, 9, "task point latitude")?, line_no)?;
        let lon = parse_lon(field(line, line_no, 9, 18, "task point longitude")?, line_no)?;
        self.task_points.push(Point { lat, lon });
        Ok(())
    }

    /// `B` + time (6) + latitude (8) + longitude (9) + validity (1) +
    /// pressure altitude (5) + GNSS altitude (5).
    fn b_record(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let time = parse_time(field(line, line_no, 1, 7, "fix time")?, line_no)?;
        let lat = parse_lat(field(line, line_no, 7, 15, "fix latitude")?, line_no)?;
        let lon = parse_lon(field(line, line_no, 15, 24, "fix longitude")?, line_no)?;
        let valid = match field(line, line_no, 24, 25, "fix validity")? {
            "A" => true,
            "V" => false,
            other => {
                return Err(ParseError::InvalidRecord {
                    line: line_no,
                    message: format!("fix validity must be A or V, got {other:?}"),
                })
            }
        };
        let pressure_alt: i32 = num(line, line_no, 25, 30, "pressure altitude")?;
        let gnss_alt: i32 = num(line, line_no, 30, 35, "GNSS altitude")?;

        self.fixes.push(Fix {
            time,
            lat,
            lon,
            valid,
            pressure_alt,
            gnss_alt,
        });
        Ok(())
    }

    fn finish(self) -> Result<Track, ParseError> {
        let date = self.date.ok_or(ParseError::MissingDate)?;
        let task = match self.declared_turnpoints {
            None => Task::default(),
            Some(count) => assemble_task(count, self.task_points)?,
        };

        Ok(Track {
            date,
            pilot: self.pilot,
            glider_type: self.glider_type,
            glider_id: self.glider_id,
            manufacturer: self.manufacturer,
            task,
            fixes: self.fixes,
        })
    }
}

/// Split the flat C point list into named task roles.
///
/// A declaration of `n` turnpoints must come with exactly `n + 4` points:
/// takeoff and start ahead of the turnpoints, finish and landing after.
fn assemble_task(turnpoints: usize, points: Vec<Point>) -> Result<Task, ParseError> {
    let expected = turnpoints + 4;
    if points.len() != expected {
        return Err(ParseError::TaskPointCount {
            expected,
            found: points.len(),
        });
    }

    let mut points = points.into_iter();
    Ok(Task {
        takeoff: points.next(),
        start: points.next(),
        turnpoints: points.by_ref().take(turnpoints).collect(),
        finish: points.next(),
        landing: points.next(),
    })
}

/// Fixed-width field access. IGC records are ASCII, so a line too short for
/// the field or one with a multi-byte character across the boundary is
/// invalid.
fn field<'a>(
    line: &'a str,
    line_no: usize,
    from: usize,
    to: usize,
    what: &str,
) -> Result<&'a str, ParseError> {
    line.get(from..to).ok_or_else(|| ParseError::InvalidRecord {
        line: line_no,
        message: format!("record too short for {what}"),
    })
}

/// Parse a fixed-width run of digits.
fn num<T: std::str::FromStr>(
    s: &str,
    line_no: usize,
    from: usize,
    to: usize,
    what: &str,
) -> Result<T, ParseError> {
    let digits = field(s, line_no, from, to, what)?;
    digits.parse().map_err(|_| ParseError::InvalidRecord {
        line: line_no,
        message: format!("{what} is not a number: {digits:?}"),
    })
}

/// `DDMMYY`, with an optional `,NN` flight-number suffix on newer recorders.
fn parse_date(value: &str, line_no: usize) -> Result<NaiveDate, ParseError> {
    let digits = match value.split_once(',') {
        Some((before_comma, _)) => before_comma,
        None => value,
    };
    let day: u32 = num(digits, line_no, 0, 2, "day")?;
    let month: u32 = num(digits, line_no, 2, 4, "month")?;
    let year: u32 = num(digits, line_no, 4, 6, "year")?;

    // Two-digit years pivot at 70, the usual GPS-era window.
    let year = if year < 70 { 2000 + year } else { 1900 + year };

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| ParseError::InvalidRecord {
        line: line_no,
        message: format!("invalid date {digits:?}"),
    })
}

/// `HHMMSS` UTC.
fn parse_time(s: &str, line_no: usize) -> Result<NaiveTime, ParseError> {
    let hour: u32 = num(s, line_no, 0, 2, "hour")?;
    let minute: u32 = num(s, line_no, 2, 4, "minute")?;
    let second: u32 = num(s, line_no, 4, 6, "second")?;
    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| ParseError::InvalidRecord {
        line: line_no,
        message: format!("invalid time {s:?}"),
    })
}

/// `DDMMmmmN`: degrees, minutes, thousandths of minutes, hemisphere.
fn parse_lat(s: &str, line_no: usize) -> Result<f64, ParseError> {
    let degrees: u32 = num(s, line_no, 0, 2, "latitude degrees")?;
    let minute_thousandths: u32 = num(s, line_no, 2, 7, "latitude minutes")?;
    let value = f64::from(degrees) + f64::from(minute_thousandths) / 60_000.0;
    match field(s, line_no, 7, 8, "latitude hemisphere")? {
        "N" => Ok(value),
        "S" => Ok(-value),
        other => Err(ParseError::InvalidRecord {
            line: line_no,
            message: format!("latitude hemisphere must be N or S, got {other:?}"),
        }),
    }
}

/// `DDDMMmmmE`: degrees, minutes, thousandths of minutes, hemisphere.
fn parse_lon(s: &str, line_no: usize) -> Result<f64, ParseError> {
    let degrees: u32 = num(s, line_no, 0, 3, "longitude degrees")?;
    let minute_thousandths: u32 = num(s, line_no, 3, 8, "longitude minutes")?;
    let value = f64::from(degrees) + f64::from(minute_thousandths) / 60_000.0;
    match field(s, line_no, 8, 9, "longitude hemisphere")? {
        "E" => Ok(value),
        "W" => Ok(-value),
        other => Err(ParseError::InvalidRecord {
            line: line_no,
            message: format!("longitude hemisphere must be E or W, got {other:?}"),
        }),
    }
}
