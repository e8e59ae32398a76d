//! Track model produced by the IGC parser.

use chrono::{NaiveDate, NaiveTime};

use crate::spatial::haversine_km;

/// A parsed IGC flight recording.
///
/// Built once by the parser and immutable afterwards; consumers only read
/// header fields and geometry off it.
#[derive(Debug, Clone)]
pub struct Track {
    /// Recording date from the HFDTE header.
    pub date: NaiveDate,
    /// Pilot-in-charge from the HFPLT header, empty when absent.
    pub pilot: String,
    /// Glider type from the HFGTY header, empty when absent.
    pub glider_type: String,
    /// Glider registration from the HFGID header, empty when absent.
    pub glider_id: String,
    /// Three-letter manufacturer code from the A record, empty when absent.
    pub manufacturer: String,
    /// Declared task from C records, empty when the file declares none.
    pub task: Task,
    /// Position fixes from B records, in file order.
    pub fixes: Vec<Fix>,
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

/// A pre-declared task: the turnpoint chain the flight intended to fly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub takeoff: Option<Point>,
    pub start: Option<Point>,
    pub turnpoints: Vec<Point>,
    pub finish: Option<Point>,
    pub landing: Option<Point>,
}

impl Task {
    /// Total task length in kilometres.
    ///
    /// Sums the great-circle legs of the scoring chain start, turnpoints,
    /// finish. Takeoff and landing points do not count towards task length.
    /// A track without a declared task has length zero.
    pub fn distance(&self) -> f64 {
        let mut chain: Vec<Point> = Vec::with_capacity(self.turnpoints.len() + 2);
        if let Some(start) = self.start {
            chain.push(start);
        }
        chain.extend(self.turnpoints.iter().copied());
        if let Some(finish) = self.finish {
            chain.push(finish);
        }

        chain
            .windows(2)
            .map(|leg| haversine_km(leg[0].lat, leg[0].lon, leg[1].lat, leg[1].lon))
            .sum()
    }
}

/// A single B-record position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    /// UTC time of day of the fix.
    pub time: NaiveTime,
    pub lat: f64,
    pub lon: f64,
    /// True for a 3D fix ('A'), false for a 2D or invalid fix ('V').
    pub valid: bool,
    /// Pressure altitude in metres.
    pub pressure_alt: i32,
    /// GNSS altitude in metres.
    pub gnss_alt: i32,
}
