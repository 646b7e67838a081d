use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

/// Wall-clock format of the `fechaini`/`fechafin` URL segments.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SUTC";

/// Anything whose wall clock can be sent as a request boundary.
///
/// Aware values keep their own wall clock: the offset is dropped, not applied.
/// Strings are tried as RFC 3339, then `%Y-%m-%d %H:%M:%S`, then `%Y-%m-%d`.
pub trait AnyDateTime {
    fn get_wall_clock(self) -> Option<NaiveDateTime>;

    /// Renders the wall clock as `YYYY-MM-DDTHH:MM:SSUTC`.
    ///
    /// Returns `None` when the value cannot be resolved or its year does not fit
    /// in four digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use aemet::AnyDateTime;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    /// assert_eq!(start.to_wire_format().as_deref(), Some("2023-01-01T00:00:00UTC"));
    /// assert_eq!("not a date".to_wire_format(), None);
    /// ```
    fn to_wire_format(self) -> Option<String>
    where
        Self: Sized,
    {
        let dt = self.get_wall_clock()?;
        if !(0..=9999).contains(&dt.year()) {
            return None;
        }
        Some(dt.format(WIRE_FORMAT).to_string())
    }
}

impl AnyDateTime for NaiveDateTime {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        Some(self)
    }
}

impl AnyDateTime for NaiveDate {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        self.and_hms_opt(0, 0, 0)
    }
}

impl AnyDateTime for DateTime<Utc> {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        Some(self.naive_utc())
    }
}

impl AnyDateTime for DateTime<FixedOffset> {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        Some(self.naive_local())
    }
}

impl AnyDateTime for DateTime<Local> {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        Some(self.naive_local())
    }
}

impl AnyDateTime for DateTime<chrono_tz::Tz> {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        Some(self.naive_local())
    }
}

impl AnyDateTime for &str {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(self) {
            return dt.get_wall_clock();
        }
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(self, "%Y-%m-%d %H:%M:%S") {
            return naive_dt.get_wall_clock();
        }
        if let Ok(naive_date) = NaiveDate::parse_from_str(self, "%Y-%m-%d") {
            return naive_date.get_wall_clock();
        }
        None
    }
}

impl AnyDateTime for String {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        self.as_str().get_wall_clock()
    }
}

impl AnyDateTime for &String {
    fn get_wall_clock(self) -> Option<NaiveDateTime> {
        self.as_str().get_wall_clock()
    }
}
