// =============================================================================
// parser/access.rs - Parser pentru Access Log-uri de Server Web
// =============================================================================
//
// FORMAT (exemplu real):
//   10.0.0.5 - [21/Feb/2026:11:23:00 +0530] "POST /login.php HTTP/1.1" 401
//
// Campuri extrase:
//   - IP:        primul token fara spatii de la inceputul liniei
//   - Timestamp: continutul primei perechi de paranteze drepte
//   - Status:    primul cod de 3 cifre dupa o ghilimea (sfarsitul cererii)
//
// Potrivirea intre timestamp si status este non-greedy (`.*?`), deci
// cererea dintre ghilimele nu trebuie sa fie bine formata.
//
// =============================================================================

use super::{LogEvent, LogParser};
use chrono::DateTime;
use regex::Regex;

/// Formatul exact al timestamp-ului din paranteze (ex: 21/Feb/2026:11:23:00 +0530).
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

const LOG_PATTERN: &str =
    r#"^(?P<ip>\S+).*?\[(?P<timestamp>[^\]]+)\].*?"\s*(?P<status>\d{3})"#;

/// Parser pentru linii de access log in stil Apache/Nginx.
///
/// NOTA RUST: Struct-ul detine (owns) regex-ul compilat. `Regex` este
/// Send + Sync, deci AccessLogParser respecta automat cerintele trait-ului.
pub struct AccessLogParser {
    pattern: Regex,
}

impl AccessLogParser {
    /// Construieste parser-ul cu regex-ul pre-compilat.
    pub fn new() -> anyhow::Result<Self> {
        let pattern = Regex::new(LOG_PATTERN)?;
        Ok(Self { pattern })
    }
}

impl LogParser for AccessLogParser {
    /// Extrage (ip, timestamp, status) dintr-o linie.
    ///
    /// NOTA RUST: `?` pe Option propaga None-ul. `.ok()?` converteste un
    /// Result de parsare in Option, astfel incat un timestamp invalid
    /// inseamna doar "linie sarita", nu eroare.
    fn parse(&self, line: &str) -> Option<LogEvent> {
        let caps = self.pattern.captures(line)?;

        let ip = caps.name("ip")?.as_str().to_string();
        let time = DateTime::parse_from_str(caps.name("timestamp")?.as_str(), TIMESTAMP_FORMAT)
            .ok()?;
        let status = caps.name("status")?.as_str().to_string();

        Some(LogEvent { ip, time, status })
    }

    fn name(&self) -> &str {
        "Web Access Log"
    }

    fn expected_format(&self) -> &str {
        r#"10.0.0.5 - [21/Feb/2026:11:23:00 +0530] "POST /login.php HTTP/1.1" 401"#
    }
}
