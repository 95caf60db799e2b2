// =============================================================================
// parser/mod.rs - Modul de Parsing: Trait si Citirea Fisierului de Log
// =============================================================================
//
// CONCEPTE RUST EXPLICATE:
//
// 1. TRAITS (Trasaturi)
//    Un trait defineste un CONTRACT - un set de metode pe care un tip trebuie
//    sa le implementeze:
//
//    trait LogParser {
//        fn parse(&self, line: &str) -> Option<LogEvent>;
//    }
//
// 2. GENERICS cu TRAIT BOUNDS (static dispatch)
//    `read_events<P: LogParser + ?Sized>` accepta orice parser, inclusiv
//    un `dyn LogParser` (`?Sized` relaxeaza cerinta de dimensiune cunoscuta).
//
// 3. BufRead::lines()
//    Citeste fisierul linie cu linie fara a-l incarca intr-un singur String.
//    Fiecare linie este un `io::Result<String>`: UTF-8 invalid = eroare.
//
// =============================================================================

pub mod access;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Eveniment de acces extras dintr-o linie de log.
///
/// NOTA RUST: `ip` ramane `String` (nu `IpAddr`) deoarece formatul accepta
/// orice token fara spatii in prima coloana (ex: hostname-uri sau "-").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub ip: String,
    /// Momentul cererii, cu fusul orar din log.
    pub time: DateTime<FixedOffset>,
    /// Codul HTTP exact cum apare in linie ("401", "200", ...).
    pub status: String,
}

/// Contractul pe care orice parser de linii il respecta.
pub trait LogParser: Send + Sync {
    /// Parseaza o linie de log. `None` = linia nu respecta formatul.
    fn parse(&self, line: &str) -> Option<LogEvent>;

    /// Numele uman al parser-ului (pentru afisare).
    fn name(&self) -> &str;

    /// Un exemplu de linie valida (pentru diagnostic in mod debug).
    fn expected_format(&self) -> &str;
}

/// Rezultatul citirii unui fisier: evenimentele valide plus statistici agregate.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub events: Vec<LogEvent>,
    pub lines_read: usize,
    pub skipped: usize,
}

/// Citeste un fisier de log si aplica parser-ul pe fiecare linie.
///
/// Liniile care nu pot fi parsate sunt sarite in tacere si doar numarate.
/// `on_skip` este apelat pentru fiecare linie respinsa (folosit de modul
/// debug din main pentru diagnostic).
///
/// Erorile de I/O (fisier lipsa, UTF-8 invalid) sunt propagate cu context;
/// `io::Error`-ul original ramane in lantul anyhow.
pub fn read_events<P, F>(path: &Path, parser: &P, mut on_skip: F) -> Result<ParseOutcome>
where
    P: LogParser + ?Sized,
    F: FnMut(&str),
{
    let file =
        File::open(path).with_context(|| format!("Nu pot deschide fisierul: {:?}", path))?;
    let reader = BufReader::new(file);
    let mut outcome = ParseOutcome::default();

    for (index, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("Eroare la citirea liniei {} din {:?}", index + 1, path))?;
        outcome.lines_read += 1;

        match parser.parse(line.trim()) {
            Some(event) => outcome.events.push(event),
            None => {
                outcome.skipped += 1;
                on_skip(&line);
            }
        }
    }

    tracing::debug!(
        lines = outcome.lines_read,
        events = outcome.events.len(),
        skipped = outcome.skipped,
        "Fisier parsat"
    );

    Ok(outcome)
}
