// =============================================================================
// report.rs - Raportul Final: Tabel in Consola si Export JSON
// =============================================================================
//
// Doua iesiri pentru acelasi ThreatMap:
//   1. Consola: top N amenintari dupa peak_count (descrescator), fiecare
//      rand marcat [COMPROMISED] sau [BLOCKED].
//   2. Fisier JSON: TOATE amenintarile, indentare 4 spatii.
//
// NOTA RUST - serde_json::ser::PrettyFormatter:
// `serde_json::to_string_pretty` foloseste 2 spatii. Pentru 4 spatii
// construim explicit un Serializer cu `PrettyFormatter::with_indent(b"    ")`.
//
// =============================================================================

use crate::detector::{ThreatMap, ThreatRecord, ThreatStatus};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::path::Path;

const HEADER_WIDTH: usize = 55;
const HEADER_TITLE: &str = "CONFIRMED BRUTE FORCE THREATS (ROBUST ENGINE)";
const NO_THREATS: &str = "No suspicious activity detected.";

/// Primele `n` amenintari dupa peak_count, descrescator.
///
/// Sortarea este stabila: la egalitate ramane ordinea din BTreeMap (dupa IP),
/// nu ordinea in care amenintarile au fost declansate.
pub fn top_threats(threats: &ThreatMap, n: usize) -> Vec<(&String, &ThreatRecord)> {
    let mut ranked: Vec<_> = threats.iter().collect();
    ranked.sort_by(|a, b| b.1.peak_count.cmp(&a.1.peak_count));
    ranked.truncate(n);
    ranked
}

/// Un rand din tabel, fara culori: `[BLOCKED] 10.0.0.5        | Peak Failures: 4`.
pub fn format_row(ip: &str, record: &ThreatRecord) -> String {
    format!(
        "{} {:<15} | Peak Failures: {}",
        record.status(),
        ip,
        record.peak_count
    )
}

/// Afiseaza tabelul cu amenintari in consola.
pub fn print_console(threats: &ThreatMap, top_n: usize) {
    let rule = "=".repeat(HEADER_WIDTH);
    println!();
    println!("{}", rule);
    println!("{}", HEADER_TITLE.bold());
    println!("{}", rule);

    if threats.is_empty() {
        println!("{}", NO_THREATS.green());
        return;
    }

    for (ip, record) in top_threats(threats, top_n) {
        let row = format_row(ip, record);
        match record.status() {
            ThreatStatus::Compromised => println!("{}", row.red().bold()),
            ThreatStatus::Blocked => println!("{}", row.yellow()),
        }
    }
}

/// Serializeaza amenintarile in JSON cu indentare de 4 spatii.
pub fn to_json(threats: &ThreatMap) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    threats
        .serialize(&mut serializer)
        .context("Eroare la serializarea raportului JSON")?;

    // serde_json produce doar UTF-8 valid.
    String::from_utf8(buf).context("Raportul JSON nu este UTF-8 valid")
}

/// Scrie raportul complet in fisierul `path`.
pub fn export_json(threats: &ThreatMap, path: &Path) -> Result<()> {
    let json = to_json(threats)?;
    std::fs::write(path, json)
        .with_context(|| format!("Nu pot scrie raportul in {:?}", path))?;
    Ok(())
}
