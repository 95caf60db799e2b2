// =============================================================================
// main.rs - Punct de Intrare bruteforce-rs
// =============================================================================
//
// Acest fisier orchestreaza toate componentele:
//   1. Verifica argumentele (exact un fisier de log)
//   2. Incarca configurarea optionala (bruteforce.toml)
//   3. Citeste si parseaza fisierul de log
//   4. Ruleaza detectia brute force pe tot lotul de evenimente
//   5. Afiseaza top amenintari si scrie threat_report.json
//
// Erorile NU opresc procesul cu panic:
//   - fisier lipsa        -> mesaj de eroare, exit 0, fara raport
//   - orice alta eroare   -> "Unexpected error: ...", exit 0, fara raport
//   - argumente gresite   -> usage pe stdout, exit 1
//   - configurare invalida-> mesaj de eroare, exit 1
//
// NOTA RUST: `main() -> ExitCode` permite controlul exact al codului de
// iesire fara `std::process::exit()`, care ar sari peste destructori (Drop).
//
// =============================================================================

mod config;
mod detector;
mod display;
mod parser;
mod report;

use config::AppConfig;
use detector::Detector;
use parser::access::AccessLogParser;
use parser::{LogParser, ParseOutcome};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    // =========================================================================
    // 1. INITIALIZARE TRACING (debug logging)
    // =========================================================================
    //
    // Tracing este pentru logging INTERN. Output-ul catre utilizator este
    // gestionat de modulele `display` si `report`.
    //
    //   RUST_LOG=bruteforce_rs=debug  -> declansaje, breach-uri, evictii
    //   (fara RUST_LOG)               -> doar warn + error
    //
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bruteforce_rs=warn")),
        )
        .with_target(false)
        .init();

    // =========================================================================
    // 2. ARGUMENTE
    // =========================================================================
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        let program = args.first().map(String::as_str).unwrap_or("bruteforce-rs");
        println!("{}", usage(program));
        return ExitCode::FAILURE;
    }
    let log_file = PathBuf::from(&args[1]);

    // =========================================================================
    // 3. CONFIGURARE
    // =========================================================================
    let (config, config_file) = match AppConfig::discover() {
        Ok(found) => found,
        Err(e) => {
            // `{:#}` afiseaza tot lantul de context anyhow pe o linie.
            display::log_error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };

    display::print_banner(&config, &log_file, config_file.as_deref());

    // =========================================================================
    // 4. CITIRE + DETECTIE + RAPORT
    // =========================================================================
    let outcome = match read_log(&log_file, &config) {
        Ok(outcome) => outcome,
        Err(e) => {
            display::log_error(&describe_read_failure(&log_file, &e));
            return ExitCode::SUCCESS;
        }
    };

    if let Err(e) = analyze(outcome, &config) {
        display::log_error(&format!("Unexpected error: {:#}", e));
    }

    ExitCode::SUCCESS
}

fn usage(program: &str) -> String {
    format!("Usage: {} <log_file>", program)
}

/// Citeste fisierul de log. In mod debug, fiecare linie respinsa este afisata.
fn read_log(log_file: &Path, config: &AppConfig) -> anyhow::Result<ParseOutcome> {
    let parser = AccessLogParser::new()?;
    let debug = config.report.debug;

    parser::read_events(log_file, &parser, |line| {
        if debug {
            display::log_debug_parse_fail(line, parser.name(), parser.expected_format());
        }
    })
}

/// Ruleaza detectia si produce raportul.
///
/// Raportul JSON se scrie DOAR dupa o detectie completa; la orice eroare
/// anterioara nu exista raport partial.
fn analyze(outcome: ParseOutcome, config: &AppConfig) -> anyhow::Result<()> {
    let ParseOutcome {
        events,
        lines_read,
        skipped,
    } = outcome;

    if events.is_empty() {
        display::log_warning("No valid log entries found.");
        return Ok(());
    }

    let parsed = events.len();
    let detector = Detector::new(config.detection.clone());
    let threats = detector.detect(events);

    display::log_summary(lines_read, parsed, skipped, threats.len());
    report::print_console(&threats, config.report.top_n);

    let output = Path::new(&config.report.output_file);
    report::export_json(&threats, output)?;
    display::log_info(&format!("Threat report exported to {}", output.display()));

    Ok(())
}

/// Mesajul pentru o citire esuata: fisier lipsa vs. orice alta eroare.
///
/// NOTA RUST: `err.chain()` parcurge eroarea si toate cauzele ei.
/// `downcast_ref::<io::Error>()` recupereaza eroarea I/O originala chiar
/// daca a fost invelita cu `.with_context()`.
fn describe_read_failure(log_file: &Path, err: &anyhow::Error) -> String {
    let not_found = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == std::io::ErrorKind::NotFound);

    if not_found {
        format!("File '{}' not found.", log_file.display())
    } else {
        format!("Unexpected error: {:#}", err)
    }
}
