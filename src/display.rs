// =============================================================================
// display.rs - Interfata CLI cu Culori ANSI
// =============================================================================
//
// Acest modul gestioneaza iesirea vizuala catre terminal:
//   - Banner-ul de start (fisierul analizat si pragurile active)
//   - Log-uri de stare formatate cu culori si badge-uri
//   - Diagnostic de parsare in mod debug
//   - Sumarul rularii
//
// Tabelul final cu amenintari este in `report.rs`.
//
// NOTA RUST - CRATE-ul `colored`:
//   "text".red()              -> ColoredString (rosu)
//   " INFO ".on_green()       -> fundal verde (badge vizual)
//   "text".dimmed()           -> gri/atenuat
//
// =============================================================================

use crate::config::AppConfig;
use chrono::Local;
use colored::*;
use std::path::Path;

/// Latimea separatorului orizontal (in caractere).
const SEPARATOR_WIDTH: usize = 72;

/// Liniile respinse mai lungi de atat sunt trunchiate in diagnostic.
const MAX_LINE_PREVIEW: usize = 120;

/// Afiseaza banner-ul de start al aplicatiei.
pub fn print_banner(config: &AppConfig, log_file: &Path, config_file: Option<&Path>) {
    let inner_width = SEPARATOR_WIDTH - 2;
    let border = "═".repeat(inner_width);

    println!();
    println!("{}", format!("╔{}╗", border).bold().cyan());
    println!(
        "{}",
        format!(
            "║{:^width$}║",
            "BRUTEFORCE-RS  ::  ACCESS LOG ANALYZER  v0.1.0",
            width = inner_width
        )
        .bold()
        .cyan()
    );
    println!("{}", format!("╠{}╣", border).bold().cyan());

    let file_line = format!("  Log:    {}", log_file.display());
    println!(
        "{}",
        format!("║{:<width$}║", file_line, width = inner_width).cyan()
    );

    let config_label = match config_file {
        Some(path) => path.display().to_string(),
        None => "(implicit)".to_string(),
    };
    let config_line = format!("  Config: {}", config_label);
    println!(
        "{}",
        format!("║{:<width$}║", config_line, width = inner_width).cyan()
    );

    let detection = &config.detection;
    let thresh_line = format!(
        "  Prag:   >={} esecuri/{}min   Max IP-uri: {}",
        detection.brute_force_limit, detection.time_window_mins, detection.max_tracked_ips
    );
    println!(
        "{}",
        format!("║{:<width$}║", thresh_line, width = inner_width).cyan()
    );

    let codes_line = format!(
        "  Esec:   {:<16} Succes: {}",
        detection.failed_codes.join(","),
        detection.success_codes.join(",")
    );
    println!(
        "{}",
        format!("║{:<width$}║", codes_line, width = inner_width).cyan()
    );

    println!("{}", format!("╚{}╝", border).bold().cyan());
    println!();
}

/// Progresul normal al rularii, ex: "Threat report exported to threat_report.json".
pub fn log_info(message: &str) {
    println!("{}", badge_line(" INFO ".on_green().black().bold(), message.white()));
}

/// Situatii care nu opresc rularea, ex: fisier fara nicio linie valida.
pub fn log_warning(message: &str) {
    println!("{}", badge_line(" WARN ".on_yellow().black().bold(), message.yellow()));
}

/// Fisier de log lipsa, configurare invalida sau eroare neasteptata (stderr).
pub fn log_error(message: &str) {
    eprintln!("{}", badge_line(" ERR  ".on_red().white().bold(), message.red()));
}

/// `[timestamp] BADGE mesaj` - formatul comun al mesajelor de stare.
fn badge_line(badge: ColoredString, message: ColoredString) -> String {
    format!("{} {} {}", timestamp().bold().white(), badge, message)
}

/// Sumarul citirii si detectiei.
///
/// Format: [timestamp]  STAT  120 linii | 118 evenimente | 2 sarite | 3 amenintari
pub fn log_summary(lines_read: usize, events: usize, skipped: usize, threats: usize) {
    println!(
        "{} {} {} linii | {} evenimente | {} sarite | {} amenintari",
        timestamp().dimmed(),
        " STAT ".on_cyan().black().bold(),
        lines_read.to_string().white().bold(),
        events.to_string().white().bold(),
        skipped.to_string().white().bold(),
        threats.to_string().white().bold()
    );
}

/// Afiseaza detalii despre o linie respinsa de parser (mod debug).
pub fn log_debug_parse_fail(line: &str, parser_name: &str, expected: &str) {
    println!(
        "{} {} Parsare esuata! (parser: {})",
        timestamp().bold().white(),
        " FAIL ".on_red().white().bold(),
        parser_name.red().bold()
    );
    println!(
        "                      Primit:   \"{}\"",
        preview(line).yellow()
    );
    println!("                      Asteptat: \"{}\"", expected.dimmed());
}

/// Trunchiaza linia la MAX_LINE_PREVIEW caractere (nu bytes).
///
/// NOTA RUST: `&line[..120]` ar putea taia un caracter UTF-8 multi-byte
/// la jumatate si ar produce panic. `char_indices().nth()` gaseste o
/// granita valida.
fn preview(line: &str) -> String {
    match line.char_indices().nth(MAX_LINE_PREVIEW) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

fn timestamp() -> String {
    Local::now().format("[%Y-%m-%d %H:%M:%S]").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_line_contains_badge_and_message() {
        let line = badge_line(" WARN ".normal(), "No valid log entries found.".normal());

        // Timestamp-ul poate avea coduri ANSI; badge-ul si mesajul sunt simple.
        assert!(line.contains(" WARN "));
        assert!(line.ends_with("No valid log entries found."));
    }

    #[test]
    fn test_preview_short_line_unchanged() {
        assert_eq!(preview("abc"), "abc");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let line = "ă".repeat(MAX_LINE_PREVIEW + 5);
        let short = preview(&line);

        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), MAX_LINE_PREVIEW + 3);
    }
}
