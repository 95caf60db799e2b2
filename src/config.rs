// =============================================================================
// config.rs - Modul de Configurare
// =============================================================================
//
// Configurarea este OPTIONALA. Fara fisier, aplicatia foloseste valorile
// implicite (401/403 = esec, 200/302 = succes, prag 4, fereastra 5 minute,
// maxim 10000 IP-uri urmarite).
//
// Cautare fisier:
//   1. variabila de mediu BRUTEFORCE_CONFIG (fisierul TREBUIE sa existe)
//   2. `bruteforce.toml` in directorul curent (ignorat daca lipseste)
//
// CONCEPTE RUST EXPLICATE:
//
// 1. #[serde(default)]
//    Un camp lipsa din TOML primeste valoarea din `Default::default()`.
//    Pe struct, atributul se aplica tuturor campurilor: un fisier partial
//    (ex: doar `[report] top_n = 20`) este valid.
//
// 2. VALIDARE POST-DESERIALIZARE
//    serde verifica doar tipurile. AppConfig::validate() verifica logica
//    valorilor si raporteaza TOATE erorile dintr-o data.
//
// =============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Numele fisierului de configurare cautat in directorul curent.
pub const DEFAULT_CONFIG_FILE: &str = "bruteforce.toml";

/// Variabila de mediu care suprascrie calea fisierului de configurare.
pub const CONFIG_ENV_VAR: &str = "BRUTEFORCE_CONFIG";

/// Structura principala de configurare a aplicatiei.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub report: ReportConfig,
}

/// Pragurile motorului de detectie brute force.
///
/// NOTA RUST: Codurile de status raman `String` (nu u16) deoarece
/// evenimentele poarta status-ul exact cum apare in log ("401").
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Numarul de esecuri in fereastra care declanseaza o amenintare.
    pub brute_force_limit: usize,
    /// Fereastra glisanta, in minute.
    pub time_window_mins: u64,
    /// Numarul maxim de IP-uri cu fereastra activa pastrate in memorie.
    pub max_tracked_ips: usize,
    /// Coduri HTTP considerate autentificare esuata.
    pub failed_codes: Vec<String>,
    /// Coduri HTTP considerate autentificare reusita.
    pub success_codes: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            brute_force_limit: 4,
            time_window_mins: 5,
            max_tracked_ips: 10_000,
            failed_codes: vec!["401".to_string(), "403".to_string()],
            success_codes: vec!["200".to_string(), "302".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Fisierul JSON cu raportul complet.
    pub output_file: String,
    /// Cate amenintari apar in tabelul din consola.
    pub top_n: usize,
    /// Afiseaza fiecare linie respinsa de parser.
    pub debug: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_file: "threat_report.json".to_string(),
            top_n: 10,
            debug: false,
        }
    }
}

impl AppConfig {
    /// Incarca configurarea conform regulilor de cautare de mai sus.
    ///
    /// Returneaza si calea fisierului folosit (None = valori implicite),
    /// pentru afisare in banner.
    pub fn discover() -> Result<(Self, Option<PathBuf>)> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(explicit);
            let config = Self::load(&path)?;
            return Ok((config, Some(path)));
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            let config = Self::load(&local)?;
            return Ok((config, Some(local)));
        }

        tracing::debug!("Niciun fisier de configurare, folosim valorile implicite");
        Ok((Self::default(), None))
    }

    /// Incarca si parseaza un fisier de configurare TOML.
    ///
    /// NOTA RUST: `P: AsRef<Path>` accepta String, &str, PathBuf, &Path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Nu pot citi fisierul: {:?}", path.as_ref()))?;

        let config: AppConfig =
            toml::from_str(&content).context("Eroare la parsarea fisierului TOML")?;

        config.validate()?;

        Ok(config)
    }

    /// Valideaza constrangerile semantice ale configuratiei.
    ///
    /// Colectam TOATE erorile intr-un Vec<String> inainte de a esua.
    fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();
        let detection = &self.detection;

        // --- Detection ---

        if detection.brute_force_limit == 0 {
            errors.push(
                "detection.brute_force_limit = 0: orice esec ar deveni amenintare".to_string(),
            );
        }
        if detection.time_window_mins == 0 {
            errors.push(
                "detection.time_window_mins = 0: fereastra de timp zero face detectia imposibila"
                    .to_string(),
            );
        }
        if detection.max_tracked_ips == 0 {
            errors.push(
                "detection.max_tracked_ips = 0: niciun IP nu ar putea fi urmarit".to_string(),
            );
        }
        if detection.failed_codes.is_empty() {
            errors.push(
                "detection.failed_codes nu poate fi goala: adauga cel putin un cod (ex: \"401\")"
                    .to_string(),
            );
        }

        for code in detection.failed_codes.iter().chain(&detection.success_codes) {
            if !is_status_code(code) {
                errors.push(format!(
                    "cod de status invalid {:?}: trebuie exact 3 cifre",
                    code
                ));
            }
        }

        for code in &detection.failed_codes {
            if detection.success_codes.contains(code) {
                errors.push(format!(
                    "codul {:?} apare atat in failed_codes cat si in success_codes",
                    code
                ));
            }
        }

        // --- Report ---

        if self.report.output_file.trim().is_empty() {
            errors.push("report.output_file nu poate fi gol".to_string());
        }
        if self.report.top_n == 0 {
            errors.push("report.top_n = 0: tabelul din consola ar fi mereu gol".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            let listing = errors
                .iter()
                .enumerate()
                .map(|(i, e)| format!("  {}. {}", i + 1, e))
                .collect::<Vec<_>>()
                .join("\n");
            anyhow::bail!(
                "configuratia contine {} erori:\n{}",
                errors.len(),
                listing
            );
        }
    }
}

fn is_status_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_match_reference_constants() {
        let config = AppConfig::default();
        assert_eq!(config.detection.brute_force_limit, 4);
        assert_eq!(config.detection.time_window_mins, 5);
        assert_eq!(config.detection.max_tracked_ips, 10_000);
        assert_eq!(config.detection.failed_codes, vec!["401", "403"]);
        assert_eq!(config.detection.success_codes, vec!["200", "302"]);
        assert_eq!(config.report.output_file, "threat_report.json");
        assert_eq!(config.report.top_n, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[report]\ntop_n = 20\n");
        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.report.top_n, 20);
        assert_eq!(config.report.output_file, "threat_report.json");
        assert_eq!(config.detection.brute_force_limit, 4);
    }

    #[test]
    fn test_full_file_overrides() {
        let file = write_config(
            r#"
[detection]
brute_force_limit = 10
time_window_mins = 2
max_tracked_ips = 500
failed_codes = ["401"]
success_codes = ["200"]

[report]
output_file = "out.json"
top_n = 3
debug = true
"#,
        );
        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.detection.brute_force_limit, 10);
        assert_eq!(config.detection.time_window_mins, 2);
        assert_eq!(config.detection.max_tracked_ips, 500);
        assert_eq!(config.detection.failed_codes, vec!["401"]);
        assert!(config.report.debug);
        assert_eq!(config.report.output_file, "out.json");
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let file = write_config(
            r#"
[detection]
brute_force_limit = 0
time_window_mins = 0
failed_codes = ["401", "abc"]
success_codes = ["401"]
"#,
        );
        let err = AppConfig::load(file.path()).unwrap_err().to_string();

        assert!(err.contains("brute_force_limit"), "{}", err);
        assert!(err.contains("time_window_mins"), "{}", err);
        assert!(err.contains("\"abc\""), "{}", err);
        assert!(err.contains("atat in failed_codes"), "{}", err);
        assert!(err.contains("4 erori"), "{}", err);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let file = write_config("[detection\nbrute_force_limit = ");
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = AppConfig::load("/nonexistent/bruteforce.toml").unwrap_err();
        assert!(err.to_string().contains("Nu pot citi fisierul"));
    }
}
