// =============================================================================
// detector.rs - Motor de Detectie Brute Force
// =============================================================================
//
// Acest modul implementeaza logica centrala a detectorului:
//   1. Sorteaza evenimentele dupa timp (stabil) - obligatoriu
//   2. Mentine per IP o fereastra glisanta (FIFO) cu timestamp-urile esecurilor
//   3. Declanseaza o amenintare cand fereastra atinge pragul brute force
//   4. Marcheaza amenintarea ca "breached" la un login reusit ulterior
//   5. Limiteaza numarul de IP-uri urmarite (evictia celui mai vechi last_seen)
//
// CONCEPTE RUST EXPLICATE:
//
// 1. STARE LOCALA per APEL
//    Ferestrele, last_seen si amenintarile traiesc intr-un `DetectionState`
//    creat la inceputul lui `detect()` si distrus la return. Nu exista
//    stare globala sau partajata: `Detector` contine doar configurarea,
//    deci `detect(&self, ...)` poate fi apelat de oricate ori.
//
// 2. VecDeque (coada cu doua capete)
//    `push_back` adauga la coada, `pop_front` scoate din fata in O(1).
//    Perfect pentru o fereastra glisanta oldest-first.
//
// 3. BTreeMap vs HashMap
//    Rezultatul este un BTreeMap (ordonat dupa IP) pentru un raport JSON
//    determinist. Starea interna foloseste HashMap (acces O(1)).
//
// =============================================================================

use crate::config::DetectionConfig;
use crate::parser::LogEvent;
use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

// =============================================================================
// Structuri de date
// =============================================================================

/// Amenintarile confirmate, indexate dupa IP.
pub type ThreatMap = BTreeMap<String, ThreatRecord>;

/// O amenintare brute force confirmata.
///
/// NOTA RUST: `DateTime<FixedOffset>` se serializeaza (feature "serde" din
/// chrono) ca string RFC 3339, ex: "2026-02-21T11:23:00+05:30".
/// Numele campurilor sunt exact cheile din threat_report.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatRecord {
    /// Momentul primului declansaj. Nu se schimba la re-declansari.
    pub first_detected: DateTime<FixedOffset>,
    /// Dimensiunea maxima a ferestrei observata de la declansaj incoace.
    pub peak_count: usize,
    /// Un login reusit a urmat dupa declansaj.
    pub breached: bool,
}

impl ThreatRecord {
    pub fn status(&self) -> ThreatStatus {
        if self.breached {
            ThreatStatus::Compromised
        } else {
            ThreatStatus::Blocked
        }
    }
}

/// Severitatea unei amenintari.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatStatus {
    /// Atacul brute force a fost urmat de un login reusit.
    Compromised,
    /// Doar esecuri: atacul nu a reusit (inca).
    Blocked,
}

impl std::fmt::Display for ThreatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatStatus::Compromised => write!(f, "[COMPROMISED]"),
            ThreatStatus::Blocked => write!(f, "[BLOCKED]"),
        }
    }
}

/// Starea unei singure rulari de detectie.
#[derive(Debug, Default)]
struct DetectionState {
    /// Fereastra de esecuri per IP, oldest-first.
    windows: HashMap<String, VecDeque<DateTime<FixedOffset>>>,
    /// Ultimul eveniment vazut per IP (orice status). Alege victima evictiei.
    last_seen: HashMap<String, DateTime<FixedOffset>>,
    threats: ThreatMap,
    evictions: usize,
}

impl DetectionState {
    /// Elimina IP-ul cu cel mai vechi last_seen (fereastra + last_seen).
    ///
    /// La egalitate de timp castiga IP-ul cel mai mic lexicografic, ca
    /// rezultatul sa nu depinda de ordinea de iterare a HashMap-ului.
    ///
    /// Complexitate O(n) - evictia apare doar peste limita.
    fn evict_stalest(&mut self) -> Option<String> {
        let victim = self
            .last_seen
            .iter()
            .min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(ip, _)| ip.clone())?;

        self.windows.remove(&victim);
        self.last_seen.remove(&victim);
        self.evictions += 1;
        Some(victim)
    }
}

// =============================================================================
// Detector - Motorul de detectie
// =============================================================================

pub struct Detector {
    config: DetectionConfig,
    failed_codes: HashSet<String>,
    success_codes: HashSet<String>,
    time_window: TimeDelta,
}

impl Detector {
    pub fn new(config: DetectionConfig) -> Self {
        let failed_codes = config.failed_codes.iter().cloned().collect();
        let success_codes = config.success_codes.iter().cloned().collect();
        // Valori uriase din config sunt plafonate in loc sa produca panic.
        let time_window = i64::try_from(config.time_window_mins)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .unwrap_or(TimeDelta::MAX);

        Self {
            config,
            failed_codes,
            success_codes,
            time_window,
        }
    }

    /// Ruleaza detectia pe un lot complet de evenimente.
    ///
    /// Evenimentele pot veni in orice ordine; sunt sortate STABIL dupa timp
    /// inainte de procesare. Ferestrele si evictia presupun timp monoton.
    pub fn detect(&self, events: Vec<LogEvent>) -> ThreatMap {
        let total = events.len();
        let state = self.run(events);
        tracing::debug!(
            events = total,
            evictions = state.evictions,
            threats = state.threats.len(),
            "Detectie terminata"
        );
        state.threats
    }

    fn run(&self, mut events: Vec<LogEvent>) -> DetectionState {
        // `sort_by_key` pe slice este stabil: evenimentele cu acelasi timestamp
        // raman in ordinea din fisier.
        events.sort_by_key(|event| event.time);

        let mut state = DetectionState::default();
        for event in &events {
            self.process_event(&mut state, event);
        }
        state
    }

    fn process_event(&self, state: &mut DetectionState, event: &LogEvent) {
        let ip = event.ip.as_str();

        // --- 1. last_seen se actualizeaza neconditionat ---
        state.last_seen.insert(ip.to_string(), event.time);

        // --- 2. Limita globala de IP-uri urmarite ---
        //
        // Verificarea este `>` (strict) si ruleaza INAINTE de inserarea
        // esecului curent, deci pot exista temporar max_tracked_ips + 1
        // ferestre. O singura victima per eveniment.
        if state.windows.len() > self.config.max_tracked_ips {
            if let Some(victim) = state.evict_stalest() {
                tracing::debug!(ip = %victim, tracked = state.windows.len(), "Evictie IP (limita atinsa)");
            }
        }

        // --- 3. Login reusit: breach + reset fereastra ---
        if self.success_codes.contains(&event.status) {
            if let Some(threat) = state.threats.get_mut(ip) {
                if !threat.breached {
                    tracing::debug!(ip, time = %event.time, "Breach dupa brute force");
                }
                threat.breached = true;
            }
            state.windows.remove(ip);
            return;
        }

        // --- 4. Esec: fereastra glisanta + declansaj ---
        if !self.failed_codes.contains(&event.status) {
            return;
        }

        let window = state.windows.entry(ip.to_string()).or_default();
        window.push_back(event.time);

        // Scoatem din fata timestamp-urile STRICT mai vechi decat cutoff.
        // Un timestamp exact pe cutoff ramane in fereastra.
        if let Some(cutoff) = event.time.checked_sub_signed(self.time_window) {
            while window.front().is_some_and(|oldest| *oldest < cutoff) {
                window.pop_front();
            }
        }

        let count = window.len();
        if count >= self.config.brute_force_limit {
            let threat = state.threats.entry(ip.to_string()).or_insert_with(|| {
                tracing::debug!(ip, time = %event.time, count, "Brute force detectat");
                ThreatRecord {
                    first_detected: event.time,
                    peak_count: 0,
                    breached: false,
                }
            });
            threat.peak_count = threat.peak_count.max(count);
        }
    }
}
