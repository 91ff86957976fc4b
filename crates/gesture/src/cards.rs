//! Which interest cards are currently on screen.

use std::collections::{BTreeMap, BTreeSet};

use crate::surface::KioskDisplay;

/// Open interest cards, keyed by feature then sequence number.
///
/// Exclusivity rule: under one feature key at most one sequence is open;
/// opening a new sequence closes the others. Re-opening the pair that is
/// already (and exclusively) open is a complete no-op, so repeated
/// proximity hits do not flicker the card.
#[derive(Debug, Default)]
pub struct OpenCardSet {
    open: BTreeMap<String, BTreeSet<u32>>,
}

impl OpenCardSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, key: &str, sequence: u32) -> bool {
        self.open
            .get(key)
            .map_or(false, |seqs| seqs.contains(&sequence))
    }

    pub fn any_open(&self) -> bool {
        self.open.values().any(|seqs| !seqs.is_empty())
    }

    pub fn open(&mut self, key: &str, sequence: u32, display: &mut impl KioskDisplay) {
        if let Some(seqs) = self.open.get(key) {
            if seqs.len() == 1 && seqs.contains(&sequence) {
                return;
            }
        }
        let seqs = self.open.entry(key.to_string()).or_default();
        for &other in seqs.iter().filter(|&&s| s != sequence) {
            display.hide_card(key, other);
        }
        seqs.retain(|&s| s == sequence);
        if seqs.insert(sequence) {
            display.show_card(key, sequence);
        }
    }

    pub fn close_key(&mut self, key: &str, display: &mut impl KioskDisplay) {
        if let Some(seqs) = self.open.remove(key) {
            for sequence in seqs {
                display.hide_card(key, sequence);
            }
        }
    }

    pub fn close_all(&mut self, display: &mut impl KioskDisplay) {
        let open = std::mem::take(&mut self.open);
        for (key, seqs) in open {
            for sequence in seqs {
                display.hide_card(&key, sequence);
            }
        }
    }
}
