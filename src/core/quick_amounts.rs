use crate::utils::error::Result;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_VALUES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedAmount {
    pub amount: Decimal,
    pub frequency: u32,
    pub last_played: NaiveDateTime,
}

/// 記錄最常下注的金額，提供操作員快速選擇
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickAmounts {
    max_values: usize,
    played: Vec<PlayedAmount>,
}

impl Default for QuickAmounts {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VALUES)
    }
}

impl QuickAmounts {
    pub fn new(max_values: usize) -> Self {
        Self {
            max_values,
            played: Vec::new(),
        }
    }

    /// Loads saved amounts, starting empty when the file does not exist yet.
    pub fn load<P: AsRef<Path>>(path: P, max_values: usize) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new(max_values));
        }

        let content = fs::read_to_string(path)?;
        let mut amounts: QuickAmounts = serde_json::from_str(&content)?;
        amounts.max_values = max_values;
        Ok(amounts)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn record(&mut self, amount: Decimal, at: NaiveDateTime) {
        match self.played.iter_mut().find(|played| played.amount == amount) {
            Some(played) => {
                played.frequency += 1;
                played.last_played = at;
            }
            None => self.played.push(PlayedAmount {
                amount,
                frequency: 1,
                last_played: at,
            }),
        }
    }

    pub fn record_all<I: IntoIterator<Item = Decimal>>(&mut self, amounts: I, at: NaiveDateTime) {
        for amount in amounts {
            self.record(amount, at);
        }
    }

    pub fn top(&self) -> Vec<Decimal> {
        let mut ranked: Vec<&PlayedAmount> = self.played.iter().collect();
        ranked.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| b.last_played.cmp(&a.last_played))
        });
        ranked
            .into_iter()
            .take(self.max_values)
            .map(|played| played.amount)
            .collect()
    }

    pub fn clear(&mut self) {
        self.played.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.played.is_empty()
    }
}
