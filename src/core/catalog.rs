use crate::domain::model::LineItem;
use crate::utils::error::{KioskError, Result};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub number: u8,
    pub code: String,
    pub name: String,
}

/// 開獎時段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub code: String,
    pub description: String,
    pub time: NaiveTime,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

const STANDARD_ROULETTE: [(u8, &str, &str); 38] = [
    (0, "00", "Ballena"),
    (0, "0", "Delfin"),
    (1, "1", "Carnero"),
    (2, "2", "Toro"),
    (3, "3", "Cienpies"),
    (4, "4", "Alacran"),
    (5, "5", "Leon"),
    (6, "6", "Rana"),
    (7, "7", "Perico"),
    (8, "8", "Raton"),
    (9, "9", "Aguila"),
    (10, "10", "Tigre"),
    (11, "11", "Gato"),
    (12, "12", "Caballo"),
    (13, "13", "Mono"),
    (14, "14", "Paloma"),
    (15, "15", "Zorro"),
    (16, "16", "Oso"),
    (17, "17", "Pavo"),
    (18, "18", "Burro"),
    (19, "19", "Hormiga"),
    (20, "20", "Cerdo"),
    (21, "21", "Gallo"),
    (22, "22", "Camello"),
    (23, "23", "Cebra"),
    (24, "24", "Iguana"),
    (25, "25", "Gallina"),
    (26, "26", "Vaca"),
    (27, "27", "Perro"),
    (28, "28", "Condor"),
    (29, "29", "Elefante"),
    (30, "30", "Caiman"),
    (31, "31", "Capibara"),
    (32, "32", "Ardilla"),
    (33, "33", "Pescado"),
    (34, "34", "Venado"),
    (35, "35", "Jirafa"),
    (36, "36", "Culebra"),
];

pub fn standard_animals() -> Vec<Animal> {
    STANDARD_ROULETTE
        .iter()
        .map(|(number, code, name)| Animal {
            number: *number,
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// Animals and draw slots the operator can pick from.
#[derive(Debug, Clone)]
pub struct Catalog {
    animals: Vec<Animal>,
    slots: Vec<Slot>,
}

impl Catalog {
    pub fn new(animals: Vec<Animal>, slots: Vec<Slot>) -> Self {
        Self { animals, slots }
    }

    pub fn with_standard_animals(slots: Vec<Slot>) -> Self {
        Self::new(standard_animals(), slots)
    }

    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    /// 只列出啟用中的時段，依時間排序
    pub fn active_slots(&self) -> Vec<&Slot> {
        let mut slots: Vec<&Slot> = self.slots.iter().filter(|slot| slot.active).collect();
        slots.sort_by_key(|slot| slot.time);
        slots
    }

    pub fn find_animal(&self, code: &str) -> Option<&Animal> {
        let code = code.trim();
        self.animals.iter().find(|animal| animal.code == code)
    }

    pub fn find_slot(&self, code: &str) -> Option<&Slot> {
        let code = code.trim();
        self.slots
            .iter()
            .find(|slot| slot.active && slot.code == code)
    }

    pub fn line_item(
        &self,
        animal_code: &str,
        slot_code: &str,
        wager: Decimal,
    ) -> Result<LineItem> {
        let animal = self
            .find_animal(animal_code)
            .ok_or_else(|| KioskError::UnknownAnimal {
                code: animal_code.to_string(),
            })?;
        let slot = self
            .find_slot(slot_code)
            .ok_or_else(|| KioskError::UnknownSlot {
                code: slot_code.to_string(),
            })?;

        Ok(LineItem {
            game_code: animal.code.clone(),
            animal_label: animal.name.clone(),
            slot_code: slot.code.clone(),
            slot_description: slot.description.clone(),
            slot_time: Some(slot.time),
            wager_amount: wager,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn slot(code: &str, hour: u32, active: bool) -> Slot {
        Slot {
            code: code.to_string(),
            description: format!("Sorteo {}", hour),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            active,
        }
    }

    #[test]
    fn test_standard_roulette_has_both_zeros() {
        let animals = standard_animals();
        assert_eq!(animals.len(), 38);
        assert_eq!(animals[0].name, "Ballena");
        assert_eq!(animals[1].name, "Delfin");
        assert_eq!(animals.last().unwrap().code, "36");
    }

    #[test]
    fn test_find_animal_distinguishes_zero_codes() {
        let catalog = Catalog::with_standard_animals(vec![]);
        assert_eq!(catalog.find_animal("00").unwrap().name, "Ballena");
        assert_eq!(catalog.find_animal("0").unwrap().name, "Delfin");
        assert_eq!(catalog.find_animal(" 5 ").unwrap().name, "Leon");
        assert!(catalog.find_animal("37").is_none());
    }

    #[test]
    fn test_active_slots_sorted_by_time() {
        let catalog = Catalog::with_standard_animals(vec![
            slot("3", 15, true),
            slot("1", 9, true),
            slot("2", 12, false),
        ]);
        let codes: Vec<&str> = catalog
            .active_slots()
            .iter()
            .map(|slot| slot.code.as_str())
            .collect();
        assert_eq!(codes, vec!["1", "3"]);
        assert!(catalog.find_slot("2").is_none());
    }

    #[test]
    fn test_line_item_from_codes() {
        let catalog = Catalog::with_standard_animals(vec![slot("1", 9, true)]);
        let item = catalog.line_item("12", "1", dec!(2000)).unwrap();

        assert_eq!(item.game_code, "12");
        assert_eq!(item.animal_label, "Caballo");
        assert_eq!(item.slot_description, "Sorteo 9");
        assert!(item.has_slot());
        assert_eq!(item.wager_amount, dec!(2000));
    }

    #[test]
    fn test_line_item_unknown_codes() {
        let catalog = Catalog::with_standard_animals(vec![slot("1", 9, true)]);
        assert!(matches!(
            catalog.line_item("99", "1", dec!(2000)),
            Err(KioskError::UnknownAnimal { .. })
        ));
        assert!(matches!(
            catalog.line_item("12", "9", dec!(2000)),
            Err(KioskError::UnknownSlot { .. })
        ));
    }
}
