//! Data-driven game balance
//!
//! Ordered list of ages, each unlocking its own units, upgrades, towers and
//! abilities. The stock tables are built in code; alternative tables can be
//! loaded from JSON and are validated before use.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MELEE_RANGE_THRESHOLD, SELL_FRACTION};

/// Problems found while loading or validating content tables
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning defines no ages")]
    NoAges,
    #[error("age {age} has no evolve cost but is not the final age")]
    MissingEvolveCost { age: usize },
    #[error("final age {age} must not have an evolve cost")]
    FinalAgeEvolves { age: usize },
    #[error("{kind} `{name}` in age {age} is already defined")]
    Duplicate {
        age: usize,
        kind: &'static str,
        name: String,
    },
    #[error("upgrade `{upgrade}` targets unknown unit `{unit}`")]
    UnknownUpgradeTarget { upgrade: String, unit: String },
    #[error("tower `{tower}` upgrades from unknown tower `{from}`")]
    UnknownTowerBase { tower: String, from: String },
    #[error("`{name}` has a non-positive attack rate")]
    BadAttackRate { name: String },
}

/// Stat block of a unit type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub name: String,
    /// Gold cost
    pub cost: f32,
    pub health: f32,
    pub damage: f32,
    /// Attack range in pixels
    pub range: f32,
    /// Attacks per second
    pub attack_speed: f32,
    /// Pixels per second
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    /// Time spent at the head of the build queue
    #[serde(default)]
    pub build_time_ms: f32,
    /// Opaque visual tag for the presentation layer
    #[serde(default)]
    pub sprite: Option<String>,
}

impl UnitStats {
    pub fn is_melee(&self) -> bool {
        self.range < MELEE_RANGE_THRESHOLD
    }

    /// Add an upgrade value to the given stat
    pub fn apply(&mut self, stat: UnitStat, value: f32) {
        match stat {
            UnitStat::Damage => self.damage += value,
            UnitStat::Health => self.health += value,
            UnitStat::Range => self.range += value,
        }
    }
}

/// Unit stats an upgrade can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStat {
    Damage,
    Health,
    Range,
}

impl UnitStat {
    /// Stats that keep units alive rather than kill faster
    pub fn is_defensive(self) -> bool {
        self == UnitStat::Health
    }
}

/// A one-time purchasable stat boost (XP cost)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub name: String,
    pub description: String,
    pub cost: f32,
    pub unit_name: String,
    pub stat: UnitStat,
    pub value: f32,
}

/// A stationary defense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    pub name: String,
    /// Gold cost
    pub cost: f32,
    pub damage: f32,
    pub range: f32,
    pub attack_speed: f32,
    pub sell_value: f32,
    /// Name of the tower this one replaces when upgrading
    #[serde(default)]
    pub upgrade_from: Option<String>,
}

impl TowerStats {
    /// A tower that can be built on an empty slot
    pub fn is_base_tier(&self) -> bool {
        self.upgrade_from.is_none()
    }
}

/// Ability effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Damages every live enemy unit
    AreaDamage,
    /// Restores base health
    Heal,
    /// Grants gold
    ResourceGrant,
}

/// A purchasable special action (XP cost)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityStats {
    pub name: String,
    pub description: String,
    pub kind: AbilityKind,
    pub cost: f32,
    pub cooldown_ms: f32,
    /// Damage, healing or gold depending on kind
    pub magnitude: f32,
}

/// One technology tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Age {
    pub name: String,
    /// XP needed to leave this age (`None` for the final age)
    pub xp_to_evolve: Option<f32>,
    pub units: Vec<UnitStats>,
    pub upgrades: Vec<Upgrade>,
    pub towers: Vec<TowerStats>,
    pub abilities: Vec<AbilityStats>,
}

/// Complete content tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub ages: Vec<Age>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ages: vec![stone_age(), bronze_age(), future_age()],
        }
    }
}

impl Tuning {
    /// Parse and validate tables from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate tables from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check structural consistency of the tables
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.ages.is_empty() {
            return Err(TuningError::NoAges);
        }
        let last = self.ages.len() - 1;
        let all_units: HashSet<&str> = self.units().map(|u| u.name.as_str()).collect();
        let all_towers: HashSet<&str> = self
            .ages
            .iter()
            .flat_map(|a| a.towers.iter())
            .map(|t| t.name.as_str())
            .collect();
        // Lookups by name search every age, so names are unique table-wide
        let mut seen: [HashSet<&str>; 4] = Default::default();

        for (index, age) in self.ages.iter().enumerate() {
            match (age.xp_to_evolve, index == last) {
                (None, false) => return Err(TuningError::MissingEvolveCost { age: index }),
                (Some(_), true) => return Err(TuningError::FinalAgeEvolves { age: index }),
                _ => {}
            }

            let [units, upgrades, towers, abilities] = &mut seen;
            check_unique(index, "unit", units, age.units.iter().map(|u| u.name.as_str()))?;
            check_unique(
                index,
                "upgrade",
                upgrades,
                age.upgrades.iter().map(|u| u.name.as_str()),
            )?;
            check_unique(index, "tower", towers, age.towers.iter().map(|t| t.name.as_str()))?;
            check_unique(
                index,
                "ability",
                abilities,
                age.abilities.iter().map(|a| a.name.as_str()),
            )?;

            for unit in &age.units {
                if unit.attack_speed <= 0.0 {
                    return Err(TuningError::BadAttackRate {
                        name: unit.name.clone(),
                    });
                }
            }
            for upgrade in &age.upgrades {
                if !all_units.contains(upgrade.unit_name.as_str()) {
                    return Err(TuningError::UnknownUpgradeTarget {
                        upgrade: upgrade.name.clone(),
                        unit: upgrade.unit_name.clone(),
                    });
                }
            }
            for tower in &age.towers {
                if tower.attack_speed <= 0.0 {
                    return Err(TuningError::BadAttackRate {
                        name: tower.name.clone(),
                    });
                }
                if let Some(from) = &tower.upgrade_from {
                    if !all_towers.contains(from.as_str()) {
                        return Err(TuningError::UnknownTowerBase {
                            tower: tower.name.clone(),
                            from: from.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn age(&self, index: usize) -> Option<&Age> {
        self.ages.get(index)
    }

    /// Index of the final age
    pub fn last_age(&self) -> usize {
        self.ages.len().saturating_sub(1)
    }

    /// Every unit across all ages
    pub fn units(&self) -> impl Iterator<Item = &UnitStats> {
        self.ages.iter().flat_map(|a| a.units.iter())
    }

    pub fn unit(&self, name: &str) -> Option<&UnitStats> {
        self.units().find(|u| u.name == name)
    }

    /// Upgrade definition by name, searching every age
    pub fn upgrade(&self, name: &str) -> Option<&Upgrade> {
        self.ages
            .iter()
            .flat_map(|a| a.upgrades.iter())
            .find(|u| u.name == name)
    }

    /// Ability definition and the age that unlocks it
    pub fn ability(&self, name: &str) -> Option<(usize, &AbilityStats)> {
        self.ages.iter().enumerate().find_map(|(index, age)| {
            age.abilities
                .iter()
                .find(|a| a.name == name)
                .map(|a| (index, a))
        })
    }

    /// Abilities available to a side that has reached `age`
    pub fn unlocked_abilities(&self, age: usize) -> impl Iterator<Item = &AbilityStats> {
        self.ages
            .iter()
            .take(age + 1)
            .flat_map(|a| a.abilities.iter())
    }
}

fn check_unique<'a>(
    age: usize,
    kind: &'static str,
    seen: &mut HashSet<&'a str>,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), TuningError> {
    for name in names {
        if !seen.insert(name) {
            return Err(TuningError::Duplicate {
                age,
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn unit(
    name: &str,
    cost: f32,
    health: f32,
    damage: f32,
    range: f32,
    attack_speed: f32,
    speed: f32,
    size: f32,
    build_time_ms: f32,
    sprite: &str,
) -> UnitStats {
    UnitStats {
        name: name.to_string(),
        cost,
        health,
        damage,
        range,
        attack_speed,
        speed,
        width: size,
        height: size,
        build_time_ms,
        sprite: Some(sprite.to_string()),
    }
}

fn upgrade(name: &str, unit_name: &str, stat: UnitStat, value: f32, cost: f32) -> Upgrade {
    let label = match stat {
        UnitStat::Damage => "Dmg",
        UnitStat::Health => "HP",
        UnitStat::Range => "Range",
    };
    Upgrade {
        name: name.to_string(),
        description: format!("+{value} {label} for {unit_name}"),
        cost,
        unit_name: unit_name.to_string(),
        stat,
        value,
    }
}

fn tower(
    name: &str,
    cost: f32,
    damage: f32,
    range: f32,
    attack_speed: f32,
    upgrade_from: Option<&str>,
) -> TowerStats {
    TowerStats {
        name: name.to_string(),
        cost,
        damage,
        range,
        attack_speed,
        sell_value: (cost * SELL_FRACTION).floor(),
        upgrade_from: upgrade_from.map(str::to_string),
    }
}

fn ability(
    name: &str,
    description: &str,
    kind: AbilityKind,
    cost: f32,
    cooldown_ms: f32,
    magnitude: f32,
) -> AbilityStats {
    AbilityStats {
        name: name.to_string(),
        description: description.to_string(),
        kind,
        cost,
        cooldown_ms,
        magnitude,
    }
}

fn stone_age() -> Age {
    Age {
        name: "Stone Age".to_string(),
        xp_to_evolve: Some(400.0),
        units: vec![
            unit("Clubman", 50.0, 100.0, 15.0, 5.0, 1.0, 30.0, 50.0, 1500.0, "units/1/1"),
            unit("Slingshot", 75.0, 70.0, 10.0, 150.0, 0.8, 35.0, 50.0, 2000.0, "units/1/2"),
        ],
        upgrades: vec![
            upgrade("Sharpened Sticks", "Clubman", UnitStat::Damage, 5.0, 100.0),
            upgrade("Tougher Hide", "Clubman", UnitStat::Health, 20.0, 150.0),
            upgrade("Bigger Rocks", "Slingshot", UnitStat::Damage, 5.0, 125.0),
        ],
        towers: vec![
            tower("Rock Slinger", 100.0, 12.0, 250.0, 0.8, None),
            tower("Boulder Thrower", 220.0, 22.0, 280.0, 0.8, Some("Rock Slinger")),
        ],
        abilities: vec![
            ability(
                "Rockfall",
                "Drop rocks on every enemy unit",
                AbilityKind::AreaDamage,
                150.0,
                30_000.0,
                40.0,
            ),
            ability(
                "Tribal Remedy",
                "Patch up the base",
                AbilityKind::Heal,
                120.0,
                45_000.0,
                150.0,
            ),
        ],
    }
}

fn bronze_age() -> Age {
    Age {
        name: "Bronze Age".to_string(),
        xp_to_evolve: Some(1000.0),
        units: vec![
            unit("Swordsman", 100.0, 150.0, 25.0, 5.0, 1.2, 30.0, 50.0, 2500.0, "units/2/1"),
            unit("Archer", 150.0, 100.0, 20.0, 200.0, 1.0, 35.0, 50.0, 3000.0, "units/2/2"),
        ],
        upgrades: vec![
            upgrade("Bronze Swords", "Swordsman", UnitStat::Damage, 10.0, 250.0),
            upgrade("Chainmail", "Swordsman", UnitStat::Health, 50.0, 300.0),
            upgrade("Composite Bows", "Archer", UnitStat::Range, 25.0, 200.0),
        ],
        towers: vec![
            tower("Ballista", 250.0, 30.0, 300.0, 0.9, None),
            tower("Repeating Ballista", 450.0, 35.0, 300.0, 1.5, Some("Ballista")),
        ],
        abilities: vec![
            ability(
                "Arrow Volley",
                "Rain arrows on every enemy unit",
                AbilityKind::AreaDamage,
                350.0,
                30_000.0,
                80.0,
            ),
            ability(
                "Tribute",
                "Collect tribute from the villages",
                AbilityKind::ResourceGrant,
                250.0,
                60_000.0,
                300.0,
            ),
        ],
    }
}

fn future_age() -> Age {
    Age {
        name: "Future Age".to_string(),
        xp_to_evolve: None,
        units: vec![
            unit("Cyborg", 500.0, 400.0, 75.0, 10.0, 1.5, 40.0, 60.0, 4000.0, "units/5/1"),
            unit("Laser Trooper", 800.0, 250.0, 60.0, 250.0, 1.2, 45.0, 60.0, 5000.0, "units/5/2"),
        ],
        upgrades: vec![
            upgrade("Plasma Blade", "Cyborg", UnitStat::Damage, 25.0, 800.0),
            upgrade("Titanium Armor", "Cyborg", UnitStat::Health, 100.0, 1000.0),
            upgrade("Long-Range Scope", "Laser Trooper", UnitStat::Range, 50.0, 750.0),
        ],
        towers: vec![
            tower("Laser Turret", 900.0, 70.0, 350.0, 1.5, None),
            tower("Ion Cannon", 1600.0, 140.0, 380.0, 1.2, Some("Laser Turret")),
        ],
        abilities: vec![
            ability(
                "Orbital Strike",
                "Strike every enemy unit from orbit",
                AbilityKind::AreaDamage,
                1200.0,
                40_000.0,
                220.0,
            ),
            ability(
                "Nano Repair",
                "Rebuild the base with nanites",
                AbilityKind::Heal,
                900.0,
                45_000.0,
                400.0,
            ),
            ability(
                "Market Surge",
                "Flood the treasury",
                AbilityKind::ResourceGrant,
                700.0,
                60_000.0,
                1000.0,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.last_age(), 2);
        assert!(tuning.ages[tuning.last_age()].xp_to_evolve.is_none());
    }

    #[test]
    fn test_lookups() {
        let tuning = Tuning::default();
        assert_eq!(tuning.unit("Archer").map(|u| u.cost), Some(150.0));
        assert_eq!(
            tuning.upgrade("Sharpened Sticks").map(|u| u.stat),
            Some(UnitStat::Damage)
        );
        let (age, rockfall) = tuning.ability("Rockfall").expect("rockfall exists");
        assert_eq!(age, 0);
        assert_eq!(rockfall.kind, AbilityKind::AreaDamage);
        assert!(tuning.unit("Dragon").is_none());
    }

    #[test]
    fn test_unlocked_abilities_grow_with_age() {
        let tuning = Tuning::default();
        assert_eq!(tuning.unlocked_abilities(0).count(), 2);
        assert_eq!(tuning.unlocked_abilities(1).count(), 4);
        assert_eq!(tuning.unlocked_abilities(2).count(), 7);
    }

    #[test]
    fn test_sell_value_is_fraction_of_cost() {
        let tuning = Tuning::default();
        for tower in tuning.ages.iter().flat_map(|a| a.towers.iter()) {
            assert!(tower.sell_value < tower.cost);
            assert!((tower.sell_value - (tower.cost * SELL_FRACTION).floor()).abs() < 0.001);
        }
    }

    #[test]
    fn test_json_round_trip_validates() {
        let json = serde_json::to_string(&Tuning::default()).expect("serialize");
        let parsed = Tuning::from_json(&json).expect("parse");
        assert_eq!(parsed, Tuning::default());
    }

    #[test]
    fn test_rejects_dangling_tower_chain() {
        let mut tuning = Tuning::default();
        tuning.ages[0].towers[1].upgrade_from = Some("Trebuchet".to_string());
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::UnknownTowerBase { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_upgrade_target() {
        let mut tuning = Tuning::default();
        tuning.ages[1].upgrades[0].unit_name = "Hoplite".to_string();
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::UnknownUpgradeTarget { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_evolve_costs() {
        let mut tuning = Tuning::default();
        tuning.ages[0].xp_to_evolve = None;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::MissingEvolveCost { age: 0 })
        ));

        let mut tuning = Tuning::default();
        tuning.ages[2].xp_to_evolve = Some(5000.0);
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::FinalAgeEvolves { age: 2 })
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let mut tuning = Tuning::default();
        let copy = tuning.ages[0].units[0].clone();
        tuning.ages[0].units.push(copy);
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Duplicate { kind: "unit", .. })
        ));

        assert!(matches!(
            Tuning { ages: Vec::new() }.validate(),
            Err(TuningError::NoAges)
        ));
    }

    #[test]
    fn test_rejects_names_repeated_in_a_later_age() {
        let mut tuning = Tuning::default();
        let upgrade = tuning.ages[0].upgrades[0].clone();
        tuning.ages[1].upgrades.push(upgrade);
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Duplicate { age: 1, kind: "upgrade", .. })
        ));

        let mut tuning = Tuning::default();
        let ability = tuning.ages[0].abilities[0].clone();
        tuning.ages[2].abilities.push(ability);
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Duplicate { age: 2, kind: "ability", .. })
        ));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_apply_upgrade() {
        let mut stats = Tuning::default().ages[0].units[0].clone();
        stats.apply(UnitStat::Damage, 5.0);
        stats.apply(UnitStat::Range, 10.0);
        assert_eq!(stats.damage, 20.0);
        assert_eq!(stats.range, 15.0);
        assert!(stats.is_melee());

        // Enough reach crosses into ranged
        stats.apply(UnitStat::Range, MELEE_RANGE_THRESHOLD);
        assert!(!stats.is_melee());
    }
}
