//! Toy world the demo agents live in.
//!
//! Units stand on a line and belong to one of two teams. Distances are
//! measured in steps; a unit reaches melee range at distance one.

use std::collections::BTreeMap;

use behavior_engine::EntityId;
use runtime::BotState;
use strum::{Display, EnumString};

pub const MELEE_RANGE: u32 = 1;
pub const AGGRO_RANGE: u32 = 6;
pub const FLEE_RANGE: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Team {
    Red,
    Blue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Fighter,
    Healer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    pub id: EntityId,
    pub team: Team,
    pub role: Role,
    pub position: i32,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub potions: u32,
}

impl Unit {
    pub fn new(id: EntityId, team: Team, role: Role, position: i32) -> Self {
        let (max_health, max_mana) = match role {
            Role::Fighter => (120, 0),
            Role::Healer => (80, 100),
        };
        Self {
            id,
            team,
            role,
            position,
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            potions: 1,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_pct(&self) -> u32 {
        if self.max_health == 0 {
            return 0;
        }
        self.health * 100 / self.max_health
    }

    fn distance_to(&self, other: &Unit) -> u32 {
        self.position.abs_diff(other.position)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Arena {
    units: BTreeMap<EntityId, Unit>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two teams of `team_size` facing each other, alternating fighters and
    /// healers. Red gets the lower ids.
    pub fn skirmish(team_size: u32) -> Self {
        let mut arena = Self::new();
        for (team, side) in [(Team::Red, -1), (Team::Blue, 1)] {
            let first = if team == Team::Red { 1 } else { team_size + 1 };
            for slot in 0..team_size {
                let role = if slot % 2 == 0 { Role::Fighter } else { Role::Healer };
                let position = side * (4 + slot as i32);
                arena.spawn(Unit::new(EntityId(u64::from(first + slot)), team, role, position));
            }
        }
        arena
    }

    pub fn spawn(&mut self, unit: Unit) {
        self.units.insert(unit.id, unit);
    }

    pub fn unit(&self, id: EntityId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: EntityId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.units.keys().copied().collect()
    }

    /// Living team members of `team`.
    pub fn alive(&self, team: Team) -> usize {
        self.units
            .values()
            .filter(|u| u.team == team && u.is_alive())
            .count()
    }

    /// Closest living enemy of `id` and its distance.
    pub fn nearest_enemy(&self, id: EntityId) -> Option<(EntityId, u32)> {
        let me = self.unit(id)?;
        self.units
            .values()
            .filter(|u| u.team != me.team && u.is_alive())
            .map(|u| (u.id, me.distance_to(u)))
            .min_by_key(|(enemy, distance)| (*distance, *enemy))
    }

    /// Living ally (self included) with the lowest health percentage.
    pub fn weakest_ally(&self, id: EntityId) -> Option<(EntityId, u32)> {
        let me = self.unit(id)?;
        self.units
            .values()
            .filter(|u| u.team == me.team && u.is_alive())
            .map(|u| (u.id, u.health_pct()))
            .min_by_key(|(ally, pct)| (*pct, *ally))
    }

    /// The state an agent controlling `id` should be in.
    pub fn bot_state(&self, id: EntityId) -> BotState {
        match self.unit(id) {
            Some(unit) if !unit.is_alive() => BotState::Dead,
            Some(_) => match self.nearest_enemy(id) {
                Some((_, distance)) if distance <= AGGRO_RANGE => BotState::Combat,
                _ => BotState::NonCombat,
            },
            None => BotState::Dead,
        }
    }

    /// Deals damage and returns whether the target died from it.
    pub fn damage(&mut self, target: EntityId, amount: u32) -> bool {
        let Some(unit) = self.unit_mut(target) else {
            return false;
        };
        if !unit.is_alive() {
            return false;
        }
        unit.health = unit.health.saturating_sub(amount);
        !unit.is_alive()
    }

    pub fn heal(&mut self, target: EntityId, amount: u32) {
        if let Some(unit) = self.unit_mut(target).filter(|u| u.is_alive()) {
            unit.health = (unit.health + amount).min(unit.max_health);
        }
    }

    /// Moves `id` one step towards (`sign = 1`) or away from (`sign = -1`)
    /// `other`.
    pub fn step(&mut self, id: EntityId, other: EntityId, sign: i32) {
        let Some(target) = self.unit(other).map(|u| u.position) else {
            return;
        };
        if let Some(unit) = self.unit_mut(id) {
            let direction = (target - unit.position).signum();
            let direction = if direction == 0 { 1 } else { direction };
            unit.position += direction * sign;
        }
    }

    /// Brings a dead unit back at half health.
    pub fn revive(&mut self, id: EntityId) {
        if let Some(unit) = self.unit_mut(id).filter(|u| !u.is_alive()) {
            unit.health = unit.max_health / 2;
            unit.mana = unit.max_mana / 2;
        }
    }

    /// Passive mana regeneration for living units.
    pub fn regenerate(&mut self, elapsed_ms: u32) {
        let amount = elapsed_ms / 100;
        for unit in self.units.values_mut().filter(|u| u.is_alive()) {
            unit.mana = (unit.mana + amount).min(unit.max_mana);
        }
    }
}
