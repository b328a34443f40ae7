//! Arena behaviors: values, triggers, multipliers and actions.
//!
//! Strategy bundles are data in `assets/strategies.ron`; this module only
//! provides the named building blocks they reference.

use behavior_engine::{
    Action, ActionContext, BehaviorRegistry, EntityId, Event, FnMultiplier, FnTrigger,
    Observation, Result,
};
use runtime::{DefaultStrategies, SchedulingConfig};
use tracing::{debug, info};

use crate::arena::{Arena, FLEE_RANGE, MELEE_RANGE, Role, Unit};

const STRATEGIES: &str = include_str!("../assets/strategies.ron");

const MELEE_DAMAGE: u32 = 15;
const MELEE_SWING_MS: u32 = 1000;
const HEAL_AMOUNT: u32 = 30;
const HEAL_COST: u32 = 25;
const HEAL_CAST_MS: u32 = 1500;
const POTION_AMOUNT: u32 = 40;
const STEP_MS: u32 = 250;
const REST_MS: u32 = 1000;
const RELEASE_MS: u32 = 3000;

fn health_pct(obs: &mut Observation<'_, Arena>) -> u32 {
    obs.value::<u32>("health pct").unwrap_or(0)
}

fn enemy_distance(obs: &mut Observation<'_, Arena>) -> Option<u32> {
    obs.value::<Option<(EntityId, u32)>>("nearest enemy")
        .flatten()
        .map(|(_, distance)| distance)
}

/// Builds the registry of everything the arena strategies reference.
///
/// Movement delays are capped at the global cooldown of `timings`.
pub fn registry(timings: &SchedulingConfig) -> Result<BehaviorRegistry<Arena>> {
    let step_ms = STEP_MS.min(timings.global_cooldown);
    let mut registry = BehaviorRegistry::new();

    registry
        .register_calculated("health pct", 1, |arena: &Arena, scope| {
            arena.unit(scope.agent).map_or(0, Unit::health_pct)
        })
        .register_calculated("mana", 1, |arena: &Arena, scope| {
            arena.unit(scope.agent).map_or(0, |u| u.mana)
        })
        .register_calculated("nearest enemy", 1, |arena: &Arena, scope| {
            arena.nearest_enemy(scope.agent)
        })
        .register_calculated("weakest ally", 2, |arena: &Arena, scope| {
            arena.weakest_ally(scope.agent)
        })
        .register_manual("spirit released", false);

    registry
        .register_trigger("enemy in reach", || {
            FnTrigger::new("enemy in reach", |obs: &mut Observation<'_, Arena>| {
                enemy_distance(obs).is_some_and(|d| d <= MELEE_RANGE)
            })
        })
        .register_trigger("low health", || {
            FnTrigger::new("low health", |obs: &mut Observation<'_, Arena>| {
                health_pct(obs) < 40
            })
        })
        .register_trigger("critical health", || {
            FnTrigger::new("critical health", |obs: &mut Observation<'_, Arena>| {
                health_pct(obs) < 20
            })
        })
        .register_trigger("ally hurt", || {
            FnTrigger::new("ally hurt", |obs: &mut Observation<'_, Arena>| {
                obs.value::<Option<(EntityId, u32)>>("weakest ally")
                    .flatten()
                    .is_some_and(|(_, pct)| pct < 70)
            })
            .every(2)
        })
        .register_event_trigger("attack");

    registry
        .register_multiplier("conserve mana", || {
            FnMultiplier::new(
                "conserve mana",
                |action: &dyn Action<Arena>, obs: &mut Observation<'_, Arena>| {
                    if action.name() == "heal" && obs.value::<u32>("mana").unwrap_or(0) < 50 {
                        0.5
                    } else {
                        1.0
                    }
                },
            )
        })
        .register_multiplier("no heroics", || {
            FnMultiplier::new(
                "no heroics",
                |action: &dyn Action<Arena>, obs: &mut Observation<'_, Arena>| {
                    let reckless = matches!(action.name(), "melee" | "reach melee" | "charge");
                    if reckless && health_pct(obs) < 20 { 0.0 } else { 1.0 }
                },
            )
        });

    registry
        .register_action("melee", || Melee)
        .register_action("reach melee", move || Step::towards("reach melee", step_ms))
        .register_action("charge", move || Step::towards("charge", step_ms))
        .register_action("flee", move || Step::away("flee", step_ms))
        .register_action("heal", || Heal)
        .register_action("drink potion", || DrinkPotion)
        .register_action("rest", || Rest)
        .register_action("release spirit", || ReleaseSpirit)
        .register_action("revive", || Revive);

    let loaded = registry.load_strategies(STRATEGIES)?;
    debug!(target: "client::behaviors", strategies = loaded, "arena strategies loaded");
    Ok(registry)
}

/// Fills every empty per-state strategy list with the arena bundles.
pub fn fill_default_strategies(strategies: &mut DefaultStrategies) {
    for (changes, bundles) in [
        (&mut strategies.combat, "+melee,+heal,+flee"),
        (&mut strategies.non_combat, "+rest"),
        (&mut strategies.dead, "+dead"),
    ] {
        if changes.trim().is_empty() {
            *changes = bundles.to_owned();
        }
    }
}

struct Melee;

impl Action<Arena> for Melee {
    fn name(&self) -> &str {
        "melee"
    }

    fn is_useful(&self, obs: &mut Observation<'_, Arena>) -> bool {
        enemy_distance(obs).is_some()
    }

    fn is_possible(&self, obs: &mut Observation<'_, Arena>) -> bool {
        enemy_distance(obs).is_some_and(|d| d <= MELEE_RANGE)
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Arena>, _event: &Event) -> bool {
        let agent = ctx.agent();
        let Some((victim, distance)) = ctx.world().nearest_enemy(agent) else {
            return false;
        };
        if distance > MELEE_RANGE {
            return false;
        }
        if ctx.world_mut().damage(victim, MELEE_DAMAGE) {
            info!(target: "client::arena", %agent, %victim, "kill");
        }
        ctx.set_next_check_delay(MELEE_SWING_MS);
        true
    }
}

/// One step relative to the nearest enemy.
struct Step {
    name: &'static str,
    sign: i32,
    delay_ms: u32,
}

impl Step {
    fn towards(name: &'static str, delay_ms: u32) -> Self {
        Self {
            name,
            sign: 1,
            delay_ms,
        }
    }

    fn away(name: &'static str, delay_ms: u32) -> Self {
        Self {
            name,
            sign: -1,
            delay_ms,
        }
    }
}

impl Action<Arena> for Step {
    fn name(&self) -> &str {
        self.name
    }

    fn is_useful(&self, obs: &mut Observation<'_, Arena>) -> bool {
        match enemy_distance(obs) {
            Some(distance) if self.sign > 0 => distance > MELEE_RANGE,
            Some(distance) => distance <= FLEE_RANGE,
            None => false,
        }
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Arena>, _event: &Event) -> bool {
        let agent = ctx.agent();
        let Some((enemy, _)) = ctx.world().nearest_enemy(agent) else {
            return false;
        };
        ctx.world_mut().step(agent, enemy, self.sign);
        ctx.set_next_check_delay(self.delay_ms);
        true
    }
}

struct Heal;

impl Action<Arena> for Heal {
    fn name(&self) -> &str {
        "heal"
    }

    fn is_useful(&self, obs: &mut Observation<'_, Arena>) -> bool {
        obs.value::<Option<(EntityId, u32)>>("weakest ally")
            .flatten()
            .is_some_and(|(_, pct)| pct < 70)
    }

    fn is_possible(&self, obs: &mut Observation<'_, Arena>) -> bool {
        let healer = obs
            .world()
            .unit(obs.agent())
            .is_some_and(|u| u.role == Role::Healer);
        healer && obs.value::<u32>("mana").unwrap_or(0) >= HEAL_COST
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Arena>, _event: &Event) -> bool {
        let agent = ctx.agent();
        let Some((ally, _)) = ctx.world().weakest_ally(agent) else {
            return false;
        };
        let arena = ctx.world_mut();
        match arena.unit_mut(agent) {
            Some(me) if me.mana >= HEAL_COST => me.mana -= HEAL_COST,
            _ => return false,
        }
        arena.heal(ally, HEAL_AMOUNT);
        ctx.set_next_check_delay(HEAL_CAST_MS);
        true
    }
}

struct DrinkPotion;

impl Action<Arena> for DrinkPotion {
    fn name(&self) -> &str {
        "drink potion"
    }

    fn is_useful(&self, obs: &mut Observation<'_, Arena>) -> bool {
        health_pct(obs) < 60
    }

    fn is_possible(&self, obs: &mut Observation<'_, Arena>) -> bool {
        obs.world().unit(obs.agent()).is_some_and(|u| u.potions > 0)
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Arena>, _event: &Event) -> bool {
        let agent = ctx.agent();
        let arena = ctx.world_mut();
        match arena.unit_mut(agent) {
            Some(me) if me.potions > 0 => me.potions -= 1,
            _ => return false,
        }
        arena.heal(agent, POTION_AMOUNT);
        true
    }
}

struct Rest;

impl Action<Arena> for Rest {
    fn name(&self) -> &str {
        "rest"
    }

    fn is_useful(&self, obs: &mut Observation<'_, Arena>) -> bool {
        health_pct(obs) < 100
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Arena>, _event: &Event) -> bool {
        let agent = ctx.agent();
        ctx.world_mut().heal(agent, 5);
        ctx.set_next_check_delay(REST_MS);
        true
    }
}

struct ReleaseSpirit;

impl Action<Arena> for ReleaseSpirit {
    fn name(&self) -> &str {
        "release spirit"
    }

    fn is_useful(&self, obs: &mut Observation<'_, Arena>) -> bool {
        !obs.value::<bool>("spirit released").unwrap_or(false)
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Arena>, _event: &Event) -> bool {
        ctx.set_value("spirit released", None, true);
        ctx.set_next_check_delay(RELEASE_MS);
        true
    }
}

struct Revive;

impl Action<Arena> for Revive {
    fn name(&self) -> &str {
        "revive"
    }

    fn is_possible(&self, obs: &mut Observation<'_, Arena>) -> bool {
        obs.value::<bool>("spirit released").unwrap_or(false)
    }

    fn is_useful(&self, obs: &mut Observation<'_, Arena>) -> bool {
        obs.world().unit(obs.agent()).is_some_and(|u| !u.is_alive())
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Arena>, _event: &Event) -> bool {
        let agent = ctx.agent();
        ctx.world_mut().revive(agent);
        ctx.set_value("spirit released", None, false);
        info!(target: "client::arena", %agent, "revived");
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use behavior_engine::{ActionResult, Engine, EngineConfig, ValueContext};

    use super::*;
    use crate::arena::Team;

    fn arena() -> Arena {
        let mut arena = Arena::new();
        arena.spawn(Unit::new(EntityId(1), Team::Red, Role::Fighter, 0));
        arena.spawn(Unit::new(EntityId(2), Team::Red, Role::Healer, -2));
        arena.spawn(Unit::new(EntityId(3), Team::Blue, Role::Fighter, 3));
        arena
    }

    fn engine(changes: &str, agent: u64) -> (Engine<Arena>, ValueContext<Arena>) {
        let registry = Arc::new(registry(&SchedulingConfig::default()).expect("registry"));
        let mut engine = Engine::new(Arc::clone(&registry), EngineConfig::default());
        engine.change_strategy(changes).expect("strategies");
        (engine, ValueContext::new(EntityId(agent), registry))
    }

    #[test]
    fn bundled_strategies_load() {
        let registry = registry(&SchedulingConfig::default()).expect("registry");
        assert_eq!(registry.strategy_names(), ["dead", "flee", "heal", "melee", "rest"]);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn configured_lists_win_over_bundles() {
        let mut strategies = DefaultStrategies {
            combat: "+melee".into(),
            ..DefaultStrategies::default()
        };
        fill_default_strategies(&mut strategies);

        assert_eq!(strategies.combat, "+melee");
        assert_eq!(strategies.non_combat, "+rest");
        assert_eq!(strategies.dead, "+dead");
    }

    #[test]
    fn fighter_closes_distance_before_swinging() {
        let mut arena = arena();
        let (mut engine, mut values) = engine("+melee", 1);

        let decision = engine.do_next_action(&mut arena, &mut values);
        assert_eq!(decision.action.as_ref().map(|a| a.as_str()), Some("reach melee"));
        assert_eq!(arena.unit(EntityId(1)).map(|u| u.position), Some(1));
        assert_eq!(decision.next_check_delay, Some(STEP_MS));

        engine.do_next_action(&mut arena, &mut values);
        let decision = engine.do_next_action(&mut arena, &mut values);
        assert_eq!(decision.action.as_ref().map(|a| a.as_str()), Some("melee"));
        assert_eq!(arena.unit(EntityId(3)).map(|u| u.health), Some(105));
    }

    #[test]
    fn healer_tops_up_the_weakest_ally() {
        let mut arena = arena();
        arena.damage(EntityId(1), 60);
        let (mut engine, mut values) = engine("+heal", 2);

        let decision = engine.do_next_action(&mut arena, &mut values);
        assert_eq!(decision.action.as_ref().map(|a| a.as_str()), Some("heal"));
        assert_eq!(arena.unit(EntityId(1)).map(|u| u.health), Some(90));
        assert_eq!(arena.unit(EntityId(2)).map(|u| u.mana), Some(75));
    }

    #[test]
    fn out_of_mana_healer_drinks_instead() {
        let mut arena = arena();
        arena.damage(EntityId(2), 36);
        if let Some(healer) = arena.unit_mut(EntityId(2)) {
            healer.mana = 0;
        }
        let (mut engine, mut values) = engine("+heal", 2);

        let decision = engine.do_next_action(&mut arena, &mut values);
        assert_eq!(decision.action.as_ref().map(|a| a.as_str()), Some("drink potion"));
        assert_eq!(arena.unit(EntityId(2)).map(|u| u.potions), Some(0));
    }

    #[test]
    fn dead_agent_releases_then_revives() {
        let mut arena = arena();
        arena.damage(EntityId(1), 500);
        let (mut engine, mut values) = engine("+dead", 1);

        let decision = engine.do_next_action(&mut arena, &mut values);
        assert_eq!(decision.action.as_ref().map(|a| a.as_str()), Some("release spirit"));
        assert_eq!(decision.next_check_delay, Some(RELEASE_MS));

        let decision = engine.do_next_action(&mut arena, &mut values);
        assert_eq!(decision.action.as_ref().map(|a| a.as_str()), Some("revive"));
        assert_eq!(arena.unit(EntityId(1)).map(|u| u.health), Some(60));
    }

    #[test]
    fn direct_flee_steps_away() {
        let mut arena = arena();
        let (mut engine, mut values) = engine("+flee", 1);

        let outcome = engine.execute_action("flee", &mut arena, &mut values);
        assert_eq!(outcome.result, ActionResult::Ok);
        assert_eq!(arena.unit(EntityId(1)).map(|u| u.position), Some(-1));
    }
}
