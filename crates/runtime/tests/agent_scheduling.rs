use std::collections::BTreeMap;
use std::sync::Arc;

use behavior_engine::{
    Action, ActionContext, ActionResult, BehaviorRegistry, EntityId, Event, FnTrigger,
    Observation, Strategy, Tier,
};
use runtime::{BotState, DefaultStrategies, Roster, RuntimeConfig, RuntimeError, TickOutcome};

#[derive(Default)]
struct Field {
    enemies: u32,
    hits: BTreeMap<EntityId, u32>,
    rests: u32,
}

impl Field {
    fn hits(&self, id: u64) -> u32 {
        self.hits.get(&EntityId(id)).copied().unwrap_or(0)
    }
}

struct Strike;

impl Action<Field> for Strike {
    fn name(&self) -> &str {
        "strike"
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Field>, _event: &Event) -> bool {
        let agent = ctx.agent();
        *ctx.world_mut().hits.entry(agent).or_insert(0) += 1;
        true
    }
}

struct Rest;

impl Action<Field> for Rest {
    fn name(&self) -> &str {
        "rest"
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, Field>, _event: &Event) -> bool {
        ctx.world_mut().rests += 1;
        ctx.set_next_check_delay(2000);
        true
    }
}

fn registry() -> BehaviorRegistry<Field> {
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("strike", || Strike)
        .register_action("rest", || Rest)
        .register_calculated("enemy count", 1, |field: &Field, _| field.enemies)
        .register_trigger("enemy near", || {
            FnTrigger::new("enemy near", |obs: &mut Observation<'_, Field>| {
                obs.value::<u32>("enemy count").unwrap_or(0) > 0
            })
        })
        .register_strategy(
            Strategy::new("fight")
                .on("enemy near", [("strike", Tier::High)])
                .default_action("rest", Tier::Normal),
        );
    registry
}

fn roster() -> Roster<Field> {
    let config = RuntimeConfig {
        strategies: DefaultStrategies {
            non_combat: "+fight".into(),
            ..DefaultStrategies::default()
        },
        ..RuntimeConfig::default()
    };
    Roster::new(Arc::new(registry()), config)
}

fn thought(outcomes: &[(EntityId, TickOutcome)], id: u64) -> Option<&str> {
    outcomes
        .iter()
        .find(|(agent, _)| *agent == EntityId(id))
        .and_then(|(_, outcome)| outcome.decision())
        .and_then(|decision| decision.action.as_ref())
        .map(|name| name.as_str())
}

#[test]
fn agents_think_on_their_own_clocks() {
    let mut roster = roster();
    roster.spawn(EntityId(1)).expect("agent 1");
    roster
        .spawn(EntityId(2))
        .expect("agent 2")
        .set_next_check_delay(500);

    let mut field = Field {
        enemies: 3,
        ..Field::default()
    };

    let outcomes = roster.update(0, &mut field);
    assert_eq!(thought(&outcomes, 1), Some("strike"));
    assert_eq!(thought(&outcomes, 2), None);

    roster.update(100, &mut field);
    assert_eq!((field.hits(1), field.hits(2)), (2, 0));

    let outcomes = roster.update(400, &mut field);
    assert_eq!(thought(&outcomes, 2), Some("strike"));
    assert_eq!((field.hits(1), field.hits(2)), (3, 1));
}

#[test]
fn calculated_values_follow_the_world() {
    let mut roster = roster();
    roster.spawn(EntityId(1)).expect("agent");
    let mut field = Field::default();

    let outcomes = roster.update(0, &mut field);
    assert_eq!(thought(&outcomes, 1), Some("rest"));
    assert_eq!(field.rests, 1);

    field.enemies = 1;
    roster.update(2000, &mut field);
    assert_eq!(field.hits(1), 1);

    let agent = roster.get(EntityId(1)).expect("agent");
    let labels: Vec<String> = agent.format_values().into_iter().map(|(label, _)| label).collect();
    assert_eq!(labels, ["enemy count"]);
}

#[test]
fn requested_delay_outlasts_the_react_floor() {
    let mut roster = roster();
    roster.spawn(EntityId(1)).expect("agent");
    let mut field = Field::default();

    roster.update(0, &mut field);
    let agent = roster.get(EntityId(1)).expect("agent");
    assert_eq!(agent.clock().next_check_delay(), 2000);

    let outcomes = roster.update(1000, &mut field);
    assert!(matches!(
        outcomes[0].1,
        TickOutcome::Waiting { remaining_ms: 1000 }
    ));
}

#[test]
fn direct_actions_apply_their_delay() {
    let mut roster = roster();
    let mut field = Field::default();
    let agent = roster.spawn(EntityId(4)).expect("agent");

    assert_eq!(agent.do_specific_action("rest", &mut field), ActionResult::Ok);
    assert_eq!(agent.clock().next_check_delay(), 2000);
    assert_eq!(agent.do_specific_action("juggle", &mut field), ActionResult::Unknown);
}

#[test]
fn dead_agents_only_run_dead_strategies() {
    let mut roster = roster();
    let mut field = Field {
        enemies: 2,
        ..Field::default()
    };
    let agent = roster.spawn(EntityId(1)).expect("agent");
    agent.change_state(BotState::Dead);

    let outcomes = roster.update(0, &mut field);
    assert_eq!(thought(&outcomes, 1), None);
    assert_eq!(field.hits(1), 0);
}

#[test]
fn spawning_an_existing_id_fails() {
    let mut roster = roster();
    roster.spawn(EntityId(9)).expect("first spawn");

    let err = roster.spawn(EntityId(9)).map(|_| ()).unwrap_err();
    assert!(matches!(err, RuntimeError::DuplicateAgent(EntityId(9))));
    assert_eq!(roster.len(), 1);

    assert!(roster.remove(EntityId(9)).is_some());
    assert!(roster.is_empty());
}
