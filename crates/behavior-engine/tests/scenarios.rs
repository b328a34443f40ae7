use std::sync::{Arc, Mutex};

use behavior_engine::testing::{Counter, FlagTrigger, RecordingListener, ScriptedAction, Switch};
use behavior_engine::{
    Action, ActionBasket, ActionContext, ActionNode, ActionNodeDef, BehaviorRegistry, Engine,
    EngineConfig, EntityId, Event, Priority, Queue, Strategy, Tier, ValueContext,
};

fn engine_with(registry: BehaviorRegistry<()>, config: EngineConfig) -> (Engine<()>, ValueContext<()>) {
    let registry = Arc::new(registry);
    let engine = Engine::new(Arc::clone(&registry), config);
    let values = ValueContext::new(EntityId(1), registry);
    (engine, values)
}

fn test_config() -> EngineConfig {
    EngineConfig {
        test_mode: true,
        ..EngineConfig::default()
    }
}

fn live_config() -> EngineConfig {
    EngineConfig::default()
}

fn action_name(engine: &Engine<()>) -> Option<&str> {
    engine.last_action().map(|name| name.as_str())
}

fn heal_and_dps(critical: Switch) -> BehaviorRegistry<()> {
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("emergency heal", || ScriptedAction::new("emergency heal"))
        .register_action("melee", || ScriptedAction::new("melee"))
        .register_trigger("critical health", move || {
            FlagTrigger::new("critical health", critical.clone())
        })
        .register_strategy(
            Strategy::new("heal").on("critical health", [("emergency heal", Tier::Emergency)]),
        )
        .register_strategy(Strategy::new("dps").default_action("melee", Tier::Normal));
    registry
}

#[test]
fn critical_health_outranks_default_melee() {
    let critical = Switch::new(true);
    let (mut engine, mut values) = engine_with(heal_and_dps(critical.clone()), test_config());
    engine.change_strategy("+heal,+dps").expect("strategies");

    engine.evaluate(&(), &mut values);
    assert_eq!(engine.queue().peek().map(ActionBasket::name), Some("emergency heal"));

    let decision = engine.do_next_action(&mut (), &mut values);
    assert_eq!(action_name(&engine), Some("emergency heal"));
    assert_eq!(decision.relevance, 90.0);

    critical.set(false);
    engine.evaluate(&(), &mut values);
    assert_eq!(engine.queue().peek().map(ActionBasket::name), Some("melee"));

    engine.do_next_action(&mut (), &mut values);
    assert_eq!(action_name(&engine), Some("melee"));
}

#[test]
fn removed_strategy_stops_proposing() {
    let critical = Switch::new(true);
    let (mut engine, mut values) = engine_with(heal_and_dps(critical), test_config());
    engine.change_strategy("+heal,+dps,-heal").expect("strategies");

    engine.do_next_action(&mut (), &mut values);
    assert_eq!(action_name(&engine), Some("melee"));
    assert_eq!(engine.list_strategies(), "Strategies: dps");
}

#[test]
fn unsatisfiable_prerequisites_terminate_without_executing() {
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("a", || ScriptedAction::new("a").impossible())
        .register_action("b", || ScriptedAction::new("b").impossible())
        .register_strategy(
            Strategy::new("chain")
                .default_action("a", Tier::Normal)
                .node(ActionNodeDef::new("a").prerequisite("b")),
        );
    let config = EngineConfig {
        iterations_per_tick: 16,
        ..test_config()
    };
    let (mut engine, mut values) = engine_with(registry, config);
    engine.add_strategy("chain").expect("chain");

    let decision = engine.do_next_action(&mut (), &mut values);

    assert!(!decision.executed());
    let resolutions: Vec<&str> = engine
        .journal()
        .iter()
        .map(String::as_str)
        .filter(|entry| entry.starts_with("A:"))
        .collect();
    assert_eq!(
        resolutions,
        [
            "A:a - PREREQUISITES",
            "A:b - IMPOSSIBLE",
            "A:a - PREREQUISITES",
            "A:b - IMPOSSIBLE",
            "A:a - IMPOSSIBLE",
        ]
    );
    assert_eq!(engine.journal().last().map(String::as_str), Some("no action executed"));
}

#[test]
fn small_budget_still_terminates() {
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("a", || ScriptedAction::new("a").impossible())
        .register_action("b", || ScriptedAction::new("b").impossible())
        .register_strategy(
            Strategy::new("chain")
                .default_action("a", Tier::Normal)
                .node(ActionNodeDef::new("a").prerequisite("b")),
        );
    let config = EngineConfig {
        iterations_per_tick: 1,
        ..test_config()
    };
    let (mut engine, mut values) = engine_with(registry, config);
    engine.add_strategy("chain").expect("chain");

    assert!(!engine.do_next_action(&mut (), &mut values).executed());
    assert!(!engine.queue().is_empty());
}

#[test]
fn satisfied_prerequisite_lets_the_action_run() {
    let out_of_reach = Switch::new(true);
    let reach_switch = out_of_reach.clone();
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("melee", || ScriptedAction::new("melee"))
        .register_action("reach melee", move || {
            ScriptedAction::new("reach melee").useful_when(reach_switch.clone())
        })
        .register_strategy(
            Strategy::new("dps")
                .default_action("melee", Tier::Normal)
                .node(ActionNodeDef::new("melee").prerequisite("reach melee")),
        );
    let (mut engine, mut values) = engine_with(registry, test_config());
    engine.add_strategy("dps").expect("dps");

    let decision = engine.do_next_action(&mut (), &mut values);
    assert_eq!(action_name(&engine), Some("reach melee"));
    assert!((decision.relevance - 10.02).abs() < 1e-4);

    out_of_reach.set(false);
    let decision = engine.do_next_action(&mut (), &mut values);
    assert_eq!(action_name(&engine), Some("melee"));
    assert!((decision.relevance - 10.01).abs() < 1e-4);
}

#[test]
fn failure_falls_back_to_alternatives_in_the_same_pass() {
    let heals = Counter::default();
    let heal_counter = heals.clone();
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("emergency heal", move || {
            ScriptedAction::new("emergency heal")
                .failing()
                .counting(heal_counter.clone())
        })
        .register_action("healing potion", || ScriptedAction::new("healing potion"))
        .register_action("flee", || ScriptedAction::new("flee"))
        .register_trigger("critical health", || {
            FlagTrigger::new("critical health", Switch::new(true))
        })
        .register_strategy(
            Strategy::new("heal")
                .on("critical health", [("emergency heal", Tier::Emergency)])
                .node(
                    ActionNodeDef::new("emergency heal")
                        .alternative("healing potion")
                        .continuation("flee", None),
                ),
        );
    let (mut engine, mut values) = engine_with(registry, live_config());
    engine.add_strategy("heal").expect("heal");

    let decision = engine.do_next_action(&mut (), &mut values);

    assert_eq!(heals.get(), 1);
    assert_eq!(action_name(&engine), Some("healing potion"));
    assert!((decision.relevance - 90.03).abs() < 1e-4);
    assert_eq!(engine.carried().count(), 0);
}

#[test]
fn vetoed_action_counts_as_failed() {
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("melee", || ScriptedAction::new("melee"))
        .register_action("wait", || ScriptedAction::new("wait"))
        .register_strategy(Strategy::new("dps").default_action("melee", Tier::Normal))
        .register_strategy(Strategy::new("idle").default_action("wait", Priority::Exact(1.0)));
    let (mut engine, mut values) = engine_with(registry, test_config());
    engine.change_strategy("+dps,+idle").expect("strategies");

    let recorder = RecordingListener::new("recorder").vetoing("melee");
    let log = recorder.log();
    engine.add_listener(Box::new(recorder));

    engine.do_next_action(&mut (), &mut values);
    assert_eq!(action_name(&engine), Some("wait"));
    assert_eq!(
        log.entries(),
        [
            "before melee",
            "after melee false",
            "before wait",
            "allow wait",
            "after wait true",
        ]
    );

    assert!(engine.remove_listener("recorder"));
    engine.do_next_action(&mut (), &mut values);
    assert_eq!(action_name(&engine), Some("melee"));
}

#[test]
fn test_mode_suppresses_side_effects() {
    let executions = Counter::default();
    let counter = executions.clone();
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("melee", move || ScriptedAction::new("melee").counting(counter.clone()))
        .register_strategy(Strategy::new("dps").default_action("melee", Tier::Normal));
    let (mut engine, mut values) = engine_with(registry, test_config());
    engine.add_strategy("dps").expect("dps");

    assert!(engine.do_next_action(&mut (), &mut values).executed());
    assert_eq!(executions.get(), 0);
    assert!(engine.journal().iter().any(|entry| entry == "A:melee - OK"));

    engine.set_test_mode(false);
    engine.do_next_action(&mut (), &mut values);
    assert_eq!(executions.get(), 1);
}

struct Say {
    heard: Arc<Mutex<Vec<String>>>,
}

impl Action<()> for Say {
    fn name(&self) -> &str {
        "say"
    }

    fn execute(&mut self, _ctx: &mut ActionContext<'_, ()>, event: &Event) -> bool {
        let line = format!(
            "{} from {:?}",
            event.param().unwrap_or_default(),
            event.owner()
        );
        self.heard.lock().map(|mut heard| heard.push(line)).is_ok()
    }
}

#[test]
fn external_events_carry_their_parameter() {
    let heard = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&heard);
    let mut registry = BehaviorRegistry::new();
    registry
        .register_action("say", move || Say {
            heard: Arc::clone(&sink),
        })
        .register_event_trigger("talk")
        .register_strategy(Strategy::new("chat").on("talk", [("say", Tier::High)]));
    let (mut engine, mut values) = engine_with(registry, live_config());
    engine.add_strategy("chat").expect("chat");

    assert!(!engine.do_next_action(&mut (), &mut values).executed());

    assert!(engine.external_event(
        "talk",
        Event::empty().with_param("hello").with_owner(EntityId(42)),
    ));
    assert!(engine.do_next_action(&mut (), &mut values).executed());
    assert!(!engine.do_next_action(&mut (), &mut values).executed());

    let heard = heard.lock().map(|h| h.clone()).unwrap_or_default();
    assert_eq!(heard, ["hello from Some(EntityId(42))"]);
}

#[test]
fn queue_merge_and_selection_hold_for_arbitrary_pushes() {
    let names = ["melee", "flee", "heal", "loot", "wait"];
    let mut seed: u32 = 0x5eed;
    let mut next = move || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (seed >> 16) & 0x7fff
    };

    for _ in 0..50 {
        let mut queue = Queue::new();
        let mut best = std::collections::HashMap::new();
        for _ in 0..20 {
            let name = names[next() as usize % names.len()];
            let relevance = (next() % 10) as f32 * 10.0;
            queue.push(ActionBasket::new(ActionNode::new(name), relevance, Event::empty()));
            let entry = best.entry(name).or_insert(relevance);
            *entry = f32::max(*entry, relevance);
        }

        assert_eq!(queue.len(), best.len());
        let mut previous = f32::INFINITY;
        while let Some(basket) = queue.pop() {
            assert!(basket.relevance() <= previous);
            assert_eq!(Some(&basket.relevance()), best.get(basket.name()));
            assert!(!queue.contains(basket.name()));
            previous = basket.relevance();
        }
    }
}
