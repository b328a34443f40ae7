use behavior_engine::EntityId;
use botsim_client::Simulation;
use botsim_client::arena::Team;
use botsim_client::config::ClientConfig;
use runtime::{BotState, RuntimeConfig};

fn client(team_size: u32) -> ClientConfig {
    ClientConfig {
        team_size,
        ..ClientConfig::default()
    }
}

fn position(simulation: &Simulation, id: u64) -> Option<i32> {
    simulation.arena().unit(EntityId(id)).map(|u| u.position)
}

#[test]
fn idle_fighters_charge_each_other() {
    let mut simulation = Simulation::builder()
        .client(client(1))
        .build()
        .expect("simulation");

    let (decisions, _) = simulation.step();
    assert_eq!(decisions, 2);
    assert_eq!(position(&simulation, 1), Some(-3));
    assert_eq!(position(&simulation, 2), Some(3));
}

#[test]
fn teams_meet_and_fight() {
    let mut simulation = Simulation::builder()
        .client(client(2))
        .build()
        .expect("simulation");

    let summary = simulation.run(150);

    assert!(summary.decisions > 0);
    assert!(summary.state_changes >= 4);
    let wounded = simulation
        .arena()
        .units()
        .filter(|u| u.health < u.max_health)
        .count();
    assert!(wounded > 0);
    assert!(simulation.roster().iter().any(|agent| agent.state() != BotState::NonCombat));
}

#[test]
fn test_mode_leaves_the_arena_untouched() {
    let mut runtime = RuntimeConfig::default();
    runtime.engine.test_mode = true;

    let mut simulation = Simulation::builder()
        .runtime(runtime)
        .client(client(2))
        .build()
        .expect("simulation");
    let before: Vec<_> = simulation.arena().units().cloned().collect();

    let summary = simulation.run(20);

    assert!(summary.decisions > 0);
    assert_eq!(summary.state_changes, 0);
    let after: Vec<_> = simulation.arena().units().cloned().collect();
    assert_eq!(before, after);
    assert_eq!(summary.red_alive, 2);
    assert_eq!(summary.blue_alive, 2);

    let journal = simulation
        .roster()
        .get(EntityId(1))
        .expect("agent")
        .engine(BotState::NonCombat)
        .journal()
        .to_vec();
    assert!(journal.iter().any(|entry| entry == "A:charge - OK"));
}

#[test]
fn broadcast_attack_command_triggers_charge() {
    let mut simulation = Simulation::builder()
        .client(ClientConfig {
            commands: vec!["attack now".to_owned()],
            ..client(1)
        })
        .build()
        .expect("simulation");

    simulation.step();

    let agent = simulation.roster().get(EntityId(1)).expect("agent");
    let engine = agent.engine(BotState::NonCombat);
    assert_eq!(engine.last_action().map(|a| a.as_str()), Some("charge"));
    assert_eq!(engine.last_relevance(), 20.0);
    assert_eq!(simulation.arena().alive(Team::Red), 1);
}
