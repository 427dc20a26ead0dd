use anyhow::Result;
use sigrl::{build_agent, run, SignalRlConfig};
use sigrl_core::record::BufferedRecorder;
use sigrl_linear_agent::{LinearQ, QFunction};
use sigrl_sumo_env::mock::{MockConfig, MockConnector};

type Config = SignalRlConfig<MockConnector>;

fn config(mock: MockConfig, n_episodes: usize) -> Config {
    let mut config = Config::default();
    config.env = config.env.connector(mock);
    config.trainer = config
        .trainer
        .n_episodes(n_episodes)
        .max_steps_per_episode(1000);
    config
}

#[test]
fn test_empty_intersection_episode() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mock = MockConfig::default();
    let probe = mock.probe.clone();
    let mut config = config(mock, 1);
    config.trainer = config.trainer.record_step_interval(1);
    let mut agent = build_agent(&config)?;
    let mut recorder = BufferedRecorder::new();

    let report = run(&config, &config.env, &mut agent, &mut recorder)?;

    assert_eq!(report.stats.steps(), &[999]);
    assert_eq!(report.stats.returns(), &[0.0]);
    assert_eq!(report.eval.get_scalar("eval_return")?, 0.0);
    assert_eq!(report.eval.get_scalar("eval_steps")?, 1000.0);

    // Zero observations give zero gradients, so the weights never left their initial values.
    let initial = LinearQ::build(config.agent.model_config.clone())?;
    assert_eq!(agent.qfunc().weights(), initial.weights());
    assert_eq!(agent.n_opts(), 999);
    assert_eq!(agent.eps(), 0.1);

    let counts = probe.counts();
    assert_eq!(counts.connects, 2);
    assert_eq!(counts.closes, 2);
    assert_eq!(counts.phases.len(), 999 + 1000);
    assert_eq!(counts.sim_steps, 50 * (999 + 1000));
    assert!(counts.phases.iter().all(|&p| p < 6));

    // Every step observes the all-zero state and earns no reward.
    let step_records: Vec<_> = recorder
        .iter()
        .filter(|r| r.get_scalar("step").is_ok())
        .collect();
    assert_eq!(step_records.len(), 999);
    for record in step_records.iter() {
        assert_eq!(record.get_array1("obs")?, vec![0.0; 4]);
        assert_eq!(record.get_scalar("reward")?, 0.0);
        assert_eq!(record.get_scalar("loss")?, 0.0);
    }

    let record = recorder.iter().last().unwrap();
    assert_eq!(record.get_scalar("steps")?, 999.0);
    assert_eq!(record.get_scalar("epsilon")?, 0.1);
    Ok(())
}

#[test]
fn test_epsilon_decays_once_per_episode() -> Result<()> {
    let config = config(MockConfig::default(), 3);
    let mut agent = build_agent(&config)?;

    let report = run(&config, &config.env, &mut agent, &mut BufferedRecorder::new())?;

    assert_eq!(report.stats.steps(), &[999, 999, 999]);
    assert_eq!(agent.eps(), 1.0 / (2.0 / 50.0 + 10.0));
    Ok(())
}

#[test]
fn test_learning_from_queues() -> Result<()> {
    let mock = MockConfig::default().readings(vec![
        vec![8, 0, 0, 4],
        vec![0, 0, 2, 0],
        vec![3, 9, 0, 0],
    ]);
    let config = config(mock, 2);
    let mut agent = build_agent(&config)?;

    let report = run(&config, &config.env, &mut agent, &mut BufferedRecorder::new())?;

    let initial = LinearQ::build(config.agent.model_config.clone())?;
    assert_ne!(agent.qfunc().weights(), initial.weights());
    assert_eq!(report.stats.len(), 2);
    Ok(())
}

#[test]
fn test_connection_released_when_simulation_fails() -> Result<()> {
    let mock = MockConfig::default().fail_after_phases(10);
    let probe = mock.probe.clone();
    let config = config(mock, 5);
    let mut agent = build_agent(&config)?;

    let result = run(&config, &config.env, &mut agent, &mut BufferedRecorder::new());

    assert!(result.is_err());
    let counts = probe.counts();
    assert_eq!(counts.connects, 1);
    assert_eq!(counts.closes, 1);
    assert_eq!(counts.phases.len(), 10);
    assert_eq!(agent.n_opts(), 10);
    Ok(())
}

#[test]
fn test_invalid_phase_ends_training() -> Result<()> {
    let mock = MockConfig::default().n_phases(4);
    let probe = mock.probe.clone();
    let mut config = config(mock, 50);
    config.agent.explorer = config.agent.explorer.eps(1.0);
    let mut agent = build_agent(&config)?;

    let result = run(&config, &config.env, &mut agent, &mut BufferedRecorder::new());

    assert!(result.is_err());
    let counts = probe.counts();
    assert_eq!(counts.connects, counts.closes);
    Ok(())
}
