use suite::{load, EnvironmentOptions, ObsValue, Registry, Spec, SuiteError, TaskOptions};

fn seeded(seed: u64) -> TaskOptions {
    TaskOptions { random: Some(seed), ..TaskOptions::default() }
}

fn is_sky(p: &image::Rgb<u8>) -> bool {
    p.0[2] > p.0[1] && p.0[2] > p.0[0]
}

#[test]
fn default_registry_lists_reference_tasks() {
    let registry = Registry::with_defaults();
    let tasks = registry.tasks();
    assert!(tasks.contains(&("cartpole", "balance")));
    assert!(tasks.contains(&("cartpole", "swingup")));
    assert!(tasks.contains(&("point_mass", "easy")));
}

#[test]
fn unknown_task_is_an_error() {
    let err = load("humanoid", "run", &seeded(0), false, &EnvironmentOptions::default()).err();
    assert!(matches!(err, Some(SuiteError::UnknownTask { .. })));
}

#[test]
fn cartpole_episode_structure() {
    let mut env = load("cartpole", "swingup", &seeded(1), false, &EnvironmentOptions::default()).unwrap();
    let first = env.reset();
    assert!(first.first());
    assert_eq!(first.reward, None);
    assert_eq!(first.discount, None);

    let names: Vec<&str> = first.observation.iter().map(|(k, _)| k).collect();
    assert_eq!(names, ["position", "velocity"]);

    let step = env.step(&[0.3]).unwrap();
    assert!(step.mid());
    let reward = step.reward.unwrap();
    assert!((0.0..=1.0).contains(&reward));
    assert_eq!(step.discount, Some(1.0));
}

#[test]
fn episode_ends_at_time_limit_and_restarts() {
    let task = TaskOptions { random: Some(2), time_limit: Some(0.05) };
    let mut env = load("cartpole", "balance", &task, false, &EnvironmentOptions::default()).unwrap();
    env.reset();
    let mut steps = 0;
    loop {
        let ts = env.step(&[0.0]).unwrap();
        steps += 1;
        if ts.last() {
            assert_eq!(ts.discount, Some(1.0));
            break;
        }
    }
    assert_eq!(steps, 5);
    assert!(env.step(&[0.0]).unwrap().first());
}

#[test]
fn wrong_action_size_is_rejected() {
    let mut env = load("point_mass", "easy", &seeded(0), false, &EnvironmentOptions::default()).unwrap();
    env.reset();
    assert!(matches!(env.step(&[0.1]), Err(SuiteError::ActionShape { expected: 2, actual: 1 })));
}

#[test]
fn same_seed_same_initial_state() {
    let opts = EnvironmentOptions::default();
    let mut a = load("cartpole", "swingup", &seeded(11), false, &opts).unwrap();
    let mut b = load("cartpole", "swingup", &seeded(11), false, &opts).unwrap();
    assert_eq!(a.reset(), b.reset());
    assert_eq!(a.physics().get_state(), b.physics().get_state());
}

#[test]
fn sub_steps_scale_control_timestep() {
    let opts = EnvironmentOptions { n_sub_steps: Some(4), ..EnvironmentOptions::default() };
    let env = load("cartpole", "balance", &seeded(0), false, &opts).unwrap();
    approx::assert_relative_eq!(env.control_timestep(), 0.04, epsilon = 1e-12);
}

#[test]
fn flat_observation_merges_entries() {
    let opts = EnvironmentOptions { flat_observation: true, ..EnvironmentOptions::default() };
    let mut env = load("cartpole", "balance", &seeded(0), false, &opts).unwrap();
    let spec = env.observation_spec();
    assert_eq!(spec.len(), 1);
    assert_eq!(spec[0].0, "observations");
    assert!(matches!(&spec[0].1, Spec::Array(s) if s.shape == vec![5]));

    let ts = env.reset();
    match ts.observation.get("observations") {
        Some(ObsValue::Array(a)) => assert_eq!(a.len(), 5),
        other => panic!("unexpected observation {other:?}"),
    }
}

#[test]
fn frames_have_sky_above_and_floor_below() {
    let mut env = load("cartpole", "balance", &seeded(0), false, &EnvironmentOptions::default()).unwrap();
    env.reset();
    let frame = env.physics().render(64, 48, 0).unwrap();
    assert_eq!(frame.dimensions(), (48, 64));
    assert!(is_sky(frame.get_pixel(2, 1)));
    assert!(!is_sky(frame.get_pixel(2, 62)));
}

#[test]
fn unknown_camera_is_rejected() {
    let env = load("point_mass", "easy", &seeded(0), false, &EnvironmentOptions::default()).unwrap();
    assert!(matches!(env.physics().render(8, 8, 7), Err(SuiteError::InvalidCamera(7))));
}

#[test]
fn options_deserialize_with_defaults() {
    let task: TaskOptions = serde_json::from_str(r#"{"random": 5}"#).unwrap();
    assert_eq!(task.random, Some(5));
    assert_eq!(task.time_limit, None);
    let env: EnvironmentOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(env, EnvironmentOptions::default());
}
