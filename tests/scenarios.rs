use ndarray::{Array2, Axis};
use polyseg_gym::envs::segmentation::{ACTIVE, COMMITTED, CURSOR};
use polyseg_gym::{Action, CyclingGenerator, Env, EnvConfig, EnvError, PenState, Sample, SegmentationEnv};

fn blank_env(h: usize, w: usize) -> SegmentationEnv<CyclingGenerator> {
    let sample = Sample::grayscale(Array2::zeros((h, w)), Array2::zeros((h, w)));
    SegmentationEnv::new(EnvConfig::new(h, w), CyclingGenerator::repeat(sample)).expect("valid config")
}

#[test]
fn square_on_blank_canvas() {
    let mut env = blank_env(4, 4);
    env.reset(None).expect("reset");

    let s = env.step(Action::pen_down(0, 0)).expect("open");
    assert_eq!(s.reward, 0.0);
    assert!(!s.terminated);
    assert_eq!(env.pen_state(), PenState::Down);

    let s = env.step(Action::pen_down(0, 3)).expect("top edge");
    assert_eq!(s.reward, 0.0);
    env.step(Action::pen_down(3, 3)).expect("right edge");

    let s = env.step(Action::pen_up(3, 0)).expect("close");
    // Empty ground truth against a non-empty drawing: IoU is 0.
    assert_eq!(s.reward, 0.0);
    assert!(!s.terminated);
    assert_eq!(env.pen_state(), PenState::Up);
    assert_eq!(env.first_vertex(), None);

    let committed = env.channel(COMMITTED);
    for (x, y) in [(0, 0), (0, 3), (3, 3), (3, 0)] {
        assert_eq!(committed[[x, y]], 1, "vertex ({x}, {y}) committed");
    }
    assert!(committed.iter().all(|&v| v == 0 || v == 1));
    assert_eq!(env.channel(ACTIVE).sum(), 0);
    assert_eq!(env.channel(CURSOR).sum(), 0);
}

#[test]
fn pen_up_while_up_is_penalized_noop() {
    let mut env = blank_env(5, 5);
    env.reset(None).expect("reset");
    let before = env.state_map().clone();
    for _ in 0..3 {
        let s = env.step(Action::pen_up(2, 2)).expect("step");
        assert_eq!(s.reward, -1.0);
        assert!(!s.terminated);
        assert_eq!(env.state_map(), &before);
        assert_eq!(env.pen_state(), PenState::Up);
    }
}

#[test]
fn finish_while_up_terminates_without_drawing() {
    let mut env = blank_env(5, 5);
    env.reset(None).expect("reset");
    env.step(Action::pen_down(1, 1)).expect("open");
    env.step(Action::pen_down(1, 3)).expect("edge");
    env.step(Action::pen_up(3, 3)).expect("close");
    let committed = env.channel(COMMITTED).to_owned();

    let s = env.step(Action::finish(4, 4)).expect("finish");
    assert_eq!(s.reward, -1.0);
    assert!(s.terminated);
    assert_eq!(env.channel(COMMITTED), committed);
    assert_eq!(env.channel(ACTIVE).sum(), 0);
    assert!(matches!(env.step(Action::pen_up(0, 0)), Err(EnvError::EpisodeFinished)));
}

#[test]
fn observation_stacks_image_and_state() {
    let image = Array2::from_shape_fn((3, 4), |(r, c)| (r * 4 + c) as f32);
    let sample = Sample::grayscale(image.clone(), Array2::zeros((3, 4)));
    let mut env = SegmentationEnv::new(EnvConfig::new(3, 4), CyclingGenerator::repeat(sample)).expect("valid");
    let (obs, _) = env.reset(None).expect("reset");
    assert_eq!(obs.dim(), (4, 3, 4));
    assert_eq!(obs.index_axis(Axis(0), 0), image);

    let s = env.step(Action::pen_down(2, 1)).expect("open");
    assert_eq!(s.observation[[1 + ACTIVE, 2, 1]], 1.0);
    assert_eq!(s.observation[[1 + CURSOR, 2, 1]], 1.0);
    assert_eq!(s.observation, env.observation().expect("obs"));
}

#[test]
fn reset_with_wrong_image_shape_fails() {
    let sample = Sample::grayscale(Array2::zeros((8, 8)), Array2::zeros((4, 4)));
    let mut env = SegmentationEnv::new(EnvConfig::new(4, 4), CyclingGenerator::repeat(sample)).expect("valid");
    assert!(matches!(env.reset(None), Err(EnvError::ShapeMismatch { what: "image", .. })));
}
