use gridlife_core::*;

fn grid(text: &str) -> Grid {
    Grid::parse(text).unwrap()
}

#[test]
fn glider_settles_into_a_block_in_the_corner() {
    let runner = SimulationRunner::new(SimulationConfig::default());

    let state = runner.run(PatternGenerator::new(Pattern::Glider, (0, 0)).generate((5, 5))).unwrap();

    assert_eq!(state.converged_at(), Some(12));
    assert_eq!(
        state.convergence_kind(),
        Some(ConvergenceKind::Cyclical { period: Some(1) })
    );
    assert_eq!(state.cells(), &grid(".....\n.....\n.....\n...##\n...##"));
    assert!(state.is_stable());
    assert_eq!(state.population(), 4);
}

#[test]
fn toad_reports_period_two() {
    let runner = SimulationRunner::new(SimulationConfig::default());
    let toad = PatternGenerator::centered(Pattern::Toad, (6, 6)).generate((6, 6));

    let state = runner.run(toad.clone()).unwrap();

    assert_eq!(state.converged_at(), Some(2));
    assert_eq!(
        state.convergence_kind(),
        Some(ConvergenceKind::Cyclical { period: Some(2) })
    );
    assert_eq!(state.cells(), &toad);
}

#[test]
fn runner_agrees_with_a_tick_by_tick_driver() {
    let rules = RuleSet::conway();
    let r_pentomino = [(7, 6), (8, 6), (6, 7), (7, 7), (7, 8)];
    let soup = Grid::from_live_cells((16, 16), &r_pentomino).unwrap();
    let runner = SimulationRunner::new(SimulationConfig::new(rules, 500));
    let engine = Engine::new(rules);

    let expected = runner.run(soup.clone()).unwrap();

    // A storage-backed caller steps once per request and keeps the history as JSON.
    let mut stored_grid = serde_json::to_string(&soup).unwrap();
    let mut stored_history = serde_json::to_string(&History::new()).unwrap();
    let mut generation = 0;
    let outcome = loop {
        let cells: Grid = serde_json::from_str(&stored_grid).unwrap();
        let mut history: History = serde_json::from_str(&stored_history).unwrap();

        let outcome = check_convergence(&cells, &history);
        if let Some(kind) = outcome.kind_at(generation) {
            break (generation, kind, cells);
        }

        history.record_grid(&cells);
        stored_grid = serde_json::to_string(&engine.step(&cells)).unwrap();
        stored_history = serde_json::to_string(&history).unwrap();
        generation += 1;
    };

    assert_eq!(Some(outcome.0), expected.converged_at());
    assert_eq!(Some(outcome.1), expected.convergence_kind());
    assert_eq!(&outcome.2, expected.cells());
    assert_eq!(outcome.0, 47);
}

#[test]
fn jump_queries_can_land_mid_cycle() {
    let engine = Engine::new(RuleSet::conway());
    let blinker = PatternGenerator::centered(Pattern::Blinker, (3, 3)).generate((3, 3));

    // Generation 2 would be terminal for the runner, but jumps keep stepping.
    let odd = engine.jump(&blinker, 101);
    let even = engine.jump(&blinker, 100);

    assert_eq!(odd.cells(), &grid(".#.\n.#.\n.#."));
    assert_eq!(even.cells(), &blinker);
    assert_eq!(odd.generation(), 101);
    assert_eq!(odd.convergence(), None);
}

#[test]
fn stable_flag_is_idempotent_under_every_preset() {
    for preset in Preset::ALL {
        let engine = Engine::new(preset.rules());
        let mut state = RandomGridGenerator::new(5, 0.5).generate((12, 12));

        for _ in 0..64 {
            if engine.is_stable(&state) {
                let next = engine.step(&state);
                assert_eq!(engine.step(&next), next, "{preset:?}");
            }
            state = engine.step(&state);
        }
    }
}

#[test]
fn timeout_leaves_the_final_state_to_the_caller() {
    let runner = SimulationRunner::new(SimulationConfig::default().with_max_iterations(3));
    let glider = PatternGenerator::new(Pattern::Glider, (0, 0)).generate((10, 10));

    let err = runner.run(glider.clone()).unwrap_err();

    let RunError::Timeout { state } = err else {
        panic!("expected timeout, got {err:?}");
    };
    assert_eq!(state.generation(), 3);
    assert_eq!(state.cells(), &Engine::new(RuleSet::conway()).state_at_generation(&glider, 3));
}
