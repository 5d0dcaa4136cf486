use snake_arena::app::clock_seed;
use snake_arena::config::GameConfig;
use snake_arena::grid::Cell;
use snake_arena::sim::{GameMode, Simulation};

fn layout(seed: u64) -> (Option<Cell>, Vec<Cell>) {
    macroquad::rand::srand(seed);
    let sim = Simulation::new(&GameConfig::default(), GameMode::Obstacles).expect("round setup");
    let mut obstacles: Vec<Cell> = sim.obstacles().iter().copied().collect();
    obstacles.sort_by_key(|c| (c.x, c.y));
    (sim.food(), obstacles)
}

// Only test in this binary that touches the shared generator.
#[test]
fn seed_decides_obstacles_and_food() {
    let first = layout(1);
    assert_eq!(layout(1), first);
    assert_ne!(layout(2), first);
    assert_ne!(layout(0xdead_beef), first);
}

#[test]
fn clock_seed_moves_with_time() {
    let a = clock_seed();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let b = clock_seed();
    assert_ne!(a, 0);
    assert!(b > a);
}
