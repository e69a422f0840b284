//! Property tests for maze generation, ray casting and movement

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use maze_gunner::consts::{MAX_RAY_DISTANCE, PLAYER_CLEARANCE};
use maze_gunner::sim::{
    Cell, bfs_depths, can_occupy, cast, cell_center, farthest_cell, generate, try_move,
};

proptest! {
    #[test]
    fn border_is_wall_and_every_open_cell_is_reachable(
        seed in any::<u64>(),
        width in 5usize..32,
        height in 5usize..32,
    ) {
        let maze = generate(width, height, &mut Pcg32::seed_from_u64(seed));
        let grid = &maze.grid;
        prop_assert_eq!(grid.width(), width);
        prop_assert_eq!(grid.height(), height);

        for x in 0..width {
            prop_assert_eq!(grid.get(x, 0), Cell::Wall);
            prop_assert_eq!(grid.get(x, height - 1), Cell::Wall);
        }
        for y in 0..height {
            prop_assert_eq!(grid.get(0, y), Cell::Wall);
            prop_assert_eq!(grid.get(width - 1, y), Cell::Wall);
        }

        let depths = bfs_depths(grid, maze.start);
        for (x, y) in grid.open_cells() {
            prop_assert!(depths[y * width + x].is_some(), "({}, {}) unreachable", x, y);
        }
    }

    #[test]
    fn exit_is_a_farthest_cell(seed in any::<u64>(), size in 5usize..24) {
        let maze = generate(size, size, &mut Pcg32::seed_from_u64(seed));
        let depths = bfs_depths(&maze.grid, maze.start);
        let max = depths.iter().flatten().max().copied();
        let exit_depth = depths[maze.exit.1 * size + maze.exit.0];
        prop_assert_eq!(exit_depth, max);
        prop_assert_eq!(maze.exit, farthest_cell(&maze.grid, maze.start));
    }

    #[test]
    fn rays_stop_inside_the_view_distance(
        seed in any::<u64>(),
        angle in -10.0f32..10.0,
    ) {
        let maze = generate(16, 16, &mut Pcg32::seed_from_u64(seed));
        let hit = cast(cell_center(maze.start), angle, &maze.grid);
        prop_assert!(hit.distance > 0.0);
        prop_assert!(hit.distance <= MAX_RAY_DISTANCE);
        // A closed 16x16 maze always returns a wall well before the limit
        prop_assert!(hit.is_hit());
    }

    #[test]
    fn movement_never_enters_walls(
        seed in any::<u64>(),
        moves in prop::collection::vec((-0.3f32..0.3, -0.3f32..0.3), 1..200),
    ) {
        let maze = generate(12, 12, &mut Pcg32::seed_from_u64(seed));
        let mut pos = cell_center(maze.start);
        for (dx, dy) in moves {
            pos = try_move(pos, Vec2::new(dx, dy), &maze.grid, PLAYER_CLEARANCE).pos;
            prop_assert!(can_occupy(pos, &maze.grid, PLAYER_CLEARANCE));
        }
    }
}
