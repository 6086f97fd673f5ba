//! Drive a crowd of moving boxes through the grid for a few steps and watch the
//! diagnostics.
use gridphase::prelude::*;

fn main() {
    let config = GridConfig::new(GridConfig::recommended_cell_size(4.0)).with_hysteresis(0.1);
    let mut grid = SpatialGrid::with_config(config).unwrap();

    let mut bodies: Vec<(DVec2, DVec2)> = (0..400)
        .map(|i| {
            let f = f64::from(i);
            let pos = DVec2::new((f * 37.0) % 200.0, (f * 91.0) % 200.0);
            let vel = DVec2::new((f * 0.13).sin(), (f * 0.29).cos());
            (pos, vel)
        })
        .collect();
    let half = DVec2::splat(2.0);

    for (i, (pos, _)) in bodies.iter().enumerate() {
        grid.insert(Handle(i as u32), Aabb::from_center_half_extents(*pos, half)).unwrap();
    }

    for step in 0..5 {
        let writes = grid.diagnostics().bucket_writes;
        for (i, (pos, vel)) in bodies.iter_mut().enumerate() {
            *pos += *vel;
            grid.update(Handle(i as u32), Aabb::from_center_half_extents(*pos, half)).unwrap();
        }
        let contacts = grid.overlapping_aabb_pairs();
        let d = grid.diagnostics();
        println!(
            "step {step}: {} candidates, {} contacts, {} bucket writes, {} cells, longest chain {}",
            grid.candidate_pairs().count(),
            contacts.len(),
            d.bucket_writes - writes,
            d.occupied_cells,
            d.max_chain_length
        );
        assert!(!d.is_degraded(config.chain_warning_threshold), "Cell size keeps buckets short");
    }
}
