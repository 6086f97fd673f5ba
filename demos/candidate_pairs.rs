//! Collect candidate pairs and narrow them down with a custom predicate.
use gridphase::prelude::*;

fn main() {
    let mut grid = SpatialGrid::new(64.0).unwrap();

    // Circles stored by the caller; the grid only sees their bounding boxes
    let circles = [
        (DVec2::new(10.0, 10.0), 8.0),
        (DVec2::new(22.0, 10.0), 5.0),
        (DVec2::new(40.0, 40.0), 3.0),
        (DVec2::new(900.0, 900.0), 4.0),
    ];
    for (i, &(center, radius)) in circles.iter().enumerate() {
        let aabb = Aabb::from_center_half_extents(center, DVec2::splat(radius));
        grid.insert(Handle(i as u32), aabb).unwrap();
    }

    let candidates: Vec<_> = grid.candidate_pairs().collect();
    println!("Candidates: {:?}", candidates);
    assert_eq!(candidates.len(), 3, "Circles 0, 1 and 2 share cell (0, 0)");

    let hits = grid.overlapping_pairs(|a, _, b, _| {
        let (ca, ra) = circles[a.0 as usize];
        let (cb, rb) = circles[b.0 as usize];
        ca.distance(cb) <= ra + rb
    });
    println!("Circle contacts: {:?}", hits);
    assert_eq!(hits, vec![(Handle(0), Handle(1))]);
}
