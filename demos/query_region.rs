//! Find objects whose cells touch a query rectangle.
use gridphase::prelude::*;

fn main() {
    let mut grid = SpatialGrid::new(10.0).unwrap();
    grid.insert(Handle(0), Aabb::from_coords(0.0, 0.0, 1.0, 1.0)).unwrap();   // cell (0, 0)
    grid.insert(Handle(1), Aabb::from_coords(25.0, 25.0, 26.0, 26.0)).unwrap(); // cell (2, 2)
    grid.insert(Handle(2), Aabb::from_coords(-5.0, 5.0, 5.0, 6.0)).unwrap();   // cells (-1, 0), (0, 0)

    let results = grid.query_region(&Aabb::from_coords(7.0, 7.0, 8.0, 8.0));
    println!("Candidates near (7, 7): {:?}", results);

    // Cell (0, 0) holds boxes 0 and 2; neither truly overlaps the query, the caller
    // narrow-phase tests them
    assert_eq!(results, vec![Handle(0), Handle(2)]);
    assert!(!results.contains(&Handle(1)), "Box 1 is two cells away");

    let circle = grid.query_circle(DVec2::new(25.5, 25.5), 2.0);
    println!("Candidates within the circle: {:?}", circle);
    assert_eq!(circle, vec![Handle(1)]);
}
