//! Route-finding demo: generate a random world, place settlements, and run
//! path queries under different cost policies.
//!
//! Run with `RUST_LOG=debug` to see the engine's termination logging.

use caravel_core::Point;
use caravel_map::mapgen::WorldGen;
use caravel_map::{PlayerId, Relations, Rules, SettlementKind, TileMap, Unit};
use caravel_paths::{
    CostPolicy, GoalDecider, GoalExpr, Path, PathFinder, PathQuery, SearchContext,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const CROWN: PlayerId = PlayerId(0);
const NATIVES: PlayerId = PlayerId(1);

fn main() {
    env_logger::init();

    let mut worldgen = WorldGen::new(StdRng::seed_from_u64(0xCA11A5));
    let mut map = worldgen.generate(48, 20, 0.45);

    let land: Vec<Point> = map.bounds().iter().filter(|&p| map.is_land(p)).collect();
    if land.len() < 3 {
        eprintln!("world came up nearly all ocean; try another seed");
        return;
    }
    let start = land[0];
    let colony_site = land[land.len() - 1];
    let village_site = land[land.len() / 2];

    map.add_settlement(colony_site, SettlementKind::Colony, CROWN, "New Harbor");
    if village_site != start && village_site != colony_site {
        map.add_settlement(
            village_site,
            SettlementKind::NativeSettlement,
            NATIVES,
            "Three Rivers",
        );
    }

    let rules = Rules::default();
    let mut relations = Relations::new();
    relations.add_contact(CROWN, NATIVES);
    let ctx = SearchContext::new(&map, &rules, &relations);

    let scout = Unit::land(CROWN, 4);
    let trader = Unit::land(CROWN, 4).with_cargo(2);
    let mut finder = PathFinder::new();

    println!("scout from {start} to the colony at {colony_site}:");
    match finder.find_path(&ctx, PathQuery::to_tile(&scout, start, colony_site)) {
        Ok(Some(path)) => {
            render(&map, &path);
            println!(
                "{} moves, {} movement points, {} turn(s) beyond this one\n",
                path.moves(),
                path.total_cost(),
                path.total_turns()
            );
        }
        Ok(None) => println!("no overland route; the colony is on another landmass\n"),
        Err(e) => eprintln!("bad query: {e}"),
    }

    println!("trader from {start} to the nearest native settlement:");
    let goal = GoalDecider::new(GoalExpr::NativeSettlement);
    let query = PathQuery::to_goal(&trader, start, goal).with_policy(CostPolicy::AvoidIllegal);
    match finder.find_path(&ctx, query) {
        Ok(Some(path)) => {
            render(&map, &path);
            println!(
                "{} moves, {} turn(s) beyond this one\n",
                path.moves(),
                path.total_turns()
            );
        }
        Ok(None) => println!("no native settlement within reach\n"),
        Err(e) => eprintln!("bad query: {e}"),
    }
}

/// Print the map with the route overlaid.
fn render(map: &TileMap, path: &Path) {
    let on_path: Vec<Point> = path.steps().iter().map(|s| s.pos).collect();
    let bounds = map.bounds();
    for y in bounds.min.y..bounds.max.y {
        let mut row = String::with_capacity(bounds.width() as usize);
        for x in bounds.min.x..bounds.max.x {
            let p = Point::new(x, y);
            let c = if let Some(id) = map.settlement_at(p) {
                match map.settlement(id).map(|s| s.kind) {
                    Some(SettlementKind::Colony) => 'C',
                    Some(SettlementKind::NativeSettlement) => 'V',
                    None => '?',
                }
            } else if on_path.contains(&p) {
                '*'
            } else {
                map.tile(p).map_or(' ', |t| t.terrain.rune())
            };
            row.push(c);
        }
        println!("{row}");
    }
}
