use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use traffic_router::{
    Oneway, Penalty, PenaltyDirection, RoadNetwork, RouteMode, RouteRequest, Router,
    StreetAttributes, StreetId, StreetPosition,
};

/// The number of intersections along each side of the grid.
const GRID_SIZE: i32 = 100;

/// The distance between adjacent intersections, in cm.
const BLOCK_LENGTH: i32 = 10_000;

fn main() {
    env_logger::init();

    let (net, streets) = build_grid();
    let speed_cap = net.max_speed_limit().unwrap_or(1) as f64;
    let router = Router::new(Arc::new(net));
    let num_threads = std::thread::available_parallelism().map_or(1, |n| n.get());
    println!(
        "Routing on a {0}x{0} grid with {1} streets using {2} threads...",
        GRID_SIZE,
        streets.len(),
        num_threads
    );

    const NUM_ROUTES: usize = 200;
    loop {
        let start = Instant::now();
        let found = std::thread::scope(|s| {
            let handles = (0..num_threads)
                .map(|thread| {
                    let router = &router;
                    let streets = &streets;
                    s.spawn(move || {
                        reroute_vehicles(router, streets, speed_cap, thread as u64, NUM_ROUTES)
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(0))
                .sum::<usize>()
        });
        let total = NUM_ROUTES * num_threads;
        let per_route = start.elapsed() / total as u32;
        println!(
            "Avg. route: {:?} --> {:.0} routes/s ({} of {} reachable)",
            per_route,
            1.0 / per_route.as_secs_f64() * num_threads as f64,
            found,
            total
        );
    }
}

/// Builds a grid of two-way streets, where every fifth avenue is a faster one-way street.
fn build_grid() -> (RoadNetwork, Vec<StreetId>) {
    let mut net = RoadNetwork::new();
    let nodes = (0..GRID_SIZE)
        .flat_map(|y| (0..GRID_SIZE).map(move |x| (x, y)))
        .map(|(x, y)| net.add_node(x * BLOCK_LENGTH, y * BLOCK_LENGTH))
        .collect::<Vec<_>>();
    let node = |x: i32, y: i32| nodes[(y * GRID_SIZE + x) as usize];

    let mut streets = vec![];
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            if x + 1 < GRID_SIZE {
                streets.push(net.add_street(&StreetAttributes {
                    start: node(x, y),
                    end: node(x + 1, y),
                    length: None,
                    speed_limit: Some(if y % 5 == 0 { 2222 } else { 1389 }),
                    oneway: if y % 5 == 0 { Oneway::Forward } else { Oneway::Both },
                }));
            }
            if y + 1 < GRID_SIZE {
                streets.push(net.add_street(&StreetAttributes {
                    start: node(x, y),
                    end: node(x, y + 1),
                    length: None,
                    speed_limit: Some(1389),
                    oneway: Oneway::Both,
                }));
            }
        }
    }
    (net, streets)
}

/// Routes a batch of vehicles between random positions, returning how many routes were found.
fn reroute_vehicles(
    router: &Router<RoadNetwork>,
    streets: &[StreetId],
    speed_cap: f64,
    seed: u64,
    count: usize,
) -> usize {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let position = |rng: &mut rand::rngs::StdRng| {
        let street = streets[rng.gen_range(0..streets.len())];
        StreetPosition::new(street, rng.gen_range(0..=BLOCK_LENGTH as u32))
    };
    let penalties = (0..20)
        .map(|_| Penalty {
            street: streets[rng.gen_range(0..streets.len())],
            direction: PenaltyDirection::Both,
            magnitude: 50_000,
            expires_at: None,
        })
        .collect::<Vec<_>>();

    (0..count)
        .filter(|_| {
            let request = RouteRequest::new(position(&mut rng), position(&mut rng))
                .mode(RouteMode::Time)
                .speed_cap(speed_cap)
                .penalties(&penalties);
            match router.route(&request) {
                Ok(route) => route.is_some(),
                Err(err) => {
                    log::error!("{}", err);
                    false
                }
            }
        })
        .count()
}
