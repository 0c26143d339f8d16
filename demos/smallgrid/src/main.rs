//! smallgrid — smallest example for the rust_mapf simulation framework.
//!
//! 12 cars navigate a 16×16 grid toward a central 4×4 target zone while the
//! environment drifts under them.  Scale comment: bump GRID_SIDE and
//! AGENT_COUNT (and enable the `parallel` feature on mapf-sim) to run
//! thousands of agents on a many-core workstation.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use mapf_behavior::Navigator;
use mapf_core::{Algorithm, SimConfig};
use mapf_output::{CsvWriter, SimOutputObserver};
use mapf_sim::SimBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_SIDE:             u16   = 16;
const TARGET_ZONE_SIDE:      u16   = 4;
const AGENT_COUNT:           usize = 12;
const LEADER_COUNT:          usize = 2;
const FOLLOWER_COUNT:        usize = 4;
const SEED:                  u64   = 42;
const TOTAL_TICKS:           u64   = 300;
const OUTPUT_INTERVAL_TICKS: u64   = 1; // snapshot every tick (captures movement)

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== smallgrid — rust_mapf pathfinding sim ===");
    println!("Agents: {AGENT_COUNT}  |  Grid: {GRID_SIDE}×{GRID_SIDE}  |  Seed: {SEED}");
    println!();

    // 1. Sim config.
    let config = SimConfig {
        rows:                     GRID_SIDE,
        cols:                     GRID_SIDE,
        target_zone_size:         TARGET_ZONE_SIDE,
        obstacle_density:         0.12,
        drift_probability:        0.3,
        cost_min:                 1.0,
        cost_max:                 4.0,
        cost_ceiling:             3.0,
        agent_count:              AGENT_COUNT,
        leader_count:             LEADER_COUNT,
        follower_count:           FOLLOWER_COUNT,
        epsilon:                  0.2,
        alpha:                    0.1,
        epsilon_decay:            0.95,
        synergy_window_ticks:     15,
        broadcast_interval_ticks: 5,
        total_ticks:              TOTAL_TICKS,
        seed:                     SEED,
        num_threads:              None, // all logical cores (with the parallel feature)
        output_interval_ticks:    OUTPUT_INTERVAL_TICKS,
    };
    println!(
        "Sim: up to {} ticks, zone {}×{}, drift p={}, output every {} ticks",
        config.total_ticks,
        TARGET_ZONE_SIDE,
        TARGET_ZONE_SIDE,
        config.drift_probability,
        OUTPUT_INTERVAL_TICKS
    );
    println!();

    // 2. Build behavior and sim.  Grid, starts, targets, and roles are all
    //    derived from the config seed.
    let behavior = Navigator::new(config.cost_ceiling, config.broadcast_interval_ticks);
    let mut sim = SimBuilder::new(config, behavior).build()?;

    // 3. Set up output.
    std::fs::create_dir_all("output/smallgrid")?;
    let writer = CsvWriter::new(Path::new("output/smallgrid"))?;
    let mut obs = SimOutputObserver::new(writer);

    // 4. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    let m = &sim.metrics;
    println!("Simulation complete in {:.3} s ({} ticks run)", elapsed.as_secs_f64(), m.ticks_run);
    println!("  finished            : {}/{AGENT_COUNT}", m.finished);
    if let Some(avg) = m.average_finish_tick() {
        println!("  avg finish tick     : {avg:.1}");
    }
    println!("  collisions avoided  : {}", m.collisions_avoided);
    println!("  near collisions     : {}", m.near_collisions);
    println!("  yields (honored/ignored): {}/{}", m.yields_honored, m.yields_ignored);
    println!("  path broadcasts     : {}", m.path_broadcasts);
    println!("  replans / switches  : {}/{}", m.replans, m.algorithm_switches);
    println!("  stuck transitions   : {}", m.stuck_transitions);
    println!("  synergy bonuses     : {}", m.synergy_bonuses);
    println!("  drift (applied/rejected): {}/{}", m.drift_applied, m.drift_rejected);
    println!();

    // 6. Final agent table.
    println!(
        "{:<6} {:<10} {:<9} {:<8} {:<10} {:<7} Q(a*/bfs/dij)",
        "Agent", "Role", "Status", "Pos", "Finish", "Algo"
    );
    println!("{}", "-".repeat(72));
    for a in sim.agents.agent_ids() {
        let i = a.index();
        let sel = &sim.agents.selector[i];
        println!(
            "{:<6} {:<10} {:<9} {:<8} {:<10} {:<7} {:.2}/{:.2}/{:.2}",
            i,
            sim.agents.role[i].as_str(),
            sim.agents.status[i].as_str(),
            format!("{}", sim.agents.position[i]),
            sim.agents.finish_tick[i]
                .map(|t| t.0.to_string())
                .unwrap_or_else(|| "-".into()),
            sim.agents.algorithm[i].as_str(),
            sel.q_value(Algorithm::AStar),
            sel.q_value(Algorithm::Bfs),
            sel.q_value(Algorithm::Dijkstra),
        );
    }
    println!();
    println!("Output written to output/smallgrid/");

    Ok(())
}
