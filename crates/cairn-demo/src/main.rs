//! Demo binary exercising the voxel store and pathfinder end-to-end.
//!
//! Generates a terraced terrain, streams residency around the origin, edits
//! a few voxels, round-trips the modified chunks through a JSON save, and
//! runs path and ground queries over the restored world.
//! Run with `cargo run -p cairn-demo`.

use cairn_log::init_logging;
use cairn_path::Pathfinder;
use cairn_voxel::{ChunkArchive, ChunkBounds, ChunkKey, ChunkStore};
use glam::{IVec3, Vec3};
use tracing::info;

/// Terraced ground rising one level every eight cells of x.
fn terrain(x: i32, y: i32, _z: i32) -> u8 {
    let height = x.div_euclid(8).clamp(0, 3);
    u8::from(y <= height)
}

fn main() {
    init_logging(None);

    let mut store = ChunkStore::new(Some(Box::new(terrain)));
    let watcher = store.add_listener(|change| {
        info!("voxel {} set to {}", change.position, change.value);
    });

    // Stream a residency box around the world origin, as a renderer would.
    store.load_chunks(
        ChunkKey::new(0, 0, 0),
        ChunkBounds::from_half_extent(IVec3::new(2, 1, 2)),
    );
    info!(
        "resident chunks: {} ({} materialized)",
        store.loaded().chunks.len(),
        store.chunk_count()
    );

    // Carve a doorway through the first terrace step.
    for y in 1..=2 {
        store.set_voxel(IVec3::new(8, y, 4), 0);
    }
    store.remove_listener(watcher);

    // Save the edits and restore them into a brand-new store.
    let archive = store.export_chunks();
    let json = serde_json::to_string(&archive).expect("archive should serialize");
    info!("saved {} modified chunk(s), {} bytes of JSON", archive.len(), json.len());

    let restored: ChunkArchive = serde_json::from_str(&json).expect("archive should deserialize");
    let mut world = ChunkStore::new(Some(Box::new(terrain)));
    world.import_chunks(&restored);

    // Route an agent two cells tall across the terraces.
    let finder = Pathfinder::new();
    let from = Vec3::new(0.0, 0.0, 4.0);
    let to = Vec3::new(20.0, 2.0, 4.0);
    let path = finder.get_path(&mut world, from, to, 2);
    if path.is_empty() {
        info!("no path from {from} to {to}");
    } else {
        info!("path with {} waypoint(s):", path.len());
        for point in &path {
            info!("  -> {point}");
        }
    }

    // Drop a probe onto the highest terrace.
    let mut probe = Vec3::new(30.0, 20.0, 4.0);
    if finder.ground(&mut world, &mut probe, 2, 0) {
        info!("probe landed at {probe}");
    } else {
        info!("probe found no ground above y=0");
    }
}
