//! KD-tree spatial index over charging stations.
//!
//! Candidate discovery asks for every station within a radius of a node. The
//! index keeps station positions in a 2-D KD-tree so those queries do not scan
//! the whole station list on large networks.

use std::collections::HashMap;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::network::{ChargingStation, Position};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Relative slack applied to the KD-tree radius before the exact check.
const RADIUS_SLACK: f64 = 1e-9;

/// Spatial index of station positions.
///
/// Stations sharing a coordinate are grouped so the tree holds one item per
/// distinct position; kiddo refuses more than a bucket's worth of items at
/// exactly the same point. Query results are station indices into the slice
/// the index was built from.
pub struct StationIndex {
    tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32>,
    /// Distinct positions, indexed by tree item.
    sites: Vec<Position>,
    /// Station indices at each site, in declaration order.
    groups: Vec<Vec<usize>>,
    len: usize,
}

impl StationIndex {
    /// Build an index over `stations`, preserving their order as item ids.
    pub fn build(stations: &[ChargingStation]) -> Self {
        let mut tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32> = KdTree::new();
        let mut site_lookup: HashMap<(u64, u64), usize> = HashMap::new();
        let mut sites = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for (index, station) in stations.iter().enumerate() {
            let position = station.position();
            // Adding 0.0 folds -0.0 into 0.0 so both share a site.
            let key = ((position.x + 0.0).to_bits(), (position.y + 0.0).to_bits());
            let site = *site_lookup.entry(key).or_insert_with(|| {
                tree.add(&[position.x, position.y], sites.len());
                sites.push(position);
                groups.push(Vec::new());
                sites.len() - 1
            });
            groups[site].push(index);
        }

        debug!(
            stations = stations.len(),
            sites = sites.len(),
            "built station index"
        );

        Self {
            tree,
            sites,
            groups,
            len: stations.len(),
        }
    }

    /// Number of indexed stations.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find all stations whose distance to `point` is at most `radius`.
    ///
    /// Returns `(station index, distance)` pairs sorted by distance, then index.
    pub fn within_radius(&self, point: Position, radius: f64) -> Vec<(usize, f64)> {
        if radius < 0.0 || !radius.is_finite() || self.sites.is_empty() {
            return Vec::new();
        }

        let squared_radius = radius * radius;
        let query = [point.x, point.y];
        let candidates = self.tree.within::<SquaredEuclidean>(
            &query,
            squared_radius * (1.0 + RADIUS_SLACK) + RADIUS_SLACK,
        );

        let mut results: Vec<(usize, f64)> = Vec::new();
        for neighbour in candidates {
            let site = neighbour.item;
            let position = self.sites[site];
            let dx = position.x - point.x;
            let dy = position.y - point.y;
            let squared = dx * dx + dy * dy;
            if squared <= squared_radius {
                let distance = squared.sqrt();
                results.extend(self.groups[site].iter().map(|&index| (index, distance)));
            }
        }

        results.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        results
    }
}

impl std::fmt::Debug for StationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationIndex")
            .field("stations", &self.len)
            .field("sites", &self.sites.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, x: f64, y: f64) -> ChargingStation {
        ChargingStation {
            id: id.to_string(),
            edge: "e".to_string(),
            x,
            y,
            power: 22_000.0,
            efficiency: 0.95,
        }
    }

    #[test]
    fn test_build_empty() {
        let index = StationIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.within_radius(Position::new(0.0, 0.0), 100.0).is_empty());
    }

    #[test]
    fn test_radius_filtering() {
        let stations = vec![
            station("cs1", 0.0, 0.0),
            station("cs2", 5.0, 0.0),
            station("cs3", 15.0, 0.0), // Outside radius
        ];
        let index = StationIndex::build(&stations);

        let results = index.within_radius(Position::new(0.0, 0.0), 10.0);
        let ids: Vec<_> = results.iter().map(|(idx, _)| *idx).collect();
        assert_eq!(ids, vec![0, 1]);
        assert!((results[1].1 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let stations = vec![station("cs1", 3.0, 4.0)];
        let index = StationIndex::build(&stations);

        assert_eq!(index.within_radius(Position::new(0.0, 0.0), 5.0).len(), 1);
        assert!(index
            .within_radius(Position::new(0.0, 0.0), 4.999)
            .is_empty());
    }

    #[test]
    fn test_zero_radius_keeps_colocated_station() {
        let stations = vec![station("cs1", 7.0, 7.0)];
        let index = StationIndex::build(&stations);
        assert_eq!(index.within_radius(Position::new(7.0, 7.0), 0.0).len(), 1);
    }

    #[test]
    fn test_colocated_stations_share_one_site() {
        let stations: Vec<_> = (0..100)
            .map(|i| station(&format!("cs{i}"), 1000.0, 0.0))
            .collect();
        let index = StationIndex::build(&stations);
        assert_eq!(index.len(), 100);

        let results = index.within_radius(Position::new(1000.0, 0.0), 1.0);
        let ids: Vec<_> = results.iter().map(|(idx, _)| *idx).collect();
        assert_eq!(ids, (0..100).collect::<Vec<_>>());
        assert!(index.within_radius(Position::new(0.0, 0.0), 999.0).is_empty());
    }

    #[test]
    fn test_signed_zero_positions_are_one_site() {
        let stations: Vec<_> = (0..40)
            .map(|i| {
                let x = if i % 2 == 0 { 0.0 } else { -0.0 };
                station(&format!("cs{i}"), x, 0.0)
            })
            .collect();
        let index = StationIndex::build(&stations);
        assert_eq!(index.within_radius(Position::new(0.0, 0.0), 0.0).len(), 40);
    }
}
