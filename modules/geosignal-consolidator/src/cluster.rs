use geosignal_common::quality::DEFAULT_PROXIMITY_RADIUS_DEGREES;

use crate::signal::ConflictSignal;

/// A group of signals within `proximity_radius_degrees` of one another
/// (§4.7 clustering). Built incrementally by [`cluster_signals`]; the
/// consolidator turns each one into a `ConflictZone`.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub members: Vec<ConflictSignal>,
}

impl Cluster {
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.members.len() as f64;
        let lat = self.members.iter().map(|s| s.lat).sum::<f64>() / n;
        let lon = self.members.iter().map(|s| s.lon).sum::<f64>() / n;
        (lat, lon)
    }
}

/// `euclidean_distance_in_degrees` (§4.7): a flat-plane approximation over
/// lat/lon is deliberate here — the radius is small (≈50km) and the spec
/// names this exact formula, not a great-circle one.
fn euclidean_distance_in_degrees(a: (f64, f64), b: (f64, f64)) -> f64 {
    let d_lat = a.0 - b.0;
    let d_lon = a.1 - b.1;
    (d_lat * d_lat + d_lon * d_lon).sqrt()
}

/// Agglomerates signals by geographic proximity (§4.7): iterate by
/// descending score so the highest-risk signal in an area seeds its
/// cluster, then greedily absorb every remaining signal within
/// `radius_degrees` of *any* current member (chaining, not just the seed —
/// a cluster grows to cover a contiguous footprint rather than a fixed
/// circle around its first point).
pub fn cluster_signals(mut signals: Vec<ConflictSignal>, radius_degrees: f64) -> Vec<Cluster> {
    signals.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut clusters: Vec<Cluster> = Vec::new();
    let mut unclaimed: Vec<ConflictSignal> = signals;

    while let Some(seed) = unclaimed.first().cloned() {
        let mut members = vec![seed];
        unclaimed.remove(0);

        loop {
            let mut grew = false;
            let mut remaining = Vec::with_capacity(unclaimed.len());
            for candidate in unclaimed.drain(..) {
                let joins = members
                    .iter()
                    .any(|m| euclidean_distance_in_degrees((m.lat, m.lon), (candidate.lat, candidate.lon)) <= radius_degrees);
                if joins {
                    members.push(candidate);
                    grew = true;
                } else {
                    remaining.push(candidate);
                }
            }
            unclaimed = remaining;
            if !grew {
                break;
            }
        }

        clusters.push(Cluster { members });
    }

    clusters
}

pub fn default_radius() -> f64 {
    DEFAULT_PROXIMITY_RADIUS_DEGREES
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geosignal_common::SignalSourceKind;

    fn signal(lat: f64, lon: f64, score: f64) -> ConflictSignal {
        ConflictSignal {
            lat,
            lon,
            source_kind: SignalSourceKind::Events,
            weight: 0.3,
            score,
            occurred_at: Utc::now(),
            country: None,
            region: None,
            article_id: None,
            event_count: 1,
            fatalities: 0,
            actors: Vec::new(),
            event_types: Vec::new(),
        }
    }

    #[test]
    fn signals_within_radius_join_one_cluster() {
        let signals = vec![signal(48.5, 37.5, 0.9), signal(48.6, 37.6, 0.7), signal(48.55, 37.45, 0.6)];
        let clusters = cluster_signals(signals, 0.5);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 3);
    }

    #[test]
    fn distant_signals_form_separate_clusters() {
        let signals = vec![signal(0.0, 0.0, 0.9), signal(50.0, 50.0, 0.8)];
        let clusters = cluster_signals(signals, 0.5);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn highest_score_signal_seeds_first_cluster() {
        let signals = vec![signal(10.0, 10.0, 0.2), signal(0.0, 0.0, 0.95)];
        let clusters = cluster_signals(signals, 0.5);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members[0].score, 0.95);
    }

    #[test]
    fn chained_membership_extends_beyond_the_seed_radius() {
        // a -- 0.4 -- b -- 0.4 -- c: a and c are 0.8 apart (outside radius)
        // but both within 0.5 of b, so all three must join one cluster.
        let signals = vec![signal(0.0, 0.0, 0.9), signal(0.4, 0.0, 0.5), signal(0.8, 0.0, 0.3)];
        let clusters = cluster_signals(signals, 0.5);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 3);
    }
}
