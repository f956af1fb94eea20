use chrono::Utc;
use geosignal_common::{BoundingBox, ConflictZone, RiskLevel};

/// Renders one zone as a GeoJSON Point feature (§6: `GET /zones.geojson`).
/// A Polygon variant would need a real cluster hull; this spec models every
/// zone by its centroid and bbox, so the geometry is always a Point and the
/// bbox rides along in `properties` for map consumers that want a rectangle.
fn zone_to_feature(zone: &ConflictZone) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [zone.centroid.lng, zone.centroid.lat],
        },
        "properties": {
            "zone_id": zone.zone_id,
            "location_label": zone.location_label,
            "country": zone.country,
            "risk_score": zone.final_risk_score,
            "risk_level": zone.risk_level.to_string(),
            "sources": zone.sources.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            "total_events": zone.total_events,
            "total_fatalities": zone.total_fatalities,
            "actors": zone.actors.iter().collect::<Vec<_>>(),
            "event_types": zone.event_types.iter().collect::<Vec<_>>(),
            "latest_event_at": zone.latest_event_at,
            "monitoring_frequency": zone.monitoring_frequency.to_string(),
            "is_prediction": zone.is_prediction,
            "bbox": [zone.bbox.min_lng, zone.bbox.min_lat, zone.bbox.max_lng, zone.bbox.max_lat],
        }
    })
}

fn global_bbox(zones: &[ConflictZone]) -> Option<BoundingBox> {
    zones.iter().fold(None, |acc, z| match acc {
        None => Some(z.bbox.clone()),
        Some(mut bbox) => {
            bbox.min_lat = bbox.min_lat.min(z.bbox.min_lat);
            bbox.min_lng = bbox.min_lng.min(z.bbox.min_lng);
            bbox.max_lat = bbox.max_lat.max(z.bbox.max_lat);
            bbox.max_lng = bbox.max_lng.max(z.bbox.max_lng);
            Some(bbox)
        }
    })
}

/// Builds the full `zones.geojson` feature collection (§6), including the
/// top-level `metadata` object. `has_run_ever` distinguishes "zero zones
/// because nothing qualified this pass" from cold start (§7: "if no
/// snapshot exists yet, zone queries return an empty feature collection
/// with `metadata.status = "warming_up"`").
pub fn zones_to_geojson(zones: &[ConflictZone], has_run_ever: bool) -> serde_json::Value {
    let features: Vec<serde_json::Value> = zones.iter().map(zone_to_feature).collect();
    let priority_zones = zones.iter().filter(|z| matches!(z.risk_level, RiskLevel::High | RiskLevel::Critical)).count();
    let mut data_sources: Vec<String> = zones.iter().flat_map(|z| z.sources.iter().map(|s| s.to_string())).collect();
    data_sources.sort();
    data_sources.dedup();

    let mut metadata = serde_json::json!({
        "generated_at": Utc::now(),
        "total_zones": zones.len(),
        "priority_zones": priority_zones,
        "data_sources": data_sources,
        "bbox_global": global_bbox(zones),
        "monitoring_strategy": "critical zones hourly, high weekly, others monthly",
    });
    if !has_run_ever {
        metadata["status"] = serde_json::json!("warming_up");
    }

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
        "metadata": metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use uuid::Uuid;

    fn sample_zone() -> ConflictZone {
        ConflictZone {
            zone_id: Uuid::new_v4(),
            centroid: geosignal_common::GeoPoint { lat: 48.5, lng: 37.5 },
            bbox: BoundingBox { min_lat: 48.0, min_lng: 37.0, max_lat: 49.0, max_lng: 38.0 },
            location_label: "Donetsk".to_string(),
            country: Some("Ukraine".to_string()),
            region: None,
            sources: HashSet::from([geosignal_common::SignalSourceKind::News]),
            source_scores: HashMap::new(),
            total_events: 5,
            total_fatalities: 12,
            actors: HashSet::new(),
            event_types: HashSet::new(),
            latest_event_at: Utc::now(),
            final_risk_score: 0.85,
            risk_level: RiskLevel::Critical,
            monitoring_frequency: geosignal_common::MonitoringFrequency::Daily,
            member_article_ids: HashSet::new(),
            is_prediction: false,
        }
    }

    #[test]
    fn empty_collection_marks_warming_up_only_when_never_run() {
        let cold = zones_to_geojson(&[], false);
        assert_eq!(cold["metadata"]["status"], "warming_up");

        let empty_but_ran = zones_to_geojson(&[], true);
        assert!(empty_but_ran["metadata"].get("status").is_none());
    }

    #[test]
    fn feature_carries_required_properties() {
        let zones = vec![sample_zone()];
        let collection = zones_to_geojson(&zones, true);
        let feature = &collection["features"][0];
        assert_eq!(feature["geometry"]["type"], "Point");
        assert_eq!(feature["properties"]["risk_level"], "critical");
        assert_eq!(collection["metadata"]["total_zones"], 1);
        assert_eq!(collection["metadata"]["priority_zones"], 1);
    }
}
