//! Integration tests for simulation and aggregation end to end.

mod common;

use std::collections::HashMap;

use chrono::{Duration, Timelike};

use bikeshare_sim::Error;
use bikeshare_sim::aggregate::aggregate;
use bikeshare_sim::io::flow_csv::{read_flow_csv, write_flow_csv};
use bikeshare_sim::runner::{GenerationRequest, build_report, generate, simulate};
use bikeshare_sim::sim::engine::Engine;
use bikeshare_sim::sim::rng::build_rng;
use bikeshare_sim::sim::window::SimWindow;

#[test]
fn record_count_covers_every_station_hour() {
    let model = common::sample_store().load("centro").expect("sample loads");
    let days = 3;
    let records = simulate(&model, days, common::fixed_now(), common::seeded(1)).expect("simulates");

    assert_eq!(records.len(), days as usize * 24 * model.stations.len());

    let mut per_slot: HashMap<(&str, u32), u32> = HashMap::new();
    for r in &records {
        *per_slot
            .entry((r.station_id.as_str(), r.timestamp.hour()))
            .or_default() += 1;
    }
    assert_eq!(per_slot.len(), 24 * model.stations.len());
    assert!(per_slot.values().all(|&n| n == days));
}

#[test]
fn occupancy_never_leaves_capacity_bounds() {
    let model = common::sample_store().load("centro").expect("sample loads");
    for seed in 0..5 {
        let records =
            simulate(&model, 10, common::fixed_now(), common::seeded(seed)).expect("simulates");
        for station in aggregate(&model, &records, 10) {
            assert!(
                station
                    .history
                    .iter()
                    .all(|h| h.bikes_available <= station.capacity),
                "station {} exceeded {} docks",
                station.id,
                station.capacity
            );
        }
    }
}

#[test]
fn replay_matches_engine_state_every_hour() {
    let model = common::sample_store().load("centro").expect("sample loads");
    let window = SimWindow::ending_on(common::fixed_now(), 4).expect("valid window");
    let mut engine = Engine::new(&model, window, common::seeded(11));

    let mut records = Vec::new();
    let mut engine_bikes: Vec<Vec<u32>> = Vec::new();
    for hour in 0..window.total_hours() {
        records.extend(engine.step(hour));
        engine_bikes.push(engine.states().iter().map(|s| s.bikes).collect());
    }

    let stations = aggregate(&model, &records, 4);
    for (i, station) in stations.iter().enumerate() {
        assert_eq!(station.history.len(), window.total_hours());
        for (hour, entry) in station.history.iter().enumerate() {
            assert_eq!(
                entry.bikes_available, engine_bikes[hour][i],
                "station {} diverged at hour {hour}",
                station.id
            );
        }
        assert_eq!(station.bikes_available, engine.states()[i].bikes);
    }
}

#[test]
fn replay_through_csv_protocol_is_lossless() {
    let model = common::sample_store().load("campus").expect("sample loads");
    let records = simulate(&model, 2, common::fixed_now(), common::seeded(5)).expect("simulates");

    let mut buf = Vec::new();
    write_flow_csv(&records, &mut buf).expect("writes");
    let parsed = read_flow_csv(buf.as_slice()).expect("parses");

    assert_eq!(parsed, records);
    assert_eq!(aggregate(&model, &parsed, 2), aggregate(&model, &records, 2));
}

#[test]
fn profile_always_has_24_ordered_buckets() {
    let model = common::single_station();
    for days in [1, 2, 7, 8, 30] {
        let records =
            simulate(&model, days, common::fixed_now(), common::seeded(2)).expect("simulates");
        let station = &aggregate(&model, &records, days)[0];
        assert_eq!(station.hourly_average_demand.len(), 24);
        for (hour, bucket) in station.hourly_average_demand.iter().enumerate() {
            assert_eq!(bucket.hour, hour as u32);
            assert!(bucket.average_trips >= 0.0);
        }
    }
}

#[test]
fn single_station_single_day() {
    let model = common::single_station();
    let records = simulate(&model, 1, common::fixed_now(), common::seeded(3)).expect("simulates");
    assert_eq!(records.len(), 24);

    for (hour, r) in records.iter().enumerate() {
        assert_eq!(
            r.timestamp,
            common::fixed_midnight() + Duration::hours(hour as i64)
        );
    }

    let station = &aggregate(&model, &records, 1)[0];
    assert!(station.history.iter().all(|h| h.bikes_available <= 20));
    for (bucket, entry) in station.hourly_average_demand.iter().zip(&station.history) {
        assert_eq!(bucket.average_trips, f64::from(entry.flow.trips()));
    }
}

#[test]
fn empty_and_full_stations_clamp_asymmetrically() {
    let model = common::empty_and_full();
    let records = simulate(&model, 2, common::fixed_now(), common::seeded(8)).expect("simulates");
    let stations = aggregate(&model, &records, 2);
    let (empty, full) = (&stations[0], &stations[1]);

    // first hour: nothing to take from the empty station, nowhere to put
    // bikes at the full one beyond what just left
    assert_eq!(empty.history[0].flow.exits, 0);
    assert!(full.history[0].flow.entries <= full.history[0].flow.exits);

    let mut before = empty.initial_bikes;
    for h in &empty.history {
        if before == 0 {
            assert_eq!(h.flow.exits, 0);
        }
        before = h.bikes_available;
    }

    let mut before = full.initial_bikes;
    for h in &full.history {
        if before == full.capacity {
            assert!(h.flow.entries <= h.flow.exits);
        }
        before = h.bikes_available;
    }
}

#[test]
fn seeded_generation_is_reproducible() {
    let store = common::sample_store();
    let request = GenerationRequest::new("centro", 5);
    let a = generate(&store, &request, 30, common::fixed_now(), common::seeded(99)).expect("a");
    let b = generate(&store, &request, 30, common::fixed_now(), common::seeded(99)).expect("b");
    assert_eq!(a, b);
}

#[test]
fn unseeded_runs_still_respect_bounds() {
    let model = common::empty_and_full();
    let records = simulate(&model, 3, common::fixed_now(), build_rng(None)).expect("simulates");
    let report = build_report(&model, &records, 3);
    for station in &report.stations {
        assert!(station.bikes_available <= station.capacity);
        assert_eq!(station.history.len(), 72);
    }
}

#[test]
fn generate_reports_scenario_range_and_stations() {
    let report = generate(
        &common::sample_store(),
        &GenerationRequest::new("centro", 2),
        30,
        common::fixed_now(),
        common::seeded(4),
    )
    .expect("generates");

    assert_eq!(report.scenario.id, "centro");
    assert_eq!(report.scenario.name, "Centro");
    assert_eq!(report.scenario.city, "Valencia");

    let range = report.range.as_ref().expect("range present");
    assert_eq!(range.start, common::fixed_midnight() - Duration::days(1));
    assert_eq!(
        range.end,
        common::fixed_midnight() + Duration::hours(23)
    );
    assert_eq!(range.days, 2);

    assert_eq!(report.stations.len(), 5);
    assert_eq!(report.stations[2].id, "mercado-central");
    assert_eq!(report.stations[2].initial_bikes, 10);

    let json = serde_json::to_value(&report).expect("serializes");
    assert_eq!(json["stations"][0]["id"], "plaza-ayuntamiento");
    assert_eq!(json["stations"][0]["location"]["lat"], 39.4699);
    assert_eq!(
        json["stations"][0]["hourlyAverageDemand"]
            .as_array()
            .map(Vec::len),
        Some(24)
    );
    assert_eq!(json["range"]["start"], "2026-10-16T00:00:00.000Z");
    assert_eq!(
        json["stations"][0]["history"][0]["timestamp"],
        "2026-10-16T00:00:00.000Z"
    );
}

#[test]
fn generate_rejects_unknown_scenario_and_out_of_range_days() {
    let store = common::sample_store();

    let err = generate(
        &store,
        &GenerationRequest::new("atlantis", 2),
        30,
        common::fixed_now(),
        common::seeded(0),
    )
    .expect_err("unknown scenario");
    assert!(matches!(err, Error::ScenarioNotFound { .. }));

    let err = generate(
        &store,
        &GenerationRequest::new("centro", 31),
        30,
        common::fixed_now(),
        common::seeded(0),
    )
    .expect_err("too many days");
    assert!(matches!(err, Error::Usage(_)));
}
