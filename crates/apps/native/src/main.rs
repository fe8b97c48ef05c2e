use std::env;
use std::fs;
use std::process::ExitCode;

use formats::UploadedFile;
use layers::ViewKind;
use session::{DashboardConfig, DashboardView, Store};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let json_output = env::var("DASHBOARD_JSON").is_ok_and(|v| v == "1");
    let paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: native <file.geojson|file.json|file.xyz|file.pcd>...");
        return ExitCode::FAILURE;
    }

    let mut store = Store::new(config);
    let mut failures = 0usize;
    for path in &paths {
        let content = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(path = %path, "read failed: {err}");
                failures += 1;
                continue;
            }
        };

        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        if let Err(err) = store.ingest(&UploadedFile::new(name, &content)) {
            tracing::error!(path = %path, kind = err.kind(), "{err}");
            failures += 1;
            continue;
        }
        summarize(&mut store);

        if json_output {
            match serde_json::to_string_pretty(&DashboardView::from_store(&store)) {
                Ok(json) => println!("{json}"),
                Err(err) => tracing::error!("view model serialisation failed: {err}"),
            }
        }
    }

    for message in store.log().messages() {
        tracing::info!(target: "activity", "{message}");
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn summarize(store: &mut Store) {
    if let Some(meta) = store.file_meta() {
        tracing::info!(
            name = %meta.name,
            size = %meta.size_label,
            format = meta.format,
            points = ?meta.point_count,
            "file details"
        );
    }
    for warning in store.warnings() {
        tracing::warn!(kind = warning.kind(), "{warning}");
    }

    match store.active_view() {
        ViewKind::Points => {
            let layer = store.points();
            let range = layer.altitude_range();
            tracing::info!(
                visible = layer.view().visible.len(),
                min_z = range.min,
                max_z = range.max,
                point_size = layer.point_size().default_size,
                camera_distance = layer.framing().distance,
                "point view"
            );
        }
        ViewKind::Map => {
            tracing::info!(
                tags = ?store.features().vocabulary().as_slice(),
                steps = store.timeline().steps().len(),
                "map view"
            );
            // Walk one full animation cycle, one tick per step.
            let steps = store.timeline().steps().len();
            store.play();
            for _ in 0..steps {
                let snapshot = store.features().snapshot();
                tracing::info!(
                    cursor = ?store.timeline().cursor().map(|c| c.raw.as_str()),
                    filtered = snapshot.filtered.len(),
                    track = snapshot.track.members.len(),
                    static_features = snapshot.static_features.len(),
                    "timeline step"
                );
                let period = store.config().tick_period_s;
                store.tick(period);
            }
            store.restart_playback();
        }
    }
}
