// File: crates/demo/src/main.rs
// Summary: Demo loads interval CSV, runs constrained selections over it and eases a viewport onto each result.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use adtui_model::{
    AnimatedRange, AnimatedRangeOptions, AspectObserver, BaseDataSeries, DefaultConfigurableDurationData,
    DefaultDataSeries, DurationDataModel, FpsTimer, Range, RangedSeries, SelectionAspect, SelectionListener,
    SelectionModel, SharedSeries, TimerOptions, Updater, UNSPECIFIED_DURATION,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Settings read from an optional TOML file; every key has a default.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    timer: TimerOptions,
    animation: AnimatedRangeOptions,
    /// Upper bound on ticks spent easing the viewport per selection.
    frames: u32,
    /// Whether unfinished intervals (no end) can be selected.
    select_unfinished: bool,
    /// Selection requests as `[min, max]` in microseconds.
    selections: Vec<[f64; 2]>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            timer: TimerOptions::default(),
            animation: AnimatedRangeOptions::default(),
            frames: 120,
            select_unfinished: true,
            selections: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IntervalRow {
    start: String,
    end: Option<String>,
    partial: Option<bool>,
}

struct LogListener;

impl SelectionListener for LogListener {
    fn selection_created(&self) { info!("selection created") }
    fn selection_cleared(&self) { info!("selection cleared") }
    fn selection_creation_failure(&self) { warn!("request overlaps no selectable interval") }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let csv_path = PathBuf::from(args.next().unwrap_or_else(|| "crates/demo/data/intervals.csv".to_string()));
    let config_path = args.next().map(PathBuf::from);

    let config = load_config(config_path.as_deref())?;
    config.timer.validate()?;
    config.animation.validate()?;
    debug!(?config, "configuration");

    let data = load_intervals(&csv_path, config.select_unfinished)
        .with_context(|| format!("failed to load CSV '{}'", csv_path.display()))?;
    if data.is_empty() {
        anyhow::bail!("no intervals loaded from {}", csv_path.display());
    }
    info!(intervals = data.len(), "loaded {}", csv_path.display());

    let (lo, hi) = extent(&data);
    let series: SharedSeries<DefaultConfigurableDurationData> = Rc::new(RefCell::new(data));
    let durations = DurationDataModel::shared(RangedSeries::new(Range::shared(lo, hi), series));

    let selection = Rc::new(Range::empty());
    let model = SelectionModel::new(selection.clone());
    model.add_constraint(durations.clone());
    model.add_listener(Rc::new(LogListener));

    let observer = AspectObserver::new();
    {
        let selection = selection.clone();
        model.add_dependency(&observer).on_change(SelectionAspect::Selection, move || {
            debug!(min = selection.min(), max = selection.max(), "selection aspect fired");
        });
    }

    let viewport = Range::shared(lo, hi);
    let camera = Rc::new(AnimatedRange::new(viewport.clone(), config.animation)?);
    let timer = Rc::new(FpsTimer::new(config.timer)?);
    let updater = Updater::new(timer.clone());
    updater.register(camera.clone());
    updater.register(durations.clone());

    let requests = if config.selections.is_empty() {
        let third = (hi - lo) / 3.0;
        vec![[lo + third, hi - third]]
    } else {
        config.selections.clone()
    };

    for [min, max] in requests {
        model.set(min, max);
        if selection.is_empty() {
            info!(min, max, "request rejected");
            continue;
        }
        info!(min, max, selected_min = selection.min(), selected_max = selection.max(), "request accepted");

        camera.animate_to(selection.min(), selection.max().min(hi));
        let ticks = run_until_settled(&timer, &camera, config.frames);
        info!(ticks, viewport_min = viewport.min(), viewport_max = viewport.max(), "viewport settled");
    }

    model.clear();
    Ok(())
}

/// Poll the timer until the camera reaches its target or `frames` ticks elapse.
fn run_until_settled(timer: &FpsTimer, camera: &AnimatedRange, frames: u32) -> u32 {
    timer.start_at(Instant::now());
    let mut ticks = 0;
    while camera.is_animating() && ticks < frames {
        std::thread::sleep(timer.time_until_next(Instant::now()));
        if timer.poll(Instant::now()) {
            ticks += 1;
            debug!(min = camera.range().min(), max = camera.range().max(), "tick {ticks}");
        }
    }
    ticks
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load `start,end,partial` rows into a series keyed by start time.
fn load_intervals(path: &Path, select_unfinished: bool) -> Result<DefaultDataSeries<DefaultConfigurableDurationData>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut out = DefaultDataSeries::new();
    for (line, rec) in rdr.deserialize::<IntervalRow>().enumerate() {
        let row = rec.with_context(|| format!("row {}", line + 1))?;
        let start = parse_timestamp_us(&row.start).with_context(|| format!("row {}: bad start", line + 1))?;
        let duration_us = match row.end.as_deref() {
            Some(end) => {
                let end = parse_timestamp_us(end).with_context(|| format!("row {}: bad end", line + 1))?;
                if end < start {
                    anyhow::bail!("row {}: end precedes start", line + 1);
                }
                end - start
            }
            None => UNSPECIFIED_DURATION,
        };
        let data = DefaultConfigurableDurationData::new(duration_us, select_unfinished, row.partial.unwrap_or(false));
        out.try_add(start, data).with_context(|| format!("row {}", line + 1))?;
    }
    Ok(out)
}

/// Integer microseconds, or an RFC 3339 timestamp converted to epoch microseconds.
fn parse_timestamp_us(s: &str) -> Result<i64> {
    if let Ok(us) = s.parse::<i64>() {
        return Ok(us);
    }
    let t = chrono::DateTime::parse_from_rfc3339(s).with_context(|| format!("'{s}' is neither micros nor RFC 3339"))?;
    Ok(t.timestamp_micros())
}

/// Span from the first start to the latest finished end (or last start).
fn extent(data: &DefaultDataSeries<DefaultConfigurableDurationData>) -> (f64, f64) {
    let mut hi = f64::MIN;
    for d in data.all_data() {
        let end = if d.value.is_unfinished() { d.x } else { d.x.saturating_add(d.value.duration_us) };
        hi = hi.max(end as f64);
    }
    (data.x_at(0) as f64, hi)
}
