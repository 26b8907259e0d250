use anyhow::{bail, Context};
use partnermap::{
    geolocation::{FixedPositionProvider, Position},
    map::{HeadlessMapFactory, MapContainer},
    FilterSelection, LocationStatus, PartnerMapConfig, PartnerMapView, PartnerMapViewBuilder,
    SearchState, SearchStatus,
};
use std::sync::Arc;
use std::time::Duration;

const USAGE: &str = "usage: partnermap-app [--config <file.json>] [--filter <partner>] [--search <term>] [--at <lat>,<lng>]";

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    filter: Option<String>,
    search: Option<String>,
    at: Option<(f64, f64)>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut raw = std::env::args().skip(1);

    while let Some(flag) = raw.next() {
        let mut value = || raw.next().with_context(|| format!("{} needs a value\n{}", flag, USAGE));
        match flag.as_str() {
            "--config" => args.config = Some(value()?),
            "--filter" => args.filter = Some(value()?),
            "--search" => args.search = Some(value()?),
            "--at" => {
                let value = value()?;
                let (lat, lng) = value
                    .split_once(',')
                    .with_context(|| format!("--at expects <lat>,<lng>, got {:?}", value))?;
                args.at = Some((lat.trim().parse()?, lng.trim().parse()?));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => bail!("unknown argument {:?}\n{}", other, USAGE),
        }
    }

    Ok(args)
}

/// Waits until the first request started by the session has been answered
async fn wait_for_search(view: &PartnerMapView) -> SearchState {
    let mut rx = view.subscribe_search();
    loop {
        {
            let state = rx.borrow_and_update();
            if view.search().latest_sequence() > 0 && state.status != SearchStatus::Searching {
                return state.clone();
            }
        }
        if rx.changed().await.is_err() {
            return view.search_state();
        }
    }
}

async fn run_search(view: &PartnerMapView, term: &str) -> anyhow::Result<()> {
    view.set_query(term);
    let timeout = view.config().search.request_timeout() + view.config().search.debounce() + Duration::from_secs(1);
    let state = tokio::time::timeout(timeout, wait_for_search(view))
        .await
        .context("search did not finish")?;

    match state.status {
        SearchStatus::Error => {
            println!("search {:?}: {}", term, state.error_message.unwrap_or_default());
        }
        _ => {
            println!("search {:?}: {} result(s)", term, state.results.len());
            for result in &state.results {
                println!("  {} {}", result.coordinate, result.label);
            }
            if let Some(first) = state.results.first() {
                view.choose_result(first);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            PartnerMapConfig::from_json_str(&json)?
        }
        None => PartnerMapConfig::default(),
    };

    let factory = HeadlessMapFactory::new();
    let mut builder = PartnerMapViewBuilder::new()
        .with_config(config)
        .with_widget_factory(Box::new(factory.clone()));
    if let Some((lat, lng)) = args.at {
        builder = builder.with_position_provider(Arc::new(FixedPositionProvider::new(Position::new(
            lat,
            lng,
            Some(50.0),
        ))));
    }
    let view = builder.build()?;

    let events = view.controller().subscribe();
    let handle = view.mount(&MapContainer::new("reward-partners-map", 1200.0, 800.0))?;
    println!("mounted {}", handle);

    if let Some(partner) = &args.filter {
        let filter = FilterSelection::from_label(partner);
        if !view.select_filter(filter) {
            println!("filter {:?}: viewport unchanged", partner);
        }
        println!("showing {} store(s)", view.visible().stores.len());
    }

    // Search and locate are independent tracks; run them side by side
    let search = async {
        match &args.search {
            Some(term) => run_search(&view, term).await,
            None => Ok(()),
        }
    };
    let locate = async {
        if args.at.is_some() {
            let state = view.locate_me().await;
            match state.status {
                LocationStatus::Granted => println!(
                    "located at {}",
                    state.coordinate.map(|c| c.to_string()).unwrap_or_default()
                ),
                _ => println!("locate: {}", state.message.unwrap_or_default()),
            }
        }
    };
    let (search, ()) = futures::join!(search, locate);
    search?;

    for event in events.try_iter() {
        println!("event {}: {:?}", event.event_type(), event);
    }
    if let Some((center, zoom)) = view.controller().current_view() {
        println!("final view {} @ zoom {}", center, zoom);
    }
    if let Some(viewport) = factory.view() {
        println!("widget resolution {:.1} m/px", viewport.resolution());
    }

    view.unmount();
    Ok(())
}
