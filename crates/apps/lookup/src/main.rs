use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use formats::{BoundaryCollection, BoundaryFeature};
use foundation::{fips, Chamber};
use interaction::{locate, DistrictLabel, MapSession, NullSurface, PointerEvent, ScreenPoint, Seat};
use roster::{FileRosterSource, HttpRosterSource, RosterConfig, RosterIndex, RosterSource, Rosters};
use streaming::{BoundaryConfig, GeoDataLoader, LoadOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Resolve congressional boundaries to members of Congress")]
struct Args {
    /// Boundary data root: a directory or an http(s):// base URL
    /// (default: DISTRICT_DATA_ROOT or "data")
    #[arg(long)]
    data_root: Option<String>,

    /// Roster service base URL (default: ROSTER_API_URL)
    #[arg(long)]
    roster_url: Option<String>,

    /// HTTP request timeout in seconds (default: DISTRICT_HTTP_TIMEOUT_SECS or 30)
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Click a boundary feature and print the session events as JSON lines
    Resolve {
        /// house or senate
        #[arg(long)]
        chamber: Chamber,

        /// Feature GEOID, e.g. 4812
        #[arg(long, conflicts_with = "fips", required_unless_present = "fips")]
        geoid: Option<String>,

        /// State FIPS code, e.g. 48
        #[arg(long)]
        fips: Option<String>,

        /// District within the state (House only), e.g. 12 or AL
        #[arg(long, requires = "fips")]
        district: Option<String>,

        /// Roster JSON file instead of the roster service
        #[arg(long)]
        roster: Option<PathBuf>,
    },

    /// Count features per color bucket
    Buckets {
        #[arg(long, default_value = "house")]
        chamber: Chamber,
    },

    /// Search a chamber's roster by name, state or district
    Search {
        #[arg(long)]
        chamber: Chamber,

        query: String,

        #[arg(long)]
        roster: Option<PathBuf>,
    },

    /// Print the FIPS state table
    States,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Geoid(String),
    Fips {
        code: String,
        district: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(args: Args) -> Result<(), String> {
    let mut boundaries = BoundaryConfig::from_env();
    let mut rosters = RosterConfig::from_env();
    if let Some(root) = &args.data_root {
        boundaries.data_root = root.clone();
    }
    if let Some(url) = &args.roster_url {
        rosters.api_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        boundaries.http_timeout = Duration::from_secs(secs);
        rosters.timeout = Duration::from_secs(secs);
    }

    match args.command {
        Command::Resolve {
            chamber,
            geoid,
            fips,
            district,
            roster,
        } => {
            let target = match (geoid, fips) {
                (Some(id), _) => Target::Geoid(id),
                (None, Some(code)) => Target::Fips { code, district },
                (None, None) => return Err("resolve needs --geoid or --fips".to_string()),
            };
            cmd_resolve(&boundaries, &rosters, chamber, &target, roster).await
        }
        Command::Buckets { chamber } => cmd_buckets(&boundaries, chamber).await,
        Command::Search {
            chamber,
            query,
            roster,
        } => cmd_search(&rosters, chamber, &query, roster).await,
        Command::States => {
            for (code, name) in fips::STATES {
                println!("{code}\t{name}");
            }
            Ok(())
        }
    }
}

async fn cmd_resolve(
    boundaries: &BoundaryConfig,
    rosters: &RosterConfig,
    chamber: Chamber,
    target: &Target,
    roster_file: Option<PathBuf>,
) -> Result<(), String> {
    let source = boundaries
        .build_source()
        .map_err(|e| format!("boundary source: {e}"))?;
    let roster_source = roster_source(rosters, chamber, roster_file)?;

    let mut session = MapSession::new(source, Rosters::default(), chamber, NullSurface);
    session
        .refresh_roster(roster_source.as_ref(), chamber)
        .await
        .map_err(|e| e.to_string())?;

    let layer = match session.activate(chamber).await {
        LoadOutcome::Applied(layer) => layer,
        LoadOutcome::Failed(e) => return Err(e.to_string()),
        LoadOutcome::Stale => return Err("boundary load was superseded".to_string()),
    };
    let feature = find_feature(&layer, chamber, target)?;
    info!(id = ?feature.id, geoid = ?feature.geoid(), "clicking feature");
    session.clicked(PointerEvent::over(ScreenPoint::default(), feature));

    for event in session.drain_events() {
        let line = serde_json::to_string(&event).map_err(|e| format!("encode event: {e}"))?;
        println!("{line}");
    }
    Ok(())
}

async fn cmd_buckets(boundaries: &BoundaryConfig, chamber: Chamber) -> Result<(), String> {
    let source = boundaries
        .build_source()
        .map_err(|e| format!("boundary source: {e}"))?;
    let mut loader = GeoDataLoader::new(source);
    let layer = loader.load(chamber).await.map_err(|e| e.to_string())?;

    for (bucket, count) in layers::histogram(&layer).iter().enumerate() {
        let bucket = bucket as u8;
        println!("{bucket}\t{count}\t{}", layers::hex_for_bucket(bucket));
    }
    Ok(())
}

async fn cmd_search(
    rosters: &RosterConfig,
    chamber: Chamber,
    query: &str,
    roster_file: Option<PathBuf>,
) -> Result<(), String> {
    let members = roster_source(rosters, chamber, roster_file)?
        .fetch(chamber)
        .await
        .map_err(|e| e.to_string())?;
    let index = RosterIndex::build(chamber, members);
    for member in index.search(query) {
        println!(
            "{}\t{}\t{}",
            member.addressed_name(),
            member.seat_label(),
            member.party.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// `--roster FILE` serves `chamber` from disk; otherwise the roster service.
fn roster_source(
    config: &RosterConfig,
    chamber: Chamber,
    file: Option<PathBuf>,
) -> Result<Box<dyn RosterSource>, String> {
    match file {
        Some(path) => Ok(Box::new(FileRosterSource::new().with(chamber, path))),
        None => {
            let source = HttpRosterSource::from_config(config).map_err(|e| e.to_string())?;
            Ok(Box::new(source))
        }
    }
}

fn find_feature<'a>(
    layer: &'a BoundaryCollection,
    chamber: Chamber,
    target: &Target,
) -> Result<&'a BoundaryFeature, String> {
    match target {
        Target::Geoid(id) => layer
            .find_by_geoid(id)
            .ok_or_else(|| format!("no feature with GEOID {id}")),
        Target::Fips { code, district } => {
            let want = fips::normalize_code(code).ok_or_else(|| format!("invalid FIPS code {code:?}"))?;
            let label = match district {
                Some(raw) => Some(
                    DistrictLabel::parse(raw).ok_or_else(|| format!("invalid district {raw:?}"))?,
                ),
                None => None,
            };
            layer
                .features
                .iter()
                .find(|f| {
                    let same_state =
                        f.state_code().and_then(|c| fips::normalize_code(&c)) == Some(want);
                    same_state
                        && match (chamber, label) {
                            (Chamber::House, Some(label)) => {
                                locate(f, chamber).map(|r| r.seat) == Ok(Seat::District(label))
                            }
                            _ => true,
                        }
                })
                .ok_or_else(|| format!("no {} feature for FIPS {code}", chamber.dataset()))
        }
    }
}
