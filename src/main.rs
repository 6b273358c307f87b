use std::env;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::info;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use starpaths::data::read_catalog_from_file;
use starpaths::{CatalogIndex, VisitPolicy};

const ENV_DATASET: &str = "STARPATHS_DATASET";
const DEFAULT_DATASET: &str = "data/starpaths.bin";

static CATALOG: OnceCell<CatalogIndex> = OnceCell::new();

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PathsRequest {
    Path {
        origin: String,
        target: String,
        #[serde(default)]
        policy: Option<VisitPolicy>,
    },
    Neighbours {
        name: String,
    },
    Paths {
        /// Unset fields fall back to the limits stored with the catalog.
        max_depth: Option<usize>,
        max_paths: Option<usize>,
        record_exhausted: Option<bool>,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PathsResponse {
    Path { systems: Option<Vec<String>> },
    Neighbours { systems: Vec<NeighbourResult> },
    Paths { paths: Vec<Vec<String>> },
    Error { message: String },
}

#[derive(Debug, Serialize)]
struct NeighbourResult {
    id: String,
    name: String,
    distance: f64,
}

fn respond(catalog: &CatalogIndex, req: PathsRequest) -> starpaths::Result<PathsResponse> {
    match req {
        PathsRequest::Path {
            origin,
            target,
            policy,
        } => {
            let policy = policy.unwrap_or(VisitPolicy::CopyOnBranch);
            let systems = catalog.find_path_with(&origin, &target, policy)?;
            Ok(PathsResponse::Path { systems })
        }
        PathsRequest::Neighbours { name } => {
            let origin = catalog.lookup(&name)?;
            let systems = catalog
                .neighbours(origin)
                .iter()
                .map(|n| {
                    let s = &catalog.stars()[n.index];
                    NeighbourResult {
                        id: s.id.clone(),
                        name: s.label(),
                        distance: n.distance,
                    }
                })
                .collect();
            Ok(PathsResponse::Neighbours { systems })
        }
        PathsRequest::Paths {
            max_depth,
            max_paths,
            record_exhausted,
        } => {
            let limits = catalog
                .config()
                .enumeration
                .overridden(max_depth, max_paths, record_exhausted);
            let paths = catalog
                .enumerate_paths(&limits, VisitPolicy::Backtrack)?
                .iter()
                .map(|path| path.iter().map(|star| star.label()).collect())
                .collect();
            Ok(PathsResponse::Paths { paths })
        }
    }
}

async fn handler(event: LambdaEvent<PathsRequest>) -> Result<PathsResponse, Error> {
    let Some(catalog) = CATALOG.get() else {
        return Ok(PathsResponse::Error {
            message: "catalog not loaded".into(),
        });
    };
    match respond(catalog, event.payload) {
        Ok(response) => Ok(response),
        Err(err) => Ok(PathsResponse::Error {
            message: err.to_string(),
        }),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let dataset = env::var(ENV_DATASET).unwrap_or_else(|_| DEFAULT_DATASET.to_string());
    let catalog = read_catalog_from_file(&dataset)?;
    info!("loaded {} stars from {}", catalog.len(), dataset);
    CATALOG
        .set(catalog)
        .map_err(|_| "catalog was already loaded")?;

    let func = service_fn(handler);
    lambda_runtime::run(func).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use starpaths::{CatalogConfig, EnumerationLimits, StarRecord};

    fn fan_catalog() -> CatalogIndex {
        let limits = EnumerationLimits {
            max_depth: Some(2),
            max_paths: Some(1),
            record_exhausted: false,
        };
        CatalogIndex::build(
            vec![
                StarRecord::new("0", 0.0, 0.0, 0.0).unwrap().with_proper("Sol"),
                StarRecord::new("1", 0.0, 0.0, 1.0).unwrap().with_proper("A"),
                StarRecord::new("2", 180.0, 0.0, 1.0).unwrap().with_proper("B"),
            ],
            CatalogConfig::new(1.5, 4.0).unwrap().with_enumeration(limits),
        )
    }

    fn paths_of(response: PathsResponse) -> Vec<Vec<String>> {
        match response {
            PathsResponse::Paths { paths } => paths,
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn bare_paths_request_uses_catalog_limits() {
        let catalog = fan_catalog();
        let req: PathsRequest = serde_json::from_str(r#"{"kind":"paths"}"#).unwrap();
        let paths = paths_of(respond(&catalog, req).unwrap());
        assert_eq!(paths, vec![vec!["Sol", "A"]]);
    }

    #[test]
    fn request_fields_override_catalog_limits() {
        let catalog = fan_catalog();
        let req: PathsRequest = serde_json::from_str(r#"{"kind":"paths","max_paths":5}"#).unwrap();
        let paths = paths_of(respond(&catalog, req).unwrap());
        assert_eq!(paths, vec![vec!["Sol", "A"], vec!["Sol", "B"]]);
    }
}
