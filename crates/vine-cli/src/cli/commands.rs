use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use vine_core::models::VideoAddress;
use vine_core::nostr::{normalize_event_id, normalize_pubkey};
use vine_core::{
    cancel_channel, CancelSignal, CoreConfig, NostrRelayClient, Outcome, RelayConfig, SocialQueries,
    VideoRef,
};

/// A query requested from the command line, with inputs still unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Metrics {
        video_id: String,
        author: Option<String>,
        slug: Option<String>,
        address: Option<String>,
    },
    Interaction {
        video_id: String,
        viewer: String,
        author: Option<String>,
        slug: Option<String>,
        address: Option<String>,
    },
    Following {
        pubkey: String,
    },
    Followers {
        pubkey: String,
    },
    FollowCounts {
        pubkey: String,
    },
    Relays,
}

/// Resolve the video reference. An explicit `kind:author:slug` address wins
/// over separate author and slug arguments.
pub fn video_ref(
    video_id: &str,
    author: Option<&str>,
    slug: Option<&str>,
    address: Option<&str>,
) -> Result<VideoRef> {
    let mut video = VideoRef::new(normalize_event_id(video_id)?);

    let (author, slug) = match address {
        Some(coordinate) => {
            let address = VideoAddress::parse(coordinate)?;
            (Some(address.author), Some(address.slug))
        }
        None => (author.map(str::to_string), slug.map(str::to_string)),
    };

    if let Some(author) = author {
        video = video.with_author(normalize_pubkey(&author)?);
    }
    if let Some(slug) = slug {
        video = video.with_slug(slug);
    }
    Ok(video)
}

fn outcome_json<T: serde::Serialize>(key: &str, outcome: &Outcome<T>) -> Result<Value> {
    let mut report = json!({
        "degraded": outcome.is_degraded(),
        "failure": outcome.failure.as_ref().map(|e| e.to_string()),
    });
    report[key] = serde_json::to_value(&outcome.value)?;
    Ok(report)
}

/// Cancel in-flight queries on Ctrl-C.
fn cancel_on_ctrl_c() -> CancelSignal {
    let (cancel_tx, cancel_rx) = cancel_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling queries");
            let _ = cancel_tx.send(true);
        }
    });
    cancel_rx
}

fn relays_report(relays: &RelayConfig) -> Value {
    json!({
        "primary": relays.primary,
        "relays": relays.query_relays(),
        "searchRelays": relays.search_relays(),
    })
}

/// A command with validated inputs, ready to query relays.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Metrics(VideoRef),
    Interaction { video: VideoRef, viewer: String },
    Following(String),
    Followers(String),
    FollowCounts(String),
}

impl Request {
    /// Validate and normalize inputs. `None` for commands that need no relay.
    fn from_command(command: CliCommand) -> Result<Option<Self>> {
        let request = match command {
            CliCommand::Metrics {
                video_id,
                author,
                slug,
                address,
            } => Self::Metrics(video_ref(
                &video_id,
                author.as_deref(),
                slug.as_deref(),
                address.as_deref(),
            )?),
            CliCommand::Interaction {
                video_id,
                viewer,
                author,
                slug,
                address,
            } => Self::Interaction {
                video: video_ref(
                    &video_id,
                    author.as_deref(),
                    slug.as_deref(),
                    address.as_deref(),
                )?,
                viewer: normalize_pubkey(&viewer)?,
            },
            CliCommand::Following { pubkey } => Self::Following(normalize_pubkey(&pubkey)?),
            CliCommand::Followers { pubkey } => Self::Followers(normalize_pubkey(&pubkey)?),
            CliCommand::FollowCounts { pubkey } => {
                Self::FollowCounts(normalize_pubkey(&pubkey)?)
            }
            CliCommand::Relays => return Ok(None),
        };
        Ok(Some(request))
    }

    async fn run(self, queries: &SocialQueries, cancel: &CancelSignal) -> Result<Value> {
        let report = match self {
            Self::Metrics(video) => {
                let outcome = queries.video_metrics(&video, Some(cancel)).await;
                let mut report = outcome_json("metrics", &outcome)?;
                report["video"] = json!(video.id);
                report
            }
            Self::Interaction { video, viewer } => {
                let outcome = queries.interaction(&video, Some(&viewer), Some(cancel)).await;
                let mut report = outcome_json("interaction", &outcome)?;
                report["video"] = json!(video.id);
                report["viewer"] = json!(viewer);
                report
            }
            Self::Following(pubkey) => {
                let outcome = queries.following(&pubkey, Some(cancel)).await;
                let mut report = outcome_json("following", &outcome)?;
                report["pubkey"] = json!(pubkey);
                report["count"] = json!(outcome.value.len());
                report
            }
            Self::Followers(pubkey) => {
                let outcome = queries.followers(&pubkey, Some(cancel)).await;
                let mut report = outcome_json("followers", &outcome)?;
                report["pubkey"] = json!(pubkey);
                report["count"] = json!(outcome.value.len());
                report["approximate"] = json!(true);
                report
            }
            Self::FollowCounts(pubkey) => {
                let outcome = queries.follow_counts(&pubkey, Some(cancel)).await;
                let mut report = outcome_json("counts", &outcome)?;
                report["pubkey"] = json!(pubkey);
                report
            }
        };
        Ok(report)
    }
}

/// Run one command and return its JSON report. Inputs are validated before
/// any relay connection is opened.
pub async fn run_command(command: CliCommand, config: CoreConfig) -> Result<Value> {
    let Some(request) = Request::from_command(command)? else {
        return Ok(relays_report(&config.relays));
    };

    let client = NostrRelayClient::connect(&config.relays)
        .await
        .context("Failed to set up relay client")?;
    let queries = SocialQueries::new(Arc::new(client.clone()), config.queries);
    let cancel = cancel_on_ctrl_c();

    let report = request.run(&queries, &cancel).await;
    client.disconnect().await;
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "b3e392b11f5d4f28321cedd09303a748acfd0487aea5a7450b3481c60b6e4f87";
    const PUBKEY: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn test_video_ref_from_parts() {
        let video = video_ref(ID, Some(PUBKEY), Some("loop"), None).unwrap();
        assert_eq!(video.id, ID);
        assert_eq!(
            video.address().unwrap().to_string(),
            format!("34236:{}:loop", PUBKEY)
        );
    }

    #[test]
    fn test_video_ref_address_wins() {
        let coordinate = format!("34236:{}:from-address", PUBKEY);
        let video = video_ref(ID, None, Some("ignored"), Some(&coordinate)).unwrap();
        assert_eq!(video.slug.as_deref(), Some("from-address"));
    }

    #[test]
    fn test_video_ref_rejects_bad_input() {
        assert!(video_ref("not-an-id", None, None, None).is_err());
        assert!(video_ref(ID, Some("not-a-key"), Some("loop"), None).is_err());
        assert!(video_ref(ID, None, None, Some("34236:only")).is_err());
    }

    #[test]
    fn test_outcome_json_reports_failure() {
        let outcome: Outcome<Vec<String>> = Outcome::fallback(vine_core::QueryError::Cancelled);
        let report = outcome_json("followers", &outcome).unwrap();
        assert_eq!(report["degraded"], true);
        assert_eq!(report["failure"], "Query cancelled");
        assert_eq!(report["followers"], json!([]));
    }

    #[tokio::test]
    async fn test_relays_command_needs_no_connection() {
        let report = run_command(CliCommand::Relays, CoreConfig::default())
            .await
            .unwrap();
        assert_eq!(report["primary"], "wss://relay.divine.video");
        assert_eq!(report["searchRelays"], json!(["wss://relay.nostr.band"]));
    }

    #[test]
    fn test_inputs_validated_before_connecting() {
        let request = Request::from_command(CliCommand::Following {
            pubkey: PUBKEY.to_string(),
        })
        .unwrap();
        assert_eq!(request, Some(Request::Following(PUBKEY.to_string())));

        assert!(Request::from_command(CliCommand::Followers {
            pubkey: "not-a-key".to_string(),
        })
        .is_err());
        assert!(Request::from_command(CliCommand::Interaction {
            video_id: ID.to_string(),
            viewer: "not-a-key".to_string(),
            author: None,
            slug: None,
            address: None,
        })
        .is_err());
        assert_eq!(Request::from_command(CliCommand::Relays).unwrap(), None);
    }

    #[tokio::test]
    async fn test_bad_input_fails_without_relay_connection() {
        let config = CoreConfig {
            relays: RelayConfig::default().with_relays(vec!["not a relay url".to_string()]),
            ..Default::default()
        };
        let err = run_command(
            CliCommand::FollowCounts {
                pubkey: "not-a-key".to_string(),
            },
            config,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid public key"));
    }
}
